// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, ArgGroup, Command, crate_version, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn id_arg(help: &'static str) -> Arg {
    Arg::new("id").long("id").required(true).help(help)
}

fn user_arg() -> Arg {
    Arg::new("user")
        .long("user")
        .short('u')
        .required(true)
        .help("Owner username")
}

pub fn build_cli() -> Command {
    Command::new("pzledger")
        .version(crate_version!())
        .about("Bank accounts, category trees and transactions")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("Database file (overrides PZLEDGER_DB)"),
        )
        .subcommand(Command::new("init").about("Create or migrate the database"))
        .subcommand(
            Command::new("user")
                .about("Manage users")
                .subcommand(
                    Command::new("add").arg(Arg::new("username").required(true)),
                )
                .subcommand(Command::new("list"))
                .subcommand(
                    Command::new("rm")
                        .about("Delete a user and everything they own")
                        .arg(Arg::new("username").required(true)),
                ),
        )
        .subcommand(
            Command::new("account")
                .about("Manage bank accounts")
                .subcommand(
                    Command::new("add")
                        .arg(user_arg())
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .default_value(""),
                        )
                        .arg(
                            Arg::new("balance")
                                .long("balance")
                                .default_value("0")
                                .allow_hyphen_values(true),
                        )
                        .arg(Arg::new("currency").long("currency").required(true)),
                )
                .subcommand(json_flags(Command::new("list").arg(user_arg())))
                .subcommand(
                    Command::new("set")
                        .about("Change fields of an account")
                        .arg(id_arg("Account id"))
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("description").long("description"))
                        .arg(
                            Arg::new("balance")
                                .long("balance")
                                .allow_hyphen_values(true),
                        )
                        .arg(Arg::new("currency").long("currency")),
                )
                .subcommand(Command::new("rm").arg(id_arg("Account id"))),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(user_arg())
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("income or expense"),
                        )
                        .arg(Arg::new("icon").long("icon").default_value(""))
                        .arg(Arg::new("parent").long("parent").help("Parent category id")),
                )
                .subcommand(json_flags(Command::new("list").arg(user_arg())))
                .subcommand(
                    Command::new("move")
                        .about("Re-parent a category")
                        .arg(id_arg("Category id"))
                        .arg(Arg::new("parent").long("parent"))
                        .arg(Arg::new("root").long("root").action(ArgAction::SetTrue))
                        .group(
                            ArgGroup::new("target")
                                .args(["parent", "root"])
                                .required(true),
                        ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a category with its subtree and transactions")
                        .arg(id_arg("Category id")),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true),
                        )
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .default_value(""),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("account").long("account"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("from").long("from"))
                        .arg(Arg::new("to").long("to"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(Command::new("rm").arg(id_arg("Transaction id"))),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv or json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check stored data for integrity problems"))
}

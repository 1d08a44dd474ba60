// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pzledger::error::LedgerError;
use pzledger::models::{Currency, NewBankAccount, UserId};
use pzledger::store::{accounts, users};
use pzledger::{cli, commands, db};

#[test]
fn usernames_are_unique_and_trimmed() {
    let conn = db::open_in_memory().unwrap();
    let alice = users::create(&conn, "  alice ").unwrap();
    assert_eq!(alice.username, "alice");
    assert_eq!(alice.to_string(), "alice");
    assert!(matches!(
        users::create(&conn, "alice"),
        Err(LedgerError::Db(_))
    ));
    assert_eq!(users::get(&conn, alice.id()).unwrap(), alice);
    assert!(users::find_by_username(&conn, "carol").unwrap().is_none());
}

#[test]
fn cli_rm_removes_user_and_accounts() {
    let conn = db::open_in_memory().unwrap();
    let matches = cli::build_cli().get_matches_from(["pzledger", "user", "add", "alice"]);
    if let Some(("user", m)) = matches.subcommand() {
        commands::users::handle(&conn, m).unwrap();
    } else {
        panic!("no user subcommand");
    }
    let alice = users::require_by_username(&conn, "alice").unwrap();
    accounts::create(
        &conn,
        &NewBankAccount {
            user_id: alice.id(),
            name: "Checking".into(),
            description: String::new(),
            balance: "1".parse().unwrap(),
            currency: "GBP".parse::<Currency>().unwrap(),
        },
    )
    .unwrap();

    let matches = cli::build_cli().get_matches_from(["pzledger", "user", "rm", "alice"]);
    if let Some(("user", m)) = matches.subcommand() {
        commands::users::handle(&conn, m).unwrap();
    } else {
        panic!("no user subcommand");
    }
    assert!(users::list(&conn).unwrap().is_empty());
    assert!(accounts::list_for_user(&conn, alice.id()).unwrap().is_empty());
}

#[test]
fn blank_username_is_rejected() {
    let conn = db::open_in_memory().unwrap();
    assert!(matches!(
        users::create(&conn, "   "),
        Err(LedgerError::Blank { field: "username" })
    ));
    assert!(users::list(&conn).unwrap().is_empty());
}

#[test]
fn missing_user_is_not_found() {
    let conn = db::open_in_memory().unwrap();
    let id = UserId::generate();
    assert!(matches!(
        users::get(&conn, id),
        Err(LedgerError::NotFound { .. })
    ));
    assert!(matches!(
        users::delete(&conn, id),
        Err(LedgerError::NotFound { .. })
    ));
}

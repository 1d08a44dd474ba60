// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{BankAccountId, Currency, NewBankAccount};
use crate::store::accounts;
use crate::utils::{arg, maybe_print_json, opt_arg, parse_money, pretty_table, user_by_name};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("set", sub)) => set(conn, sub)?,
        Some(("rm", sub)) => {
            let id: BankAccountId = arg(sub, "id")?.parse()?;
            let account = accounts::get(conn, id)?;
            accounts::delete(conn, id)?;
            println!("Removed account '{}'", account);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = user_by_name(conn, arg(sub, "user")?)?;
    let new = NewBankAccount {
        user_id: user.id(),
        name: arg(sub, "name")?.to_string(),
        description: arg(sub, "description")?.to_string(),
        balance: parse_money(arg(sub, "balance")?)?,
        currency: arg(sub, "currency")?.parse::<Currency>()?,
    };
    let account = accounts::create(conn, &new)
        .with_context(|| format!("Could not add account '{}'", new.name.trim()))?;
    println!(
        "Added account '{}' ({} {}) id {}",
        account.name,
        account.balance,
        account.currency,
        account.id()
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = user_by_name(conn, arg(sub, "user")?)?;
    let data = accounts::list_for_user(conn, user.id())?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|a| {
            vec![
                a.name.clone(),
                a.description.clone(),
                a.balance.to_string(),
                a.currency.to_string(),
                a.id().to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Name", "Description", "Balance", "CCY", "Id"], rows)
    );
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id: BankAccountId = arg(sub, "id")?.parse()?;
    let mut account = accounts::get(conn, id)?;
    if let Some(name) = opt_arg(sub, "name") {
        account.name = name.to_string();
    }
    if let Some(desc) = opt_arg(sub, "description") {
        account.description = desc.to_string();
    }
    if let Some(balance) = opt_arg(sub, "balance") {
        account.balance = parse_money(balance)?;
    }
    if let Some(ccy) = opt_arg(sub, "currency") {
        account.currency = ccy.parse()?;
    }
    accounts::save(conn, &mut account)?;
    println!("Updated account '{}'", account);
    Ok(())
}

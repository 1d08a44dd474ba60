// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pzledger::error::LedgerError;
use pzledger::models::{BankAccountId, NewBankAccount, User};
use pzledger::store::{accounts, users};
use pzledger::{cli, commands, db};
use rusqlite::{Connection, params};

fn setup() -> (Connection, User) {
    let conn = db::open_in_memory().unwrap();
    let user = users::create(&conn, "alice").unwrap();
    (conn, user)
}

fn new_account(user: &User, name: &str, balance: &str) -> NewBankAccount {
    NewBankAccount {
        user_id: user.id(),
        name: name.into(),
        description: "everyday spending".into(),
        balance: balance.parse().unwrap(),
        currency: "usd".parse().unwrap(),
    }
}

#[test]
fn balance_round_trips_with_two_places() {
    let (conn, user) = setup();
    let created = accounts::create(&conn, &new_account(&user, "Checking", "12.3")).unwrap();

    let raw: String = conn
        .query_row(
            "SELECT balance FROM bank_accounts WHERE id=?1",
            params![created.id()],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(raw, "12.30");

    let fetched = accounts::get(&conn, created.id()).unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.balance.to_string(), "12.30");
    assert_eq!(fetched.currency.as_str(), "USD");
    assert_eq!(fetched.to_string(), "Checking");
}

#[test]
fn negative_balance_is_allowed() {
    let (conn, user) = setup();
    let a = accounts::create(&conn, &new_account(&user, "Card", "-250.75")).unwrap();
    assert!(accounts::get(&conn, a.id()).unwrap().balance.is_negative());
}

#[test]
fn save_keeps_created_at_and_advances_updated_at() {
    let (conn, user) = setup();
    let mut a = accounts::create(&conn, &new_account(&user, "Checking", "0")).unwrap();
    let created_at = a.created_at();
    let first = a.updated_at();

    a.name = "Main checking".into();
    a.balance = "99.99".parse().unwrap();
    accounts::save(&conn, &mut a).unwrap();
    let second = a.updated_at();
    assert!(second > first);

    accounts::save(&conn, &mut a).unwrap();
    assert!(a.updated_at() > second);

    let stored = accounts::get(&conn, a.id()).unwrap();
    assert_eq!(stored.created_at(), created_at);
    assert_eq!(stored.updated_at(), a.updated_at());
    assert_eq!(stored.name, "Main checking");
    assert_eq!(stored.balance.to_string(), "99.99");
}

#[test]
fn overlong_name_is_rejected() {
    let (conn, user) = setup();
    let long = "x".repeat(256);
    let err = accounts::create(&conn, &new_account(&user, &long, "1")).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::TooLong {
            field: "name",
            max: 255,
            len: 256
        }
    ));
}

#[test]
fn blank_name_is_rejected() {
    let (conn, user) = setup();
    assert!(matches!(
        accounts::create(&conn, &new_account(&user, " \t ", "1")),
        Err(LedgerError::Blank { field: "name" })
    ));

    let mut acct = accounts::create(&conn, &new_account(&user, "Checking", "1")).unwrap();
    acct.name = "  ".into();
    assert!(matches!(
        accounts::save(&conn, &mut acct),
        Err(LedgerError::Blank { field: "name" })
    ));
    assert_eq!(accounts::get(&conn, acct.id()).unwrap().name, "Checking");
}

#[test]
fn missing_account_is_not_found() {
    let (conn, _) = setup();
    let id = BankAccountId::generate();
    assert!(matches!(
        accounts::get(&conn, id),
        Err(LedgerError::NotFound { .. })
    ));
    assert!(matches!(
        accounts::delete(&conn, id),
        Err(LedgerError::NotFound { .. })
    ));
}

#[test]
fn accounts_are_listed_per_owner() {
    let (conn, alice) = setup();
    let bob = users::create(&conn, "bob").unwrap();
    accounts::create(&conn, &new_account(&alice, "Savings", "1")).unwrap();
    accounts::create(&conn, &new_account(&alice, "Checking", "1")).unwrap();
    accounts::create(&conn, &new_account(&bob, "Brokerage", "1")).unwrap();

    let names: Vec<String> = accounts::list_for_user(&conn, alice.id())
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(names, ["Checking", "Savings"]);
}

#[test]
fn cli_add_normalises_currency_and_balance() {
    let (conn, user) = setup();
    let matches = cli::build_cli().get_matches_from([
        "pzledger",
        "account",
        "add",
        "--user",
        "alice",
        "--name",
        "Travel card",
        "--balance",
        "-25.5",
        "--currency",
        "eur",
    ]);
    if let Some(("account", m)) = matches.subcommand() {
        commands::accounts::handle(&conn, m).unwrap();
    } else {
        panic!("no account subcommand");
    }

    let list = accounts::list_for_user(&conn, user.id()).unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].balance.to_string(), "-25.50");
    assert_eq!(list[0].currency.as_str(), "EUR");
    assert_eq!(list[0].description, "");
}

#[test]
fn cli_set_updates_only_given_fields() {
    let (conn, user) = setup();
    let a = accounts::create(&conn, &new_account(&user, "Checking", "10")).unwrap();
    let id = a.id().to_string();
    let matches = cli::build_cli().get_matches_from([
        "pzledger", "account", "set", "--id", &id, "--balance", "42",
    ]);
    if let Some(("account", m)) = matches.subcommand() {
        commands::accounts::handle(&conn, m).unwrap();
    } else {
        panic!("no account subcommand");
    }

    let stored = accounts::get(&conn, a.id()).unwrap();
    assert_eq!(stored.name, "Checking");
    assert_eq!(stored.balance.to_string(), "42.00");
    assert!(stored.updated_at() > a.updated_at());
}

#[test]
fn cli_add_for_unknown_user_fails() {
    let (conn, _) = setup();
    let matches = cli::build_cli().get_matches_from([
        "pzledger", "account", "add", "--user", "nobody", "--name", "X", "--currency", "USD",
    ]);
    if let Some(("account", m)) = matches.subcommand() {
        assert!(commands::accounts::handle(&conn, m).is_err());
    } else {
        panic!("no account subcommand");
    }
}

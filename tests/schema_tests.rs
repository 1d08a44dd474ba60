// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{TimeZone, Utc};
use pzledger::db;
use pzledger::models::{
    BankAccount, Category, CategoryKind, Money, NewBankAccount, NewCategory, NewTransaction,
    Transaction, User,
};
use pzledger::store::{accounts, categories, transactions, users};
use rusqlite::{Connection, params};

fn setup() -> (Connection, User) {
    let conn = db::open_in_memory().unwrap();
    let user = users::create(&conn, "alice").unwrap();
    (conn, user)
}

fn account(conn: &Connection, user: &User, name: &str) -> BankAccount {
    accounts::create(
        conn,
        &NewBankAccount {
            user_id: user.id(),
            name: name.into(),
            description: String::new(),
            balance: "100".parse().unwrap(),
            currency: "USD".parse().unwrap(),
        },
    )
    .unwrap()
}

fn category(conn: &Connection, user: &User, name: &str, parent: Option<&Category>) -> Category {
    categories::create(
        conn,
        &NewCategory {
            user_id: user.id(),
            parent_id: parent.map(|p| p.id()),
            name: name.into(),
            icon: String::new(),
            kind: CategoryKind::Expense,
        },
    )
    .unwrap()
}

fn record(conn: &Connection, a: &BankAccount, c: &Category, amount: &str) -> Transaction {
    transactions::create(
        conn,
        &NewTransaction {
            bank_account_id: a.id(),
            category_id: c.id(),
            description: "coffee".into(),
            date: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
            amount: amount.parse::<Money>().unwrap(),
        },
    )
    .unwrap()
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
        .unwrap()
}

#[test]
fn migrations_are_idempotent() {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    db::init_schema(&mut conn).unwrap();
    assert_eq!(db::schema_version(&conn).unwrap(), db::latest_version());
    let fk: i64 = conn
        .query_row("PRAGMA foreign_keys", [], |r| r.get(0))
        .unwrap();
    assert_eq!(fk, 1);
}

#[test]
fn primary_keys_cannot_be_rewritten() {
    let (conn, user) = setup();
    let a = account(&conn, &user, "Checking");
    let c = category(&conn, &user, "Food", None);
    let t = record(&conn, &a, &c, "2.75");

    let new_id = "00000000-0000-4000-8000-000000000000";
    for (table, id) in [
        ("users", user.id().to_string()),
        ("bank_accounts", a.id().to_string()),
        ("categories", c.id().to_string()),
        ("transactions", t.id().to_string()),
    ] {
        let res = conn.execute(
            &format!("UPDATE {table} SET id=?1 WHERE id=?2"),
            params![new_id, id],
        );
        assert!(res.is_err(), "{table}.id should be immutable");
    }

    for (table, id) in [
        ("bank_accounts", a.id().to_string()),
        ("transactions", t.id().to_string()),
    ] {
        let res = conn.execute(
            &format!("UPDATE {table} SET created_at='2000-01-01 00:00:00+00:00' WHERE id=?1"),
            params![id],
        );
        assert!(res.is_err(), "{table}.created_at should be immutable");
    }
    assert_eq!(transactions::get(&conn, t.id()).unwrap().created_at(), t.created_at());
}

#[test]
fn deleting_user_cascades_to_everything_owned() {
    let (conn, user) = setup();
    let bob = users::create(&conn, "bob").unwrap();
    let a = account(&conn, &user, "Checking");
    let food = category(&conn, &user, "Food", None);
    category(&conn, &user, "Groceries", Some(&food));
    record(&conn, &a, &food, "4.50");
    let bob_acct = account(&conn, &bob, "Savings");

    users::delete(&conn, user.id()).unwrap();

    assert_eq!(count(&conn, "users"), 1);
    assert_eq!(count(&conn, "bank_accounts"), 1);
    assert_eq!(count(&conn, "categories"), 0);
    assert_eq!(count(&conn, "transactions"), 0);
    assert!(accounts::get(&conn, bob_acct.id()).is_ok());
}

#[test]
fn deleting_parent_category_removes_subtree_and_its_transactions() {
    let (conn, user) = setup();
    let a = account(&conn, &user, "Checking");
    let food = category(&conn, &user, "Food", None);
    let groceries = category(&conn, &user, "Groceries", Some(&food));
    let produce = category(&conn, &user, "Produce", Some(&groceries));
    let travel = category(&conn, &user, "Travel", None);
    record(&conn, &a, &produce, "3.20");
    record(&conn, &a, &travel, "120");

    categories::delete(&conn, food.id()).unwrap();

    let left = categories::list_for_user(&conn, user.id()).unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].name, "Travel");
    assert_eq!(count(&conn, "transactions"), 1);
}

#[test]
fn deleting_account_removes_its_transactions() {
    let (conn, user) = setup();
    let a = account(&conn, &user, "Checking");
    let b = account(&conn, &user, "Cash");
    let food = category(&conn, &user, "Food", None);
    record(&conn, &a, &food, "1");
    record(&conn, &a, &food, "2");
    record(&conn, &b, &food, "3");

    accounts::delete(&conn, a.id()).unwrap();

    assert_eq!(count(&conn, "transactions"), 1);
    assert_eq!(count(&conn, "categories"), 1);
}

#[test]
fn category_type_column_only_holds_one_flag_byte() {
    let (conn, user) = setup();
    let res = conn.execute(
        "INSERT INTO categories(id, user_id, parent_id, name, icon, type)
         VALUES ('11111111-1111-4111-8111-111111111111', ?1, NULL, 'x', '', x'02')",
        params![user.id()],
    );
    assert!(res.is_err());
}

#[test]
fn category_cannot_reference_itself() {
    let (conn, user) = setup();
    let c = category(&conn, &user, "Food", None);
    let res = conn.execute(
        "UPDATE categories SET parent_id=id WHERE id=?1",
        params![c.id()],
    );
    assert!(res.is_err());
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{TimeZone, Utc};
use pzledger::models::{CategoryKind, NewBankAccount, NewCategory, NewTransaction};
use pzledger::store::{accounts, categories, transactions, users};
use pzledger::{cli, commands::exporter, db};
use rusqlite::Connection;
use tempfile::tempdir;

fn seeded_conn() -> Connection {
    let conn = db::open_in_memory().unwrap();
    let user = users::create(&conn, "alice").unwrap();
    let checking = accounts::create(
        &conn,
        &NewBankAccount {
            user_id: user.id(),
            name: "Checking".into(),
            description: String::new(),
            balance: "0".parse().unwrap(),
            currency: "USD".parse().unwrap(),
        },
    )
    .unwrap();
    let groceries = categories::create(
        &conn,
        &NewCategory {
            user_id: user.id(),
            parent_id: None,
            name: "Groceries".into(),
            icon: String::new(),
            kind: CategoryKind::Expense,
        },
    )
    .unwrap();
    transactions::create(
        &conn,
        &NewTransaction {
            bank_account_id: checking.id(),
            category_id: groceries.id(),
            description: "Corner Shop".into(),
            date: Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap(),
            amount: "12.34".parse().unwrap(),
        },
    )
    .unwrap();
    conn
}

fn run_export(conn: &Connection, format: &str, out: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from([
        "pzledger",
        "export",
        "transactions",
        "--format",
        format,
        "--out",
        out,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_transactions_streams_pretty_json() {
    let conn = seeded_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    run_export(&conn, "json", &out_path.to_string_lossy()).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item["account"], "Checking");
    assert_eq!(item["category"], "Groceries");
    assert_eq!(item["description"], "Corner Shop");
    assert_eq!(item["amount"], "12.34");
    assert_eq!(item["currency"], "USD");
    assert_eq!(item["user"], "alice");
    assert!(item["date"].as_str().unwrap().starts_with("2025-01-02"));
}

#[test]
fn export_transactions_writes_csv_with_header() {
    let conn = seeded_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    run_export(&conn, "CSV", &out_path.to_string_lossy()).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        ["id", "date", "account", "category", "description", "amount", "currency", "user"]
    );
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 1);
    assert_eq!(&records[0][5], "12.34");
}

#[test]
fn export_transactions_rejects_unknown_format() {
    let conn = seeded_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    assert!(run_export(&conn, "xml", &out_path.to_string_lossy()).is_err());
    assert!(!out_path.exists());
}

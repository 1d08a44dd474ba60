// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::arg;
use anyhow::{Result, bail};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

type ExportRow = (String, String, String, String, String, String, String, String);

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = arg(sub, "format")?.trim().to_lowercase();
    let out = arg(sub, "out")?.trim();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let mut stmt = conn.prepare(
        "SELECT t.id, t.date, a.name, c.name, t.description, t.amount, a.currency, u.username
         FROM transactions t
         JOIN bank_accounts a ON t.bank_account_id=a.id
         JOIN categories c ON t.category_id=c.id
         JOIN users u ON a.user_id=u.id
         ORDER BY t.date, t.created_at",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, String>(6)?,
            r.get::<_, String>(7)?,
        ))
    })?;
    let rows: Vec<ExportRow> = rows.collect::<rusqlite::Result<_>>()?;

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record([
            "id",
            "date",
            "account",
            "category",
            "description",
            "amount",
            "currency",
            "user",
        ])?;
        for (id, d, a, c, desc, amt, ccy, user) in rows {
            wtr.write_record([id, d, a, c, desc, amt, ccy, user])?;
        }
        wtr.flush()?;
    } else {
        let items: Vec<_> = rows
            .into_iter()
            .map(|(id, d, a, c, desc, amt, ccy, user)| {
                json!({
                    "id": id, "date": d, "account": a, "category": c,
                    "description": desc, "amount": amt, "currency": ccy, "user": user
                })
            })
            .collect();
        std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
    }
    println!("Exported transactions to {}", out);
    Ok(())
}

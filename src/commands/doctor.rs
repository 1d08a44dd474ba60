// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{HashMap, HashSet};

use crate::models::{Currency, MONEY_SCALE};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub kind: &'static str,
    pub detail: String,
}

impl Issue {
    fn new(kind: &'static str, detail: String) -> Self {
        Self { kind, detail }
    }
}

pub fn handle(conn: &Connection) -> Result<()> {
    let issues = check(conn)?;
    if issues.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        let rows = issues
            .into_iter()
            .map(|i| vec![i.kind.to_string(), i.detail])
            .collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

pub fn check(conn: &Connection) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();
    bad_decimals(conn, "bank_accounts", "balance", &mut issues)?;
    bad_decimals(conn, "transactions", "amount", &mut issues)?;
    bad_currencies(conn, &mut issues)?;
    category_loops(conn, &mut issues)?;
    cross_owner_transactions(conn, &mut issues)?;
    for i in &issues {
        warn!(kind = i.kind, detail = %i.detail, "doctor finding");
    }
    Ok(issues)
}

// 1) decimal text that is not an exact two-place value
fn bad_decimals(
    conn: &Connection,
    table: &str,
    column: &str,
    issues: &mut Vec<Issue>,
) -> Result<()> {
    let mut stmt = conn.prepare(&format!("SELECT id, CAST({column} AS TEXT) FROM {table}"))?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: String = r.get(0)?;
        let raw: String = r.get(1)?;
        let ok = raw
            .parse::<Decimal>()
            .map(|d| d.scale() == MONEY_SCALE)
            .unwrap_or(false);
        if !ok {
            issues.push(Issue::new(
                "bad_decimal",
                format!("{table}.{column} {id}: '{raw}'"),
            ));
        }
    }
    Ok(())
}

// 2) currency codes that are not three upper-case letters
fn bad_currencies(conn: &Connection, issues: &mut Vec<Issue>) -> Result<()> {
    let mut stmt = conn.prepare("SELECT id, currency FROM bank_accounts")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: String = r.get(0)?;
        let ccy: String = r.get(1)?;
        if !Currency::is_valid_code(&ccy) || ccy.to_ascii_uppercase() != ccy {
            issues.push(Issue::new("bad_currency", format!("account {id}: '{ccy}'")));
        }
    }
    Ok(())
}

// 3) parent chains that come back on themselves
fn category_loops(conn: &Connection, issues: &mut Vec<Issue>) -> Result<()> {
    let mut stmt = conn.prepare("SELECT id, parent_id FROM categories")?;
    let parents: HashMap<String, Option<String>> = stmt
        .query_map([], |r| {
            Ok((r.get::<_, String>(0)?, r.get::<_, Option<String>>(1)?))
        })?
        .collect::<rusqlite::Result<_>>()?;

    let mut ids: Vec<&String> = parents.keys().collect();
    ids.sort();
    for start in ids {
        let mut seen = HashSet::from([start.as_str()]);
        let mut next = parents.get(start).and_then(|p| p.as_deref());
        while let Some(p) = next {
            if !seen.insert(p) {
                if p == start.as_str() {
                    issues.push(Issue::new("category_loop", format!("category {start}")));
                }
                break;
            }
            next = parents.get(p).and_then(|pp| pp.as_deref());
        }
    }
    Ok(())
}

// 4) transactions linking an account and a category of different users
fn cross_owner_transactions(conn: &Connection, issues: &mut Vec<Issue>) -> Result<()> {
    let mut stmt = conn.prepare(
        "SELECT t.id FROM transactions t
         JOIN bank_accounts a ON t.bank_account_id=a.id
         JOIN categories c ON t.category_id=c.id
         WHERE a.user_id != c.user_id
         ORDER BY t.id",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: String = r.get(0)?;
        issues.push(Issue::new("owner_mismatch", format!("transaction {id}")));
    }
    Ok(())
}

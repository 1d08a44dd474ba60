// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, ToSql, params};
use tracing::{debug, info};

use super::{accounts, categories, expect_one, next_stamp, not_found, now};
use crate::error::{LedgerError, Result};
use crate::models::{
    BankAccountId, CategoryId, NewTransaction, Transaction, TransactionId,
};

const COLUMNS: &str = "t.id, t.bank_account_id, t.category_id, t.description, t.date, t.amount, \
                       t.created_at, t.updated_at";

fn from_row(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: r.get(0)?,
        bank_account_id: r.get(1)?,
        category_id: r.get(2)?,
        description: r.get(3)?,
        date: r.get(4)?,
        amount: r.get(5)?,
        created_at: r.get(6)?,
        updated_at: r.get(7)?,
    })
}

/// Optional narrowing for [`list`]. Dates are inclusive.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub bank_account_id: Option<BankAccountId>,
    pub category_id: Option<CategoryId>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

/// The account and the category must have the same owner.
fn check_links(
    conn: &Connection,
    bank_account_id: BankAccountId,
    category_id: CategoryId,
) -> Result<()> {
    let account = accounts::get(conn, bank_account_id)?;
    let category = categories::get(conn, category_id)?;
    if account.user_id() != category.user_id() {
        return Err(LedgerError::OwnerMismatch {
            what: format!(
                "Category '{}' and bank account '{}'",
                category.name, account.name
            ),
        });
    }
    Ok(())
}

pub fn create(conn: &Connection, new: &NewTransaction) -> Result<Transaction> {
    let stamp = now();
    let txn = Transaction {
        id: TransactionId::generate(),
        bank_account_id: new.bank_account_id,
        category_id: new.category_id,
        description: new.description.trim().to_string(),
        date: new.date,
        amount: new.amount,
        created_at: stamp,
        updated_at: stamp,
    };
    txn.validate()?;
    check_links(conn, txn.bank_account_id, txn.category_id)?;
    conn.execute(
        "INSERT INTO transactions(id, bank_account_id, category_id, description, date, amount,
                                  created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            txn.id,
            txn.bank_account_id,
            txn.category_id,
            txn.description,
            txn.date,
            txn.amount,
            txn.created_at,
            txn.updated_at
        ],
    )?;
    debug!(id = %txn.id, account = %txn.bank_account_id, "created transaction");
    Ok(txn)
}

pub fn get(conn: &Connection, id: TransactionId) -> Result<Transaction> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM transactions t WHERE t.id=?1"),
        params![id],
        from_row,
    )
    .optional()?
    .ok_or_else(|| not_found("Transaction", id))
}

/// Matching transactions, newest first.
pub fn list(conn: &Connection, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
    let mut sql = format!("SELECT {COLUMNS} FROM transactions t WHERE 1=1");
    let mut args: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(acct) = filter.bank_account_id {
        sql.push_str(" AND t.bank_account_id=?");
        args.push(Box::new(acct));
    }
    if let Some(cat) = filter.category_id {
        sql.push_str(" AND t.category_id=?");
        args.push(Box::new(cat));
    }
    if let Some(from) = filter.from {
        sql.push_str(" AND t.date>=?");
        args.push(Box::new(from));
    }
    if let Some(to) = filter.to {
        sql.push_str(" AND t.date<=?");
        args.push(Box::new(to));
    }
    sql.push_str(" ORDER BY t.date DESC, t.created_at DESC");
    if let Some(limit) = filter.limit {
        sql.push_str(" LIMIT ?");
        args.push(Box::new(i64::try_from(limit).unwrap_or(i64::MAX)));
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())),
        from_row,
    )?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Persist the mutable fields of `txn` and advance `updated_at`.
pub fn save(conn: &Connection, txn: &mut Transaction) -> Result<()> {
    txn.description = txn.description.trim().to_string();
    txn.validate()?;
    check_links(conn, txn.bank_account_id, txn.category_id)?;
    let stamp = next_stamp(txn.updated_at);
    let n = conn.execute(
        "UPDATE transactions SET bank_account_id=?2, category_id=?3, description=?4, date=?5,
                amount=?6, updated_at=?7
         WHERE id=?1",
        params![
            txn.id,
            txn.bank_account_id,
            txn.category_id,
            txn.description,
            txn.date,
            txn.amount,
            stamp
        ],
    )?;
    expect_one(n, "Transaction", txn.id)?;
    txn.updated_at = stamp;
    debug!(id = %txn.id, "saved transaction");
    Ok(())
}

pub fn delete(conn: &Connection, id: TransactionId) -> Result<()> {
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    expect_one(n, "Transaction", id)?;
    info!(id = %id, "deleted transaction");
    Ok(())
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, info};

use super::{expect_one, next_stamp, not_found, now};
use crate::error::Result;
use crate::models::{BankAccount, BankAccountId, NewBankAccount, UserId};

const COLUMNS: &str =
    "id, user_id, name, description, balance, currency, created_at, updated_at";

fn from_row(r: &Row<'_>) -> rusqlite::Result<BankAccount> {
    Ok(BankAccount {
        id: r.get(0)?,
        user_id: r.get(1)?,
        name: r.get(2)?,
        description: r.get(3)?,
        balance: r.get(4)?,
        currency: r.get(5)?,
        created_at: r.get(6)?,
        updated_at: r.get(7)?,
    })
}

pub fn create(conn: &Connection, new: &NewBankAccount) -> Result<BankAccount> {
    let stamp = now();
    let account = BankAccount {
        id: BankAccountId::generate(),
        user_id: new.user_id,
        name: new.name.trim().to_string(),
        description: new.description.trim().to_string(),
        balance: new.balance,
        currency: new.currency.clone(),
        created_at: stamp,
        updated_at: stamp,
    };
    account.validate()?;
    conn.execute(
        &format!("INSERT INTO bank_accounts({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
        params![
            account.id,
            account.user_id,
            account.name,
            account.description,
            account.balance,
            account.currency,
            account.created_at,
            account.updated_at
        ],
    )?;
    debug!(id = %account.id, user = %account.user_id, "created bank account");
    Ok(account)
}

pub fn get(conn: &Connection, id: BankAccountId) -> Result<BankAccount> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM bank_accounts WHERE id=?1"),
        params![id],
        from_row,
    )
    .optional()?
    .ok_or_else(|| not_found("Bank account", id))
}

pub fn list_for_user(conn: &Connection, user_id: UserId) -> Result<Vec<BankAccount>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM bank_accounts WHERE user_id=?1 ORDER BY name, created_at"
    ))?;
    let rows = stmt.query_map(params![user_id], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Persist the mutable fields of `account` and advance `updated_at`.
pub fn save(conn: &Connection, account: &mut BankAccount) -> Result<()> {
    account.name = account.name.trim().to_string();
    account.description = account.description.trim().to_string();
    account.validate()?;
    let stamp = next_stamp(account.updated_at);
    let n = conn.execute(
        "UPDATE bank_accounts SET name=?2, description=?3, balance=?4, currency=?5, updated_at=?6
         WHERE id=?1",
        params![
            account.id,
            account.name,
            account.description,
            account.balance,
            account.currency,
            stamp
        ],
    )?;
    expect_one(n, "Bank account", account.id)?;
    account.updated_at = stamp;
    debug!(id = %account.id, "saved bank account");
    Ok(())
}

/// Removes the account and, by cascade, its transactions.
pub fn delete(conn: &Connection, id: BankAccountId) -> Result<()> {
    let n = conn.execute("DELETE FROM bank_accounts WHERE id=?1", params![id])?;
    expect_one(n, "Bank account", id)?;
    info!(id = %id, "deleted bank account");
    Ok(())
}

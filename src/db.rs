// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;

/// Ordered schema scripts. `PRAGMA user_version` holds how many ran.
const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE users(
        id TEXT PRIMARY KEY NOT NULL,
        username TEXT NOT NULL UNIQUE CHECK(length(username) <= 150),
        created_at TEXT NOT NULL
    );

    CREATE TABLE bank_accounts(
        id TEXT PRIMARY KEY NOT NULL,
        user_id TEXT NOT NULL,
        name TEXT NOT NULL CHECK(length(name) <= 255),
        description TEXT NOT NULL CHECK(length(description) <= 255),
        balance TEXT NOT NULL, -- DECIMAL(12,2) as text
        currency TEXT NOT NULL CHECK(length(currency) = 3),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );
    CREATE INDEX idx_bank_accounts_user ON bank_accounts(user_id);

    CREATE TABLE categories(
        id TEXT PRIMARY KEY NOT NULL,
        user_id TEXT NOT NULL,
        parent_id TEXT,
        name TEXT NOT NULL CHECK(length(name) <= 255),
        icon TEXT NOT NULL CHECK(length(icon) <= 200),
        type BLOB NOT NULL CHECK(type IN (x'00', x'01')),
        CHECK(parent_id IS NULL OR parent_id != id),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY(parent_id) REFERENCES categories(id) ON DELETE CASCADE
    );
    CREATE INDEX idx_categories_user ON categories(user_id);
    CREATE INDEX idx_categories_parent ON categories(parent_id);

    CREATE TABLE transactions(
        id TEXT PRIMARY KEY NOT NULL,
        bank_account_id TEXT NOT NULL,
        category_id TEXT NOT NULL,
        description TEXT NOT NULL CHECK(length(description) <= 255),
        date TEXT NOT NULL,
        amount TEXT NOT NULL, -- DECIMAL(12,2) as text
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY(bank_account_id) REFERENCES bank_accounts(id) ON DELETE CASCADE,
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE CASCADE
    );
    CREATE INDEX idx_transactions_account ON transactions(bank_account_id);
    CREATE INDEX idx_transactions_category ON transactions(category_id);
    CREATE INDEX idx_transactions_date ON transactions(date);

    CREATE TRIGGER users_immutable BEFORE UPDATE ON users
    WHEN NEW.id IS NOT OLD.id OR NEW.created_at IS NOT OLD.created_at
    BEGIN
        SELECT RAISE(ABORT, 'users.id and users.created_at are immutable');
    END;

    CREATE TRIGGER bank_accounts_immutable BEFORE UPDATE ON bank_accounts
    WHEN NEW.id IS NOT OLD.id OR NEW.created_at IS NOT OLD.created_at
    BEGIN
        SELECT RAISE(ABORT, 'bank_accounts.id and bank_accounts.created_at are immutable');
    END;

    CREATE TRIGGER categories_immutable BEFORE UPDATE ON categories
    WHEN NEW.id IS NOT OLD.id
    BEGIN
        SELECT RAISE(ABORT, 'categories.id is immutable');
    END;

    CREATE TRIGGER transactions_immutable BEFORE UPDATE ON transactions
    WHEN NEW.id IS NOT OLD.id OR NEW.created_at IS NOT OLD.created_at
    BEGIN
        SELECT RAISE(ABORT, 'transactions.id and transactions.created_at are immutable');
    END;
    "#,
];

pub fn open_or_init(cfg: &Config) -> Result<Connection> {
    open(&cfg.db_path)
}

pub fn open(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let mut conn = Connection::open(path)?;
    debug!(path = %path.display(), "opened database");
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let mut conn = Connection::open_in_memory()?;
    init_schema(&mut conn)?;
    Ok(conn)
}

/// Enable foreign keys on this connection and bring the schema up to date.
pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    migrate(conn)
}

pub fn schema_version(conn: &Connection) -> Result<usize> {
    let v: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    Ok(usize::try_from(v).unwrap_or(0))
}

pub fn latest_version() -> usize {
    MIGRATIONS.len()
}

fn migrate(conn: &mut Connection) -> Result<()> {
    let current = schema_version(conn)?;
    if current >= MIGRATIONS.len() {
        return Ok(());
    }
    let tx = conn.transaction()?;
    for (idx, script) in MIGRATIONS.iter().enumerate().skip(current) {
        tx.execute_batch(script)?;
        info!(version = idx + 1, "applied schema migration");
    }
    tx.pragma_update(None, "user_version", MIGRATIONS.len() as i64)?;
    tx.commit()?;
    Ok(())
}

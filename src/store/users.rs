// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, info};

use super::{expect_one, not_found, now};
use crate::error::Result;
use crate::models::{USERNAME_MAX, User, UserId, check_name};

const COLUMNS: &str = "id, username, created_at";

fn from_row(r: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: r.get(0)?,
        username: r.get(1)?,
        created_at: r.get(2)?,
    })
}

pub fn create(conn: &Connection, username: &str) -> Result<User> {
    let username = username.trim();
    check_name("username", username, USERNAME_MAX)?;
    let user = User {
        id: UserId::generate(),
        username: username.to_string(),
        created_at: now(),
    };
    conn.execute(
        "INSERT INTO users(id, username, created_at) VALUES (?1, ?2, ?3)",
        params![user.id, user.username, user.created_at],
    )?;
    debug!(id = %user.id, "created user");
    Ok(user)
}

pub fn get(conn: &Connection, id: UserId) -> Result<User> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM users WHERE id=?1"),
        params![id],
        from_row,
    )
    .optional()?
    .ok_or_else(|| not_found("User", id))
}

pub fn find_by_username(conn: &Connection, username: &str) -> Result<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM users WHERE username=?1"),
            params![username.trim()],
            from_row,
        )
        .optional()?;
    Ok(user)
}

/// Like [`find_by_username`] but a missing user is an error.
pub fn require_by_username(conn: &Connection, username: &str) -> Result<User> {
    find_by_username(conn, username)?.ok_or_else(|| not_found("User", username.trim()))
}

pub fn list(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM users ORDER BY username"))?;
    let rows = stmt.query_map([], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Removes the user together with every account, category and
/// transaction they own.
pub fn delete(conn: &Connection, id: UserId) -> Result<()> {
    let n = conn.execute("DELETE FROM users WHERE id=?1", params![id])?;
    expect_one(n, "User", id)?;
    info!(id = %id, "deleted user");
    Ok(())
}

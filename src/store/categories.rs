// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashSet;

use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, info};

use super::{expect_one, not_found};
use crate::error::{LedgerError, Result};
use crate::models::{Category, CategoryId, NewCategory, UserId};

const COLUMNS: &str = "c.id, c.user_id, c.parent_id, c.name, c.icon, c.type";

fn from_row(r: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: r.get(0)?,
        user_id: r.get(1)?,
        parent_id: r.get(2)?,
        name: r.get(3)?,
        icon: r.get(4)?,
        kind: r.get(5)?,
    })
}

fn collect(conn: &Connection, sql: &str, p: impl rusqlite::Params) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(p, from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn create(conn: &Connection, new: &NewCategory) -> Result<Category> {
    let category = Category {
        id: CategoryId::generate(),
        user_id: new.user_id,
        parent_id: new.parent_id,
        name: new.name.trim().to_string(),
        icon: new.icon.trim().to_string(),
        kind: new.kind,
    };
    category.validate()?;
    if let Some(parent_id) = category.parent_id {
        let parent = get(conn, parent_id)?;
        if parent.user_id != category.user_id {
            return Err(LedgerError::OwnerMismatch {
                what: format!("Parent category '{}'", parent.name),
            });
        }
    }
    conn.execute(
        "INSERT INTO categories(id, user_id, parent_id, name, icon, type)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            category.id,
            category.user_id,
            category.parent_id,
            category.name,
            category.icon,
            category.kind
        ],
    )?;
    debug!(id = %category.id, parent = ?category.parent_id, "created category");
    Ok(category)
}

pub fn get(conn: &Connection, id: CategoryId) -> Result<Category> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM categories c WHERE c.id=?1"),
        params![id],
        from_row,
    )
    .optional()?
    .ok_or_else(|| not_found("Category", id))
}

pub fn list_for_user(conn: &Connection, user_id: UserId) -> Result<Vec<Category>> {
    collect(
        conn,
        &format!("SELECT {COLUMNS} FROM categories c WHERE c.user_id=?1 ORDER BY c.name"),
        params![user_id],
    )
}

/// Direct children only.
pub fn children(conn: &Connection, id: CategoryId) -> Result<Vec<Category>> {
    collect(
        conn,
        &format!("SELECT {COLUMNS} FROM categories c WHERE c.parent_id=?1 ORDER BY c.name"),
        params![id],
    )
}

/// Every category below `id`, at any depth.
pub fn descendants(conn: &Connection, id: CategoryId) -> Result<Vec<Category>> {
    collect(
        conn,
        &format!(
            "WITH RECURSIVE subtree(id) AS (
                 SELECT id FROM categories WHERE parent_id=?1
                 UNION
                 SELECT k.id FROM categories k JOIN subtree s ON k.parent_id=s.id
             )
             SELECT {COLUMNS} FROM categories c JOIN subtree s ON c.id=s.id ORDER BY c.name"
        ),
        params![id],
    )
}

/// Parent chain of `id`, nearest first. Stops if the chain loops.
pub fn ancestors(conn: &Connection, id: CategoryId) -> Result<Vec<Category>> {
    let mut seen = HashSet::from([id]);
    let mut chain = Vec::new();
    let mut next = get(conn, id)?.parent_id;
    while let Some(parent_id) = next {
        if !seen.insert(parent_id) {
            break;
        }
        let parent = get(conn, parent_id)?;
        next = parent.parent_id;
        chain.push(parent);
    }
    Ok(chain)
}

/// Persist name, icon, kind and parent. Re-parenting under the category
/// itself, one of its descendants or another user's category is refused.
pub fn save(conn: &Connection, category: &mut Category) -> Result<()> {
    category.name = category.name.trim().to_string();
    category.icon = category.icon.trim().to_string();
    category.validate()?;
    if let Some(parent_id) = category.parent_id {
        check_parent(conn, category, parent_id)?;
    }
    let n = conn.execute(
        "UPDATE categories SET parent_id=?2, name=?3, icon=?4, type=?5 WHERE id=?1",
        params![
            category.id,
            category.parent_id,
            category.name,
            category.icon,
            category.kind
        ],
    )?;
    expect_one(n, "Category", category.id)?;
    debug!(id = %category.id, parent = ?category.parent_id, "saved category");
    Ok(())
}

fn check_parent(conn: &Connection, category: &Category, parent_id: CategoryId) -> Result<()> {
    let cycle = || LedgerError::CategoryCycle {
        category: category.id.to_string(),
        parent: parent_id.to_string(),
    };
    if parent_id == category.id {
        return Err(cycle());
    }
    let parent = get(conn, parent_id)?;
    if parent.user_id != category.user_id {
        return Err(LedgerError::OwnerMismatch {
            what: format!("Parent category '{}'", parent.name),
        });
    }
    if descendants(conn, category.id)?
        .iter()
        .any(|d| d.id == parent_id)
    {
        return Err(cycle());
    }
    Ok(())
}

/// Removes the category, its whole subtree and every transaction filed
/// under any of them.
pub fn delete(conn: &Connection, id: CategoryId) -> Result<()> {
    let n = conn.execute("DELETE FROM categories WHERE id=?1", params![id])?;
    expect_one(n, "Category", id)?;
    info!(id = %id, "deleted category");
    Ok(())
}

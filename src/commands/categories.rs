// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{HashMap, HashSet};

use crate::models::{Category, CategoryId, CategoryKind, NewCategory};
use crate::store::categories;
use crate::utils::{arg, maybe_print_json, opt_arg, pretty_table, user_by_name};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("move", sub)) => move_to(conn, sub)?,
        Some(("rm", sub)) => {
            let id: CategoryId = arg(sub, "id")?.parse()?;
            let category = categories::get(conn, id)?;
            let below = categories::descendants(conn, id)?.len();
            categories::delete(conn, id)?;
            println!(
                "Removed category '{}' and {} subcategories",
                category, below
            );
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = user_by_name(conn, arg(sub, "user")?)?;
    let parent_id = opt_arg(sub, "parent")
        .map(str::parse::<CategoryId>)
        .transpose()?;
    let new = NewCategory {
        user_id: user.id(),
        parent_id,
        name: arg(sub, "name")?.to_string(),
        icon: arg(sub, "icon")?.to_string(),
        kind: arg(sub, "kind")?.parse::<CategoryKind>()?,
    };
    let category = categories::create(conn, &new)
        .with_context(|| format!("Could not add category '{}'", new.name.trim()))?;
    println!(
        "Added {} category '{}' id {}",
        category.kind,
        category.name,
        category.id()
    );
    Ok(())
}

fn move_to(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id: CategoryId = arg(sub, "id")?.parse()?;
    let mut category = categories::get(conn, id)?;
    category.parent_id = if sub.get_flag("root") {
        None
    } else {
        opt_arg(sub, "parent")
            .map(str::parse::<CategoryId>)
            .transpose()?
    };
    categories::save(conn, &mut category)?;
    match category.parent_id {
        Some(p) => println!("Moved '{}' under {}", category, p),
        None => println!("Moved '{}' to the top level", category),
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = user_by_name(conn, arg(sub, "user")?)?;
    let data = categories::list_for_user(conn, user.id())?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = tree_rows(&data)
        .into_iter()
        .map(|(depth, c)| {
            vec![
                format!("{}{}", "  ".repeat(depth), c.name),
                c.kind.to_string(),
                c.icon.clone(),
                c.id().to_string(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Kind", "Icon", "Id"], rows));
    Ok(())
}

/// Depth-first order with depth, parents before children. Categories
/// unreachable from a root (only possible in a looped chain) come last at
/// depth zero.
pub fn tree_rows(all: &[Category]) -> Vec<(usize, &Category)> {
    let ids: HashSet<CategoryId> = all.iter().map(|c| c.id()).collect();
    let mut by_parent: HashMap<Option<CategoryId>, Vec<&Category>> = HashMap::new();
    for c in all {
        let key = c.parent_id.filter(|p| ids.contains(p));
        by_parent.entry(key).or_default().push(c);
    }

    let mut out = Vec::with_capacity(all.len());
    let mut seen = HashSet::new();
    let mut stack: Vec<(usize, &Category)> = by_parent
        .get(&None)
        .map(|roots| roots.iter().rev().map(|c| (0, *c)).collect())
        .unwrap_or_default();
    while let Some((depth, c)) = stack.pop() {
        if !seen.insert(c.id()) {
            continue;
        }
        out.push((depth, c));
        if let Some(kids) = by_parent.get(&Some(c.id())) {
            stack.extend(kids.iter().rev().map(|k| (depth + 1, *k)));
        }
    }
    for c in all {
        if !seen.contains(&c.id()) {
            out.push((0, c));
        }
    }
    out
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::users;
use crate::utils::{arg, pretty_table, user_by_name};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = arg(sub, "username")?;
            let user = users::create(conn, name)
                .with_context(|| format!("Could not add user '{}'", name.trim()))?;
            println!("Added user '{}' ({})", user.username, user.id());
        }
        Some(("list", _)) => {
            let data = users::list(conn)?
                .into_iter()
                .map(|u| {
                    vec![
                        u.username.clone(),
                        u.id().to_string(),
                        u.created_at().to_rfc3339(),
                    ]
                })
                .collect();
            println!("{}", pretty_table(&["User", "Id", "Created"], data));
        }
        Some(("rm", sub)) => {
            let user = user_by_name(conn, arg(sub, "username")?)?;
            users::delete(conn, user.id())?;
            println!("Removed user '{}' and everything they owned", user.username);
        }
        _ => {}
    }
    Ok(())
}

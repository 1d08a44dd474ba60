// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt};

use pzledger::{cli, commands, config::Config, db};

fn main() -> Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("tracing init failed: {e}");
    }

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let cfg = Config::resolve(matches.get_one::<String>("db").map(|s| s.as_str()))?;
    let conn = db::open_or_init(&cfg)
        .with_context(|| format!("Open DB at {}", cfg.db_path.display()))?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!(
                "Database initialized at {} (schema v{})",
                cfg.db_path.display(),
                db::schema_version(&conn)?
            );
        }
        Some(("user", sub)) => commands::users::handle(&conn, sub)?,
        Some(("account", sub)) => commands::accounts::handle(&conn, sub)?,
        Some(("category", sub)) => commands::categories::handle(&conn, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

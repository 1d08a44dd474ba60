// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::env;
use std::path::PathBuf;

use directories::ProjectDirs;
use once_cell::sync::Lazy;

use crate::error::{LedgerError, Result};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.pzledger", "Pzledger", "pzledger"));

pub const DB_ENV: &str = "PZLEDGER_DB";
pub const DB_FILE: &str = "pzledger.sqlite";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
}

impl Config {
    /// Resolve the database location: explicit path, then `PZLEDGER_DB`,
    /// then the platform data directory.
    pub fn resolve(explicit: Option<&str>) -> Result<Self> {
        let from_env = env::var(DB_ENV).ok();
        Self::resolve_with(explicit, from_env.as_deref())
    }

    pub fn resolve_with(explicit: Option<&str>, from_env: Option<&str>) -> Result<Self> {
        let chosen = explicit
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or_else(|| from_env.map(str::trim).filter(|s| !s.is_empty()));
        let db_path = match chosen {
            Some(p) => PathBuf::from(p),
            None => default_db_path()?,
        };
        Ok(Self { db_path })
    }
}

pub fn default_db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2).ok_or_else(|| {
        LedgerError::Config("Could not determine platform-specific data dir".into())
    })?;
    Ok(proj.data_dir().join(DB_FILE))
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use pzledger::config::Config;
use pzledger::{db, store::users};
use tempfile::tempdir;

#[test]
fn explicit_path_wins_over_environment() {
    let cfg = Config::resolve_with(Some("/tmp/a.sqlite"), Some("/tmp/b.sqlite")).unwrap();
    assert_eq!(cfg.db_path, PathBuf::from("/tmp/a.sqlite"));
}

#[test]
fn environment_used_when_no_flag() {
    let cfg = Config::resolve_with(None, Some(" /tmp/b.sqlite ")).unwrap();
    assert_eq!(cfg.db_path, PathBuf::from("/tmp/b.sqlite"));
    let cfg = Config::resolve_with(Some("  "), Some("/tmp/c.sqlite")).unwrap();
    assert_eq!(cfg.db_path, PathBuf::from("/tmp/c.sqlite"));
}

#[test]
fn open_creates_missing_directories_and_persists() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("ledger.sqlite");
    let cfg = Config::resolve_with(Some(path.to_str().unwrap()), None).unwrap();

    let conn = db::open_or_init(&cfg).unwrap();
    users::create(&conn, "alice").unwrap();
    drop(conn);

    let reopened = db::open(&path).unwrap();
    assert_eq!(db::schema_version(&reopened).unwrap(), db::latest_version());
    assert!(users::find_by_username(&reopened, "alice").unwrap().is_some());
}

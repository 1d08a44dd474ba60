// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-entity persistence. Each module owns the SQL for one table and
//! maps rows into the types in [`crate::models`].

pub mod accounts;
pub mod categories;
pub mod transactions;
pub mod users;

use chrono::{DateTime, Duration, Utc};

use crate::error::{LedgerError, Result};

pub(crate) fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Next `updated_at` value: the current time, or one microsecond past the
/// previous stamp when the clock has not moved on.
pub(crate) fn next_stamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let current = now();
    if current > previous {
        current
    } else {
        previous + Duration::microseconds(1)
    }
}

/// Map a zero-row UPDATE/DELETE onto `NotFound`.
pub(crate) fn expect_one(changed: usize, entity: &'static str, id: impl ToString) -> Result<()> {
    if changed == 0 {
        return Err(LedgerError::NotFound {
            entity,
            id: id.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> LedgerError {
    LedgerError::NotFound {
        entity,
        id: id.to_string(),
    }
}

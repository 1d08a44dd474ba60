// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid currency code '{0}', expected three letters such as EUR")]
    InvalidCurrency(String),

    #[error("Invalid amount '{0}'")]
    InvalidAmount(String),

    #[error("Amount {0} exceeds 12 digits (10 before the decimal point)")]
    AmountOutOfRange(Decimal),

    #[error("{field} must not be blank")]
    Blank { field: &'static str },

    #[error("{field} is {len} characters long, at most {max} allowed")]
    TooLong {
        field: &'static str,
        max: usize,
        len: usize,
    },

    #[error("Invalid icon URL '{0}'")]
    InvalidIcon(String),

    #[error("Invalid category kind '{0}', expected income or expense")]
    InvalidKind(String),

    #[error("Invalid id '{0}'")]
    InvalidId(String),

    #[error("Category {category} cannot be placed under {parent}: it would become its own ancestor")]
    CategoryCycle { category: String, parent: String },

    #[error("{what} belongs to a different user")]
    OwnerMismatch { what: String },

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

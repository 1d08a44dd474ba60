// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Value, ValueRef};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{LedgerError, Result};

pub const NAME_MAX: usize = 255;
pub const USERNAME_MAX: usize = 150;
pub const ICON_MAX: usize = 200;

/// Fractional digits kept for every monetary column.
pub const MONEY_SCALE: u32 = 2;
/// Total significant digits allowed, i.e. `DECIMAL(12, 2)`.
pub const MONEY_MAX_DIGITS: u32 = 12;

static ICON_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)(https?|ftps?)://[^\s/?#]+[^\s]*$").expect("icon url pattern compiles")
});

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Fresh random (v4) identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.hyphenated())
            }
        }

        impl FromStr for $name {
            type Err = LedgerError;

            fn from_str(s: &str) -> Result<Self> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|_| LedgerError::InvalidId(s.to_string()))
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.to_string()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                Uuid::parse_str(value.as_str()?)
                    .map(Self)
                    .map_err(|e| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

uuid_id!(UserId);
uuid_id!(BankAccountId);
uuid_id!(CategoryId);
uuid_id!(TransactionId);

/// Exact decimal with two fractional digits and at most twelve digits in
/// total. Values with more precision are rounded half-to-even.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub fn new(value: Decimal) -> Result<Self> {
        let mut rounded =
            value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven);
        let limit = Decimal::from(10_i64.pow(MONEY_MAX_DIGITS - MONEY_SCALE));
        if rounded.abs() >= limit {
            return Err(LedgerError::AmountOutOfRange(value));
        }
        rounded.rescale(MONEY_SCALE);
        Ok(Self(rounded))
    }

    pub fn zero() -> Self {
        Self(Decimal::new(0, MONEY_SCALE))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl TryFrom<Decimal> for Money {
    type Error = LedgerError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(m: Money) -> Self {
        m.0
    }
}

impl FromStr for Money {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let d = s
            .trim()
            .parse::<Decimal>()
            .map_err(|_| LedgerError::InvalidAmount(s.to_string()))?;
        Self::new(d)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for Money {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for Money {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let parsed = match value {
            ValueRef::Text(_) => value.as_str()?.parse::<Self>(),
            ValueRef::Integer(i) => Self::new(Decimal::from(i)),
            _ => return Err(FromSqlError::InvalidType),
        };
        parsed.map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// Three-letter currency code, stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_valid_code(s: &str) -> bool {
        s.len() == 3 && s.bytes().all(|b| b.is_ascii_alphabetic())
    }
}

impl FromStr for Currency {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim();
        if !Self::is_valid_code(code) {
            return Err(LedgerError::InvalidCurrency(s.to_string()));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }
}

impl TryFrom<String> for Currency {
    type Error = LedgerError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Currency> for String {
    fn from(c: Currency) -> Self {
        c.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl ToSql for Currency {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.as_str()))
    }
}

impl FromSql for Currency {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse::<Self>()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// Direction of money flow for a category. Persisted as a single byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Expense,
    Income,
}

impl CategoryKind {
    pub fn as_byte(self) -> u8 {
        match self {
            CategoryKind::Expense => 0x00,
            CategoryKind::Income => 0x01,
        }
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x00 => Some(CategoryKind::Expense),
            0x01 => Some(CategoryKind::Income),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryKind::Expense => "expense",
            CategoryKind::Income => "income",
        }
    }
}

impl FromStr for CategoryKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expense" | "output" | "out" => Ok(CategoryKind::Expense),
            "income" | "input" | "in" => Ok(CategoryKind::Income),
            _ => Err(LedgerError::InvalidKind(s.to_string())),
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for CategoryKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Owned(Value::Blob(vec![self.as_byte()])))
    }
}

impl FromSql for CategoryKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_blob()? {
            [b] => Self::from_byte(*b).ok_or(FromSqlError::OutOfRange(i64::from(*b))),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub(crate) id: UserId,
    pub username: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl User {
    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.username)
    }
}

/// A bank account owned by one user. `id`, the owner and both timestamps
/// are managed by the store; the rest is assigned directly and persisted
/// with `store::accounts::save`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    pub(crate) id: BankAccountId,
    pub(crate) user_id: UserId,
    pub name: String,
    pub description: String,
    pub balance: Money,
    pub currency: Currency,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl BankAccount {
    pub fn id(&self) -> BankAccountId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(crate) fn validate(&self) -> Result<()> {
        check_name("name", &self.name, NAME_MAX)?;
        check_len("description", &self.description, NAME_MAX)
    }
}

impl fmt::Display for BankAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone)]
pub struct NewBankAccount {
    pub user_id: UserId,
    pub name: String,
    pub description: String,
    pub balance: Money,
    pub currency: Currency,
}

/// A node in a user's category forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub(crate) id: CategoryId,
    pub(crate) user_id: UserId,
    pub parent_id: Option<CategoryId>,
    pub name: String,
    pub icon: String,
    pub kind: CategoryKind,
}

impl Category {
    pub fn id(&self) -> CategoryId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        check_name("name", &self.name, NAME_MAX)?;
        check_icon(&self.icon)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub user_id: UserId,
    pub parent_id: Option<CategoryId>,
    pub name: String,
    pub icon: String,
    pub kind: CategoryKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub(crate) id: TransactionId,
    pub bank_account_id: BankAccountId,
    pub category_id: CategoryId,
    pub description: String,
    pub date: DateTime<Utc>,
    pub amount: Money,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Amount with the direction implied by the category kind: expenses
    /// are negative, income positive, whatever sign was entered.
    pub fn signed_amount(&self, kind: CategoryKind) -> Decimal {
        let magnitude = self.amount.value().abs();
        match kind {
            CategoryKind::Expense => -magnitude,
            CategoryKind::Income => magnitude,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        check_len("description", &self.description, NAME_MAX)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub bank_account_id: BankAccountId,
    pub category_id: CategoryId,
    pub description: String,
    pub date: DateTime<Utc>,
    pub amount: Money,
}

pub(crate) fn check_name(field: &'static str, value: &str, max: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::Blank { field });
    }
    check_len(field, value, max)
}

pub(crate) fn check_len(field: &'static str, value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len > max {
        return Err(LedgerError::TooLong { field, max, len });
    }
    Ok(())
}

/// Empty means "no icon".
pub(crate) fn check_icon(icon: &str) -> Result<()> {
    if icon.is_empty() {
        return Ok(());
    }
    check_len("icon", icon, ICON_MAX)?;
    if !ICON_URL.is_match(icon) {
        return Err(LedgerError::InvalidIcon(icon.to_string()));
    }
    Ok(())
}

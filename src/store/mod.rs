//! SQLite persistence for configurations, employees and severance records.
//!
//! The ledger tables (entries, audit rows, payments) are written by
//! [`crate::ledger`] on the same pool. Decimals are stored as TEXT and parsed
//! back with [`decimal_column`].

mod configuration;
mod employee;
mod pool;
mod severance;

use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::error::{EngineError, EngineResult};

pub use configuration::ConfigurationRepository;
pub use employee::EmployeeRepository;
pub use pool::{Database, DbConfig};
pub use severance::{SeveranceRecord, SeveranceRecordRepository};

/// Reads a TEXT column as a decimal.
pub(crate) fn decimal_column(row: &SqliteRow, column: &str) -> EngineResult<Decimal> {
    let raw: String = row.try_get(column)?;
    Decimal::from_str(&raw).map_err(|e| {
        EngineError::persistence(format!(
            "column '{}' holds an invalid decimal '{}': {}",
            column, raw, e
        ))
    })
}

/// Reads a non-negative INTEGER column as `u32`.
pub(crate) fn u32_column(row: &SqliteRow, column: &str) -> EngineResult<u32> {
    let raw: i64 = row.try_get(column)?;
    u32::try_from(raw).map_err(|_| {
        EngineError::persistence(format!("column '{}' holds an out-of-range value {}", column, raw))
    })
}

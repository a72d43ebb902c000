//! Audit rows for severance settlements.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::SeveranceResult;

use super::decimal_column;

/// One persisted settlement run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeveranceRecord {
    /// Record id.
    pub id: String,
    /// Employee settled.
    pub employee_id: String,
    /// Last day worked.
    pub retirement_date: NaiveDate,
    /// Retirement reason label.
    pub reason: String,
    /// Configuration used.
    pub configuration_id: i64,
    /// Name of the rule set in force.
    pub normative_version: String,
    /// Settlement total.
    pub total: Decimal,
    /// Full result as computed.
    pub snapshot: serde_json::Value,
    /// Who ran it.
    pub author: String,
    /// When it was stored.
    pub recorded_at: DateTime<Utc>,
}

/// Repository for the `severance_records` table.
#[derive(Debug, Clone)]
pub struct SeveranceRecordRepository {
    pool: SqlitePool,
}

fn from_row(row: &SqliteRow) -> EngineResult<SeveranceRecord> {
    let snapshot: String = row.try_get("snapshot")?;
    Ok(SeveranceRecord {
        id: row.try_get("id")?,
        employee_id: row.try_get("employee_id")?,
        retirement_date: row.try_get("retirement_date")?,
        reason: row.try_get("reason")?,
        configuration_id: row.try_get("configuration_id")?,
        normative_version: row.try_get("normative_version")?,
        total: decimal_column(row, "total")?,
        snapshot: serde_json::from_str(&snapshot)?,
        author: row.try_get("author")?,
        recorded_at: row.try_get("recorded_at")?,
    })
}

impl SeveranceRecordRepository {
    /// Creates a repository on `pool`.
    pub fn new(pool: SqlitePool) -> Self {
        SeveranceRecordRepository { pool }
    }

    /// Stores `result` with the rule-set name it was computed under.
    pub async fn record(
        &self,
        result: &SeveranceResult,
        normative_version: &str,
        author: &str,
    ) -> EngineResult<SeveranceRecord> {
        let record = SeveranceRecord {
            id: Uuid::new_v4().to_string(),
            employee_id: result.employee_id.clone(),
            retirement_date: result.retirement_date,
            reason: result.reason.as_str().to_string(),
            configuration_id: result.configuration_id,
            normative_version: normative_version.to_string(),
            total: result.total,
            snapshot: serde_json::to_value(result)?,
            author: author.to_string(),
            recorded_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO severance_records (
                id, employee_id, retirement_date, reason, configuration_id,
                normative_version, total, snapshot, author, recorded_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&record.id)
        .bind(&record.employee_id)
        .bind(record.retirement_date)
        .bind(&record.reason)
        .bind(record.configuration_id)
        .bind(&record.normative_version)
        .bind(record.total.to_string())
        .bind(record.snapshot.to_string())
        .bind(&record.author)
        .bind(record.recorded_at)
        .execute(&self.pool)
        .await?;

        info!(
            record_id = %record.id,
            employee_id = %record.employee_id,
            total = %record.total,
            "Severance settlement recorded"
        );

        Ok(record)
    }

    /// Settlements recorded for an employee, oldest first.
    pub async fn for_employee(&self, employee_id: &str) -> EngineResult<Vec<SeveranceRecord>> {
        let rows = sqlx::query(
            "SELECT id, employee_id, retirement_date, reason, configuration_id, normative_version,
                    total, snapshot, author, recorded_at
             FROM severance_records WHERE employee_id = ?1 ORDER BY recorded_at, id",
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(from_row).collect()
    }
}

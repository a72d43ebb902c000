//! Versioned payroll configurations.
//!
//! Exactly one row is effective at a time. Activation inserts a new row and
//! supersedes the previous one in the same transaction; rows are never
//! edited otherwise.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;

use crate::config::{Configuration, RuleSet};
use crate::error::{EngineError, EngineResult};

/// Repository for the `configurations` table.
#[derive(Debug, Clone)]
pub struct ConfigurationRepository {
    pool: SqlitePool,
}

fn from_row(row: &SqliteRow) -> EngineResult<Configuration> {
    let rules_json: String = row.try_get("rules")?;
    let rules: RuleSet = serde_json::from_str(&rules_json)?;
    let activated_at: DateTime<Utc> = row.try_get("activated_at")?;
    let superseded_at: Option<DateTime<Utc>> = row.try_get("superseded_at")?;

    Ok(Configuration {
        id: row.try_get("id")?,
        activated_at,
        superseded_at,
        rules,
    })
}

impl ConfigurationRepository {
    /// Creates a repository on `pool`.
    pub fn new(pool: SqlitePool) -> Self {
        ConfigurationRepository { pool }
    }

    /// The effective configuration, if one has been activated.
    pub async fn current(&self) -> EngineResult<Option<Configuration>> {
        let row = sqlx::query(
            "SELECT id, rules, activated_at, superseded_at FROM configurations WHERE active = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(from_row).transpose()
    }

    /// A configuration by id, effective or superseded.
    pub async fn get(&self, id: i64) -> EngineResult<Configuration> {
        let row = sqlx::query(
            "SELECT id, rules, activated_at, superseded_at FROM configurations WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| EngineError::not_found("configuration", id))?;

        from_row(&row)
    }

    /// Every configuration, oldest first.
    pub async fn list(&self) -> EngineResult<Vec<Configuration>> {
        let rows = sqlx::query(
            "SELECT id, rules, activated_at, superseded_at FROM configurations ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(from_row).collect()
    }

    /// Makes `rules` the effective configuration.
    ///
    /// The previous effective row is stamped `superseded_at` in the same
    /// transaction, so readers never observe zero or two effective rows.
    pub async fn activate(&self, rules: &RuleSet) -> EngineResult<Configuration> {
        let now = Utc::now();
        let rules_json = serde_json::to_string(rules)?;

        let mut tx = self.pool.begin().await?;

        let superseded = sqlx::query(
            "UPDATE configurations SET active = 0, superseded_at = ?1 WHERE active = 1",
        )
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let id = sqlx::query(
            "INSERT INTO configurations (name, effective_from, rules, active, activated_at)
             VALUES (?1, ?2, ?3, 1, ?4)",
        )
        .bind(&rules.name)
        .bind(rules.effective_from)
        .bind(&rules_json)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        tx.commit().await?;

        info!(
            configuration_id = id,
            name = %rules.name,
            effective_from = %rules.effective_from,
            superseded,
            "Configuration activated"
        );

        Ok(Configuration {
            id,
            activated_at: now,
            superseded_at: None,
            rules: rules.clone(),
        })
    }
}

//! Partial payments against OPEN payroll versions.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{EntryState, NewPayment, Payment, PaymentOutcome};

use super::WriteGate;
use super::rows::{find_entry, outstanding, payments_for};

/// Registers payments and closes entries once they are fully paid.
#[derive(Debug, Clone)]
pub struct PaymentReconciler {
    pool: SqlitePool,
    gate: WriteGate,
}

impl PaymentReconciler {
    /// Creates a reconciler; `gate` must be shared with the ledger.
    pub fn new(pool: SqlitePool, gate: WriteGate) -> Self {
        PaymentReconciler { pool, gate }
    }

    /// Records a payment against an OPEN entry.
    ///
    /// # Returns
    ///
    /// - `EntityNotFound` when the entry does not exist
    /// - `ConflictError` when the entry is ADJUSTED or PAID
    /// - `ValidationError` when the amount is not positive or exceeds the
    ///   outstanding balance
    ///
    /// Reaching a zero balance moves the entry to PAID in the same transaction.
    pub async fn register_payment(
        &self,
        entry_id: i64,
        payment: NewPayment,
        author: &str,
    ) -> EngineResult<PaymentOutcome> {
        let _guard = self.gate.lock().await;
        let mut tx = self.pool.begin().await?;

        let entry = find_entry(&mut tx, entry_id)
            .await?
            .ok_or_else(|| EngineError::not_found("payroll entry", entry_id))?;

        if entry.state != EntryState::Open {
            return Err(EngineError::conflict(format!(
                "entry {} (version {}) is {}; payments are only accepted on OPEN entries",
                entry.id,
                entry.version,
                entry.state.as_str()
            )));
        }

        if payment.amount <= Decimal::ZERO {
            return Err(EngineError::validation("amount", "must be greater than zero"));
        }

        let previous = payments_for(&mut tx, entry.id).await?;
        let balance = outstanding(&entry, &previous);
        if payment.amount > balance {
            return Err(EngineError::validation(
                "amount",
                format!(
                    "payment ${} exceeds the outstanding balance ${}",
                    payment.amount, balance
                ),
            ));
        }

        let recorded = Payment {
            id: 0,
            entry_id: entry.id,
            amount: payment.amount,
            paid_on: payment.paid_on.unwrap_or_else(|| Utc::now().date_naive()),
            kind: payment.kind.unwrap_or_default(),
            note: payment.note,
            author: author.to_string(),
            recorded_at: Utc::now(),
        };

        let id = sqlx::query(
            "INSERT INTO payments (entry_id, amount, paid_on, kind, note, author, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(recorded.entry_id)
        .bind(recorded.amount.to_string())
        .bind(recorded.paid_on)
        .bind(recorded.kind.as_str())
        .bind(&recorded.note)
        .bind(&recorded.author)
        .bind(recorded.recorded_at)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        let remaining = balance - recorded.amount;
        let state = if remaining <= Decimal::ZERO {
            sqlx::query("UPDATE payroll_entries SET state = 'PAID' WHERE id = ?1 AND state = 'OPEN'")
                .bind(entry.id)
                .execute(&mut *tx)
                .await?;
            EntryState::Paid
        } else {
            EntryState::Open
        };

        let payments = payments_for(&mut tx, entry.id).await?;
        tx.commit().await?;

        info!(
            entry_id = entry.id,
            employee_id = %entry.employee_id,
            payment_id = id,
            amount = %recorded.amount,
            remaining = %remaining,
            state = state.as_str(),
            "Payment registered"
        );

        Ok(PaymentOutcome {
            payment: Payment { id, ..recorded },
            payments,
            outstanding_balance: remaining,
            state,
        })
    }

    /// Net minus payments for one entry.
    pub async fn outstanding_balance(&self, entry_id: i64) -> EngineResult<Decimal> {
        let mut conn = self.pool.acquire().await?;
        let entry = find_entry(&mut conn, entry_id)
            .await?
            .ok_or_else(|| EngineError::not_found("payroll entry", entry_id))?;
        let payments = payments_for(&mut conn, entry_id).await?;
        Ok(outstanding(&entry, &payments))
    }
}

//! Versioned payroll entries.
//!
//! ```text
//! save(result)
//!   ├─ latest version matches (within 0.01)?  → return it, write nothing
//!   └─ otherwise, in one transaction:
//!        OPEN → ADJUSTED, insert v+1 as OPEN (PAID when net <= 0), append audit row
//!      then, after commit: render + store document (failure recorded on the row)
//! ```

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

use crate::calculation::within_cent;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    DocumentStatus, Employee, EntryState, History, PayrollEntry, PayrollResult, Period,
    SaveOutcome,
};
use crate::render::{DocumentRenderer, DocumentStore, Payslip, StoredDocument, document_file_stem};
use crate::store::EmployeeRepository;

use super::WriteGate;
use super::rows::{
    ENTRY_COLUMNS, audit_from_row, entry_from_row, find_entry, latest_entry, outstanding,
    payments_for, payments_for_employee,
};

/// True when `result` reproduces `entry` to the cent: totals, days worked,
/// every earnings and deduction component, and every hour count.
pub fn same_figures(entry: &PayrollEntry, result: &PayrollResult) -> bool {
    let pairs = entry
        .earnings
        .components()
        .into_iter()
        .zip(result.earnings.components())
        .chain(
            entry
                .deductions
                .components()
                .into_iter()
                .zip(result.deductions.components()),
        )
        .chain(entry.hours.components().into_iter().zip(result.hours.components()))
        .chain([
            (entry.totals.gross, result.totals.gross),
            (entry.totals.deductions, result.totals.deductions),
            (entry.totals.net, result.totals.net),
        ]);

    entry.days_worked == result.days_worked && pairs.into_iter().all(|(a, b)| within_cent(a, b))
}

fn entry_from_result(result: &PayrollResult, version: u32, author: &str) -> PayrollEntry {
    PayrollEntry {
        id: 0,
        employee_id: result.employee_id.clone(),
        period: result.period,
        version,
        // Nothing to pay
        state: if result.totals.net <= Decimal::ZERO {
            EntryState::Paid
        } else {
            EntryState::Open
        },
        days_worked: result.days_worked,
        base_salary: result.base_salary,
        hours: result.hours.clone(),
        earnings: result.earnings.clone(),
        deductions: result.deductions.clone(),
        totals: result.totals.clone(),
        employer_costs: result.employer_costs.clone(),
        configuration_id: result.configuration_id,
        generated_at: Utc::now(),
        author: author.to_string(),
        document: DocumentStatus::Pending,
    }
}

async fn insert_entry(conn: &mut SqliteConnection, entry: &PayrollEntry) -> EngineResult<i64> {
    let e = &entry.earnings;
    let d = &entry.deductions;
    let c = &entry.employer_costs;

    let id = sqlx::query(
        "INSERT INTO payroll_entries (
            employee_id, year, month, version, state, days_worked, base_salary,
            sunday_hours, holiday_hours, sunday_overtime_hours, daytime_overtime_hours,
            base_pay, transport_subsidy, daytime_overtime_pay, sunday_pay, holiday_pay,
            sunday_overtime_pay, commissions, other_earnings,
            health, pension, solidarity_fund, other_deductions,
            gross, contribution_base, total_deductions, net,
            employer_exempt, employer_health, employer_pension, arl_rate, arl, family_fund,
            sena, icbf, severance_provision, severance_interest_provision, bonus_provision,
            vacation_provision, configuration_id, generated_at, author
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18,
            ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30, ?31, ?32, ?33, ?34,
            ?35, ?36, ?37, ?38, ?39, ?40, ?41, ?42
        )",
    )
    .bind(&entry.employee_id)
    .bind(entry.period.year)
    .bind(entry.period.month)
    .bind(entry.version)
    .bind(entry.state.as_str())
    .bind(entry.days_worked)
    .bind(entry.base_salary.to_string())
    .bind(entry.hours.sunday.to_string())
    .bind(entry.hours.holiday.to_string())
    .bind(entry.hours.sunday_overtime.to_string())
    .bind(entry.hours.daytime_overtime.to_string())
    .bind(e.base_pay.to_string())
    .bind(e.transport_subsidy.to_string())
    .bind(e.daytime_overtime.to_string())
    .bind(e.sunday.to_string())
    .bind(e.holiday.to_string())
    .bind(e.sunday_overtime.to_string())
    .bind(e.commissions.to_string())
    .bind(e.other.to_string())
    .bind(d.health.to_string())
    .bind(d.pension.to_string())
    .bind(d.solidarity_fund.to_string())
    .bind(d.other.to_string())
    .bind(entry.totals.gross.to_string())
    .bind(entry.totals.contribution_base.to_string())
    .bind(entry.totals.deductions.to_string())
    .bind(entry.totals.net.to_string())
    .bind(c.exempt)
    .bind(c.health.to_string())
    .bind(c.pension.to_string())
    .bind(c.arl_rate.to_string())
    .bind(c.arl.to_string())
    .bind(c.family_fund.to_string())
    .bind(c.sena.to_string())
    .bind(c.icbf.to_string())
    .bind(c.severance_provision.to_string())
    .bind(c.severance_interest_provision.to_string())
    .bind(c.bonus_provision.to_string())
    .bind(c.vacation_provision.to_string())
    .bind(entry.configuration_id)
    .bind(entry.generated_at)
    .bind(&entry.author)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

async fn insert_audit(
    conn: &mut SqliteConnection,
    entry: &PayrollEntry,
    description: &str,
    snapshot: &serde_json::Value,
) -> EngineResult<()> {
    sqlx::query(
        "INSERT INTO payroll_audit (
            entry_id, employee_id, year, month, version, recorded_at, description, author, snapshot
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(entry.id)
    .bind(&entry.employee_id)
    .bind(entry.period.year)
    .bind(entry.period.month)
    .bind(entry.version)
    .bind(Utc::now())
    .bind(description)
    .bind(&entry.author)
    .bind(snapshot.to_string())
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Versioned, audited payroll records and their documents.
#[derive(Clone)]
pub struct PayrollLedger {
    pool: SqlitePool,
    gate: WriteGate,
    renderer: Arc<dyn DocumentRenderer>,
    documents: DocumentStore,
}

impl PayrollLedger {
    /// Creates a ledger; `gate` must be shared with the payment reconciler.
    pub fn new(
        pool: SqlitePool,
        gate: WriteGate,
        renderer: Arc<dyn DocumentRenderer>,
        documents: DocumentStore,
    ) -> Self {
        PayrollLedger {
            pool,
            gate,
            renderer,
            documents,
        }
    }

    /// Persists `result` as the current version for its period.
    ///
    /// An identical recomputation returns the existing version with an info
    /// note and writes nothing. Otherwise the previous OPEN version becomes
    /// ADJUSTED, a new OPEN version and its audit row are committed together
    /// (a version with nothing to pay is stored PAID),
    /// and the document is rendered afterwards. A failed render is reported
    /// in `document_error`, never as success.
    pub async fn save(
        &self,
        employee: &Employee,
        result: &PayrollResult,
        author: &str,
    ) -> EngineResult<SaveOutcome> {
        if result.employee_id != employee.id {
            return Err(EngineError::validation(
                "employee_id",
                format!(
                    "result belongs to '{}', not '{}'",
                    result.employee_id, employee.id
                ),
            ));
        }

        let guard = self.gate.lock().await;
        let mut tx = self.pool.begin().await?;

        let latest = latest_entry(&mut tx, &employee.id, result.period).await?;
        if let Some(existing) = latest.as_ref().filter(|e| same_figures(e, result)) {
            let payments = payments_for(&mut tx, existing.id).await?;
            tx.commit().await?;
            drop(guard);

            info!(
                employee_id = %employee.id,
                period = %result.period,
                version = existing.version,
                "Recomputation unchanged; keeping current version"
            );
            return Ok(SaveOutcome {
                outstanding_balance: outstanding(existing, &payments),
                entry: existing.clone(),
                payments,
                created: false,
                info: Some(format!(
                    "No changes from version {}; nothing was written",
                    existing.version
                )),
                document_error: None,
            });
        }

        let version = latest.as_ref().map(|e| e.version + 1).unwrap_or(1);

        let adjusted = sqlx::query(
            "UPDATE payroll_entries SET state = 'ADJUSTED'
             WHERE employee_id = ?1 AND year = ?2 AND month = ?3 AND state = 'OPEN'",
        )
        .bind(&employee.id)
        .bind(result.period.year)
        .bind(result.period.month)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let mut entry = entry_from_result(result, version, author);
        entry.id = insert_entry(&mut tx, &entry).await?;

        let description = match latest.as_ref() {
            None => "Initial payroll calculation".to_string(),
            Some(previous) => format!(
                "Recalculated: gross ${} → ${}, net ${} → ${}",
                previous.totals.gross, entry.totals.gross, previous.totals.net, entry.totals.net
            ),
        };
        insert_audit(&mut tx, &entry, &description, &serde_json::to_value(result)?).await?;

        tx.commit().await?;
        drop(guard);

        info!(
            employee_id = %employee.id,
            period = %result.period,
            version,
            entry_id = entry.id,
            adjusted,
            state = entry.state.as_str(),
            net = %entry.totals.net,
            "Payroll version saved"
        );

        let document_error = self.store_document(employee, &mut entry).await.err();

        Ok(SaveOutcome {
            outstanding_balance: entry.totals.net,
            entry,
            payments: Vec::new(),
            created: true,
            info: None,
            document_error: document_error.map(|e| e.to_string()),
        })
    }

    /// Renders and writes the document for `entry`, recording the outcome on its row.
    async fn store_document(&self, employee: &Employee, entry: &mut PayrollEntry) -> EngineResult<()> {
        let stem = document_file_stem(&entry.employee_id, entry.period, entry.version);
        let written = match self.renderer.render_payslip(&Payslip::from_entry(employee, entry)) {
            Ok(bytes) => {
                self.documents
                    .write_new(&stem, self.renderer.extension(), &bytes)
                    .await
            }
            Err(err) => Err(err),
        };

        let (path, error) = match &written {
            Ok(path) => (Some(path.to_string_lossy().into_owned()), None),
            Err(err) => {
                warn!(entry_id = entry.id, error = %err, "Document rendering failed");
                (None, Some(err.to_string()))
            }
        };

        sqlx::query("UPDATE payroll_entries SET document_path = ?1, document_error = ?2 WHERE id = ?3")
            .bind(&path)
            .bind(&error)
            .bind(entry.id)
            .execute(&self.pool)
            .await?;
        entry.document = DocumentStatus::from_columns(path, error);

        written.map(|_| ())
    }

    /// One entry by id.
    pub async fn entry(&self, entry_id: i64) -> EngineResult<PayrollEntry> {
        let mut conn = self.pool.acquire().await?;
        find_entry(&mut conn, entry_id)
            .await?
            .ok_or_else(|| EngineError::not_found("payroll entry", entry_id))
    }

    /// Entries (newest version first), payments and audit rows for an
    /// employee, optionally limited to one period.
    pub async fn history(&self, employee_id: &str, period: Option<Period>) -> EngineResult<History> {
        let mut conn = self.pool.acquire().await?;
        let period_filter = if period.is_some() {
            "AND year = ?2 AND month = ?3"
        } else {
            ""
        };

        let entries_sql = format!(
            "SELECT {} FROM payroll_entries WHERE employee_id = ?1 {}
             ORDER BY year DESC, month DESC, version DESC",
            ENTRY_COLUMNS, period_filter
        );
        let audit_sql = format!(
            "SELECT id, entry_id, employee_id, year, month, version, recorded_at, description,
                    author, snapshot
             FROM payroll_audit WHERE employee_id = ?1 {}
             ORDER BY recorded_at, id",
            period_filter
        );

        let mut entries_query = sqlx::query(&entries_sql).bind(employee_id);
        let mut audit_query = sqlx::query(&audit_sql).bind(employee_id);
        if let Some(period) = period {
            entries_query = entries_query.bind(period.year).bind(period.month);
            audit_query = audit_query.bind(period.year).bind(period.month);
        }

        let entries = entries_query
            .fetch_all(&mut *conn)
            .await?
            .iter()
            .map(entry_from_row)
            .collect::<EngineResult<Vec<_>>>()?;
        let audit_records = audit_query
            .fetch_all(&mut *conn)
            .await?
            .iter()
            .map(audit_from_row)
            .collect::<EngineResult<Vec<_>>>()?;
        let payments = payments_for_employee(&mut conn, employee_id, period).await?;

        Ok(History {
            entries,
            payments,
            audit_records,
        })
    }

    /// The stored document for an entry.
    ///
    /// # Returns
    ///
    /// `EntityNotFound` when the entry does not exist, has no stored
    /// document, or the file is gone.
    pub async fn document(&self, entry_id: i64) -> EngineResult<StoredDocument> {
        let entry = self.entry(entry_id).await?;
        match &entry.document {
            DocumentStatus::Stored { path } => self.documents.read(path).await,
            _ => Err(EngineError::not_found("document", entry_id)),
        }
    }

    /// Renders the document again for a version whose document is missing.
    ///
    /// A version with a readable stored document is returned unchanged.
    pub async fn regenerate_document(&self, entry_id: i64) -> EngineResult<PayrollEntry> {
        let mut entry = self.entry(entry_id).await?;
        if let Some(path) = entry.document.path() {
            if self.documents.exists(path).await {
                return Ok(entry);
            }
        }

        let employee = EmployeeRepository::new(self.pool.clone())
            .get(&entry.employee_id)
            .await?;
        self.store_document(&employee, &mut entry).await?;

        info!(entry_id, version = entry.version, "Document regenerated");
        Ok(entry)
    }
}

//! Service facade over the calculators, store and ledger.
//!
//! [`PayrollService`] resolves employees and the effective configuration from
//! the store, runs the pure calculators, and hands results to the ledger.
//! The HTTP layer and the binary only talk to this type.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::calculation::{calculate_payroll, calculate_severance};
use crate::config::{Configuration, RuleSet};
use crate::error::{EngineError, EngineResult};
use crate::ledger::{PaymentReconciler, PayrollLedger, WriteGate};
use crate::models::{
    Employee, History, NewPayment, PaymentOutcome, PayrollEntry, PayrollResult, Period,
    PeriodOverrides, PeriodRunSummary, RetirementReason, SaveOutcome, SeveranceOverrides,
    SeveranceResult,
};
use crate::render::{DocumentRenderer, DocumentStore, Payslip, StoredDocument};
use crate::store::{Database, SeveranceRecord};

/// Days saved for every employee by a monthly run.
pub const FULL_MONTH_DAYS: u32 = 30;

/// Payroll operations over one database and document directory.
#[derive(Clone)]
pub struct PayrollService {
    db: Database,
    ledger: PayrollLedger,
    payments: PaymentReconciler,
    renderer: Arc<dyn DocumentRenderer>,
}

impl PayrollService {
    /// Creates a service; the ledger and the reconciler share one write gate.
    pub fn new(db: Database, renderer: Arc<dyn DocumentRenderer>, documents: DocumentStore) -> Self {
        let gate = WriteGate::default();
        let ledger = PayrollLedger::new(db.pool().clone(), gate.clone(), renderer.clone(), documents);
        let payments = PaymentReconciler::new(db.pool().clone(), gate);
        PayrollService {
            db,
            ledger,
            payments,
            renderer,
        }
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// The effective configuration, if any.
    pub async fn current_configuration(&self) -> EngineResult<Option<Configuration>> {
        self.db.configurations().current().await
    }

    /// Makes `rules` the effective configuration, superseding the previous one.
    pub async fn activate_configuration(&self, rules: &RuleSet) -> EngineResult<Configuration> {
        self.db.configurations().activate(rules).await
    }

    /// Stores a new employee.
    pub async fn register_employee(&self, employee: &Employee) -> EngineResult<()> {
        self.db.employees().insert(employee).await
    }

    /// Computes a payroll without persisting it.
    pub async fn calculate(
        &self,
        employee_id: &str,
        days_worked: u32,
        overrides: &PeriodOverrides,
    ) -> EngineResult<PayrollResult> {
        let employee = self.db.employees().get(employee_id).await?;
        let configuration = self.current_configuration().await?;
        calculate_payroll(&employee, days_worked, configuration.as_ref(), overrides)
    }

    /// Computes and persists a payroll as the current version for its period.
    pub async fn save(
        &self,
        employee_id: &str,
        days_worked: u32,
        overrides: &PeriodOverrides,
        author: &str,
    ) -> EngineResult<SaveOutcome> {
        let employee = self.db.employees().get(employee_id).await?;
        let configuration = self.current_configuration().await?;
        let result = calculate_payroll(&employee, days_worked, configuration.as_ref(), overrides)?;
        self.ledger.save(&employee, &result, author).await
    }

    /// Records a payment against an OPEN entry.
    pub async fn register_payment(
        &self,
        entry_id: i64,
        payment: NewPayment,
        author: &str,
    ) -> EngineResult<PaymentOutcome> {
        self.payments.register_payment(entry_id, payment, author).await
    }

    /// History for an employee, optionally limited to one period.
    ///
    /// An unknown employee is reported as `EntityNotFound` rather than an
    /// empty history.
    pub async fn history(&self, employee_id: &str, period: Option<Period>) -> EngineResult<History> {
        self.db.employees().get(employee_id).await?;
        self.ledger.history(employee_id, period).await
    }

    /// Computes a final settlement; `record` stores it in the severance audit.
    pub async fn calculate_severance(
        &self,
        employee_id: &str,
        retirement_date: NaiveDate,
        reason: RetirementReason,
        overrides: &SeveranceOverrides,
        record: Option<&str>,
    ) -> EngineResult<SeveranceResult> {
        let employee = self.db.employees().get(employee_id).await?;
        let configuration = self.current_configuration().await?;
        let result = calculate_severance(
            &employee,
            retirement_date,
            reason,
            configuration.as_ref(),
            overrides,
        )?;

        if let (Some(author), Some(configuration)) = (record, configuration.as_ref()) {
            self.db
                .severance_records()
                .record(&result, &configuration.rules.name, author)
                .await?;
        }
        Ok(result)
    }

    /// Stored settlements for an employee.
    pub async fn severance_records(&self, employee_id: &str) -> EngineResult<Vec<SeveranceRecord>> {
        self.db.employees().get(employee_id).await?;
        self.db.severance_records().for_employee(employee_id).await
    }

    /// The stored document for an entry.
    pub async fn document(&self, entry_id: i64) -> EngineResult<StoredDocument> {
        self.ledger.document(entry_id).await
    }

    /// Retries rendering for an entry whose document is missing.
    pub async fn regenerate_document(&self, entry_id: i64) -> EngineResult<PayrollEntry> {
        self.ledger.regenerate_document(entry_id).await
    }

    /// Saves a full-month payroll for every employee.
    ///
    /// Fails fast with `ConfigurationMissing`; other per-employee failures
    /// are collected in the summary and do not stop the run.
    pub async fn generate_period(&self, period: Period, author: &str) -> EngineResult<PeriodRunSummary> {
        let configuration = self
            .current_configuration()
            .await?
            .ok_or(EngineError::ConfigurationMissing)?;
        let overrides = PeriodOverrides {
            period: Some(period),
            ..PeriodOverrides::default()
        };

        let mut summary = PeriodRunSummary {
            period,
            created: Vec::new(),
            unchanged: Vec::new(),
            failed: Vec::new(),
        };

        for employee in self.db.employees().list().await? {
            let saved = match calculate_payroll(&employee, FULL_MONTH_DAYS, Some(&configuration), &overrides) {
                Ok(result) => self.ledger.save(&employee, &result, author).await,
                Err(err) => Err(err),
            };
            match saved {
                Ok(outcome) if outcome.created => summary.created.push(employee.id),
                Ok(_) => summary.unchanged.push(employee.id),
                Err(err) => {
                    warn!(employee_id = %employee.id, %period, error = %err, "Monthly run skipped employee");
                    summary.failed.push((employee.id, err.to_string()));
                }
            }
        }

        info!(
            %period,
            created = summary.created.len(),
            unchanged = summary.unchanged.len(),
            failed = summary.failed.len(),
            "Monthly run complete"
        );
        Ok(summary)
    }

    /// Renders a payslip for an unsaved result.
    pub async fn preview_payslip(&self, result: &PayrollResult) -> EngineResult<Vec<u8>> {
        let employee = self.db.employees().get(&result.employee_id).await?;
        self.renderer.render_payslip(&Payslip::from_result(&employee, result))
    }

    /// Renders a settlement document without storing it.
    pub async fn preview_settlement(&self, settlement: &SeveranceResult) -> EngineResult<Vec<u8>> {
        let employee = self.db.employees().get(&settlement.employee_id).await?;
        self.renderer.render_settlement(&employee, settlement)
    }

    /// MIME type of rendered documents.
    pub fn document_mime_type(&self) -> &'static str {
        self.renderer.mime_type()
    }

    /// File extension of rendered documents.
    pub fn document_extension(&self) -> &'static str {
        self.renderer.extension()
    }
}

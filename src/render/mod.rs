//! Document rendering and storage.
//!
//! A [`DocumentRenderer`] turns a finished payslip or settlement into bytes.
//! The engine treats the output as opaque; [`DocumentStore`] writes it to
//! disk without ever overwriting an existing file.

mod files;
mod text;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::EngineResult;
use crate::models::{
    Deductions, Earnings, Employee, PayrollEntry, PayrollResult, PayrollTotals, Period,
    SeveranceResult, WorkedHours,
};

pub use files::{DocumentStore, StoredDocument, content_type_for, document_file_stem};
pub use text::{TextRenderer, format_pesos};

/// Everything printed on a payslip.
#[derive(Debug, Clone, Serialize)]
pub struct Payslip {
    /// Employee id.
    pub employee_id: String,
    /// Employee name.
    pub employee_name: String,
    /// Identity document number.
    pub document_number: String,
    /// Pay period.
    pub period: Period,
    /// Ledger version; `None` for previews.
    pub version: Option<u32>,
    /// Days worked, base-30.
    pub days_worked: u32,
    /// Monthly salary.
    pub base_salary: Decimal,
    /// Hours behind the differentials.
    pub hours: WorkedHours,
    /// Earnings.
    pub earnings: Earnings,
    /// Deductions.
    pub deductions: Deductions,
    /// Totals.
    pub totals: PayrollTotals,
    /// When the figures were computed.
    pub generated_at: DateTime<Utc>,
}

impl Payslip {
    /// A payslip for a stored ledger version.
    pub fn from_entry(employee: &Employee, entry: &PayrollEntry) -> Self {
        Payslip {
            employee_id: employee.id.clone(),
            employee_name: employee.full_name.clone(),
            document_number: employee.document_number.clone(),
            period: entry.period,
            version: Some(entry.version),
            days_worked: entry.days_worked,
            base_salary: entry.base_salary,
            hours: entry.hours.clone(),
            earnings: entry.earnings.clone(),
            deductions: entry.deductions.clone(),
            totals: entry.totals.clone(),
            generated_at: entry.generated_at,
        }
    }

    /// A preview payslip for an unsaved calculation.
    pub fn from_result(employee: &Employee, result: &PayrollResult) -> Self {
        Payslip {
            employee_id: employee.id.clone(),
            employee_name: employee.full_name.clone(),
            document_number: employee.document_number.clone(),
            period: result.period,
            version: None,
            days_worked: result.days_worked,
            base_salary: result.base_salary,
            hours: result.hours.clone(),
            earnings: result.earnings.clone(),
            deductions: result.deductions.clone(),
            totals: result.totals.clone(),
            generated_at: result.timestamp,
        }
    }
}

/// Turns finished value objects into document bytes.
pub trait DocumentRenderer: Send + Sync {
    /// File extension of the produced documents, without the dot.
    fn extension(&self) -> &'static str;

    /// MIME type of the produced documents.
    fn mime_type(&self) -> &'static str;

    /// Renders a payslip.
    fn render_payslip(&self, payslip: &Payslip) -> EngineResult<Vec<u8>>;

    /// Renders a severance settlement, identified by `employee`.
    fn render_settlement(
        &self,
        employee: &Employee,
        settlement: &SeveranceResult,
    ) -> EngineResult<Vec<u8>>;
}

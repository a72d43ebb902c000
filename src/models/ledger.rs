//! Ledger models: persisted payroll versions, payments, and audit rows.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Deductions, Earnings, EmployerCosts, Period, PayrollTotals, WorkedHours};

/// Lifecycle state of one payroll version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryState {
    /// Current version; accepts payments.
    Open,
    /// Superseded by a later recomputation.
    Adjusted,
    /// Fully paid.
    Paid,
}

impl EntryState {
    /// Storage label.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryState::Open => "OPEN",
            EntryState::Adjusted => "ADJUSTED",
            EntryState::Paid => "PAID",
        }
    }

    /// Parses a storage label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "OPEN" => Some(EntryState::Open),
            "ADJUSTED" => Some(EntryState::Adjusted),
            "PAID" => Some(EntryState::Paid),
            _ => None,
        }
    }
}

/// Whether a rendered document exists for a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentStatus {
    /// The document was written to `path`.
    Stored {
        /// File path of the stored document.
        path: String,
    },
    /// Rendering or writing failed; no document is available.
    Failed {
        /// Why the document is missing.
        reason: String,
    },
    /// Not rendered yet.
    Pending,
}

impl DocumentStatus {
    /// Builds the status from the two nullable storage columns.
    pub fn from_columns(path: Option<String>, error: Option<String>) -> Self {
        match (path, error) {
            (Some(path), _) => DocumentStatus::Stored { path },
            (None, Some(reason)) => DocumentStatus::Failed { reason },
            (None, None) => DocumentStatus::Pending,
        }
    }

    /// The stored path, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            DocumentStatus::Stored { path } => Some(path),
            _ => None,
        }
    }
}

/// One persisted payroll version for (employee, period).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollEntry {
    /// Store identifier.
    pub id: i64,
    /// Employee the entry belongs to.
    pub employee_id: String,
    /// Payroll period.
    pub period: Period,
    /// Version number, monotonic per (employee, period).
    pub version: u32,
    /// Lifecycle state.
    pub state: EntryState,
    /// Days worked, base-30.
    pub days_worked: u32,
    /// Monthly salary used.
    pub base_salary: Decimal,
    /// Hours behind each differential.
    pub hours: WorkedHours,
    /// Earnings breakdown.
    pub earnings: Earnings,
    /// Deductions breakdown.
    pub deductions: Deductions,
    /// Totals.
    pub totals: PayrollTotals,
    /// Employer-side costs.
    pub employer_costs: EmployerCosts,
    /// Configuration used.
    pub configuration_id: i64,
    /// When the version was generated.
    pub generated_at: DateTime<Utc>,
    /// Who generated the version.
    pub author: String,
    /// Rendered document status.
    pub document: DocumentStatus,
}

/// Append-only audit row tied to one entry version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Store identifier.
    pub id: i64,
    /// Entry the record documents.
    pub entry_id: i64,
    /// Employee.
    pub employee_id: String,
    /// Period.
    pub period: Period,
    /// Version created.
    pub version: u32,
    /// When the change was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Description of the change.
    pub description: String,
    /// Who made the change.
    pub author: String,
    /// Full snapshot of the computed result.
    pub snapshot: serde_json::Value,
}

/// The kind of a payment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    /// Partial or full payment of the net amount.
    #[default]
    Installment,
    /// Correction paid after review.
    Adjustment,
    /// Extra amount paid within the balance.
    Supplement,
}

impl PaymentKind {
    /// Storage label.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::Installment => "installment",
            PaymentKind::Adjustment => "adjustment",
            PaymentKind::Supplement => "supplement",
        }
    }

    /// Parses a storage label, defaulting to `Installment`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "adjustment" => PaymentKind::Adjustment,
            "supplement" => PaymentKind::Supplement,
            _ => PaymentKind::Installment,
        }
    }
}

/// A payment recorded against one entry version. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Store identifier.
    pub id: i64,
    /// Entry the payment settles.
    pub entry_id: i64,
    /// Amount paid.
    pub amount: Decimal,
    /// Date of payment.
    pub paid_on: NaiveDate,
    /// Kind of payment.
    pub kind: PaymentKind,
    /// Free-text note.
    pub note: Option<String>,
    /// Who registered the payment.
    pub author: String,
    /// When the payment was registered.
    pub recorded_at: DateTime<Utc>,
}

/// A payment to register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPayment {
    /// Amount paid; must be positive and within the outstanding balance.
    pub amount: Decimal,
    /// Date of payment; defaults to today.
    #[serde(default)]
    pub paid_on: Option<NaiveDate>,
    /// Kind of payment; defaults to installment.
    #[serde(default)]
    pub kind: Option<PaymentKind>,
    /// Free-text note.
    #[serde(default)]
    pub note: Option<String>,
}

/// Result of `save`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOutcome {
    /// The version now current for the period.
    pub entry: PayrollEntry,
    /// Payments recorded against that version.
    pub payments: Vec<Payment>,
    /// Net minus payments.
    pub outstanding_balance: Decimal,
    /// Whether a new version was written.
    pub created: bool,
    /// Informational note, set when nothing changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    /// Set when the document could not be rendered or stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_error: Option<String>,
}

/// Result of `register_payment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOutcome {
    /// The payment just recorded.
    pub payment: Payment,
    /// Every payment for the entry, oldest first.
    pub payments: Vec<Payment>,
    /// Remaining balance.
    pub outstanding_balance: Decimal,
    /// Entry state after the payment.
    pub state: EntryState,
}

/// Full history for one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    /// Entries, newest version first.
    pub entries: Vec<PayrollEntry>,
    /// Payments, oldest first.
    pub payments: Vec<Payment>,
    /// Audit rows, oldest first.
    pub audit_records: Vec<AuditRecord>,
}

/// Result of a bulk monthly run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRunSummary {
    /// Period processed.
    pub period: Period,
    /// Employees for which a new version was written.
    pub created: Vec<String>,
    /// Employees whose current version already matched.
    pub unchanged: Vec<String>,
    /// Employees that failed, with the reason.
    pub failed: Vec<(String, String)>,
}

//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod employee;
mod ledger;
mod payroll;
mod period;
mod severance;

pub use employee::{ContractType, Employee, MAX_PROBATION_DAYS};
pub use ledger::{
    AuditRecord, DocumentStatus, EntryState, History, NewPayment, PayrollEntry, Payment,
    PaymentKind, PaymentOutcome, PeriodRunSummary, SaveOutcome,
};
pub use payroll::{
    AuditStep, AuditTrace, AuditWarning, Deductions, Earnings, EmployerCosts, PayrollResult,
    PayrollTotals, PeriodOverrides, WorkedHours,
};
pub use period::{MONTH_NAMES, Period, parse_month};
pub use severance::{
    PendingSalary, RetirementReason, SeveranceBases, SeveranceComponent, SeveranceOverrides,
    SeveranceResult,
};

//! HTTP API for the payroll engine.
//!
//! This module exposes [`crate::service::PayrollService`] over REST:
//! calculation, versioned saves, payments, history, severance settlements,
//! documents, unsaved document previews and monthly runs. Every handler tags its log lines with a
//! per-request correlation id.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    DEFAULT_AUTHOR, EmployeeQuery, GeneratePeriodRequest, HistoryQuery, MonthLabel,
    PaymentRequest, PayrollRequest, SeveranceRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;

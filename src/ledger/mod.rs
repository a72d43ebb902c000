//! Payroll ledger: versioned entries, audit trail, payments.
//!
//! [`PayrollLedger`] and [`PaymentReconciler`] each run their writes in one
//! SQLite transaction and share a [`WriteGate`] so that writers inside this
//! process are serialized. The schema's unique indexes reject a concurrent
//! writer from another process with `ConflictError`.

mod entries;
mod payments;
mod rows;

use std::sync::Arc;

use tokio::sync::Mutex;

pub use entries::{PayrollLedger, same_figures};
pub use payments::PaymentReconciler;

/// In-process write serialization shared by the ledger writers.
pub type WriteGate = Arc<Mutex<()>>;

//! Payroll and severance engine for Colombian labor law.
//!
//! This crate computes monthly payroll (base pay, transport subsidy, shift
//! differentials, employee deductions, employer costs) and final severance
//! settlements, keeps a versioned and audited payroll ledger with partial
//! payments in SQLite, and renders payslips and settlements.
//!
//! Calculators in [`calculation`] are pure functions over an effective
//! [`config::Configuration`]; [`service::PayrollService`] ties them to the
//! [`store`] and [`ledger`]; [`api`] serves it over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod render;
pub mod service;
pub mod store;

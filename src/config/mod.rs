//! Configuration for the payroll engine.
//!
//! Two layers live here: legal rule sets loaded from YAML files
//! ([`ConfigLoader`], [`RuleSet`]) and process settings read from the
//! environment ([`ServiceSettings`]). Rule sets become effective only after
//! being activated in the store.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/default.yaml").unwrap();
//! println!("Minimum wage: {}", loader.rules().minimum_wage);
//! ```

mod loader;
mod settings;
mod types;

pub use loader::ConfigLoader;
pub use settings::ServiceSettings;
pub use types::{
    Configuration, ContributionRates, DifferentialRates, ParafiscalRates, ProvisionRates, RuleSet,
};

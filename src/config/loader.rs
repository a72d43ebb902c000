//! Rule-set loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll rule
//! sets from YAML files.

use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

use super::types::RuleSet;

/// Loads and validates a payroll rule set.
///
/// # File Layout
///
/// ```text
/// config/
/// └── default.yaml   # rule set activated on first start
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default.yaml").unwrap();
/// println!("Loaded rule set: {}", loader.rules().name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
    rules: RuleSet,
}

impl ConfigLoader {
    /// Loads a rule set from the specified YAML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the rule-set file (e.g., "./config/default.yaml")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file contains invalid YAML or a missing field (`ConfigParseError`)
    /// - A value is out of range (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let rules = Self::parse(&content).map_err(|message| EngineError::ConfigParseError {
            path: path_str,
            message,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            rules,
        })
    }

    /// Parses and validates rule-set YAML text.
    fn parse(content: &str) -> Result<RuleSet, String> {
        let rules: RuleSet = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
        validate(&rules)?;
        Ok(rules)
    }

    /// Returns the path the rule set was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the loaded rule set.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Consumes the loader, returning the rule set.
    pub fn into_rules(self) -> RuleSet {
        self.rules
    }
}

fn validate(rules: &RuleSet) -> Result<(), String> {
    let positive = [
        ("minimum_wage", rules.minimum_wage),
        ("standard_monthly_hours", rules.standard_monthly_hours),
        (
            "contributions.solidarity_threshold_multiple",
            rules.contributions.solidarity_threshold_multiple,
        ),
    ];
    for (field, value) in positive {
        if value <= Decimal::ZERO {
            return Err(format!("{} must be greater than zero", field));
        }
    }

    let non_negative = [
        ("transport_subsidy", rules.transport_subsidy),
        ("uvt", rules.uvt),
        ("contributions.employee_health", rules.contributions.employee_health),
        ("contributions.employee_pension", rules.contributions.employee_pension),
        ("contributions.employer_health", rules.contributions.employer_health),
        ("contributions.employer_pension", rules.contributions.employer_pension),
        ("contributions.solidarity_rate", rules.contributions.solidarity_rate),
        ("parafiscal.family_fund", rules.parafiscal.family_fund),
        ("parafiscal.sena", rules.parafiscal.sena),
        ("parafiscal.icbf", rules.parafiscal.icbf),
        ("provisions.severance", rules.provisions.severance),
        ("provisions.severance_interest", rules.provisions.severance_interest),
        ("provisions.bonus", rules.provisions.bonus),
        ("provisions.vacation", rules.provisions.vacation),
        ("differentials.sunday", rules.differentials.sunday),
        ("differentials.holiday", rules.differentials.holiday),
        ("differentials.sunday_overtime", rules.differentials.sunday_overtime),
        ("differentials.daytime_overtime", rules.differentials.daytime_overtime),
    ];
    for (field, value) in non_negative {
        if value < Decimal::ZERO {
            return Err(format!("{} must not be negative", field));
        }
    }

    Ok(())
}

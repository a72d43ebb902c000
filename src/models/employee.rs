//! Employee model and related types.
//!
//! This module defines the Employee struct and ContractType enum
//! for representing workers on the payroll.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::MAX_AMOUNT;
use crate::error::{EngineError, EngineResult};

/// Longest probation window allowed from the contract start, in days.
pub const MAX_PROBATION_DAYS: i64 = 60;

/// Represents the kind of labor contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    /// Término indefinido.
    Indefinite,
    /// Término fijo; requires an end date.
    FixedTerm,
    /// Any other arrangement (obra o labor, aprendizaje, ...).
    Other,
}

impl ContractType {
    /// Returns the storage label for this contract type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::Indefinite => "indefinite",
            ContractType::FixedTerm => "fixed_term",
            ContractType::Other => "other",
        }
    }

    /// Parses a storage label, treating unknown labels as `Other`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "indefinite" => ContractType::Indefinite,
            "fixed_term" => ContractType::FixedTerm,
            _ => ContractType::Other,
        }
    }
}

/// Represents an employee on the payroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Full name, printed on documents.
    pub full_name: String,
    /// National identity document number.
    #[serde(default)]
    pub document_number: String,
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// The kind of contract.
    pub contract_type: ContractType,
    /// First day of the contract.
    pub start_date: NaiveDate,
    /// Last day of the contract; required for fixed-term contracts.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Whether the position carries high occupational risk (ARL class V).
    #[serde(default)]
    pub high_risk: bool,
    /// Whether the salary is integral (70% contribution base).
    #[serde(default)]
    pub integral_salary: bool,
    /// Whether the employee may receive the transport subsidy.
    #[serde(default = "default_true")]
    pub transport_subsidy_eligible: bool,
    /// Whether the contract started with a probation period.
    #[serde(default)]
    pub probation: bool,
    /// Last day of the probation period.
    #[serde(default)]
    pub probation_end_date: Option<NaiveDate>,
}

fn default_true() -> bool {
    true
}

impl Employee {
    /// Checks the contract invariants.
    ///
    /// # Returns
    ///
    /// `ValidationError` when:
    /// - the salary is not positive
    /// - a fixed-term contract has no end date, or it precedes the start date
    /// - probation is set without an end date
    /// - the probation end date is before the start or more than 60 days after it
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{ContractType, Employee};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     full_name: "Ana Gómez".to_string(),
    ///     document_number: "1020304050".to_string(),
    ///     base_salary: Decimal::from(1_750_905),
    ///     contract_type: ContractType::FixedTerm,
    ///     start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
    ///     end_date: None,
    ///     high_risk: false,
    ///     integral_salary: false,
    ///     transport_subsidy_eligible: true,
    ///     probation: false,
    ///     probation_end_date: None,
    /// };
    /// assert!(employee.validate().is_err());
    /// ```
    pub fn validate(&self) -> EngineResult<()> {
        if self.base_salary <= Decimal::ZERO {
            return Err(EngineError::validation(
                "base_salary",
                "must be greater than zero",
            ));
        }
        if self.base_salary > MAX_AMOUNT {
            return Err(EngineError::validation(
                "base_salary",
                format!("must not exceed {}", MAX_AMOUNT),
            ));
        }

        if self.contract_type == ContractType::FixedTerm {
            match self.end_date {
                None => {
                    return Err(EngineError::validation(
                        "end_date",
                        "required for fixed-term contracts",
                    ));
                }
                Some(end) if end < self.start_date => {
                    return Err(EngineError::validation(
                        "end_date",
                        "cannot precede the start date",
                    ));
                }
                Some(_) => {}
            }
        }

        if self.probation {
            let Some(probation_end) = self.probation_end_date else {
                return Err(EngineError::validation(
                    "probation_end_date",
                    "required when probation is set",
                ));
            };
            let window = (probation_end - self.start_date).num_days();
            if window < 0 {
                return Err(EngineError::validation(
                    "probation_end_date",
                    "cannot precede the start date",
                ));
            }
            if window > MAX_PROBATION_DAYS {
                return Err(EngineError::validation(
                    "probation_end_date",
                    format!(
                        "probation window of {} days exceeds {} days",
                        window, MAX_PROBATION_DAYS
                    ),
                ));
            }
        }

        Ok(())
    }

    /// Returns true when `date` falls inside an active, dated probation window.
    pub fn in_probation_on(&self, date: NaiveDate) -> bool {
        self.probation && self.probation_end_date.is_some_and(|end| date <= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_employee(contract_type: ContractType) -> Employee {
        Employee {
            id: "emp_001".to_string(),
            full_name: "Carlos Pérez".to_string(),
            document_number: "79000111".to_string(),
            base_salary: Decimal::from(1_750_905),
            contract_type,
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            end_date: None,
            high_risk: false,
            integral_salary: false,
            transport_subsidy_eligible: true,
            probation: false,
            probation_end_date: None,
        }
    }

    #[test]
    fn test_deserialize_employee_with_defaults() {
        let json = r#"{
            "id": "emp_001",
            "full_name": "Carlos Pérez",
            "base_salary": "1750905",
            "contract_type": "indefinite",
            "start_date": "2025-03-01"
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.contract_type, ContractType::Indefinite);
        assert!(employee.transport_subsidy_eligible);
        assert!(!employee.high_risk);
        assert!(employee.end_date.is_none());
        assert!(employee.validate().is_ok());
    }

    #[test]
    fn test_contract_type_labels() {
        assert_eq!(
            serde_json::to_string(&ContractType::FixedTerm).unwrap(),
            "\"fixed_term\""
        );
        assert_eq!(ContractType::from_label("fixed_term"), ContractType::FixedTerm);
        assert_eq!(ContractType::from_label("obra_labor"), ContractType::Other);
    }

    #[test]
    fn test_salary_above_accepted_range_is_rejected() {
        let mut employee = create_test_employee(ContractType::Indefinite);
        employee.base_salary = MAX_AMOUNT;
        assert!(employee.validate().is_ok());

        employee.base_salary = Decimal::MAX;
        assert!(matches!(
            employee.validate(),
            Err(EngineError::ValidationError { ref field, .. }) if field == "base_salary"
        ));
    }

    #[test]
    fn test_fixed_term_requires_end_date() {
        let employee = create_test_employee(ContractType::FixedTerm);
        match employee.validate() {
            Err(EngineError::ValidationError { field, .. }) => assert_eq!(field, "end_date"),
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_fixed_term_with_end_date_is_valid() {
        let mut employee = create_test_employee(ContractType::FixedTerm);
        employee.end_date = Some(NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
        assert!(employee.validate().is_ok());
    }

    #[test]
    fn test_probation_requires_end_date() {
        let mut employee = create_test_employee(ContractType::Indefinite);
        employee.probation = true;
        match employee.validate() {
            Err(EngineError::ValidationError { field, .. }) => {
                assert_eq!(field, "probation_end_date")
            }
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_probation_window_over_sixty_days_is_rejected() {
        let mut employee = create_test_employee(ContractType::Indefinite);
        employee.probation = true;
        employee.probation_end_date = Some(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
        assert!(employee.validate().is_err());

        employee.probation_end_date = Some(NaiveDate::from_ymd_opt(2025, 4, 30).unwrap());
        assert!(employee.validate().is_ok());
    }

    #[test]
    fn test_in_probation_on_boundaries() {
        let mut employee = create_test_employee(ContractType::Indefinite);
        employee.probation = true;
        employee.probation_end_date = Some(NaiveDate::from_ymd_opt(2025, 4, 15).unwrap());

        assert!(employee.in_probation_on(NaiveDate::from_ymd_opt(2025, 4, 15).unwrap()));
        assert!(!employee.in_probation_on(NaiveDate::from_ymd_opt(2025, 4, 16).unwrap()));

        employee.probation = false;
        assert!(!employee.in_probation_on(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()));
    }
}

//! Shared fixtures for calculation tests.

use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::config::{
    Configuration, ContributionRates, DifferentialRates, ParafiscalRates, ProvisionRates, RuleSet,
};
use crate::models::{ContractType, Employee};

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Round figures: minimum wage 1,300,000 and subsidy 162,000.
pub fn test_rules() -> RuleSet {
    RuleSet {
        name: "Test".to_string(),
        effective_from: date(2026, 1, 1),
        minimum_wage: dec("1300000"),
        transport_subsidy: dec("162000"),
        uvt: dec("47065"),
        contributions: ContributionRates {
            employee_health: dec("4"),
            employee_pension: dec("4"),
            employer_health: dec("8.5"),
            employer_pension: dec("12"),
            solidarity_threshold_multiple: dec("4"),
            solidarity_rate: dec("1"),
        },
        parafiscal: ParafiscalRates {
            family_fund: dec("4"),
            sena: dec("2"),
            icbf: dec("3"),
        },
        provisions: ProvisionRates {
            severance: dec("8.33"),
            severance_interest: dec("1"),
            bonus: dec("8.33"),
            vacation: dec("4.17"),
        },
        differentials: DifferentialRates {
            sunday: dec("80"),
            holiday: dec("80"),
            sunday_overtime: dec("105"),
            daytime_overtime: dec("25"),
        },
        standard_monthly_hours: dec("220"),
    }
}

pub fn test_configuration() -> Configuration {
    Configuration {
        id: 7,
        activated_at: Utc::now(),
        superseded_at: None,
        rules: test_rules(),
    }
}

pub fn create_test_employee(salary: Decimal) -> Employee {
    Employee {
        id: "emp_001".to_string(),
        full_name: "Laura Martínez".to_string(),
        document_number: "52123456".to_string(),
        base_salary: salary,
        contract_type: ContractType::Indefinite,
        start_date: date(2024, 2, 1),
        end_date: None,
        high_risk: false,
        integral_salary: false,
        transport_subsidy_eligible: true,
        probation: false,
        probation_end_date: None,
    }
}

//! Employee records read by the calculators.

use chrono::{NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{ContractType, Employee};

use super::decimal_column;

const EMPLOYEE_COLUMNS: &str = "id, full_name, document_number, base_salary, contract_type, \
     start_date, end_date, high_risk, integral_salary, transport_subsidy_eligible, probation, \
     probation_end_date";

/// Repository for the `employees` table.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

fn from_row(row: &SqliteRow) -> EngineResult<Employee> {
    let contract_type: String = row.try_get("contract_type")?;
    let start_date: NaiveDate = row.try_get("start_date")?;

    Ok(Employee {
        id: row.try_get("id")?,
        full_name: row.try_get("full_name")?,
        document_number: row.try_get("document_number")?,
        base_salary: decimal_column(row, "base_salary")?,
        contract_type: ContractType::from_label(&contract_type),
        start_date,
        end_date: row.try_get("end_date")?,
        high_risk: row.try_get("high_risk")?,
        integral_salary: row.try_get("integral_salary")?,
        transport_subsidy_eligible: row.try_get("transport_subsidy_eligible")?,
        probation: row.try_get("probation")?,
        probation_end_date: row.try_get("probation_end_date")?,
    })
}

impl EmployeeRepository {
    /// Creates a repository on `pool`.
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository { pool }
    }

    /// An employee by id, if present.
    pub async fn find(&self, id: &str) -> EngineResult<Option<Employee>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM employees WHERE id = ?1",
            EMPLOYEE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(from_row).transpose()
    }

    /// An employee by id; `EntityNotFound` when absent.
    pub async fn get(&self, id: &str) -> EngineResult<Employee> {
        self.find(id)
            .await?
            .ok_or_else(|| EngineError::not_found("employee", id))
    }

    /// Every employee, ordered by id.
    pub async fn list(&self) -> EngineResult<Vec<Employee>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM employees ORDER BY id",
            EMPLOYEE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(from_row).collect()
    }

    /// Validates and inserts an employee.
    ///
    /// # Returns
    ///
    /// `ValidationError` for contract invariant violations, `ConflictError`
    /// when the id is already taken.
    pub async fn insert(&self, employee: &Employee) -> EngineResult<()> {
        employee.validate()?;
        debug!(employee_id = %employee.id, "Inserting employee");

        sqlx::query(
            "INSERT INTO employees (
                id, full_name, document_number, base_salary, contract_type,
                start_date, end_date, high_risk, integral_salary,
                transport_subsidy_eligible, probation, probation_end_date, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )
        .bind(&employee.id)
        .bind(&employee.full_name)
        .bind(&employee.document_number)
        .bind(employee.base_salary.to_string())
        .bind(employee.contract_type.as_str())
        .bind(employee.start_date)
        .bind(employee.end_date)
        .bind(employee.high_risk)
        .bind(employee.integral_salary)
        .bind(employee.transport_subsidy_eligible)
        .bind(employee.probation)
        .bind(employee.probation_end_date)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Database, DbConfig};
    use rust_decimal::Decimal;

    fn employee(id: &str) -> Employee {
        Employee {
            id: id.to_string(),
            full_name: "María Rodríguez".to_string(),
            document_number: "1032456789".to_string(),
            base_salary: Decimal::from(2_100_000),
            contract_type: ContractType::FixedTerm,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 12, 31),
            high_risk: true,
            integral_salary: false,
            transport_subsidy_eligible: true,
            probation: true,
            probation_end_date: NaiveDate::from_ymd_opt(2026, 3, 1),
        }
    }

    async fn repository() -> EmployeeRepository {
        Database::new(DbConfig::in_memory())
            .await
            .unwrap()
            .employees()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = repository().await;
        let original = employee("emp_100");

        repo.insert(&original).await.unwrap();
        let loaded = repo.get("emp_100").await.unwrap();

        assert_eq!(loaded, original);
    }

    #[tokio::test]
    async fn test_missing_employee_is_not_found() {
        let repo = repository().await;
        match repo.get("ghost").await {
            Err(EngineError::EntityNotFound { entity, id }) => {
                assert_eq!(entity, "employee");
                assert_eq!(id, "ghost");
            }
            other => panic!("Expected EntityNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_employee_is_rejected() {
        let repo = repository().await;
        let mut invalid = employee("emp_101");
        invalid.end_date = None;

        assert!(matches!(
            repo.insert(&invalid).await,
            Err(EngineError::ValidationError { .. })
        ));
        assert!(repo.find("emp_101").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_is_conflict() {
        let repo = repository().await;
        repo.insert(&employee("emp_102")).await.unwrap();

        assert!(matches!(
            repo.insert(&employee("emp_102")).await,
            Err(EngineError::ConflictError { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_is_ordered() {
        let repo = repository().await;
        repo.insert(&employee("emp_b")).await.unwrap();
        repo.insert(&employee("emp_a")).await.unwrap();

        let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["emp_a", "emp_b"]);
    }
}

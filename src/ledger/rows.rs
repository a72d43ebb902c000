//! Row mapping and queries shared by the ledger writers.

use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditRecord, Deductions, DocumentStatus, Earnings, EmployerCosts, EntryState, Payment,
    PaymentKind, PayrollEntry, PayrollTotals, Period, WorkedHours,
};
use crate::store::{decimal_column, u32_column};

pub(crate) const ENTRY_COLUMNS: &str = "id, employee_id, year, month, version, state, \
     days_worked, base_salary, sunday_hours, holiday_hours, sunday_overtime_hours, \
     daytime_overtime_hours, base_pay, transport_subsidy, daytime_overtime_pay, sunday_pay, \
     holiday_pay, sunday_overtime_pay, commissions, other_earnings, health, pension, \
     solidarity_fund, other_deductions, gross, contribution_base, total_deductions, net, \
     employer_exempt, employer_health, employer_pension, arl_rate, arl, family_fund, sena, icbf, \
     severance_provision, severance_interest_provision, bonus_provision, vacation_provision, \
     configuration_id, generated_at, author, document_path, document_error";

const PAYMENT_COLUMNS: &str = "id, entry_id, amount, paid_on, kind, note, author, recorded_at";

fn period_columns(row: &SqliteRow) -> EngineResult<Period> {
    let year: i32 = row.try_get("year")?;
    Period::new(year, u32_column(row, "month")?)
}

pub(crate) fn entry_from_row(row: &SqliteRow) -> EngineResult<PayrollEntry> {
    let state_label: String = row.try_get("state")?;
    let state = EntryState::from_label(&state_label).ok_or_else(|| {
        EngineError::persistence(format!("unknown entry state '{}'", state_label))
    })?;
    let d = |column: &str| decimal_column(row, column);

    Ok(PayrollEntry {
        id: row.try_get("id")?,
        employee_id: row.try_get("employee_id")?,
        period: period_columns(row)?,
        version: u32_column(row, "version")?,
        state,
        days_worked: u32_column(row, "days_worked")?,
        base_salary: d("base_salary")?,
        hours: WorkedHours {
            sunday: d("sunday_hours")?,
            holiday: d("holiday_hours")?,
            sunday_overtime: d("sunday_overtime_hours")?,
            daytime_overtime: d("daytime_overtime_hours")?,
        },
        earnings: Earnings {
            base_pay: d("base_pay")?,
            transport_subsidy: d("transport_subsidy")?,
            daytime_overtime: d("daytime_overtime_pay")?,
            sunday: d("sunday_pay")?,
            holiday: d("holiday_pay")?,
            sunday_overtime: d("sunday_overtime_pay")?,
            commissions: d("commissions")?,
            other: d("other_earnings")?,
        },
        deductions: Deductions {
            health: d("health")?,
            pension: d("pension")?,
            solidarity_fund: d("solidarity_fund")?,
            other: d("other_deductions")?,
        },
        totals: PayrollTotals {
            gross: d("gross")?,
            contribution_base: d("contribution_base")?,
            deductions: d("total_deductions")?,
            net: d("net")?,
        },
        employer_costs: EmployerCosts {
            exempt: row.try_get("employer_exempt")?,
            health: d("employer_health")?,
            pension: d("employer_pension")?,
            arl_rate: d("arl_rate")?,
            arl: d("arl")?,
            family_fund: d("family_fund")?,
            sena: d("sena")?,
            icbf: d("icbf")?,
            severance_provision: d("severance_provision")?,
            severance_interest_provision: d("severance_interest_provision")?,
            bonus_provision: d("bonus_provision")?,
            vacation_provision: d("vacation_provision")?,
        },
        configuration_id: row.try_get("configuration_id")?,
        generated_at: row.try_get("generated_at")?,
        author: row.try_get("author")?,
        document: DocumentStatus::from_columns(
            row.try_get("document_path")?,
            row.try_get("document_error")?,
        ),
    })
}

pub(crate) fn payment_from_row(row: &SqliteRow) -> EngineResult<Payment> {
    let kind: String = row.try_get("kind")?;
    Ok(Payment {
        id: row.try_get("id")?,
        entry_id: row.try_get("entry_id")?,
        amount: decimal_column(row, "amount")?,
        paid_on: row.try_get("paid_on")?,
        kind: PaymentKind::from_label(&kind),
        note: row.try_get("note")?,
        author: row.try_get("author")?,
        recorded_at: row.try_get("recorded_at")?,
    })
}

pub(crate) fn audit_from_row(row: &SqliteRow) -> EngineResult<AuditRecord> {
    let snapshot: String = row.try_get("snapshot")?;
    Ok(AuditRecord {
        id: row.try_get("id")?,
        entry_id: row.try_get("entry_id")?,
        employee_id: row.try_get("employee_id")?,
        period: period_columns(row)?,
        version: u32_column(row, "version")?,
        recorded_at: row.try_get("recorded_at")?,
        description: row.try_get("description")?,
        author: row.try_get("author")?,
        snapshot: serde_json::from_str(&snapshot)?,
    })
}

/// An entry by id, if present.
pub(crate) async fn find_entry(
    conn: &mut SqliteConnection,
    entry_id: i64,
) -> EngineResult<Option<PayrollEntry>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM payroll_entries WHERE id = ?1",
        ENTRY_COLUMNS
    ))
    .bind(entry_id)
    .fetch_optional(&mut *conn)
    .await?;

    row.as_ref().map(entry_from_row).transpose()
}

/// The highest version for (employee, period), in any state.
pub(crate) async fn latest_entry(
    conn: &mut SqliteConnection,
    employee_id: &str,
    period: Period,
) -> EngineResult<Option<PayrollEntry>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM payroll_entries
         WHERE employee_id = ?1 AND year = ?2 AND month = ?3
         ORDER BY version DESC LIMIT 1",
        ENTRY_COLUMNS
    ))
    .bind(employee_id)
    .bind(period.year)
    .bind(period.month)
    .fetch_optional(&mut *conn)
    .await?;

    row.as_ref().map(entry_from_row).transpose()
}

/// Payments for one entry, oldest first.
pub(crate) async fn payments_for(
    conn: &mut SqliteConnection,
    entry_id: i64,
) -> EngineResult<Vec<Payment>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM payments WHERE entry_id = ?1 ORDER BY recorded_at, id",
        PAYMENT_COLUMNS
    ))
    .bind(entry_id)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter().map(payment_from_row).collect()
}

/// Payments for several entries of one employee, oldest first.
pub(crate) async fn payments_for_employee(
    conn: &mut SqliteConnection,
    employee_id: &str,
    period: Option<Period>,
) -> EngineResult<Vec<Payment>> {
    let sql = format!(
        "SELECT p.id, p.entry_id, p.amount, p.paid_on, p.kind, p.note, p.author, p.recorded_at
         FROM payments p JOIN payroll_entries e ON e.id = p.entry_id
         WHERE e.employee_id = ?1 {}
         ORDER BY p.recorded_at, p.id",
        if period.is_some() {
            "AND e.year = ?2 AND e.month = ?3"
        } else {
            ""
        }
    );
    let mut query = sqlx::query(&sql).bind(employee_id);
    if let Some(period) = period {
        query = query.bind(period.year).bind(period.month);
    }
    let rows = query.fetch_all(&mut *conn).await?;

    rows.iter().map(payment_from_row).collect()
}

/// Net minus payments.
pub(crate) fn outstanding(entry: &PayrollEntry, payments: &[Payment]) -> Decimal {
    let paid: Decimal = payments.iter().map(|p| p.amount).sum();
    entry.totals.net - paid
}

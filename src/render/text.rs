//! Plain-text payslips and settlements.

use std::fmt::Write as _;

use rust_decimal::Decimal;

use crate::calculation::round_currency;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, SeveranceComponent, SeveranceResult};

use super::{DocumentRenderer, Payslip};

const RULE: &str = "------------------------------------------------------------";

/// Formats an amount as whole pesos with `.` thousands separators.
///
/// # Examples
///
/// ```
/// use payroll_engine::render::format_pesos;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_pesos(Decimal::from(1_462_000)), "$1.462.000");
/// assert_eq!(format_pesos(Decimal::from(-5_000)), "-$5.000");
/// assert_eq!(format_pesos(Decimal::ZERO), "$0");
/// ```
pub fn format_pesos(amount: Decimal) -> String {
    let rounded = round_currency(amount);
    let digits = rounded.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if rounded < Decimal::ZERO {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Renders documents as UTF-8 text laid out like the printed forms.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TextRenderer {
    /// Creates a text renderer.
    pub fn new() -> Self {
        TextRenderer
    }
}

fn line(out: &mut String, label: &str, amount: Decimal) -> std::fmt::Result {
    writeln!(out, "{:<40}{:>20}", label, format_pesos(amount))
}

fn optional_line(out: &mut String, label: &str, amount: Decimal) -> std::fmt::Result {
    if amount != Decimal::ZERO {
        line(out, label, amount)?;
    }
    Ok(())
}

fn component(out: &mut String, label: &str, c: &SeveranceComponent) -> std::fmt::Result {
    line(out, &format!("{} ({} días)", label, c.days.normalize()), c.value)?;
    writeln!(out, "    {}  [{}]", c.formula, c.clause_ref)
}

fn write_payslip(out: &mut String, slip: &Payslip) -> std::fmt::Result {
    writeln!(out, "COMPROBANTE DE NÓMINA")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Empleado: {}", slip.employee_name)?;
    writeln!(out, "Documento: {}", slip.document_number)?;
    writeln!(out, "Período: {} {}", slip.period.month_name(), slip.period.year)?;
    writeln!(out, "Días Trabajados: {}", slip.days_worked)?;
    if let Some(version) = slip.version {
        writeln!(out, "Versión: {}", version)?;
    } else {
        writeln!(out, "Versión: VISTA PREVIA")?;
    }
    writeln!(out)?;

    let e = &slip.earnings;
    writeln!(out, "DEVENGADOS")?;
    line(out, "Sueldo Básico", e.base_pay)?;
    optional_line(out, "Auxilio Transporte", e.transport_subsidy)?;
    optional_line(out, "Horas Extras Diurnas", e.daytime_overtime)?;
    optional_line(out, "Recargo Dominical", e.sunday)?;
    optional_line(out, "Recargo Festivo", e.holiday)?;
    optional_line(out, "H. Extra Dominical", e.sunday_overtime)?;
    optional_line(out, "Comisiones", e.commissions)?;
    optional_line(out, "Otros Devengados", e.other)?;
    line(out, "Total Devengado", slip.totals.gross)?;
    writeln!(out)?;

    let d = &slip.deductions;
    writeln!(out, "DEDUCCIONES")?;
    line(out, "Salud", d.health)?;
    line(out, "Pensión", d.pension)?;
    optional_line(out, "Fondo Solidaridad", d.solidarity_fund)?;
    optional_line(out, "Otras Deducciones", d.other)?;
    line(out, "Total Deducciones", slip.totals.deductions)?;
    writeln!(out, "{}", RULE)?;
    line(out, "NETO A PAGAR", slip.totals.net)?;
    writeln!(out)?;
    writeln!(out, "_________________________     _________________________")?;
    writeln!(out, "   Firma Empleador               Firma Empleado")
}

fn write_settlement(
    out: &mut String,
    employee: &Employee,
    s: &SeveranceResult,
) -> std::fmt::Result {
    writeln!(out, "LIQUIDACIÓN DE PRESTACIONES SOCIALES")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Empleado: {}", employee.full_name)?;
    writeln!(out, "Documento: {}", employee.document_number)?;
    writeln!(out, "Fecha Ingreso: {}", s.start_date.format("%d/%m/%Y"))?;
    writeln!(out, "Fecha Retiro: {}", s.retirement_date.format("%d/%m/%Y"))?;
    writeln!(out, "Días Laborados: {}", s.tenure_days)?;
    writeln!(out, "Motivo: {}", s.reason.as_str())?;
    writeln!(out)?;

    writeln!(out, "BASES")?;
    line(out, "Salario Base", s.bases.base_salary)?;
    optional_line(out, "Auxilio Transporte", s.bases.transport_subsidy)?;
    line(out, "Base Prestaciones", s.bases.benefits_base)?;
    writeln!(out)?;

    writeln!(out, "PRESTACIONES")?;
    component(out, "Cesantías", &s.severance)?;
    component(out, "Intereses Cesantías", &s.severance_interest)?;
    component(out, "Prima de Servicios", &s.bonus)?;
    component(out, "Vacaciones", &s.vacation)?;
    component(out, "Indemnización", &s.indemnity)?;
    line(
        out,
        &format!("Salario Pendiente ({} días)", s.pending_salary.days),
        s.pending_salary.net,
    )?;
    writeln!(out, "    {}", s.pending_salary.formula)?;
    writeln!(out, "{}", RULE)?;
    line(out, "TOTAL LIQUIDACIÓN", s.total)?;

    if !s.notes.is_empty() {
        writeln!(out)?;
        writeln!(out, "OBSERVACIONES")?;
        for note in &s.notes {
            writeln!(out, "- {}", note)?;
        }
    }
    Ok(())
}

fn finish(result: std::fmt::Result, out: String) -> EngineResult<Vec<u8>> {
    result.map_err(|e| EngineError::persistence(format!("rendering failed: {}", e)))?;
    Ok(out.into_bytes())
}

impl DocumentRenderer for TextRenderer {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn mime_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn render_payslip(&self, payslip: &Payslip) -> EngineResult<Vec<u8>> {
        let mut out = String::new();
        let result = write_payslip(&mut out, payslip);
        finish(result, out)
    }

    fn render_settlement(
        &self,
        employee: &Employee,
        settlement: &SeveranceResult,
    ) -> EngineResult<Vec<u8>> {
        let mut out = String::new();
        let result = write_settlement(&mut out, employee, settlement);
        finish(result, out)
    }
}

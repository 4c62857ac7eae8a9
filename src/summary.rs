//! Number formatting shared by the dashboard front ends.

use std::fmt::Write;

use crate::aggregate::YearTotal;

/// Round to whole MWh (ties to even) and group thousands with commas: `1234567.4` → `"1,234,567"`.
/// Missing values render as `"-"`.
pub fn format_mwh(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let rounded = value.round_ties_even();
    let digits = format!("{:.0}", rounded.abs());

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Plain-text "year | total MWh" table of the yearly totals.
pub fn yearly_summary_table(rows: &[YearTotal]) -> String {
    let values: Vec<String> = rows.iter().map(|r| format_mwh(r.consumption_mwh)).collect();
    let width = values
        .iter()
        .map(String::len)
        .chain(std::iter::once("Consumo (MWh)".len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(out, "{:<6} {:>width$}", "Ano", "Consumo (MWh)");
    for (row, value) in rows.iter().zip(&values) {
        let _ = writeln!(out, "{:<6} {:>width$}", row.year, value);
    }
    out
}

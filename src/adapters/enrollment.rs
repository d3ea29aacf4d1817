use crate::domain::model::{EnrollmentRecord, Regime, RegimeCounts};
use crate::utils::error::{DashboardError, Result};
use csv::StringRecord;
use std::collections::HashSet;

const SOURCE_NAME: &str = "enrollment CSV";

/// Header names of the key and display columns. The three count columns are
/// always named after their regime.
#[derive(Debug, Clone)]
pub struct EnrollmentColumns {
    pub code: String,
    pub name: String,
}

struct ColumnIndexes {
    code: usize,
    name: usize,
    contributivo: usize,
    subsidiado: usize,
    especial: usize,
}

fn find_column(headers: &StringRecord, column: &str) -> Result<usize> {
    headers
        .iter()
        .position(|header| header.trim_start_matches('\u{feff}').trim() == column)
        .ok_or_else(|| DashboardError::MissingColumnError {
            column: column.to_string(),
            source_name: SOURCE_NAME.to_string(),
        })
}

/// Accepts `"1234"` and integral floats such as `"1234.0"`, which is what
/// spreadsheet exports tend to produce. Floats outside the `u64` range are
/// rejected rather than saturated.
fn parse_count(raw: &str, column: &str, line: u64) -> Result<u64> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<u64>() {
        return Ok(value);
    }

    match raw.parse::<f64>() {
        Ok(value)
            if value.is_finite()
                && value >= 0.0
                && value.fract() == 0.0
                && value < u64::MAX as f64 =>
        {
            Ok(value as u64)
        }
        _ => Err(DashboardError::ValidationError {
            message: format!(
                "line {}: column '{}' must be a non-negative integer, got '{}'",
                line, column, raw
            ),
        }),
    }
}

pub fn parse_enrollment_csv(
    bytes: &[u8],
    columns: &EnrollmentColumns,
) -> Result<Vec<EnrollmentRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let indexes = ColumnIndexes {
        code: find_column(&headers, &columns.code)?,
        name: find_column(&headers, &columns.name)?,
        contributivo: find_column(&headers, Regime::Contributivo.as_str())?,
        subsidiado: find_column(&headers, Regime::Subsidiado.as_str())?,
        especial: find_column(&headers, Regime::Especial.as_str())?,
    };

    let mut records = Vec::new();
    let mut seen_codes = HashSet::new();

    for result in reader.records() {
        let row = result?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let field = |index: usize| row.get(index).unwrap_or_default();

        // Codes stay strings: "05" and "5" are different departments.
        let department_code = field(indexes.code).to_string();
        if department_code.is_empty() {
            return Err(DashboardError::ValidationError {
                message: format!("line {}: empty department code", line),
            });
        }
        if !seen_codes.insert(department_code.clone()) {
            return Err(DashboardError::ValidationError {
                message: format!(
                    "line {}: duplicate department code '{}'",
                    line, department_code
                ),
            });
        }

        records.push(EnrollmentRecord {
            department_code,
            department_name: field(indexes.name).to_string(),
            counts: RegimeCounts {
                contributivo: parse_count(
                    field(indexes.contributivo),
                    Regime::Contributivo.as_str(),
                    line,
                )?,
                subsidiado: parse_count(
                    field(indexes.subsidiado),
                    Regime::Subsidiado.as_str(),
                    line,
                )?,
                especial: parse_count(field(indexes.especial), Regime::Especial.as_str(), line)?,
            },
        });
    }

    tracing::debug!("Parsed {} enrollment rows", records.len());
    Ok(records)
}

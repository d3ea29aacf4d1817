use crate::domain::model::{EnrollmentRecord, Regime, SummaryStats};
use crate::utils::error::{DashboardError, Result};

/// Sum of the regime column; 0 for an empty table. Fails instead of wrapping
/// when the sum does not fit in a `u64`.
pub fn total(table: &[EnrollmentRecord], regime: Regime) -> Result<u64> {
    table.iter().try_fold(0u64, |sum, record| {
        sum.checked_add(record.counts.get(regime))
            .ok_or_else(|| DashboardError::ProcessingError {
                message: format!("la suma de afiliados {} desborda", regime),
            })
    })
}

/// Summary of one regime column over the raw enrollment table.
///
/// The mean is undefined for an empty table, so that case is an
/// [`DashboardError::EmptyTable`] error. When several departments share the
/// maximum, the first one in table order is reported.
pub fn summarize(table: &[EnrollmentRecord], regime: Regime) -> Result<SummaryStats> {
    let first = table.first().ok_or(DashboardError::EmptyTable)?;

    let mut argmax = first;
    let mut non_zero_count = 0;
    for record in table {
        let value = record.counts.get(regime);
        if value > 0 {
            non_zero_count += 1;
        }
        if value > argmax.counts.get(regime) {
            argmax = record;
        }
    }

    let total = total(table, regime)?;

    Ok(SummaryStats {
        total,
        mean: total as f64 / table.len() as f64,
        non_zero_count,
        max: argmax.counts.get(regime),
        argmax_department_name: argmax.department_name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::RegimeCounts;

    fn record(name: &str, contributivo: u64, subsidiado: u64, especial: u64) -> EnrollmentRecord {
        EnrollmentRecord {
            department_code: name.to_string(),
            department_name: name.to_string(),
            counts: RegimeCounts {
                contributivo,
                subsidiado,
                especial,
            },
        }
    }

    #[test]
    fn test_two_departments() {
        let table = vec![record("A", 100, 5, 0), record("B", 300, 0, 0)];
        let stats = summarize(&table, Regime::Contributivo).unwrap();

        assert_eq!(stats.total, 400);
        assert_eq!(stats.mean, 200.0);
        assert_eq!(stats.non_zero_count, 2);
        assert_eq!(stats.max, 300);
        assert_eq!(stats.argmax_department_name, "B");
    }

    #[test]
    fn test_all_zero_column() {
        let table = vec![record("A", 1, 1, 0)];
        let stats = summarize(&table, Regime::Especial).unwrap();

        assert_eq!(stats.total, 0);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.non_zero_count, 0);
        assert_eq!(stats.max, 0);
        assert_eq!(stats.argmax_department_name, "A");
    }

    #[test]
    fn test_tie_keeps_first_occurrence() {
        let table = vec![
            record("A", 10, 0, 0),
            record("B", 50, 0, 0),
            record("C", 50, 0, 0),
        ];
        let stats = summarize(&table, Regime::Contributivo).unwrap();
        assert_eq!(stats.argmax_department_name, "B");
    }

    #[test]
    fn test_empty_table() {
        assert!(matches!(
            summarize(&[], Regime::Subsidiado),
            Err(DashboardError::EmptyTable)
        ));
        assert_eq!(total(&[], Regime::Subsidiado).unwrap(), 0);
    }

    #[test]
    fn test_overflowing_total_is_an_error() {
        let table = vec![record("A", u64::MAX, 0, 0), record("B", 1, 0, 0)];

        assert!(matches!(
            summarize(&table, Regime::Contributivo),
            Err(DashboardError::ProcessingError { .. })
        ));
        assert!(total(&table, Regime::Contributivo).is_err());
        // other columns still summarize
        assert_eq!(summarize(&table, Regime::Subsidiado).unwrap().total, 0);
    }

    #[test]
    fn test_properties_hold_for_every_regime() {
        let table = vec![
            record("A", 0, 7, 3),
            record("B", 12, 0, 0),
            record("C", 5, 9, 0),
            record("D", 0, 0, 0),
        ];

        for regime in Regime::ALL {
            let stats = summarize(&table, regime).unwrap();
            let positives: u64 = table
                .iter()
                .map(|r| r.counts.get(regime))
                .filter(|v| *v > 0)
                .sum();

            assert_eq!(stats.total, positives);
            assert_eq!(stats.mean, stats.total as f64 / table.len() as f64);
            if stats.non_zero_count > 0 {
                assert!(stats.total >= stats.max);
            }
        }
        // input untouched
        assert_eq!(table[1].counts.contributivo, 12);
    }
}

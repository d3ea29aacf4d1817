use crate::utils::error::DashboardError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Health-insurance enrollment regime. The variant names double as the CSV
/// column headers and the dropdown labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Regime {
    #[default]
    Contributivo,
    Subsidiado,
    Especial,
}

impl Regime {
    /// Dropdown order; the first entry is the initial selection.
    pub const ALL: [Regime; 3] = [Regime::Contributivo, Regime::Subsidiado, Regime::Especial];

    pub fn as_str(&self) -> &'static str {
        match self {
            Regime::Contributivo => "Contributivo",
            Regime::Subsidiado => "Subsidiado",
            Regime::Especial => "Especial",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Regime {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Regime::ALL
            .into_iter()
            .find(|regime| regime.as_str() == s)
            .ok_or_else(|| DashboardError::ValidationError {
                message: format!(
                    "unknown regime '{}', expected one of Contributivo, Subsidiado, Especial",
                    s
                ),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegimeCounts {
    pub contributivo: u64,
    pub subsidiado: u64,
    pub especial: u64,
}

impl RegimeCounts {
    pub fn get(&self, regime: Regime) -> u64 {
        match regime {
            Regime::Contributivo => self.contributivo,
            Regime::Subsidiado => self.subsidiado,
            Regime::Especial => self.especial,
        }
    }
}

/// One row of the enrollment CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub department_code: String,
    pub department_name: String,
    pub counts: RegimeCounts,
}

/// A closed ring of `[lon, lat]` points.
pub type Ring = Vec<[f64; 2]>;

/// Department boundary as a multipolygon: each polygon is an exterior ring
/// followed by zero or more holes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub polygons: Vec<Vec<Ring>>,
}

impl Geometry {
    pub fn is_empty(&self) -> bool {
        self.polygons.iter().all(|rings| rings.is_empty())
    }

    pub fn point_count(&self) -> usize {
        self.polygons
            .iter()
            .flat_map(|rings| rings.iter())
            .map(|ring| ring.len())
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentGeometry {
    pub department_code: String,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergedDepartment {
    pub department_code: String,
    pub department_name: String,
    pub counts: RegimeCounts,
    pub geometry: Geometry,
}

/// Both inputs as read from disk, before the join.
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub enrollment: Vec<EnrollmentRecord>,
    pub geometries: Vec<DepartmentGeometry>,
}

/// The loaded snapshot. Built once, then shared read-only.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub raw: Vec<EnrollmentRecord>,
    pub merged: Vec<MergedDepartment>,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total: u64,
    pub mean: f64,
    pub non_zero_count: usize,
    pub max: u64,
    pub argmax_department_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regime_round_trips_through_its_name() {
        for regime in Regime::ALL {
            assert_eq!(regime.as_str().parse::<Regime>().unwrap(), regime);
        }
        assert!("contributivo".parse::<Regime>().is_err());
        assert_eq!(Regime::default(), Regime::ALL[0]);
    }

    #[test]
    fn test_regime_counts_get() {
        let counts = RegimeCounts {
            contributivo: 1,
            subsidiado: 2,
            especial: 3,
        };
        assert_eq!(counts.get(Regime::Contributivo), 1);
        assert_eq!(counts.get(Regime::Subsidiado), 2);
        assert_eq!(counts.get(Regime::Especial), 3);
    }

    #[test]
    fn test_geometry_empty() {
        assert!(Geometry::default().is_empty());
        let geometry = Geometry {
            polygons: vec![vec![vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0]]]],
        };
        assert!(!geometry.is_empty());
        assert_eq!(geometry.point_count(), 4);
    }
}

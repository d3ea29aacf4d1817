use crate::domain::model::{DepartmentGeometry, EnrollmentRecord, MergedDepartment};
use std::collections::HashMap;

/// Inner join of boundaries and enrollment rows on department code.
///
/// Output follows geometry order. Boundaries without an enrollment row and
/// enrollment rows without a boundary are both dropped.
pub fn join_departments(
    geometries: &[DepartmentGeometry],
    enrollment: &[EnrollmentRecord],
) -> Vec<MergedDepartment> {
    let by_code: HashMap<&str, &EnrollmentRecord> = enrollment
        .iter()
        .map(|record| (record.department_code.as_str(), record))
        .collect();

    geometries
        .iter()
        .filter_map(|shape| {
            by_code
                .get(shape.department_code.as_str())
                .map(|record| MergedDepartment {
                    department_code: shape.department_code.clone(),
                    department_name: record.department_name.clone(),
                    counts: record.counts,
                    geometry: shape.geometry.clone(),
                })
        })
        .collect()
}

use crate::adapters::enrollment::{parse_enrollment_csv, EnrollmentColumns};
use crate::adapters::geometry::read_geometries;
use crate::core::join::join_departments;
use crate::core::{ConfigProvider, Dataset, Pipeline, SourceTables, Storage};
use crate::utils::error::Result;
use chrono::Utc;

/// Reads the enrollment CSV and the department boundaries, then joins them.
pub struct DashboardPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> DashboardPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for DashboardPipeline<S, C> {
    async fn extract(&self) -> Result<SourceTables> {
        tracing::info!("📂 Loading enrollment CSV: {}", self.config.enrollment_csv());
        let bytes = self.storage.read_file(self.config.enrollment_csv()).await?;
        let columns = EnrollmentColumns {
            code: self.config.code_column().to_string(),
            name: self.config.name_column().to_string(),
        };
        let enrollment = parse_enrollment_csv(&bytes, &columns)?;
        tracing::info!("✅ CSV loaded: {} rows", enrollment.len());

        tracing::info!("🗺️ Loading geometry: {}", self.config.geometry_file());
        let geometries = read_geometries(
            &self.storage,
            self.config.geometry_file(),
            self.config.geometry_key(),
        )
        .await?;
        tracing::info!("✅ Geometry loaded: {} shapes", geometries.len());

        Ok(SourceTables {
            enrollment,
            geometries,
        })
    }

    async fn transform(&self, tables: SourceTables) -> Result<Dataset> {
        let merged = join_departments(&tables.geometries, &tables.enrollment);

        if merged.is_empty() {
            tracing::warn!(
                "Join produced no rows; check that '{}' and '{}' use the same code format",
                self.config.code_column(),
                self.config.geometry_key()
            );
        } else if merged.len() < tables.enrollment.len() {
            tracing::warn!(
                "{} enrollment rows have no matching boundary and are left off the map",
                tables.enrollment.len() - merged.len()
            );
        }

        Ok(Dataset {
            raw: tables.enrollment,
            merged,
            loaded_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::DashboardSettings;
    use crate::utils::error::DashboardError;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn put(&self, path: &str, data: &str) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.as_bytes().to_vec());
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                DashboardError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        fn locate(&self, path: &str) -> PathBuf {
            PathBuf::from(path)
        }
    }

    fn settings() -> DashboardSettings {
        DashboardSettings {
            enrollment_csv: "afiliados.csv".to_string(),
            geometry_file: "deptos.geojson".to_string(),
            ..DashboardSettings::default()
        }
    }

    const CSV: &str = "CodDepto,Departamento,Contributivo,Subsidiado,Especial\n\
                       05,ANTIOQUIA,100,10,1\n\
                       11,BOGOTÁ,300,20,0\n";

    const GEOJSON: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"DPTO_CCDGO":"05"},
         "geometry":{"type":"Polygon","coordinates":[[[-76,6],[-75,6],[-75,7],[-76,6]]]}}]}"#;

    #[tokio::test]
    async fn test_extract_and_transform() {
        let storage = MockStorage::default();
        storage.put("afiliados.csv", CSV).await;
        storage.put("deptos.geojson", GEOJSON).await;
        let pipeline = DashboardPipeline::new(storage, settings());

        let tables = pipeline.extract().await.unwrap();
        assert_eq!(tables.enrollment.len(), 2);
        assert_eq!(tables.geometries.len(), 1);

        let dataset = pipeline.transform(tables).await.unwrap();
        assert_eq!(dataset.raw.len(), 2);
        assert_eq!(dataset.merged.len(), 1);
        assert_eq!(dataset.merged[0].department_name, "ANTIOQUIA");
    }

    #[tokio::test]
    async fn test_missing_geometry_file_fails_extract() {
        let storage = MockStorage::default();
        storage.put("afiliados.csv", CSV).await;
        let pipeline = DashboardPipeline::new(storage, settings());

        assert!(matches!(
            pipeline.extract().await,
            Err(DashboardError::IoError(_))
        ));
    }
}

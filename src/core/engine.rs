use crate::core::{Dataset, Pipeline};
use crate::utils::error::Result;
use crate::utils::monitor::LoadMonitor;

/// Drives a [`Pipeline`] from raw files to a joined [`Dataset`].
pub struct LoadEngine<P: Pipeline> {
    pipeline: P,
    monitor: LoadMonitor,
}

impl<P: Pipeline> LoadEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: LoadMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<Dataset> {
        tracing::info!("Starting data load");
        self.monitor.log_phase("Start");

        let tables = self.pipeline.extract().await?;
        let points: usize = tables
            .geometries
            .iter()
            .map(|shape| shape.geometry.point_count())
            .sum();
        tracing::debug!(
            "Extracted {} enrollment rows and {} shapes ({} points)",
            tables.enrollment.len(),
            tables.geometries.len(),
            points
        );
        self.monitor.log_phase("Extract");

        let dataset = self.pipeline.transform(tables).await?;
        tracing::info!(
            "✅ Merge complete: {} departments, {} on the map",
            dataset.raw.len(),
            dataset.merged.len()
        );
        self.monitor.log_phase("Merge");

        Ok(dataset)
    }
}

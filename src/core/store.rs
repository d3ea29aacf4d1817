use crate::core::engine::LoadEngine;
use crate::core::{Dataset, Pipeline};
use crate::domain::model::{EnrollmentRecord, MergedDepartment};
use crate::utils::error::{DashboardError, Result};
use std::sync::{Arc, OnceLock};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Holds the loaded snapshot.
///
/// The dataset lives in a write-once cell: the background load publishes it
/// exactly once and every reader afterwards gets the same immutable value
/// without locking. A load failure leaves the store not ready for the rest of
/// the process; there is no retry.
pub struct DataStore {
    dataset: OnceLock<Arc<Dataset>>,
    ready_tx: watch::Sender<bool>,
}

impl DataStore {
    pub fn new() -> Self {
        let (ready_tx, _) = watch::channel(false);
        Self {
            dataset: OnceLock::new(),
            ready_tx,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.dataset.get().is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.ready_tx.subscribe()
    }

    /// Resolves once the dataset is published. Never resolves if the load failed.
    pub async fn wait_ready(&self) {
        let mut ready = self.subscribe();
        // the sender lives as long as `self`, so this only returns on `true`
        let _ = ready.wait_for(|ready| *ready).await;
    }

    pub fn publish(&self, dataset: Dataset) -> Result<()> {
        self.dataset
            .set(Arc::new(dataset))
            .map_err(|_| DashboardError::AlreadyPublished)?;
        self.ready_tx.send_replace(true);
        Ok(())
    }

    pub fn dataset(&self) -> Option<Arc<Dataset>> {
        self.dataset.get().cloned()
    }

    /// Enrollment rows as read from the CSV, including departments that have
    /// no boundary.
    pub fn raw_table(&self) -> Option<&[EnrollmentRecord]> {
        self.dataset.get().map(|dataset| dataset.raw.as_slice())
    }

    pub fn merged(&self) -> Option<&[MergedDepartment]> {
        self.dataset.get().map(|dataset| dataset.merged.as_slice())
    }

    /// Runs the load on a background task and publishes the result.
    pub fn spawn_load<P>(self: &Arc<Self>, engine: LoadEngine<P>) -> JoinHandle<()>
    where
        P: Pipeline + 'static,
    {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            match engine.run().await {
                Ok(dataset) => {
                    if let Err(e) = store.publish(dataset) {
                        tracing::error!("❌ Could not publish dataset: {}", e);
                    }
                }
                Err(e) => {
                    tracing::error!(
                        "❌ Data load failed: {} (Category: {:?})",
                        e,
                        e.category()
                    );
                    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
                }
            }
        })
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

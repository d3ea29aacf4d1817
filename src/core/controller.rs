use crate::core::aggregate::summarize;
use crate::core::store::DataStore;
use crate::core::view::{self, DashboardView};
use crate::domain::model::Regime;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Loading,
    Ready,
}

/// Request-response handler behind the dashboard.
///
/// The only state it reads is the store, which goes from `Loading` to `Ready`
/// once and never back. Each `update` is a pure function of that snapshot and
/// the selected regime, so concurrent requests need no coordination.
#[derive(Clone)]
pub struct DashboardController {
    store: Arc<DataStore>,
}

impl DashboardController {
    pub fn new(store: Arc<DataStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.store
    }

    pub fn phase(&self) -> Phase {
        if self.store.is_ready() {
            Phase::Ready
        } else {
            Phase::Loading
        }
    }

    /// Main content is shown only once the data is in.
    pub fn show_content(&self) -> bool {
        self.phase() == Phase::Ready
    }

    pub fn update(&self, regime: Regime) -> DashboardView {
        let Some(dataset) = self.store.dataset() else {
            tracing::debug!("Update for {} while loading", regime);
            return view::loading();
        };

        let stats = summarize(&dataset.raw, regime);
        view::build(&dataset.merged, &dataset.raw, regime, &stats)
    }
}

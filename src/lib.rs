pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;
pub mod web;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, settings::DashboardSettings};
pub use core::{
    controller::DashboardController, engine::LoadEngine, pipeline::DashboardPipeline,
    store::DataStore,
};
pub use domain::model::Regime;
pub use utils::error::{DashboardError, Result};

pub mod aggregate;
pub mod controller;
pub mod engine;
pub mod join;
pub mod pipeline;
pub mod store;
pub mod view;

pub use crate::domain::model::{Dataset, SourceTables};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;

use crate::domain::model::{Dataset, SourceTables};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;

    /// Filesystem location of `path`, for formats that are spread over
    /// several sibling files (shapefiles).
    fn locate(&self, path: &str) -> PathBuf;
}

pub trait ConfigProvider: Send + Sync {
    fn enrollment_csv(&self) -> &str;
    fn geometry_file(&self) -> &str;
    fn code_column(&self) -> &str;
    fn name_column(&self) -> &str;
    fn geometry_key(&self) -> &str;
    fn bind_address(&self) -> String;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<SourceTables>;
    async fn transform(&self, tables: SourceTables) -> Result<Dataset>;
}

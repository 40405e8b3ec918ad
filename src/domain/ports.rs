use crate::domain::model::{CategoryReport, LoadSummary, OwnedItemRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Human readable location of `path`, used in logs and summaries.
    fn location(&self, path: &str) -> String;
}

/// Supplies the flat list of owned-item records for one run.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_records(&self) -> Result<Vec<OwnedItemRecord>>;
}

/// Persists finished category tables.
#[async_trait]
pub trait ReportPublisher: Send + Sync {
    /// Overwrites the addressed range with the report's table.
    async fn publish(&self, report: &CategoryReport) -> Result<()>;

    /// Called once after every category was handed over. Returns where the
    /// reports ended up, if the publisher has a single artifact to point at.
    async fn finish(&self) -> Result<Option<String>> {
        Ok(None)
    }
}

#[async_trait]
impl<T: RecordSource + ?Sized> RecordSource for Box<T> {
    async fn fetch_records(&self) -> Result<Vec<OwnedItemRecord>> {
        (**self).fetch_records().await
    }
}

#[async_trait]
impl<T: ReportPublisher + ?Sized> ReportPublisher for Box<T> {
    async fn publish(&self, report: &CategoryReport) -> Result<()> {
        (**self).publish(report).await
    }

    async fn finish(&self) -> Result<Option<String>> {
        (**self).finish().await
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<OwnedItemRecord>>;
    async fn transform(&self, records: Vec<OwnedItemRecord>) -> Result<Vec<CategoryReport>>;
    async fn load(&self, reports: Vec<CategoryReport>) -> Result<LoadSummary>;
}

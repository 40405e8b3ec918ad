use crate::core::Pipeline;
use crate::domain::model::LoadSummary;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<LoadSummary> {
        let started = Instant::now();
        tracing::info!("Starting report run...");

        // Extract
        tracing::info!("📥 Extracting roster records...");
        let records = self.pipeline.extract().await?;
        tracing::info!("Extracted {} records", records.len());

        // Transform
        tracing::info!("🔄 Building category reports...");
        let reports = self.pipeline.transform(records).await?;
        tracing::info!("Built {} reports", reports.len());

        // Load
        tracing::info!("📤 Publishing reports...");
        let summary = self.pipeline.load(reports).await?;
        tracing::info!(
            "Published {} reports in {:?}",
            summary.published.len(),
            started.elapsed()
        );

        Ok(summary)
    }
}

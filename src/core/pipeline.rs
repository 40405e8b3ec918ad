use crate::core::catalog::TeamCatalog;
use crate::core::report::build_reports;
use crate::core::roster::RosterIndex;
use crate::core::{CategoryReport, LoadSummary, OwnedItemRecord, Pipeline, RecordSource, ReportPublisher};
use crate::utils::error::{ReportError, Result};

/// What to do when one category fails to publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublishErrorPolicy {
    /// Stop at the first failure and return it.
    Abort,
    /// Publish the remaining categories, then report how many failed.
    #[default]
    Continue,
}

pub struct ReportPipeline<R: RecordSource, P: ReportPublisher> {
    source: R,
    publisher: P,
    catalog: TeamCatalog,
    policy: PublishErrorPolicy,
}

impl<R: RecordSource, P: ReportPublisher> ReportPipeline<R, P> {
    pub fn new(source: R, publisher: P, catalog: TeamCatalog) -> Self {
        Self {
            source,
            publisher,
            catalog,
            policy: PublishErrorPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: PublishErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }
}

#[async_trait::async_trait]
impl<R: RecordSource, P: ReportPublisher> Pipeline for ReportPipeline<R, P> {
    async fn extract(&self) -> Result<Vec<OwnedItemRecord>> {
        self.source.fetch_records().await
    }

    async fn transform(&self, records: Vec<OwnedItemRecord>) -> Result<Vec<CategoryReport>> {
        let index = RosterIndex::build(records);
        if index.is_empty() {
            tracing::warn!("No roster records, reports will only contain headers");
        }
        tracing::debug!("Roster index holds {} owners", index.owner_count());

        build_reports(&index, &self.catalog)
    }

    async fn load(&self, reports: Vec<CategoryReport>) -> Result<LoadSummary> {
        let total = reports.len();
        let mut summary = LoadSummary::default();

        for report in &reports {
            match self.publisher.publish(report).await {
                Ok(()) => {
                    tracing::info!("✅ Published {} ({})", report.category, report.range);
                    summary.published.push(report.category.clone());
                }
                Err(e) if self.policy == PublishErrorPolicy::Abort => {
                    tracing::error!("❌ Publishing {} failed, aborting: {}", report.category, e);
                    // 已發佈 (或已排入打包) 的類別仍需寫出
                    if let Err(finish_err) = self.publisher.finish().await {
                        tracing::error!("❌ Flushing published reports failed: {}", finish_err);
                    }
                    return Err(e);
                }
                Err(e) => {
                    tracing::error!("❌ Publishing {} failed: {}", report.category, e);
                    summary.failed.push((report.category.clone(), e.to_string()));
                }
            }
        }

        summary.location = self.publisher.finish().await?;

        if !summary.failed.is_empty() {
            return Err(ReportError::PartialPublishError {
                failed: summary.failed.len(),
                total,
            });
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::{ReportCategory, TeamDefinition};
    use crate::core::Cell;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StaticSource(Vec<OwnedItemRecord>);

    #[async_trait]
    impl RecordSource for StaticSource {
        async fn fetch_records(&self) -> Result<Vec<OwnedItemRecord>> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct MemoryPublisher {
        published: Mutex<Vec<CategoryReport>>,
        fail_on: Option<String>,
        finished: Mutex<bool>,
    }

    #[async_trait]
    impl ReportPublisher for MemoryPublisher {
        async fn publish(&self, report: &CategoryReport) -> Result<()> {
            if self.fail_on.as_deref() == Some(report.category.as_str()) {
                return Err(ReportError::PublishError {
                    target: report.range.clone(),
                    message: "HTTP 500".to_string(),
                });
            }
            self.published.lock().unwrap().push(report.clone());
            Ok(())
        }

        async fn finish(&self) -> Result<Option<String>> {
            *self.finished.lock().unwrap() = true;
            Ok(Some("memory".to_string()))
        }
    }

    fn catalog() -> TeamCatalog {
        TeamCatalog::new(vec![
            ReportCategory::new("Offense", vec![TeamDefinition::new("HLK", ["hulk"])]).unwrap(),
            ReportCategory::new("Defense", vec![TeamDefinition::new("ASG", ["thor"])]).unwrap(),
        ])
    }

    fn records() -> Vec<OwnedItemRecord> {
        vec![
            OwnedItemRecord::new("hulk", "alice", 100),
            OwnedItemRecord::new("Thor", "bob", 70),
        ]
    }

    #[tokio::test]
    async fn test_transform_builds_one_report_per_category() {
        let pipeline = ReportPipeline::new(
            StaticSource(records()),
            MemoryPublisher::default(),
            catalog(),
        );

        let extracted = pipeline.extract().await.unwrap();
        let reports = pipeline.transform(extracted).await.unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].range, "Offense!A1:C3");
        assert_eq!(reports[0].table.rows[0][0], Cell::from("alice"));
        assert_eq!(reports[1].table.rows[0][0], Cell::from("bob"));
    }

    #[tokio::test]
    async fn test_load_publishes_every_category() {
        let pipeline = ReportPipeline::new(
            StaticSource(records()),
            MemoryPublisher::default(),
            catalog(),
        );

        let reports = pipeline.transform(records()).await.unwrap();
        let summary = pipeline.load(reports).await.unwrap();

        assert_eq!(summary.published, vec!["Offense", "Defense"]);
        assert!(summary.failed.is_empty());
        assert_eq!(summary.location.as_deref(), Some("memory"));
        assert!(*pipeline.publisher().finished.lock().unwrap());
    }

    #[tokio::test]
    async fn test_continue_policy_publishes_remaining_categories() {
        let publisher = MemoryPublisher {
            fail_on: Some("Offense".to_string()),
            ..MemoryPublisher::default()
        };
        let pipeline = ReportPipeline::new(StaticSource(records()), publisher, catalog());

        let reports = pipeline.transform(records()).await.unwrap();
        let err = pipeline.load(reports).await.unwrap_err();

        assert!(matches!(
            err,
            ReportError::PartialPublishError { failed: 1, total: 2 }
        ));
        let published = pipeline.publisher().published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].category, "Defense");
    }

    #[tokio::test]
    async fn test_abort_policy_stops_at_first_failure() {
        let publisher = MemoryPublisher {
            fail_on: Some("Offense".to_string()),
            ..MemoryPublisher::default()
        };
        let pipeline = ReportPipeline::new(StaticSource(records()), publisher, catalog())
            .with_policy(PublishErrorPolicy::Abort);

        let reports = pipeline.transform(records()).await.unwrap();
        let err = pipeline.load(reports).await.unwrap_err();

        assert!(matches!(err, ReportError::PublishError { .. }));
        assert!(pipeline.publisher().published.lock().unwrap().is_empty());
        assert!(*pipeline.publisher().finished.lock().unwrap());
    }

    #[tokio::test]
    async fn test_abort_policy_flushes_bundle_of_earlier_categories() {
        let publisher = MemoryPublisher {
            fail_on: Some("Defense".to_string()),
            ..MemoryPublisher::default()
        };
        let pipeline = ReportPipeline::new(StaticSource(records()), publisher, catalog())
            .with_policy(PublishErrorPolicy::Abort);

        let reports = pipeline.transform(records()).await.unwrap();
        let err = pipeline.load(reports).await.unwrap_err();

        assert!(matches!(err, ReportError::PublishError { .. }));
        let published = pipeline.publisher().published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].category, "Offense");
        assert!(*pipeline.publisher().finished.lock().unwrap());
    }
}

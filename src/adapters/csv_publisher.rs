use crate::core::{CategoryReport, ReportPublisher, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use tokio::sync::Mutex;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const BUNDLE_FILE_NAME: &str = "reports.zip";
const MANIFEST_FILE_NAME: &str = "manifest.json";

#[derive(Debug, Serialize)]
struct Manifest {
    generated_at: DateTime<Utc>,
    reports: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Serialize)]
struct ManifestEntry {
    category: String,
    range: String,
    file: String,
    rows: usize,
}

/// `Offense` -> `Offense.csv`; anything outside `[A-Za-z0-9_-]` becomes `_`.
pub fn csv_file_name(category: &str) -> String {
    let stem: String = category
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}.csv", stem)
}

/// Writes one CSV per category, or collects them into a single zip archive
/// with a manifest when bundling is on.
pub struct CsvPublisher<S: Storage> {
    storage: S,
    bundle: bool,
    pending: Mutex<Vec<(ManifestEntry, String)>>,
}

impl<S: Storage> CsvPublisher<S> {
    pub fn new(storage: S, bundle: bool) -> Self {
        Self {
            storage,
            bundle,
            pending: Mutex::new(Vec::new()),
        }
    }

    fn build_bundle(entries: &[(ManifestEntry, String)]) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

        for (entry, csv_output) in entries {
            zip.start_file(entry.file.as_str(), SimpleFileOptions::default())?;
            zip.write_all(csv_output.as_bytes())?;
        }

        let manifest = Manifest {
            generated_at: Utc::now(),
            reports: entries.iter().map(|(entry, _)| entry.clone()).collect(),
        };
        zip.start_file(MANIFEST_FILE_NAME, SimpleFileOptions::default())?;
        zip.write_all(serde_json::to_string_pretty(&manifest)?.as_bytes())?;

        // 完成並取回底層 Vec<u8>
        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

#[async_trait]
impl<S: Storage> ReportPublisher for CsvPublisher<S> {
    async fn publish(&self, report: &CategoryReport) -> Result<()> {
        let csv_output = report.table.to_csv()?;
        let entry = ManifestEntry {
            category: report.category.clone(),
            range: report.range.clone(),
            file: csv_file_name(&report.category),
            rows: report.table.row_count(),
        };

        if self.bundle {
            self.pending.lock().await.push((entry, csv_output));
            return Ok(());
        }

        self.storage
            .write_file(&entry.file, csv_output.as_bytes())
            .await?;
        tracing::debug!("Wrote {}", self.storage.location(&entry.file));
        Ok(())
    }

    async fn finish(&self) -> Result<Option<String>> {
        if !self.bundle {
            return Ok(None);
        }

        let entries = std::mem::take(&mut *self.pending.lock().await);
        tracing::debug!("Creating ZIP file with {} reports", entries.len());
        let zip_data = Self::build_bundle(&entries)?;

        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        self.storage.write_file(BUNDLE_FILE_NAME, &zip_data).await?;
        Ok(Some(self.storage.location(BUNDLE_FILE_NAME)))
    }
}

/// Prints every table as CSV on stdout. Used for dry runs.
#[derive(Debug, Default)]
pub struct StdoutPublisher;

#[async_trait]
impl ReportPublisher for StdoutPublisher {
    async fn publish(&self, report: &CategoryReport) -> Result<()> {
        let csv_output = report.table.to_csv()?;
        println!("# {}", report.range);
        println!("{}", csv_output);
        Ok(())
    }
}

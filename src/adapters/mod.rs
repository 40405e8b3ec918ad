// Adapters layer: concrete implementations of the record source, the report
// publishers and storage.

pub mod csv_publisher;
pub mod sheets;
pub mod source;
pub mod storage;

use crate::config::toml_config::ReportConfig;
use crate::core::{RecordSource, ReportPublisher};
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;
use csv_publisher::{CsvPublisher, StdoutPublisher};
use sheets::SheetsPublisher;
use source::{ApiRecordSource, FileRecordSource};
use storage::LocalStorage;

/// Record source named by `[source]`.
pub fn source_from_config(config: &ReportConfig) -> Box<dyn RecordSource> {
    let fields = config.record_fields();
    match config.source.r#type.as_str() {
        "file" => Box::new(FileRecordSource::new(
            LocalStorage::new("."),
            config.source.endpoint.clone(),
            fields,
        )),
        _ => Box::new(ApiRecordSource::from_config(&config.source, fields)),
    }
}

/// Publisher named by `[publish]`, or stdout for a dry run.
pub fn publisher_from_config(
    config: &ReportConfig,
    dry_run: bool,
) -> Result<Box<dyn ReportPublisher>> {
    if dry_run {
        return Ok(Box::new(StdoutPublisher));
    }

    match config.publish.r#type.as_str() {
        "sheets" => {
            let sheets = validate_required_field("publish.sheets", &config.publish.sheets)?;
            Ok(Box::new(SheetsPublisher::from_config(sheets)))
        }
        _ => Ok(Box::new(CsvPublisher::new(
            LocalStorage::new(config.output_path()),
            config.bundle_enabled(),
        ))),
    }
}

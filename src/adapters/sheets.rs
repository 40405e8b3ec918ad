use crate::config::toml_config::{SheetsConfig, DEFAULT_SHEETS_BASE_URL};
use crate::core::{CategoryReport, ReportPublisher};
use crate::utils::error::{ReportError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

/// Overwrites each report's range in a Google spreadsheet through the
/// Sheets v4 `values.update` call. The bearer token is issued elsewhere.
pub struct SheetsPublisher {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
    access_token: String,
    value_input_option: String,
}

impl SheetsPublisher {
    pub fn new(spreadsheet_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_SHEETS_BASE_URL.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            access_token: access_token.into(),
            value_input_option: "RAW".to_string(),
        }
    }

    pub fn from_config(config: &SheetsConfig) -> Self {
        let mut publisher = Self::new(config.spreadsheet_id.clone(), config.access_token.clone());
        if let Some(base_url) = &config.base_url {
            publisher = publisher.with_base_url(base_url.clone());
        }
        if let Some(option) = &config.value_input_option {
            publisher.value_input_option = option.clone();
        }
        publisher
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `{base}/v4/spreadsheets/{id}/values/{range}?valueInputOption=...`
    fn values_url(&self, range: &str) -> Result<Url> {
        let invalid = |reason: String| ReportError::InvalidConfigValueError {
            field: "publish.sheets.base_url".to_string(),
            value: self.base_url.clone(),
            reason,
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("URL cannot have a path".to_string()))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.spreadsheet_id.as_str(),
                "values",
                range,
            ]);
        url.query_pairs_mut()
            .append_pair("valueInputOption", &self.value_input_option);
        Ok(url)
    }
}

#[async_trait]
impl ReportPublisher for SheetsPublisher {
    async fn publish(&self, report: &CategoryReport) -> Result<()> {
        let url = self.values_url(&report.range)?;
        let body = serde_json::json!({
            "range": report.range,
            "majorDimension": "ROWS",
            "values": report.table.values(),
        });

        tracing::debug!("PUT {} ({} rows)", url, report.table.row_count());
        let response = self
            .client
            .put(url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ReportError::PublishError {
                target: report.range.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ReportError::UnauthorizedError {
                target: report.range.clone(),
                status: status.as_u16(),
            });
        }

        let detail = response.text().await.unwrap_or_default();
        Err(ReportError::PublishError {
            target: report.range.clone(),
            message: format!("HTTP {}: {}", status.as_u16(), detail.trim()),
        })
    }

    async fn finish(&self) -> Result<Option<String>> {
        Ok(Some(format!("spreadsheet {}", self.spreadsheet_id)))
    }
}

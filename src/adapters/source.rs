use crate::config::toml_config::{RecordFields, SourceConfig};
use crate::core::{OwnedItemRecord, RecordSource, Storage};
use crate::utils::error::{ReportError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Turns a JSON array payload into records, rejecting anything that lacks
/// a string item id, a string owner id or a non-negative integer power.
pub fn decode_records(payload: Value, fields: &RecordFields) -> Result<Vec<OwnedItemRecord>> {
    let items = match payload {
        Value::Array(items) => items,
        other => {
            return Err(ReportError::ProcessingError {
                message: format!("expected a JSON array of records, got {}", json_kind(&other)),
            })
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| decode_record(index, &item, fields))
        .collect()
}

fn decode_record(index: usize, item: &Value, fields: &RecordFields) -> Result<OwnedItemRecord> {
    let malformed = |reason: String| ReportError::MalformedRecordError { index, reason };

    let object = item
        .as_object()
        .ok_or_else(|| malformed(format!("expected an object, got {}", json_kind(item))))?;

    let text_field = |name: &str| -> Result<String> {
        match object.get(name) {
            // empty ids are kept; owners group on the exact string
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(malformed(format!(
                "field '{}' must be a string, got {}",
                name,
                json_kind(other)
            ))),
            None => Err(malformed(format!("missing field '{}'", name))),
        }
    };

    let item_id = text_field(fields.item_id.as_str())?;
    let owner_id = text_field(fields.owner_id.as_str())?;
    let power = match object.get(&fields.power) {
        Some(value) => value.as_u64().ok_or_else(|| {
            malformed(format!(
                "field '{}' must be a non-negative integer, got {}",
                fields.power, value
            ))
        })?,
        None => return Err(malformed(format!("missing field '{}'", fields.power))),
    };

    Ok(OwnedItemRecord {
        item_id,
        owner_id,
        power,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Fetches the alliance roster from an HTTP endpoint.
pub struct ApiRecordSource {
    client: Client,
    endpoint: String,
    headers: Vec<(String, String)>,
    timeout: Option<Duration>,
    retry_attempts: u32,
    retry_delay: Duration,
    fields: RecordFields,
}

impl ApiRecordSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            headers: Vec::new(),
            timeout: None,
            retry_attempts: 0,
            retry_delay: Duration::from_secs(1),
            fields: RecordFields::default(),
        }
    }

    pub fn from_config(config: &SourceConfig, fields: RecordFields) -> Self {
        let mut source = Self::new(config.endpoint.clone()).with_fields(fields);
        if let Some(headers) = &config.headers {
            for (key, value) in headers {
                source = source.with_header(key.clone(), value.clone());
            }
        }
        if let Some(timeout) = config.timeout_seconds {
            source.timeout = Some(Duration::from_secs(timeout));
        }
        source.with_retry(
            config.retry_attempts.unwrap_or(0),
            Duration::from_secs(config.retry_delay_seconds.unwrap_or(1)),
        )
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn with_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.retry_attempts = attempts;
        self.retry_delay = delay;
        self
    }

    pub fn with_fields(mut self, fields: RecordFields) -> Self {
        self.fields = fields;
        self
    }

    async fn fetch_payload(&self) -> Result<Value> {
        let mut request = self.client.get(&self.endpoint);

        // 添加自定義標頭 (例如 api-key)
        for (key, value) in &self.headers {
            request = request.header(key.as_str(), value.as_str());
        }

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        tracing::debug!("Making API request to: {}", self.endpoint);
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(ReportError::SourceStatusError {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl RecordSource for ApiRecordSource {
    async fn fetch_records(&self) -> Result<Vec<OwnedItemRecord>> {
        let mut attempt = 0;
        loop {
            match self.fetch_payload().await {
                Ok(payload) => return decode_records(payload, &self.fields),
                Err(e) if e.is_transient() && attempt < self.retry_attempts => {
                    attempt += 1;
                    tracing::warn!(
                        "🔁 Roster request failed ({}), retry {}/{} in {:?}",
                        e,
                        attempt,
                        self.retry_attempts,
                        self.retry_delay
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Reads a saved roster snapshot (the same JSON the API returns).
pub struct FileRecordSource<S: Storage> {
    storage: S,
    path: String,
    fields: RecordFields,
}

impl<S: Storage> FileRecordSource<S> {
    pub fn new(storage: S, path: impl Into<String>, fields: RecordFields) -> Self {
        Self {
            storage,
            path: path.into(),
            fields,
        }
    }
}

#[async_trait]
impl<S: Storage> RecordSource for FileRecordSource<S> {
    async fn fetch_records(&self) -> Result<Vec<OwnedItemRecord>> {
        tracing::debug!("Reading roster snapshot: {}", self.storage.location(&self.path));
        let data = self.storage.read_file(&self.path).await?;
        let payload: Value = serde_json::from_slice(&data)?;
        decode_records(payload, &self.fields)
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Record source {endpoint} answered with status {status}")]
    SourceStatusError { endpoint: String, status: u16 },

    #[error("Malformed record at index {index}: {reason}")]
    MalformedRecordError { index: usize, reason: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Category '{category}' has no teams")]
    EmptyCategoryError { category: String },

    #[error("Publisher rejected credentials for {target} (status {status})")]
    UnauthorizedError { target: String, status: u16 },

    #[error("Publishing {target} failed: {message}")]
    PublishError { target: String, message: String },

    #[error("{failed} of {total} categories failed to publish")]
    PartialPublishError { failed: usize, total: usize },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Source,
    Data,
    Publish,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ReportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReportError::ConfigError { .. }
            | ReportError::InvalidConfigValueError { .. }
            | ReportError::MissingConfigError { .. }
            | ReportError::EmptyCategoryError { .. } => ErrorCategory::Configuration,
            ReportError::ApiError(_) | ReportError::SourceStatusError { .. } => {
                ErrorCategory::Source
            }
            ReportError::MalformedRecordError { .. }
            | ReportError::ProcessingError { .. }
            | ReportError::SerializationError(_) => ErrorCategory::Data,
            ReportError::UnauthorizedError { .. }
            | ReportError::PublishError { .. }
            | ReportError::PartialPublishError { .. }
            | ReportError::CsvError(_)
            | ReportError::ZipError(_) => ErrorCategory::Publish,
            ReportError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路或暫時性錯誤，重試可能成功
            ReportError::ApiError(_)
            | ReportError::SourceStatusError { .. }
            | ReportError::PublishError { .. }
            | ReportError::PartialPublishError { .. } => ErrorSeverity::Medium,
            ReportError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// Whether retrying the same request might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ReportError::ApiError(e) => e.is_timeout() || e.is_connect(),
            ReportError::SourceStatusError { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the TOML configuration file and the environment variables it references"
            }
            ErrorCategory::Source => {
                "Check network access, the source endpoint and its api-key, then retry"
            }
            ErrorCategory::Data => "Inspect the record source payload for missing or invalid fields",
            ErrorCategory::Publish => match self {
                ReportError::UnauthorizedError { .. } => {
                    "Refresh the publisher access token and run again"
                }
                _ => "Check the publish target and retry the failed categories",
            },
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ReportError::SourceStatusError { status, .. } => {
                format!("Could not download roster data (HTTP {})", status)
            }
            ReportError::ApiError(_) => "Could not reach the roster data service".to_string(),
            ReportError::MalformedRecordError { index, reason } => {
                format!("Roster record #{} is invalid: {}", index, reason)
            }
            ReportError::UnauthorizedError { target, .. } => {
                format!("Access to {} was denied, the token may have expired", target)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;

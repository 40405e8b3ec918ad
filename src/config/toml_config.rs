use crate::core::catalog::{ReportCategory, TeamCatalog, TeamDefinition};
use crate::core::pipeline::PublishErrorPolicy;
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub report: ReportInfo,
    pub source: SourceConfig,
    pub publish: PublishConfig,
    pub error_handling: Option<ErrorHandlingConfig>,
    /// Replaces the built-in catalog when present.
    pub categories: Option<Vec<CategoryConfig>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportInfo {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
    /// Restricts the run to these categories.
    pub categories: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// "api" or "file"
    pub r#type: String,
    /// URL for "api", JSON snapshot path for "file".
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
    pub fields: Option<FieldMapping>,
}

/// Payload field names for the three values the reports need.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldMapping {
    pub item_id: Option<String>,
    pub owner_id: Option<String>,
    pub power: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFields {
    pub item_id: String,
    pub owner_id: String,
    pub power: String,
}

impl Default for RecordFields {
    fn default() -> Self {
        Self {
            item_id: "id".to_string(),
            owner_id: "player".to_string(),
            power: "power".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// "sheets" or "csv"
    pub r#type: String,
    pub output_path: Option<String>,
    /// Zip the CSV files into a single archive.
    pub bundle: Option<bool>,
    pub sheets: Option<SheetsConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub access_token: String,
    pub base_url: Option<String>,
    pub value_input_option: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorHandlingConfig {
    /// "abort" or "continue"
    pub on_publish_error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    pub teams: Vec<TeamConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamConfig {
    pub label: String,
    pub name: Option<String>,
    pub members: Vec<String>,
}

pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";
const DEFAULT_OUTPUT_PATH: &str = "./reports";

impl ReportConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ReportError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ReportError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MSF_API_KEY})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static pattern")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn record_fields(&self) -> RecordFields {
        let defaults = RecordFields::default();
        match &self.source.fields {
            Some(fields) => RecordFields {
                item_id: fields.item_id.clone().unwrap_or(defaults.item_id),
                owner_id: fields.owner_id.clone().unwrap_or(defaults.owner_id),
                power: fields.power.clone().unwrap_or(defaults.power),
            },
            None => defaults,
        }
    }

    pub fn output_path(&self) -> &str {
        self.publish
            .output_path
            .as_deref()
            .unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    pub fn bundle_enabled(&self) -> bool {
        self.publish.bundle.unwrap_or(false)
    }

    pub fn publish_error_policy(&self) -> PublishErrorPolicy {
        match self
            .error_handling
            .as_ref()
            .and_then(|e| e.on_publish_error.as_deref())
        {
            Some("abort") => PublishErrorPolicy::Abort,
            _ => PublishErrorPolicy::Continue,
        }
    }

    pub fn selected_categories(&self) -> &[String] {
        self.report.categories.as_deref().unwrap_or(&[])
    }

    /// The catalog from `[[categories]]`, or the built-in one, narrowed to
    /// `report.categories`.
    pub fn catalog(&self) -> Result<TeamCatalog> {
        let catalog = match &self.categories {
            Some(categories) => TeamCatalog::new(
                categories
                    .iter()
                    .map(|category| {
                        let teams = category
                            .teams
                            .iter()
                            .map(|team| {
                                let definition =
                                    TeamDefinition::new(team.label.clone(), &team.members);
                                match &team.name {
                                    Some(name) => definition.with_name(name.clone()),
                                    None => definition,
                                }
                            })
                            .collect();
                        ReportCategory::new(category.name.clone(), teams)
                    })
                    .collect::<Result<Vec<_>>>()?,
            ),
            None => TeamCatalog::builtin(),
        };

        catalog.select(self.selected_categories())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("report.name", &self.report.name)?;

        // 驗證資料來源
        validation::validate_one_of("source.type", &self.source.r#type, &["api", "file"])?;
        if self.source.r#type == "api" {
            validation::validate_url("source.endpoint", &self.source.endpoint)?;
        } else {
            validation::validate_path("source.endpoint", &self.source.endpoint)?;
        }
        validation::validate_substituted("source.endpoint", &self.source.endpoint)?;
        if let Some(headers) = &self.source.headers {
            for (key, value) in headers {
                validation::validate_substituted(&format!("source.headers.{}", key), value)?;
            }
        }
        if let Some(retries) = self.source.retry_attempts {
            validation::validate_range("source.retry_attempts", retries, 0, 10)?;
        }
        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_range("source.timeout_seconds", timeout, 1, 600)?;
        }

        // 驗證輸出設定
        validation::validate_one_of("publish.type", &self.publish.r#type, &["sheets", "csv"])?;
        if self.publish.r#type == "sheets" {
            let sheets = validation::validate_required_field("publish.sheets", &self.publish.sheets)?;
            validation::validate_non_empty_string(
                "publish.sheets.spreadsheet_id",
                &sheets.spreadsheet_id,
            )?;
            validation::validate_non_empty_string(
                "publish.sheets.access_token",
                &sheets.access_token,
            )?;
            validation::validate_substituted("publish.sheets.access_token", &sheets.access_token)?;
            if let Some(base_url) = &sheets.base_url {
                validation::validate_url("publish.sheets.base_url", base_url)?;
            }
            if let Some(option) = &sheets.value_input_option {
                validation::validate_one_of(
                    "publish.sheets.value_input_option",
                    option,
                    &["RAW", "USER_ENTERED"],
                )?;
            }
        } else {
            validation::validate_path("publish.output_path", self.output_path())?;
        }

        if let Some(policy) = self
            .error_handling
            .as_ref()
            .and_then(|e| e.on_publish_error.as_deref())
        {
            validation::validate_one_of(
                "error_handling.on_publish_error",
                policy,
                &["abort", "continue"],
            )?;
        }

        // 類別必須至少有一個隊伍，且選取的類別必須存在
        self.catalog()?;

        Ok(())
    }
}

impl Validate for ReportConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

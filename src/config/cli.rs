use crate::config::toml_config::ReportConfig;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "alliance-report")]
#[command(about = "Ranks alliance members by team power, one table per report category")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "alliance-report.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Print the tables as CSV instead of publishing them
    #[arg(long)]
    pub dry_run: bool,

    /// Only build these categories (repeatable or comma separated)
    #[arg(long = "category", value_delimiter = ',')]
    pub categories: Vec<String>,

    /// Override publish.output_path from config
    #[arg(long)]
    pub output_path: Option<String>,
}

impl CliArgs {
    /// 應用命令列覆蓋設定
    pub fn apply_overrides(&self, config: &mut ReportConfig) {
        if !self.categories.is_empty() {
            tracing::info!("🔧 Categories overridden to: {}", self.categories.join(", "));
            config.report.categories = Some(self.categories.clone());
        }
        if let Some(output_path) = &self.output_path {
            tracing::info!("🔧 Output path overridden to: {}", output_path);
            config.publish.output_path = Some(output_path.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
[report]
name = "test"
categories = ["Flex"]

[source]
type = "api"
endpoint = "https://api.example.com/characters"

[publish]
type = "csv"
"#;

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["alliance-report"]).unwrap();
        assert_eq!(args.config, "alliance-report.toml");
        assert!(!args.dry_run);
        assert!(args.categories.is_empty());
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let args = CliArgs::try_parse_from([
            "alliance-report",
            "--category",
            "Offense,U7",
            "--output-path",
            "/tmp/reports",
        ])
        .unwrap();
        let mut config = ReportConfig::from_toml_str(CONFIG).unwrap();

        args.apply_overrides(&mut config);

        assert_eq!(config.selected_categories(), &["Offense".to_string(), "U7".to_string()]);
        assert_eq!(config.output_path(), "/tmp/reports");
        let names: Vec<String> = config
            .catalog()
            .unwrap()
            .categories()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, vec!["Offense", "U7"]);
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let args = CliArgs::try_parse_from(["alliance-report", "-v"]).unwrap();
        let mut config = ReportConfig::from_toml_str(CONFIG).unwrap();

        args.apply_overrides(&mut config);

        assert!(args.verbose);
        assert_eq!(config.selected_categories(), &["Flex".to_string()]);
        assert_eq!(config.output_path(), "./reports");
    }
}

use alliance_report::adapters::{publisher_from_config, source_from_config};
use alliance_report::utils::error::{ErrorSeverity, ReportError};
use alliance_report::utils::{logger, validation::Validate};
use alliance_report::{CliArgs, EtlEngine, ReportConfig, ReportPipeline};
use clap::Parser;

fn exit_with(e: &ReportError) -> ! {
    tracing::error!(
        "❌ Report run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting alliance-report");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match ReportConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    args.apply_overrides(&mut config);

    // 驗證配置
    if let Err(e) = config.validate() {
        exit_with(&e);
    }
    tracing::info!("✅ Configuration loaded and validated successfully");

    let catalog = config.catalog()?;
    tracing::info!(
        "📋 Report '{}' with categories: {}",
        config.report.name,
        catalog
            .categories()
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(", ")
    );
    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - tables are printed, nothing is published");
    }

    let source = source_from_config(&config);
    let publisher = publisher_from_config(&config, args.dry_run)?;
    let pipeline = ReportPipeline::new(source, publisher, catalog)
        .with_policy(config.publish_error_policy());
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("✅ Report run completed successfully!");
            if let Some(location) = &summary.location {
                tracing::info!("📁 Reports saved to: {}", location);
                println!("📁 Reports saved to: {}", location);
            }
            println!(
                "✅ Published {} categories: {}",
                summary.published.len(),
                summary.published.join(", ")
            );
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}

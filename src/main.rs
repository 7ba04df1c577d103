use clap::Parser;
use serde::Serialize;
use sustainability_index::app::batch;
use sustainability_index::config::cli::{Command, ReportFormat};
use sustainability_index::core::{report::AnalysisReport, trend};
use sustainability_index::utils::error::{ErrorSeverity, ScoreError};
use sustainability_index::utils::{logger, validation::Validate};
use sustainability_index::{
    load_scoring_config, CliConfig, LocalFiles, RawIndicatorSet, RemoteScoringClient,
    ScoringBackend, SustainabilityEngine,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting sustainability-index {}", config.command.name());
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(&config).await {
        tracing::error!(
            "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
            config.command.name(),
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
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn backend(config: &CliConfig) -> Result<Box<dyn ScoringBackend>, ScoreError> {
    match &config.remote {
        Some(url) => {
            tracing::info!("🌐 Using remote scoring service at {}", url);
            Ok(Box::new(RemoteScoringClient::new(url)?))
        }
        None => Ok(Box::new(local_engine(config)?)),
    }
}

fn local_engine(config: &CliConfig) -> Result<SustainabilityEngine, ScoreError> {
    SustainabilityEngine::new(load_scoring_config(config.config.as_deref())?)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), ScoreError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", text);
    Ok(())
}

async fn run(config: &CliConfig) -> Result<(), ScoreError> {
    let files = LocalFiles;

    match &config.command {
        Command::Calculate { input } => {
            let body = files.read_json(input)?;
            let indicators = RawIndicatorSet::from_json(&body)?;
            let result = backend(config)?.calculate(&indicators).await?;
            tracing::info!(
                "✅ Sustainability index {:.2} (grade {})",
                result.sustainability_index,
                result.grade
            );
            print_json(&result, config.pretty)
        }
        Command::Example => print_json(&backend(config)?.example().await?, config.pretty),
        Command::Indicators => print_json(
            &backend(config)?.indicator_definitions().await?,
            config.pretty,
        ),
        Command::Weights => print_json(&backend(config)?.weights().await?, config.pretty),
        Command::Report {
            input,
            format,
            output,
        } => {
            let body = files.read_json(input)?;
            let indicators = RawIndicatorSet::from_json(&body)?;
            let result = backend(config)?.calculate(&indicators).await?;
            let report = AnalysisReport::from_result(&result);

            let rendered = match format {
                ReportFormat::Markdown => report.to_markdown(),
                ReportFormat::Json if config.pretty => serde_json::to_string_pretty(&report)?,
                ReportFormat::Json => serde_json::to_string(&report)?,
            };
            match output {
                Some(path) => {
                    files.write_file(path, rendered.as_bytes())?;
                    tracing::info!("📁 Report saved to: {}", path);
                }
                None => println!("{}", rendered),
            }
            Ok(())
        }
        Command::Trend { input } => {
            let engine = local_engine(config)?;
            let years = trend::years_from_json(&files.read_json(input)?)?;
            let analysis = trend::analyze(&engine, &years)?;
            tracing::info!(
                "✅ Analyzed {} years, overall trend {:?}",
                analysis.total_years_analyzed,
                analysis.overall_environmental_trend
            );
            print_json(&analysis, config.pretty)
        }
        Command::Batch { input, output } => {
            let engine = local_engine(config)?;
            let reader = std::fs::File::open(input)?;

            let summary = match output {
                Some(path) => {
                    let mut buffer = Vec::new();
                    let summary = batch::score_csv(&engine, reader, &mut buffer)?;
                    files.write_file(path, &buffer)?;
                    tracing::info!("📁 Output saved to: {}", path);
                    summary
                }
                None => batch::score_csv(&engine, reader, std::io::stdout().lock())?,
            };
            eprintln!(
                "✅ {} rows scored, {} rows failed",
                summary.scored, summary.failed
            );
            Ok(())
        }
    }
}

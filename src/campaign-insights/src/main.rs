//! Campaign Insights: score, grade, compare and report on campaign data
//! from JSON files.
//!
//! Results are printed as JSON on stdout; logs go to stderr.

use anyhow::{anyhow, Context};
use campaign_core::config::InsightsConfig;
use campaign_core::store::InMemoryRepository;
use campaign_core::types::Campaign;
use campaign_experiments::{AbVariant, ExperimentEngine};
use campaign_reporting::{export_html, export_json, ReportAssembler, ReportData, ReportOptions};
use campaign_scoring::{CampaignScoringService, GradeInput, IndustryGrader};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "campaign-insights")]
#[command(about = "Campaign performance scoring, A/B significance and reporting")]
#[command(version)]
struct Cli {
    /// TOML configuration file (environment variables still apply on top)
    #[arg(long, env = "CAMPAIGN_INSIGHTS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score one campaign and list its recommendations
    Score {
        /// Campaign JSON: name, optional industry, metrics
        #[arg(long)]
        input: PathBuf,
    },
    /// Grade ROI, CTR and conversion rate against an industry benchmark
    Grade {
        /// JSON object with roi, ctr and convRate
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        industry: String,
    },
    /// Rank several campaigns by performance score
    Compare {
        /// JSON array of campaigns
        #[arg(long)]
        input: PathBuf,
    },
    /// Evaluate an A/B test from variant counts
    AbTest {
        /// JSON object with name, optional confidenceLevel and variants
        #[arg(long)]
        input: PathBuf,
        /// Complete the test after evaluating it
        #[arg(long, default_value_t = false)]
        stop: bool,
    },
    /// Assemble a report from campaign and daily data
    Report {
        /// Report data JSON: campaigns, daily, optional summary
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "executive")]
        template: String,
        #[arg(long)]
        date_range: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Json,
    Html,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AbTestInput {
    name: String,
    #[serde(default)]
    confidence_level: Option<f64>,
    variants: Vec<AbVariant>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campaign_insights=info".into()),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let config = InsightsConfig::load_from(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        InsightsConfig::default()
    });

    match cli.command {
        Commands::Score { input } => cmd_score(&config, &input),
        Commands::Grade { input, industry } => cmd_grade(&input, &industry),
        Commands::Compare { input } => cmd_compare(&config, &input),
        Commands::AbTest { input, stop } => cmd_ab_test(&config, &input, stop),
        Commands::Report {
            input,
            template,
            date_range,
            format,
        } => cmd_report(&config, &input, &template, date_range, format),
    }
}

fn read_input<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn scoring_service(config: &InsightsConfig) -> CampaignScoringService {
    CampaignScoringService::new(Arc::new(InMemoryRepository::new()), &config.scoring)
}

// ---------------------------------------------------------------------------
// Scoring commands
// ---------------------------------------------------------------------------

fn cmd_score(config: &InsightsConfig, input: &Path) -> anyhow::Result<()> {
    let campaign: Campaign = read_input(input)?;
    let service = scoring_service(config);
    let id = service.save_campaign(campaign)?;
    print_json(&service.score_campaign(&id)?)
}

fn cmd_grade(input: &Path, industry: &str) -> anyhow::Result<()> {
    let metrics: GradeInput = read_input(input)?;
    let grade = IndustryGrader::new().grade_against_industry(&metrics, industry);
    if grade.industry.is_none() {
        warn!(industry, "unknown industry, returned fallback grade");
    }
    print_json(&grade)
}

fn cmd_compare(config: &InsightsConfig, input: &Path) -> anyhow::Result<()> {
    let campaigns: Vec<Campaign> = read_input(input)?;
    let service = scoring_service(config);
    for campaign in campaigns {
        service.save_campaign(campaign)?;
    }
    print_json(&service.rank_all())
}

// ---------------------------------------------------------------------------
// Experiment command
// ---------------------------------------------------------------------------

fn cmd_ab_test(config: &InsightsConfig, input: &Path, stop: bool) -> anyhow::Result<()> {
    let request: AbTestInput = read_input(input)?;
    let control_index = request
        .variants
        .iter()
        .position(|v| v.is_control)
        .ok_or_else(|| anyhow!("one variant must set isControl"))?;

    let engine = ExperimentEngine::new(Arc::new(InMemoryRepository::new()), &config.experiments);
    let names: Vec<&str> = request.variants.iter().map(|v| v.name.as_str()).collect();
    let test_id = engine.create_test(&request.name, &names, control_index, request.confidence_level)?;

    let created = engine.get_test(&test_id)?;
    for (variant, observed) in created.variants.iter().zip(&request.variants) {
        engine.sync_counts(&test_id, &variant.id, observed.visitors, observed.conversions)?;
    }

    let test = if stop {
        engine.stop(&test_id)?
    } else {
        engine.get_test(&test_id)?
    };
    info!(test_id = %test.id, status = %test.status, "A/B test evaluated");
    print_json(&test)
}

// ---------------------------------------------------------------------------
// Report command
// ---------------------------------------------------------------------------

fn cmd_report(
    config: &InsightsConfig,
    input: &Path,
    template: &str,
    date_range: Option<String>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let data: ReportData = read_input(input)?;
    let assembler = ReportAssembler::new(config);
    let report = assembler.assemble(template, &data, &ReportOptions { date_range })?;

    match format {
        OutputFormat::Json => println!("{}", export_json(&report)?),
        OutputFormat::Html => println!("{}", export_html(&report)),
    }
    Ok(())
}

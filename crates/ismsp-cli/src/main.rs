mod display;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use ismsp_core::{Denominator, Period, Round, Year};
use ismsp_host::{ScopeMode, Workbench, WorkbenchConfig};
use ismsp_sync::{Backend, ClientConfig, EvidenceUpload, IsmsClient};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ismsp", version, about = "ISMS-P compliance workbench")]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "ISMSP_API_URL", global = true)]
    api_url: Option<String>,

    /// Audit year (2024, 2025, 2026)
    #[arg(long, env = "ISMSP_YEAR", default_value_t = Year::DEFAULT, global = true)]
    year: Year,

    /// Audit round: 최초, "사후 1차", "사후 2차", 갱신심사 (or initial, follow-up-1, follow-up-2, renewal)
    #[arg(long, env = "ISMSP_ROUND", default_value_t = Round::DEFAULT, global = true)]
    round: Round,

    /// Backend keeps a single catalog instead of one per period
    #[arg(long, global = true)]
    global: bool,

    /// Progress denominator: `catalog`, `fixed`, or a control count
    #[arg(long, global = true)]
    denominator: Option<Denominator>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the catalog in control-id order
    Items {
        /// Only items not yet written
        #[arg(long)]
        pending: bool,
    },
    /// Show one item
    Show { id: String },
    /// Completion for the selected period
    Progress,
    /// Completion across all periods
    Trend,
    /// Upload an evidence file and print the recommended control
    Analyze { file: PathBuf },
    /// Open an edit session for an item and commit it
    Edit {
        id: String,
        /// Analyze this evidence file first
        #[arg(long)]
        analyze: Option<PathBuf>,
        /// Replace the drafted description
        #[arg(long)]
        description: Option<String>,
        /// Replace the evidence file name
        #[arg(long)]
        evidence: Option<String>,
        /// Print the draft and discard it
        #[arg(long)]
        dry_run: bool,
    },
    /// Download the period report PDF
    Export {
        /// Output path (default: ISMS_Report_<year>_<round>.pdf)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut client_config = ClientConfig::from_env();
    if let Some(url) = &cli.api_url {
        client_config.base_url = url.trim().trim_end_matches('/').to_string();
    }
    info!(base_url = %client_config.base_url, "ismsp v{}", env!("CARGO_PKG_VERSION"));
    let client = IsmsClient::new(client_config).context("building HTTP client")?;

    let config = WorkbenchConfig {
        scope_mode: if cli.global {
            ScopeMode::Global
        } else {
            ScopeMode::PeriodScoped
        },
        denominator: cli.denominator,
        ..Default::default()
    };
    let mut wb = Workbench::new(client, config, Period::new(cli.year, cli.round));

    match cli.command {
        Command::Items { pending } => {
            load(&mut wb).await?;
            let items = if pending {
                wb.catalog().pending()
            } else {
                wb.catalog().sorted()
            };
            println!("{}", display::items_table(&items));
        }
        Command::Show { id } => {
            load(&mut wb).await?;
            let item = wb
                .catalog()
                .get(&id)
                .with_context(|| format!("item {id} not found in {}", wb.scope()))?;
            println!("{}", display::item_card(item));
        }
        Command::Progress => {
            load(&mut wb).await?;
            println!("{}", wb.scope());
            println!("{}", display::progress_line(&wb.progress()));
        }
        Command::Trend => {
            load(&mut wb).await?;
            if !wb.trend().is_loaded() {
                bail!("could not load trend data");
            }
            println!("{}", display::trend_table(wb.trend().points()));
            if let Some(point) = wb.trend().point_for(&wb.period()) {
                println!("\n{}: {:.1}%", wb.period(), point.percent);
            }
        }
        Command::Analyze { file } => {
            let result = analyze(&mut wb, &file).await?;
            println!("{}", display::analysis(&result));
        }
        Command::Edit {
            id,
            analyze: evidence_file,
            description,
            evidence,
            dry_run,
        } => {
            if let Some(file) = &evidence_file {
                let result = analyze(&mut wb, file).await?;
                println!("{}\n", display::analysis(&result));
            }
            load(&mut wb).await?;

            let draft = wb.open_session(&id)?;
            if let Some(text) = description {
                draft.set_description(text);
            }
            if let Some(name) = evidence {
                draft.set_evidence_name(name);
            }
            println!("{}", display::draft(draft));

            if dry_run {
                wb.cancel();
                println!("\n(dry run, nothing saved)");
            } else {
                let report = wb.commit().await?;
                if let Some(message) = report.ack.message {
                    println!("\n{message}");
                }
                println!("{}", display::progress_line(&wb.progress()));
            }
        }
        Command::Export { out } => {
            let report = wb.export_report().await?;
            let path = out.unwrap_or_else(|| PathBuf::from(&report.file_name));
            write_report(&path, &report.bytes).await?;
            println!("{} ({} bytes)", path.display(), report.bytes.len());
        }
    }

    for notice in wb.notices() {
        eprintln!("{}", display::notice(notice));
    }
    Ok(())
}

/// Refresh both caches. Only a missing catalog fails the command; a trend
/// outage is reported and left to the commands that need it.
async fn load<B: Backend>(wb: &mut Workbench<B>) -> anyhow::Result<()> {
    let report = wb.refresh().await;
    if report.failed() {
        for notice in wb.drain_notices() {
            eprintln!("{}", display::notice(&notice));
        }
    }
    if !wb.catalog().is_fresh_for(&wb.scope()) {
        bail!("could not load catalog for {}", wb.scope());
    }
    Ok(())
}

async fn analyze<B: Backend>(
    wb: &mut Workbench<B>,
    file: &Path,
) -> anyhow::Result<ismsp_core::AnalysisResult> {
    let upload = EvidenceUpload::from_path(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
    Ok(wb.analyze_evidence(upload).await?)
}

async fn write_report(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("writing {}", path.display()))
}

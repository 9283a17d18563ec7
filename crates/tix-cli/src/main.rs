use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

use tix_alloc::PossessionLedger;
use tix_feeds::{DeclaredRecord, DelegatedRecord, FeedError, ResultRecord};

#[derive(Parser)]
#[command(name = "tix")]
#[command(about = "Event ticket reconciliation and allocation CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse the three feeds, run both allocation passes, persist artifacts
    Allocate {
        /// Declared-preference feed: name, four counts, two venue codes
        #[arg(long, default_value = "data/app.tsv")]
        declared: PathBuf,

        /// Delegated-application feed: applicant, beneficiary, four counts
        #[arg(long, default_value = "data/app2.tsv")]
        delegated: PathBuf,

        /// Results/holdings feed: applicant, optional beneficiary, four counts
        #[arg(long, default_value = "data/result.tsv")]
        results: PathBuf,

        /// Exports root; artifacts land in <out>/<run_id>/
        #[arg(long, default_value = "exports")]
        out: PathBuf,

        /// Report banner label
        #[arg(long, default_value = "allocation")]
        label: String,
    },

    /// Parse and validate the feeds without allocating
    Check {
        /// Declared-preference feed
        #[arg(long, default_value = "data/app.tsv")]
        declared: PathBuf,

        /// Delegated-application feed
        #[arg(long, default_value = "data/app2.tsv")]
        delegated: PathBuf,

        /// Results/holdings feed
        #[arg(long, default_value = "data/result.tsv")]
        results: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Allocate {
            declared,
            delegated,
            results,
            out,
            label,
        } => run_allocate(&declared, &delegated, &results, &out, &label),

        Commands::Check {
            declared,
            delegated,
            results,
        } => run_check(&declared, &delegated, &results),
    }
}

struct Feeds {
    declared: Vec<DeclaredRecord>,
    delegated: Vec<DelegatedRecord>,
    results: Vec<ResultRecord>,
}

fn load_feed<T>(
    path: &Path,
    parse: impl Fn(&str) -> Result<Vec<T>, FeedError>,
) -> Result<Vec<T>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read feed failed: {}", path.display()))?;
    parse(&text).with_context(|| format!("parse feed failed: {}", path.display()))
}

fn load_feeds(declared: &Path, delegated: &Path, results: &Path) -> Result<Feeds> {
    Ok(Feeds {
        declared: load_feed(declared, tix_feeds::parse_declared)?,
        delegated: load_feed(delegated, tix_feeds::parse_delegated)?,
        results: load_feed(results, tix_feeds::parse_results)?,
    })
}

fn run_allocate(
    declared: &Path,
    delegated: &Path,
    results: &Path,
    out: &Path,
    label: &str,
) -> Result<()> {
    let feeds = load_feeds(declared, delegated, results)?;

    let (roster, warnings) = tix_alloc::build_roster(&feeds.declared, &feeds.delegated)?;
    for w in &warnings {
        warn!("{w}");
    }

    let pool = tix_alloc::build_pool(&feeds.results, &roster)?;
    let mut ledger = PossessionLedger::new(&roster, pool);

    let self_claims = ledger.take_self()?;
    for ev in &self_claims {
        info!("{} took own ticket {} for {}", ev.name, ev.ticket_id, ev.slot);
    }
    print!(
        "{}",
        tix_report::summarize(&ledger).render(&format!("{label}: after self-held pass"))
    );

    let delegated_claims = ledger.take_for_self()?;
    for ev in &delegated_claims {
        info!(
            "{} took delegated ticket {} for {}",
            ev.name, ev.ticket_id, ev.slot
        );
    }
    print!(
        "{}",
        tix_report::summarize(&ledger).render(&format!("{label}: after delegated pass"))
    );

    let dump = tix_report::possession_dump(&ledger);
    let run_id = Uuid::new_v4();

    let declared_path = declared.display().to_string();
    let delegated_path = delegated.display().to_string();
    let results_path = results.display().to_string();
    let art = tix_artifacts::write_run_artifacts(tix_artifacts::WriteRunArtifactsArgs {
        exports_root: out,
        schema_version: 1,
        run_id,
        label,
        declared_path: &declared_path,
        delegated_path: &delegated_path,
        results_path: &results_path,
        allocation: &dump,
    })?;

    println!("run_id={run_id}");
    println!("registrants={}", ledger.roster().len());
    println!("tickets={}", ledger.tickets().len());
    println!("claims={}", self_claims.len() + delegated_claims.len());
    println!("warnings={}", warnings.len());
    println!("allocation_json={}", art.allocation_path.display());
    println!("manifest_json={}", art.manifest_path.display());

    Ok(())
}

fn run_check(declared: &Path, delegated: &Path, results: &Path) -> Result<()> {
    let feeds = load_feeds(declared, delegated, results)?;

    let (roster, warnings) = tix_alloc::build_roster(&feeds.declared, &feeds.delegated)?;
    for w in &warnings {
        warn!("{w}");
    }
    let pool = tix_alloc::build_pool(&feeds.results, &roster)?;

    println!("declared_rows={}", feeds.declared.len());
    println!("delegated_rows={}", feeds.delegated.len());
    println!("result_rows={}", feeds.results.len());
    println!("registrants={}", roster.len());
    println!("tickets={}", pool.len());
    println!("warnings={}", warnings.len());
    println!("check_ok=true");

    Ok(())
}

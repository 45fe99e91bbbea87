//! draftgate Procurement Reference Runtime: Demo CLI
//!
//! Runs one or all of the four procurement demo scenarios. Each scenario uses
//! the real engine components (draft service, workflow engine, capability
//! gate, hash-chained audit trail) wired together with mock procurement data.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- rfq-approval
//!   cargo run -p demo -- quote-to-po
//!   cargo run -p demo -- permission-denied
//!   cargo run -p demo -- expire-sweep
//!   cargo run -p demo -- --config engine.toml run-all

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use draftgate_contracts::error::EngineResult;
use draftgate_policy::EngineConfig;
use draftgate_ref_procurement::{
    procurement_config,
    scenarios::{draft_expiry, permission_gate, quote_to_po, rfq_approval},
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// draftgate: AI action drafts and workflow approvals, procurement demo.
///
/// Each subcommand runs one or all of the procurement scenarios, showing
/// normalization, gated approval, ordered workflow resolution and audit
/// chain integrity.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "draftgate procurement reference runtime demo",
    long_about = "Runs draftgate procurement demo scenarios showing draft normalization,\n\
                  capability-gated approvals, workflow step resolution, and audit chain integrity."
)]
struct Cli {
    /// Engine configuration TOML. Defaults to the bundled procurement config.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all four procurement scenarios in sequence.
    RunAll,
    /// Scenario 1: RFQ Draft Approval (normalize, approve once, retry).
    RfqApproval,
    /// Scenario 2: Quote Comparison to Purchase Order (override, ordered steps).
    QuoteToPo,
    /// Scenario 3: Capability Gate (entitlement / scopes / roles).
    PermissionDenied,
    /// Scenario 4: Draft Expiry Sweep (configured retention).
    ExpireSweep,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(2);
        }
    };

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(&config),
        Command::RfqApproval => rfq_approval::run_scenario(&config),
        Command::QuoteToPo => quote_to_po::run_scenario(&config),
        Command::PermissionDenied => permission_gate::run_scenario(&config),
        Command::ExpireSweep => draft_expiry::run_scenario(&config),
    };

    match result {
        Ok(()) => {
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> EngineResult<EngineConfig> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading engine configuration");
            EngineConfig::from_file(path)
        }
        None => procurement_config(),
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn run_all(config: &EngineConfig) -> EngineResult<()> {
    rfq_approval::run_scenario(config)?;
    quote_to_po::run_scenario(config)?;
    permission_gate::run_scenario(config)?;
    draft_expiry::run_scenario(config)?;
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("draftgate: AI Action Drafts & Workflow Steps");
    println!("Procurement Reference Demo");
    println!("==============================================");
    println!();
    println!("Lifecycle per decision:");
    println!("  [1] Planner reply taken in; raw payload stored as a draft");
    println!("  [2] Payload normalized on read: bad fields dropped, never fatal");
    println!("  [3] Capability gate: entitlement, then permission scope or role");
    println!("  [4] Approval materializes the entity at most once, under the draft lock");
    println!("  [5] Transition record appended to the SHA-256 audit chain");
    println!();
}

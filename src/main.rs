use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use gigopt::{
    load_config, run_gig, GigId, GigOptimizer, InMemoryFactStore, OptimizerConfig, RunConfig,
    SolverBackend,
};
use tracing_subscriber::EnvFilter;

/// Assign band members to song parts for a gig
#[derive(Debug, Parser)]
#[command(name = "gigopt", version)]
struct Args {
    /// Facts file (JSON, or TOML by extension)
    #[arg(long, env = "GIGOPT_FACTS")]
    facts: PathBuf,

    /// Gig to optimise
    #[arg(long)]
    gig: u32,

    /// Optimizer configuration (TOML)
    #[arg(long, env = "GIGOPT_CONFIG")]
    config: Option<PathBuf>,

    /// Tie-break seed
    #[arg(long)]
    seed: Option<u64>,

    /// auto, microlp, cbc or highs
    #[arg(long)]
    backend: Option<SolverBackend>,

    /// Per-song solver budget in seconds
    #[arg(long)]
    time_limit: Option<f64>,

    /// Whole-gig budget in seconds
    #[arg(long)]
    run_timeout: Option<f64>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => OptimizerConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.tie_break_seed = seed;
    }
    if let Some(backend) = args.backend {
        config.solver.backend = backend;
    }
    if let Some(limit) = args.time_limit {
        config.solver.time_limit = Some(limit);
    }

    let store = InMemoryFactStore::load(&args.facts)
        .with_context(|| format!("loading facts from {}", args.facts.display()))?;
    let optimizer = GigOptimizer::from_config(config)?;
    tracing::info!(
        facts = %args.facts.display(),
        gig = args.gig,
        solver = optimizer.solver_name(),
        "Optimizer ready"
    );

    let mut run = RunConfig::new(GigId(args.gig));
    if let Some(secs) = args.run_timeout {
        let budget = Duration::try_from_secs_f64(secs)
            .with_context(|| format!("invalid --run-timeout {}", secs))?;
        run = run.with_budget(budget);
    }

    let result = run_gig(Arc::new(optimizer), Arc::new(store), run).await?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", json);

    Ok(())
}

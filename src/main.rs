use aigopt::generate::{generate, DesignKind};
use aigopt::{run_passes, AlgebraicRewrite, AlgebraicRewriteConfig, Dce, Pass};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

/// aigopt - reduce AIG depth with algebraic rewriting
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a design and optimize it
    Run {
        /// Design to generate (chain, mux, random)
        #[arg(short, long, default_value = "chain")]
        design: DesignKind,

        /// Design width (inputs for chain and mux, gates for random)
        #[arg(short, long, default_value_t = 32)]
        width: usize,

        /// Seed for random designs
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Rewriting configuration as JSON
        #[arg(short, long)]
        config: Option<String>,

        /// Skip compaction after rewriting
        #[arg(long)]
        no_dce: bool,
    },

    /// Print the default rewriting configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt().with_env_filter(log_level).init();

    match cli.command {
        Commands::Run {
            design,
            width,
            seed,
            config,
            no_dce,
        } => run(design, width, seed, config.as_deref(), no_dce)?,
        Commands::Config => {
            let json = serde_json::to_string_pretty(&AlgebraicRewriteConfig::default())?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn run(
    design: DesignKind,
    width: usize,
    seed: u64,
    config: Option<&str>,
    no_dce: bool,
) -> Result<()> {
    let config: AlgebraicRewriteConfig = match config {
        Some(json) => serde_json::from_str(json).context("Failed to parse rewriting config")?,
        None => AlgebraicRewriteConfig::default(),
    };

    let mut aig = generate(design, width, seed);
    info!("Generated {} design '{}'", design, aig.name);
    println!("{}", aig.compute_stats());

    let mut passes: Vec<Box<dyn Pass>> = vec![Box::new(AlgebraicRewrite::with_config(config))];
    if !no_dce {
        passes.push(Box::new(Dce::new()));
    }

    let results = run_passes(&mut aig, &mut passes)
        .with_context(|| format!("Optimization of '{}' failed", aig.name))?;
    for result in &results {
        println!("{}", result);
    }
    println!("{}", aig.compute_stats());

    Ok(())
}

//! bn-oracle CLI - posterior probabilities of the hidden causes from observed effects.

use anyhow::{Context, Result};
use bn_oracle::variable::{Effect, HiddenCause};
use bn_oracle::{Evidence, ModelConfig};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "bn-oracle")]
#[command(version)]
#[command(about = "Exact posterior inference for PPH/PPR from GPS, PC, PMD and PR observations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the model configuration (TOML, or JSON if the name ends in .json)
    #[arg(short, long, global = true, default_value = "model.toml")]
    model: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute P(PPH=1 | evidence) and P(PPR=1 | evidence)
    Infer {
        /// Observations such as GPS=true or PC=0. Unlisted effects are unobserved.
        observations: Vec<String>,

        /// Also report the most probable joint state of the hidden causes
        #[arg(long)]
        map: bool,
    },

    /// Validate the model configuration
    Validate,

    /// Show example model configuration
    Example,
}

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Example => {
            print!("{}", ModelConfig::example().to_toml()?);
        }

        Commands::Validate => {
            let model = ModelConfig::load(&cli.model)
                .and_then(|config| config.to_model())
                .with_context(|| format!("Invalid model {:?}", cli.model))?;

            info!("Model is valid");
            for cause in HiddenCause::ALL.iter() {
                info!("  P({}=1) = {}", cause, model.prior(*cause));
            }
            for effect in Effect::ALL.iter() {
                info!("  P({}=1 | PPH, PPR) = {:?}", effect, model.cpt(*effect));
            }
        }

        Commands::Infer { observations, map } => {
            let model = ModelConfig::load(&cli.model)
                .and_then(|config| config.to_model())
                .with_context(|| format!("Invalid model {:?}", cli.model))?;

            let mut evidence = Evidence::new();
            for obs in observations.iter() {
                let (effect, value) = Evidence::parse_observation(obs)?;
                evidence.observe(effect, value)?;
            }

            let posterior = model.infer(&evidence)?;
            let output = if map {
                let state = model.most_probable(&evidence)?;
                json!({ "posterior": posterior, "map": state })
            } else {
                serde_json::to_value(&posterior)?
            };

            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

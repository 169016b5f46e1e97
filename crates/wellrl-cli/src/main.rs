//! CLI for wellrl.
//!
//! Stands in for the serving layer of the wellness app: reads profile and
//! catalog documents as JSON, asks the Q-learning policy for a recommendation,
//! feeds observed outcomes back into the table and persists the model between
//! runs. All reports are written to stdout as JSON; logs go to stderr.

mod commands;
mod input;
mod logging;
mod simulate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use wellrl_adapt::ProgramCatalog;
use wellrl_core::ActivityCatalog;
use wellrl_qlearn::{Hyperparameters, ModelLock, ModelStore, SharedAgent};

use crate::input::{load_hyperparameters, print_json, read_json};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the model snapshot
    #[arg(
        long,
        global = true,
        env = "WELLRL_MODEL_PATH",
        default_value = "data/wellrl.agent.json"
    )]
    model: PathBuf,

    /// Hyperparameters (JSON) used when no model exists yet
    #[arg(long, global = true)]
    hyperparameters: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend an action for a profile (does not train)
    Recommend {
        /// Request document ({profile, recent_engagement}), `-` for stdin
        #[arg(long, default_value = "-")]
        input: PathBuf,

        /// Activity catalog; adds adjusted activities to the output
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Baseline programs; adds the adapted program to the output
        #[arg(long)]
        programs: Option<PathBuf>,

        /// Seed for exploration and activity sampling
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Apply feedback for the last recommendation and train
    Feedback {
        /// Request document ({profile, engagement_delta, ...}), `-` for stdin
        #[arg(long, default_value = "-")]
        input: PathBuf,
    },
    /// Record a workout session and train on its engagement contribution
    Session {
        /// Request document ({profile, activities, overall_rating, ...}), `-` for stdin
        #[arg(long, default_value = "-")]
        input: PathBuf,

        /// Activity catalog; adds the keep/modify/remove classification
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Adjust a single activity from engagement history
    Adjust {
        #[arg(long, default_value = "-")]
        input: PathBuf,
    },
    /// Classify activities into keep / increase / decrease / remove
    Classify {
        #[arg(long, default_value = "-")]
        input: PathBuf,
    },
    /// Summarize the stored model
    Stats,
    /// Train on synthetic users from several threads
    Simulate {
        #[arg(long, default_value = "50")]
        users: usize,

        #[arg(long, default_value = "4")]
        threads: usize,

        /// Feedback cycles per user
        #[arg(long, default_value = "100")]
        steps: usize,

        #[arg(long, default_value = "7")]
        seed: u64,
    },
}

fn rng_from(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}

fn optional<T: serde::de::DeserializeOwned>(path: Option<&Path>) -> Result<Option<T>> {
    path.map(read_json).transpose()
}

fn save(store: &ModelStore, shared: &SharedAgent) -> Result<()> {
    store
        .save(&shared.snapshot())
        .with_context(|| format!("Failed to save model to {}", store.path().display()))
}

/// Held from load to save by every command that trains.
fn lock(store: &ModelStore) -> Result<ModelLock> {
    store
        .lock()
        .with_context(|| format!("Failed to lock {}", store.lock_path().display()))
}

fn open_agent(store: &ModelStore, hyperparameters: Hyperparameters) -> SharedAgent {
    SharedAgent::new(store.load_or_fresh(hyperparameters))
}

fn main() -> Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();

    let store = ModelStore::new(&cli.model);
    let hyperparameters = load_hyperparameters(cli.hyperparameters.as_deref())?;

    match cli.command {
        Commands::Recommend {
            input,
            catalog,
            programs,
            seed,
        } => {
            let request: commands::RecommendRequest = read_json(&input)?;
            let catalog: Option<ActivityCatalog> =
                optional(catalog.as_deref()).context("Invalid activity catalog")?;
            let programs: Option<ProgramCatalog> =
                optional(programs.as_deref()).context("Invalid program catalog")?;

            let agent = store.load_or_fresh(hyperparameters);
            let recommendation = commands::recommend(
                &agent,
                &request,
                catalog.as_ref(),
                programs.as_ref(),
                &mut rng_from(seed),
            );
            print_json(&recommendation)?;
        }
        Commands::Feedback { input } => {
            let request: commands::FeedbackRequest = read_json(&input)?;
            let _lock = lock(&store)?;
            let shared = open_agent(&store, hyperparameters);
            let report = commands::feedback(&shared, &request);
            save(&store, &shared)?;
            print_json(&report)?;
        }
        Commands::Session { input, catalog } => {
            let request: commands::SessionRequest = read_json(&input)?;
            let catalog: Option<ActivityCatalog> =
                optional(catalog.as_deref()).context("Invalid activity catalog")?;
            let _lock = lock(&store)?;
            let shared = open_agent(&store, hyperparameters);
            let report = commands::session(&shared, &request, catalog.as_ref());
            save(&store, &shared)?;
            print_json(&report)?;
        }
        Commands::Adjust { input } => {
            let request: commands::AdjustRequest = read_json(&input)?;
            print_json(&commands::adjust_activity(&request))?;
        }
        Commands::Classify { input } => {
            let request: commands::ClassifyRequest = read_json(&input)?;
            print_json(&commands::classify_activities(&request))?;
        }
        Commands::Stats => {
            print_json(&commands::stats(&store))?;
        }
        Commands::Simulate {
            users,
            threads,
            steps,
            seed,
        } => {
            let _lock = lock(&store)?;
            let shared = open_agent(&store, hyperparameters);
            let report = simulate::run(
                &shared,
                simulate::SimulationConfig {
                    users,
                    threads,
                    steps,
                    seed,
                },
            );
            save(&store, &shared)?;
            print_json(&report)?;
        }
    }

    Ok(())
}

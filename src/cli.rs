use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::logic::SeedPlan;

#[derive(Parser)]
#[command(
    name = "agromanage",
    version,
    about = "Agricultural resource management API with planning estimates"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the HTTP API (default)
    Serve,
    /// Interactively write a config file
    Init,
    /// Validate config and open the database
    Check,
    /// Replace the database contents with generated load-test data
    Seed(SeedArgs),
    /// Print the planning estimate for one field
    Estimate {
        #[arg(long)]
        field_id: i64,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SeedArgs {
    #[arg(long, default_value_t = 2000)]
    pub fields: usize,
    #[arg(long, default_value_t = 2000)]
    pub workers: usize,
    #[arg(long, default_value_t = 2000)]
    pub resources: usize,
    #[arg(long, default_value_t = 2000)]
    pub machines: usize,
    #[arg(long, default_value_t = 500)]
    pub warehouses: usize,
    #[arg(long, default_value_t = 4000)]
    pub inventory_items: usize,
    /// Seed for the random generator; equal seeds give equal data
    #[arg(long, default_value_t = 42)]
    pub rng_seed: u64,
}

impl From<SeedArgs> for SeedPlan {
    fn from(args: SeedArgs) -> Self {
        SeedPlan {
            fields: args.fields,
            workers: args.workers,
            resources: args.resources,
            machines: args.machines,
            warehouses: args.warehouses,
            inventory_items: args.inventory_items,
            rng_seed: args.rng_seed,
        }
    }
}

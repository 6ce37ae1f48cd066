mod api;
mod cli;
mod config;
mod db;
mod error;
mod logic;
mod models;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use db::Database;
use logic::{FieldDetailsService, Seeder};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    // RUST_LOG wins over -v
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn open_database(config: &Config, cli: &Cli) -> Result<Database> {
    let db_path = config
        .db_path(cli.data_dir.as_ref())
        .context("Failed to resolve database path")?;
    Database::open(&db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))
}

fn load_config(cli: &Cli) -> Result<Config> {
    Config::load(cli.config.as_ref()).context("Failed to load configuration")
}

fn run_server(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let db = open_database(&config, cli)?;

    if config.database.seed_demo_data && db.seed_demo_data()? {
        tracing::info!("Inserted demo data into empty database");
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime
        .block_on(api::serve(&config, db))
        .context("HTTP server failed")
}

fn run_check(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let db = open_database(&config, cli)?;
    let version = db::migrations::current_version(&db)?;
    let counts = db.table_counts()?;

    println!("Server:     http://{}", config.server.bind_addr());
    println!("Database:   {}", db.path().display());
    println!("Schema:     v{}", version);
    println!(
        "Pagination: default {} / max {}",
        config.pagination.default_page_size, config.pagination.max_page_size
    );
    println!();
    println!("Rows:");
    println!("  fields           {}", counts.fields);
    println!("  resources        {}", counts.resources);
    println!("  machines         {}", counts.machines);
    println!("  workers          {}", counts.workers);
    println!("  worker tasks     {}", counts.worker_tasks);
    println!("  warehouses       {}", counts.warehouses);
    println!("  inventory items  {}", counts.inventory_items);
    Ok(())
}

fn run_seed(cli: &Cli, args: cli::SeedArgs) -> Result<()> {
    let config = load_config(cli)?;
    let db = open_database(&config, cli)?;

    let summary = Seeder::new(db, args.into())
        .run()
        .context("Seeding failed")?;

    println!(
        "Seeded {} rows in {:.2?}",
        summary.counts.total(),
        summary.elapsed
    );
    println!("{}", serde_json::to_string_pretty(&summary.counts)?);
    Ok(())
}

fn run_estimate(cli: &Cli, field_id: i64) -> Result<()> {
    let config = load_config(cli)?;
    let db = open_database(&config, cli)?;

    let details = FieldDetailsService::new(db)
        .details(field_id)
        .with_context(|| format!("Cannot estimate field {}", field_id))?;

    println!(
        "Field {} ({}, {} ha, {})",
        details.id, details.culture, details.area, details.status
    );
    println!("{}", serde_json::to_string_pretty(&details.estimate())?);
    Ok(())
}

fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command.clone() {
        None | Some(Commands::Serve) => run_server(&cli),
        Some(Commands::Init) => {
            let (config, path) = Config::setup_interactive(cli.config.as_ref())?;
            tracing::debug!(path = %path.display(), "Wrote config");
            println!("Start the API with `agromanage serve`.");
            println!("It will listen on http://{}", config.server.bind_addr());
            Ok(())
        }
        Some(Commands::Check) => run_check(&cli),
        Some(Commands::Seed(args)) => run_seed(&cli, args),
        Some(Commands::Estimate { field_id }) => run_estimate(&cli, field_id),
    }
}

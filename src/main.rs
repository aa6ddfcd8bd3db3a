use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use eco_score::config::Config;
use eco_score::ingest::{self, IngestReport};
use eco_score::model::ReferenceTable;
use eco_score::output;
use eco_score::store::Store;
use eco_score::EcoError;

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_CONFIG: i32 = 4;
const EXIT_STORAGE: i32 = 5;
const EXIT_INGEST: i32 = 6;

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Tsv,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the database tables if they do not exist
    Init,
    /// Load store emissions (JSON array of rows), upserting by name
    ImportStores { file: PathBuf },
    /// Load brand emissions (JSON array of rows), upserting by name
    ImportBrands { file: PathBuf },
    /// Append purchases from a transaction feed; re-imports are ignored
    ImportPurchases { file: PathBuf },
    /// Recompute every user's score and update the leaderboard
    Score,
    /// Show the leaderboard, highest score first (default if no subcommand)
    Leaderboard {
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Show a user's lowest-scoring purchases
    Harmful {
        user: String,
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Write the leaderboard (and optionally one user's harmful products) as JSON
    Export {
        /// Output file (defaults to export.path from config)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Include this user's harmful products (defaults to export.user from config)
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Init, import all configured sources, score, then export
    Run,
}

#[derive(Parser, Debug)]
#[command(name = "eco-score")]
#[command(about = "Purchase sustainability scoring and leaderboard", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/eco-score/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database (overrides `database` from config)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();
    eco_score::logging::init(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Leaderboard {
        format: OutputFormat::Table,
    });
    let start_time = Instant::now();

    // Load config
    let mut config = match eco_score::config::load_config(cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    if let Some(db) = cli.db {
        config.database = db;
    }

    // Validate scoring config at startup
    if let Err(errors) = eco_score::scoring::validate_scoring(&config.scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    debug!(database = %config.database.display(), "using database");

    if let Err(e) = run_command(command, &config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }

    debug!(
        elapsed = %humantime::format_duration(truncate_to_millis(start_time.elapsed())),
        "done"
    );
    std::process::exit(EXIT_SUCCESS);
}

fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<EcoError>() {
        Some(e) if e.is_storage() => EXIT_STORAGE,
        Some(EcoError::IngestionFormat { .. }) | Some(EcoError::Io { .. }) => EXIT_INGEST,
        _ => EXIT_FAILURE,
    }
}

fn truncate_to_millis(d: std::time::Duration) -> std::time::Duration {
    std::time::Duration::from_millis(d.as_millis() as u64)
}

/// Open the database and make sure the schema exists.
fn open_store(config: &Config) -> Result<Store> {
    let store = Store::open(&config.database)?;
    store.init_schema()?;
    Ok(store)
}

fn run_command(command: Commands, config: &Config) -> Result<()> {
    let use_colors = output::should_use_colors();

    match command {
        Commands::Init => {
            open_store(config)?;
            println!("Database schema initialized at {}", config.database.display());
        }
        Commands::ImportStores { file } => {
            let mut store = open_store(config)?;
            let report = ingest::import_emissions(&mut store, ReferenceTable::Store, &file)?;
            print_report(&report, use_colors);
        }
        Commands::ImportBrands { file } => {
            let mut store = open_store(config)?;
            let report = ingest::import_emissions(&mut store, ReferenceTable::Brand, &file)?;
            print_report(&report, use_colors);
        }
        Commands::ImportPurchases { file } => {
            let mut store = open_store(config)?;
            let report = ingest::import_purchases(&mut store, &file)?;
            print_report(&report, use_colors);
        }
        Commands::Score => {
            let mut store = open_store(config)?;
            let run = store.run_scoring(&config.scoring)?;
            println!(
                "Scored {} users from {} purchases",
                run.users.len(),
                run.purchases_scored
            );
        }
        Commands::Leaderboard { format } => {
            let store = open_store(config)?;
            let rows = store.leaderboard()?;
            match format {
                OutputFormat::Table => {
                    println!("{}", output::format_leaderboard_table(&rows, use_colors))
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
                OutputFormat::Tsv => println!("{}", output::format_leaderboard_tsv(&rows)),
            }
        }
        Commands::Harmful { user, format } => {
            let store = open_store(config)?;
            let products = store.harmful_products(&user, &config.scoring)?;
            match format {
                OutputFormat::Table => println!(
                    "{}",
                    output::format_harmful_table(&user, &products, use_colors)
                ),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&products)?),
                OutputFormat::Tsv => println!("{}", output::format_harmful_tsv(&products)),
            }
        }
        Commands::Export { out, user } => {
            let path = out
                .or_else(|| config.export.as_ref().map(|e| e.path.clone()))
                .context("No export path: pass --out or set export.path in config")?;
            let user = user.or_else(|| config.export.as_ref().and_then(|e| e.user.clone()));
            let store = open_store(config)?;
            export(&store, config, &path, user.as_deref())?;
            println!("Exported leaderboard to {}", path.display());
        }
        Commands::Run => run_pipeline(config, use_colors)?,
    }

    Ok(())
}

fn print_report(report: &IngestReport, use_colors: bool) {
    println!("{}", output::format_ingest_summary(report, use_colors));
}

fn export(store: &Store, config: &Config, path: &Path, user: Option<&str>) -> Result<()> {
    let mut doc = output::LeaderboardExport::new(store.leaderboard()?);
    if let Some(user) = user {
        let products = store.harmful_products(user, &config.scoring)?;
        doc = doc.with_harmful(user, products);
    }
    output::write_export(path, &doc)
}

/// Schema, the three imports in dependency order, scoring, then export.
fn run_pipeline(config: &Config, use_colors: bool) -> Result<()> {
    let mut store = open_store(config)?;
    info!(database = %config.database.display(), "database schema initialized");

    let sources = &config.sources;
    if let Some(path) = &sources.stores {
        let report = ingest::import_emissions(&mut store, ReferenceTable::Store, path)?;
        print_report(&report, use_colors);
    } else {
        warn!("sources.stores not configured, skipping store import");
    }
    if let Some(path) = &sources.brands {
        let report = ingest::import_emissions(&mut store, ReferenceTable::Brand, path)?;
        print_report(&report, use_colors);
    } else {
        warn!("sources.brands not configured, skipping brand import");
    }
    if let Some(path) = &sources.purchases {
        let report = ingest::import_purchases(&mut store, path)?;
        print_report(&report, use_colors);
    } else {
        warn!("sources.purchases not configured, skipping purchase import");
    }

    let run = store.run_scoring(&config.scoring)?;
    println!(
        "Scored {} users from {} purchases",
        run.users.len(),
        run.purchases_scored
    );

    if let Some(export_config) = &config.export {
        export(&store, config, &export_config.path, export_config.user.as_deref())?;
        println!("Exported leaderboard to {}", export_config.path.display());
    }

    Ok(())
}

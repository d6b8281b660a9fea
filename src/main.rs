use chrono::Utc;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use wisdom_insights::analyzer::PatternAggregator;
use wisdom_insights::config::{load_config, AppConfig};
use wisdom_insights::seed::generate_checkins;
use wisdom_insights::server::{self, AppState};
use wisdom_insights::source;
use wisdom_insights::storage::SqliteStorage;

#[derive(Debug, Parser)]
#[command(name = "wisdom-insights", version, about = "Weekly trend insights over daily check-ins")]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(long, default_value = "config.json")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the insights HTTP API
    Serve,
    /// Print a user's pattern report as JSON
    Analyze {
        #[arg(long)]
        user: String,
    },
    /// Write a generated check-in history into the local store
    Seed {
        #[arg(long)]
        user: String,
        #[arg(long, default_value_t = 14)]
        days: usize,
        /// Seed for a reproducible history
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {:?}", panic_info);
    }));

    let cli = Cli::parse();

    let config: Arc<AppConfig> = match load_config(&cli.config) {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!("Config load error ({}): {}", cli.config, e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Command::Seed { user, days, seed } => {
            let storage = match SqliteStorage::new(&config.database_path) {
                Ok(s) => Arc::new(Mutex::new(s)),
                Err(e) => {
                    error!("Failed to initialize storage: {}", e);
                    std::process::exit(1);
                }
            };
            run_seed(&storage, &user, days, seed).await
        }
        Command::Analyze { user } => {
            let Some(aggregator) = build_aggregator(&config) else {
                std::process::exit(1);
            };
            let report = aggregator.report_for(Some(&user), Utc::now().date_naive()).await;
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    error!("Failed to encode report: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Command::Serve => {
            let Some(aggregator) = build_aggregator(&config) else {
                std::process::exit(1);
            };
            let state = Arc::new(AppState { aggregator });
            if let Err(e) = server::serve(&config.bind_address, state).await {
                error!("Server error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn build_aggregator(config: &AppConfig) -> Option<PatternAggregator> {
    match source::from_config(config) {
        Ok(source) => Some(PatternAggregator::new(source, config.window_days)),
        Err(e) => {
            error!("Failed to initialize metric source: {}", e);
            None
        }
    }
}

async fn run_seed(storage: &Arc<Mutex<SqliteStorage>>, user: &str, days: usize, seed: Option<u64>) {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let checkins = generate_checkins(&mut rng, Utc::now().date_naive(), days);

    let storage = storage.lock().await;
    for checkin in &checkins {
        if let Err(e) = storage.save_checkin(user, checkin) {
            warn!("Failed to save check-in for {}: {}", checkin.date, e);
        }
    }

    match storage.count_checkins(user) {
        Ok(count) => info!("Seeded {} days for {} ({} stored)", checkins.len(), user, count),
        Err(e) => warn!("Seeded {} days for {}, count failed: {}", checkins.len(), user, e),
    }
}

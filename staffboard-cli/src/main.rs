//! Staffboard CLI - Command line interface for the Staffboard review service

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use staffboard_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{ReviewsArgs, ServeArgs};

/// Staffboard: staff review selection and management
#[derive(Parser, Debug)]
#[command(name = "staffboard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to load instead of ~/.config/staffboard/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database path (overrides config and env)
    #[arg(long, global = true, env = "STAFFBOARD_DB_PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Run the HTTP API
    Serve(ServeArgs),

    /// Manage and query staff reviews
    #[command(visible_alias = "r")]
    Reviews(ReviewsArgs),

    /// Show current configuration
    Config,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "staffboard=debug,tower_http=debug"
    } else {
        "staffboard=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let bind = match &cli.command {
        Some(Commands::Serve(args)) => args.bind.clone(),
        _ => None,
    };

    // Load configuration with overrides
    let config = Config::load_with_overrides(cli.config.as_deref(), bind, cli.db.clone())?;

    if cli.verbose {
        tracing::info!(
            bind = %config.server.bind,
            database = ?config.database.path,
            fallback_enabled = config.reviews.fallback_enabled,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("staffboard {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Serve(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::Reviews(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::Config) => {
            println!("Staffboard Configuration");
            println!("========================");
            println!();
            print!("{}", toml::to_string_pretty(&config)?);
            println!();
            match cli.config.or_else(Config::default_config_path) {
                Some(path) if path.exists() => println!("Config file: {} (exists)", path.display()),
                Some(path) => println!(
                    "Config file: {} (not found - using defaults)",
                    path.display()
                ),
                None => println!("Config file: (no config directory)"),
            }
        }
        None => {
            println!("Staffboard - staff review selection and management");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

use clap::{Parser, Subcommand};
use sahayak::{Config, Result, router::BackendSelector, server::personas::Persona};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "sahayak")]
#[command(about = "Persona assistant relay for hosted language models")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the configuration file (defaults to the user config directory)
    #[arg(short, long, global = true, env = "SAHAYAK_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Start {
        /// Override server host
        #[arg(long)]
        host: Option<String>,

        /// Override server port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate configuration and show the selected backend
    Config {
        /// Write the effective configuration (without credentials) to the config file
        #[arg(long)]
        init: bool,
    },

    /// Ask a persona a single question
    Ask {
        /// health, agriculture, finance or general
        #[arg(short, long, default_value = "general")]
        persona: Persona,

        /// Text to send
        #[arg(required = true)]
        text: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing, so `.env` can supply SAHAYAK_CONFIG. A missing file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = Config::load_from(&config_path)?;

    init_tracing(&config, cli.verbose)?;

    match cli.command {
        Commands::Start { host, port } => start_server(config, host, port).await,
        Commands::Config { init } => validate_config(&config, &config_path, init),
        Commands::Ask { persona, text } => {
            let answer =
                sahayak::commands::ask::handle_ask_command(&config, persona, &text.join(" "))
                    .await?;
            println!("{}", answer);
            Ok(())
        }
    }
}

async fn start_server(mut config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    info!("Starting Sahayak server...");

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let server = sahayak::server::SahayakServer::new(config);
    server.start().await
}

fn validate_config(config: &Config, config_path: &std::path::Path, init: bool) -> Result<()> {
    info!("Validating configuration...");

    if init {
        if let Err(e) = config.save_to(config_path) {
            error!("Failed to write configuration: {}", e);
            return Err(e);
        }
        println!("✓ Wrote {}", config_path.display());
    }

    let selector = BackendSelector::from_config(&config.backends);
    println!("✓ Configuration is valid");
    println!("  Config file: {}", config_path.display());
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Backend: {}", selector);
    println!(
        "  Hugging Face token: {}",
        if config.backends.huggingface.credential().is_some() { "set" } else { "not set" }
    );
    println!(
        "  OpenAI key: {}",
        if config.backends.openai.credential().is_some() { "set" } else { "not set" }
    );
    match &config.server.static_dir {
        Some(dir) => println!("  Static files: {}", dir),
        None => println!("  Static files: disabled"),
    }

    Ok(())
}

fn init_tracing(config: &Config, verbose: bool) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let default_level = if verbose { "debug" } else { config.server.log_level.as_str() };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr_layer = if config.server.log_format == "json" {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    };

    let registry = tracing_subscriber::registry().with(stderr_layer).with(filter);

    if config.server.log_file_enabled {
        let log_dir = config.log_dir()?;

        let rotation = match config.server.log_rotation.as_str() {
            "minutely" => Rotation::MINUTELY,
            "hourly" => Rotation::HOURLY,
            "daily" => Rotation::DAILY,
            "never" => Rotation::NEVER,
            _ => {
                eprintln!(
                    "Warning: Invalid log rotation '{}', using daily",
                    config.server.log_rotation
                );
                Rotation::DAILY
            }
        };

        let file_appender =
            RollingFileAppender::new(rotation, &log_dir, &config.server.log_file_prefix);

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        registry
            .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
            .init();

        // The writer must outlive every log call
        std::mem::forget(guard);
    } else {
        registry.init();
    }

    Ok(())
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use weatherform::web::{self, LookupForm};
use weatherform::{AppConfig, logging, open_weather_lookup};

#[derive(Parser)]
#[command(name = "weatherform", version, about = "Current weather for a location, served as a web form")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the lookup form over HTTP
    Serve {
        /// Interface to bind (overrides configuration)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides configuration)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Look up current weather once and print it
    Lookup {
        /// City or place name
        location: String,
        /// Country name or code
        #[arg(long)]
        country: Option<String>,
        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = AppConfig::load_from_path(cli.config).context("Failed to load configuration")?;
    logging::init(&config.logging)?;

    let lookup = open_weather_lookup(&config.provider)?;

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            info!("Starting weatherform {}", weatherform::VERSION);
            web::run(&config.server, lookup).await?;
        }
        Commands::Lookup {
            location,
            country,
            json,
        } => {
            let form = LookupForm { location, country };
            match form.run(&lookup).await {
                Ok(record) if json => {
                    println!("{}", serde_json::to_string_pretty(&record)?);
                }
                Ok(record) => {
                    println!("{}", record.location);
                    println!("  {}", record.format_description());
                    println!("  Temperature: {}", record.format_temperature());
                    println!("  Humidity:    {}", record.format_humidity());
                    println!(
                        "  Coordinates: {:.4}, {:.4}",
                        record.latitude, record.longitude
                    );
                }
                Err(err) => {
                    eprintln!("{}", err.user_message());
                    return Err(err.into());
                }
            }
        }
    }

    Ok(())
}

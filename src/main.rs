use clap::{Parser, Subcommand};
use leafwatch::configuration::config::Config;
use leafwatch::controller::controller_handler::Controller;
use leafwatch::error_handling::types::ConfigError;
use log::{error, info};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "leafwatch")]
#[command(version = "0.1.0")]
#[command(about = "Camera-fed leaf health monitor with a status web service")]
struct Args {
    /// TOML configuration file; built-in defaults when absent
    #[arg(short, long, env = "LEAFWATCH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Capture, classify, archive and publish once
    Run {
        /// Serve the status endpoints after the run unless a service already answers
        #[arg(long)]
        serve: bool,
        #[arg(long)]
        image_count: Option<usize>,
        #[arg(long)]
        camera_url: Option<String>,
    },
    /// Only serve the status endpoints
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
}

fn load_config(args: &Args) -> Result<Config, ConfigError> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Importing configuration from {}", path.display());
            Config::from_file(path)?
        }
        None => {
            info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    match &args.command {
        Command::Run {
            image_count,
            camera_url,
            ..
        } => {
            if let Some(count) = image_count {
                config.camera.image_count = *count;
            }
            if let Some(url) = camera_url {
                config.camera.url = url.clone();
            }
        }
        Command::Serve { port } => {
            if let Some(port) = port {
                config.status.port = *port;
            }
        }
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .init();

    println!(
        "
==============================================================================
                         LEAFWATCH  leaf health monitor
==============================================================================
"
    );

    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        error!("Unable to import configuration: {}", e);
        std::process::exit(1);
    });

    info!("Configuration imported successfully");

    let controller = Controller::new(config).unwrap_or_else(|e| {
        error!("Unable to create a controller instance: {}, exiting...", e);
        std::process::exit(1);
    });

    match args.command {
        Command::Run { serve, .. } => {
            // Probe before the run so a service started meanwhile is not duplicated.
            let serve_after = if serve {
                if controller.status_service_running().await {
                    info!(
                        "Status service already running at {}",
                        controller.config.status.probe_url()
                    );
                    false
                } else {
                    info!("No status service answering, will serve after the run");
                    true
                }
            } else {
                false
            };

            match controller.run_pipeline().await {
                Ok(report) => println!("{}", report.render()),
                Err(e) => {
                    error!("{}", e);
                    std::process::exit(1);
                }
            }

            if serve_after {
                if let Err(e) = controller.serve().await {
                    error!("Status server stopped: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Command::Serve { .. } => {
            if let Err(e) = controller.serve().await {
                error!("Status server stopped: {}", e);
                std::process::exit(1);
            }
        }
    }
}

//! Roadwatch - Traffic-violation detection CLI
//!
//! Runs the detection gateway, or analyzes still images through it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use roadwatch_capture::{frame_from_data_url, StillCapture};
use roadwatch_core::colored_logger::{init_component_logger, Component};
use roadwatch_core::config::Config;
use roadwatch_detect::{ChatClassifier, Classifier, Detector, Frame};
use roadwatch_session::{DashboardSummary, GatewayClient, Session, Variant};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "roadwatch")]
#[command(about = "Traffic-violation detection with a hosted multimodal model")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the detection gateway
    Serve {
        /// Interface to listen on
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Analyze still images through the gateway
    Analyze {
        /// Image files, or `data:image/...;base64,` URLs
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Detection endpoint of the gateway
        #[arg(long)]
        gateway_url: Option<String>,
    },

    /// Show resolved configuration and credential status
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let component = match cli.command {
        Commands::Serve { .. } => Component::Gateway,
        Commands::Analyze { .. } => Component::Client,
        Commands::Check => Component::Main,
    };
    init_component_logger(component, cli.verbose)?;

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { host, port } => {
            cmd_serve(config, host, port)?;
        }
        Commands::Analyze { inputs, gateway_url } => {
            cmd_analyze(config, inputs, gateway_url)?;
        }
        Commands::Check => {
            cmd_check(config, cli.config.as_deref())?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn cmd_serve(mut config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.gateway.host = host;
    }
    if let Some(port) = port {
        config.gateway.port = port;
    }
    let addr = config.gateway.socket_addr()?;

    let classifier = ChatClassifier::new(config.gateway.chat_config());
    if !classifier.is_configured() {
        warn!(
            "{} is not set - every request will fail until it is",
            classifier.credential_name()
        );
    }

    info!(
        "{} classifier: {} via {}",
        classifier.name(),
        config.gateway.model,
        config.gateway.endpoint
    );
    let detector = Detector::new(Arc::new(classifier)).with_timeout(config.gateway.timeout());

    roadwatch_web::serve(
        detector,
        addr,
        roadwatch_web::DEFAULT_MAX_BODY_BYTES,
        shutdown_signal(),
    )
    .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received shutdown signal"),
        Err(e) => {
            // without a handler the server simply runs until killed
            error!("failed to listen for ctrl+c: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[tokio::main]
async fn cmd_analyze(
    config: Config,
    inputs: Vec<String>,
    gateway_url: Option<String>,
) -> Result<()> {
    let timeout = config.client.timeout();
    let url = gateway_url.unwrap_or(config.client.gateway_url);
    info!("submitting {} frame(s) to {}", inputs.len(), url);

    let client = GatewayClient::new(url).with_timeout(timeout);
    let session = Session::new(client);
    let capture = StillCapture::new();

    for input in &inputs {
        let frame = match load_frame(&capture, input) {
            Ok(frame) => frame,
            Err(e) => {
                error!("skipping {}: {:#}", input, e);
                continue;
            }
        };

        let outcome = session.capture(frame).await?;

        println!("\n{}", display_name(input).bold());
        let title = match outcome.notification.variant {
            Variant::Destructive => outcome.notification.title.red().bold().to_string(),
            Variant::Default => outcome.notification.title.green().bold().to_string(),
        };
        println!("{}: {}", title, outcome.notification.description);

        for violation in outcome.result.violations() {
            println!(
                "  - {} ({}%, {}) at {}: {}",
                violation.violation_type.label(),
                violation.confidence_percent(),
                violation.severity.as_str(),
                violation.location,
                violation.description
            );
        }
    }

    let summary = DashboardSummary::from_stats(&session.stats(), config.client.recent_limit);
    println!("\n{}", summary);

    Ok(())
}

fn load_frame(capture: &StillCapture, input: &str) -> Result<Frame> {
    if input.starts_with("data:") {
        return frame_from_data_url(input).context("Invalid data URL");
    }
    capture
        .capture_file(Path::new(input))
        .with_context(|| format!("Failed to capture {}", input))
}

/// Data URLs are long, so show only their media type
fn display_name(input: &str) -> String {
    if input.starts_with("data:") {
        let media_type = input
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
            .unwrap_or("image");
        format!("<inline {}>", media_type)
    } else {
        input.to_string()
    }
}

fn cmd_check(config: Config, explicit: Option<&Path>) -> Result<()> {
    println!("checking configuration...\n");

    match explicit.map(Path::to_path_buf).or_else(Config::default_path) {
        Some(path) if path.exists() => println!("  config file: {}", path.display()),
        Some(path) => println!("  config file: {} (not found, using defaults)", path.display()),
        None => println!("  config file: none (using defaults)"),
    }
    println!();
    print!("{}", config.to_toml()?);
    println!();

    let classifier = ChatClassifier::new(config.gateway.chat_config());
    let credential_ok = classifier.is_configured();
    println!(
        "  {}: {}",
        classifier.credential_name(),
        if credential_ok { "set" } else { "NOT SET" }
    );
    println!();

    if credential_ok {
        println!("all checks passed!");
    } else {
        println!(
            "WARNING: the gateway needs {} set to reach the model.",
            classifier.credential_name()
        );
    }

    Ok(())
}

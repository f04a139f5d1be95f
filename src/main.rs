use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hanspell_rs::config::Config;
use hanspell_rs::extractor::Format;
use hanspell_rs::render::{render_error, render_report};
use hanspell_rs::speller::SpellerClient;
use hanspell_rs::SpellChecker;

#[derive(Parser)]
#[command(name = "hanspell")]
#[command(version, about = "Korean spell checker backed by a remote speller service")]
struct Cli {
    /// Text to check (read from stdin when omitted)
    text: Option<String>,

    /// Path to a hanspell.toml configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Upstream response format (embedded-json, direct-json)
    #[arg(long)]
    format: Option<Format>,

    /// Speller service URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Print the correction result as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => Config::load(path)?,
        None => Config::load_from_default(),
    };
    if let Some(format) = cli.format {
        config.speller.format = format;
    }
    if let Some(ref endpoint) = cli.endpoint {
        config.speller.endpoint = Some(endpoint.clone());
    }
    if let Some(timeout) = cli.timeout {
        config.speller.timeout_secs = timeout;
    }

    let text = match cli.text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let mut client = SpellerClient::from_config(&config.speller)?;
    if let Some(endpoint) = cli.endpoint {
        client = client.with_endpoint(endpoint);
    }
    tracing::debug!("Using {} ({})", client.endpoint(), config.speller.format);
    let checker = SpellChecker::new(client);

    match checker.check(&text).await {
        Ok(report) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report.result)?);
                if let Some(ref err) = report.degraded {
                    eprintln!("{}", render_error(err));
                }
            } else {
                print!("{}", render_report(&report));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", render_error(&e));
            Ok(ExitCode::FAILURE)
        }
    }
}

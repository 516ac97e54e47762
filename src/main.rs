mod config;
mod models;

use anyhow::{Context, Result};
use clap::Parser;
use models::api_request::ticket_url;
use std::{io::Write, path::PathBuf, time::Duration};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

// ----------------------------------------------------------------------
// 1  Command-line arguments
// ----------------------------------------------------------------------
/// Posts a ticket definition to the ticket service and prints the raw reply.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// YAML config file (defaults to ./config.yml when present)
    #[arg(long, env = "TICKET_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the ticket service
    #[arg(long, env = "TICKET_ENDPOINT")]
    endpoint: Option<String>,

    /// Numeric ID placed in /tickets/<id>
    #[arg(long, env = "TICKET_ID")]
    ticket_id: Option<u64>,

    /// Request timeout; waits indefinitely when unset
    #[arg(long, env = "TICKET_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
}

impl Cli {
    /// Flags win over the config file, which wins over the built-ins.
    fn resolve(&self) -> Result<config::Config> {
        let mut config = config::load(self.config.as_deref())?;
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(ticket_id) = self.ticket_id {
            config.ticket_id = ticket_id;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = Some(timeout_secs);
        }
        Ok(config)
    }
}

// ----------------------------------------------------------------------
// 2  Program start
// ----------------------------------------------------------------------
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // a) Logging; stdout stays reserved for the response body
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // b) CLI
    let cli = Cli::parse();

    // c) Send and print
    let mut stdout = std::io::stdout().lock();
    run(&cli, &mut stdout).await
}

// ----------------------------------------------------------------------
// 3  Issue the ticket
// ----------------------------------------------------------------------
async fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let config = cli.resolve()?;
    debug!("Resolved config: {:?}", config);

    let url = ticket_url(&config.endpoint, config.ticket_id);
    config.ticket.log_field_mismatches();

    let timeout = config.timeout_secs.map(Duration::from_secs);
    let resp = config.ticket.submit(&url, timeout).await?;
    info!("Received {} bytes ({})", resp.body.len(), resp.status);

    out.write_all(&resp.body)
        .context("failed to write response body")?;
    out.flush().context("failed to flush output")?;
    Ok(())
}

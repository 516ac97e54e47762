use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use super::ticket::TicketRequest;

/// What came back from the ticket service. The body is kept as raw bytes.
#[derive(Debug)]
pub struct TicketResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Builds `<endpoint>/tickets/<ticket_id>`.
pub fn ticket_url(endpoint: &str, ticket_id: u64) -> String {
    format!("{}/tickets/{}", endpoint.trim_end_matches('/'), ticket_id)
}

impl TicketRequest {
    /// Logs template markers without a `data` entry and entries no marker uses.
    /// The payload is sent regardless; the server owns that check.
    pub fn log_field_mismatches(&self) {
        for name in self.missing_fields() {
            warn!("template references ${{{}}} but no data entry is named {:?}", name, name);
        }
        for name in self.unused_fields() {
            debug!("data entry {:?} is not referenced by the template", name);
        }
    }

    /// Sends the ticket as a single JSON `POST` and reads the whole body.
    /// Non-2xx responses are returned like any other; only transport errors fail.
    #[tracing::instrument(skip(self, timeout), fields(status))]
    pub async fn submit(&self, url: &str, timeout: Option<Duration>) -> Result<TicketResponse> {
        debug!("Trying to make request to ticket service");

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("failed to build HTTP client")?;

        info!("Ticket Request URL: {}", url);
        debug!(
            "Ticket Request: {}",
            String::from_utf8_lossy(&self.to_json_bytes()?)
        );

        let resp = client
            .post(url)
            .json(self)
            .send()
            .await
            .with_context(|| format!("failed to send request to {url}"))?;

        let status = resp.status();
        tracing::Span::current().record("status", status.as_u16());
        if status.is_success() {
            info!("Ticket service answered {}", status);
        } else {
            warn!("Ticket service answered {}", status);
        }

        let body = resp
            .bytes()
            .await
            .context("failed to read response body")?
            .to_vec();
        debug!("Ticket Response: {} bytes", body.len());

        Ok(TicketResponse { status, body })
    }
}

//! MediaWiki TextExtracts gateway.
//!
//! # Responsibility
//! - Query the intro plain-text extract for one exact title.
//! - Map the response into `LookupOutcome` with a `?curid=` reference URL.
//!
//! # Invariants
//! - Every request carries the configured timeout and user agent.
//! - Non-success HTTP status maps to `NotFound`.
//!
//! # See also
//! - https://www.mediawiki.org/wiki/Extension:TextExtracts

use super::{Article, LookupError, LookupGateway, LookupOutcome, LookupResult};
use crate::config::LookupConfig;
use log::{info, warn};
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::{Duration, Instant};

/// Blocking HTTP gateway for a MediaWiki API endpoint.
pub struct WikipediaGateway {
    client: Client,
    api_url: String,
    page_url_base: String,
}

impl WikipediaGateway {
    /// Builds the HTTP client from lookup settings.
    ///
    /// # Errors
    /// - Returns `LookupError::Transport` when the TLS/client backend cannot
    ///   be initialized.
    pub fn new(config: &LookupConfig) -> LookupResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|err| LookupError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            page_url_base: config.page_url_base.clone(),
        })
    }
}

impl LookupGateway for WikipediaGateway {
    fn lookup(&self, query: &str) -> LookupResult<LookupOutcome> {
        let started_at = Instant::now();
        let response = self
            .client
            .get(self.api_url.as_str())
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("titles", query),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
            ])
            .send()
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                "event=lookup module=lookup status=not_found http_status={} duration_ms={}",
                status.as_u16(),
                started_at.elapsed().as_millis()
            );
            return Ok(LookupOutcome::NotFound);
        }

        let body = response.text().map_err(map_transport_error)?;
        let outcome = parse_extract_response(&body, &self.page_url_base)?;
        info!(
            "event=lookup module=lookup status={} duration_ms={}",
            match outcome {
                LookupOutcome::Found(_) => "ok",
                LookupOutcome::NotFound => "not_found",
            },
            started_at.elapsed().as_millis()
        );
        Ok(outcome)
    }
}

/// Parses a `prop=extracts` query response.
///
/// Only the first page is considered. Pages flagged `missing`/`invalid`, or
/// without a `pageid`, resolve to `NotFound`.
///
/// # Errors
/// - Returns `LookupError::MalformedResponse` when the body is not JSON or
///   lacks `query.pages`.
pub fn parse_extract_response(body: &str, page_url_base: &str) -> LookupResult<LookupOutcome> {
    let value: Value = serde_json::from_str(body)
        .map_err(|err| LookupError::MalformedResponse(format!("invalid JSON: {err}")))?;
    let pages = value
        .get("query")
        .and_then(|query| query.get("pages"))
        .and_then(Value::as_object)
        .ok_or_else(|| LookupError::MalformedResponse("missing `query.pages`".to_string()))?;

    let Some(page) = pages.values().next() else {
        return Ok(LookupOutcome::NotFound);
    };
    if page.get("missing").is_some() || page.get("invalid").is_some() {
        return Ok(LookupOutcome::NotFound);
    }
    let Some(page_id) = page.get("pageid").and_then(Value::as_u64) else {
        return Ok(LookupOutcome::NotFound);
    };

    let title = page
        .get("title")
        .and_then(Value::as_str)
        .ok_or_else(|| LookupError::MalformedResponse("page without `title`".to_string()))?
        .to_string();
    let summary = page
        .get("extract")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(LookupOutcome::Found(Article {
        title,
        page_id,
        summary,
        reference_url: reference_url(page_url_base, page_id),
    }))
}

/// Canonical page URL for a page id, e.g. `https://en.wikipedia.org/?curid=42`.
pub fn reference_url(page_url_base: &str, page_id: u64) -> String {
    let base = page_url_base.trim_end_matches('/');
    format!("{base}/?curid={page_id}")
}

fn map_transport_error(err: reqwest::Error) -> LookupError {
    if err.is_timeout() {
        LookupError::Timeout
    } else {
        LookupError::Transport(err.to_string())
    }
}

//! External encyclopedia lookup.
//!
//! # Responsibility
//! - Define the gateway contract used by fetch-and-cache.
//! - Keep "nothing exists for this title" distinct from "lookup failed".
//!
//! # Invariants
//! - `LookupOutcome::NotFound` is a successful answer, never an error.
//! - Timeouts and malformed payloads surface as `LookupError`.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod wikipedia;

pub use wikipedia::{parse_extract_response, reference_url, WikipediaGateway};

pub type LookupResult<T> = Result<T, LookupError>;

/// Article summary resolved by a gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub page_id: u64,
    /// Introductory plain-text extract; may be empty.
    pub summary: String,
    /// Canonical URL derived from `page_id`.
    pub reference_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(Article),
    NotFound,
}

#[derive(Debug)]
pub enum LookupError {
    /// Request could not be built or sent, or the body could not be read.
    Transport(String),
    /// The bounded request timeout elapsed.
    Timeout,
    /// Response body was not the expected shape.
    MalformedResponse(String),
}

impl Display for LookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "lookup transport failed: {message}"),
            Self::Timeout => write!(f, "lookup timed out"),
            Self::MalformedResponse(message) => write!(f, "malformed lookup response: {message}"),
        }
    }
}

impl Error for LookupError {}

/// Resolves a topic string into an article summary.
pub trait LookupGateway: Send + Sync {
    /// Performs one lookup for an exact title.
    fn lookup(&self, query: &str) -> LookupResult<LookupOutcome>;
}

impl<G: LookupGateway + ?Sized> LookupGateway for Box<G> {
    fn lookup(&self, query: &str) -> LookupResult<LookupOutcome> {
        (**self).lookup(query)
    }
}

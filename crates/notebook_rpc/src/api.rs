//! Transport-facing notebook API.
//!
//! # Responsibility
//! - Collapse typed facade results into values an untyped RPC transport can
//!   carry: a string, or a list of `(timestamp, title, text)` triples.
//! - Route method-name requests to the facade. `dispatch` is the single
//!   entry point for transports and for the CLI.
//!
//! # Invariants
//! - Exported functions never panic and always return something printable.
//! - Notes are the only non-string result; every failure is a message.

use log::warn;
use notebook_core::{
    cached_confirmation, FetchOutcome, LookupGateway, NotebookError, NotebookService, NotesLookup,
};
use serde::Serialize;
use serde_json::Value;

/// Value returned across the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RpcValue {
    /// Confirmation or descriptive message.
    Text(String),
    /// Notes in insertion order as `(timestamp, title, text)`.
    Notes(Vec<(String, String, String)>),
}

impl RpcValue {
    /// Renders the value one line per note, `timestamp : title : text`.
    pub fn render(&self) -> String {
        match self {
            Self::Text(message) => message.clone(),
            Self::Notes(notes) => notes
                .iter()
                .map(|(timestamp, title, text)| format!("{timestamp} : {title} : {text}"))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Adds a note; returns the confirmation or an error message.
pub fn add_note<G: LookupGateway>(
    service: &NotebookService<G>,
    topic: &str,
    title: &str,
    text: &str,
) -> String {
    match service.add_note(topic, title, text) {
        Ok(added) => added.confirmation(),
        Err(NotebookError::Validation { field }) => validation_message(field),
        Err(err) => format!("Error adding note: {err}"),
    }
}

/// Returns the notes for `topic`, or a not-found/no-notes message.
pub fn get_notes<G: LookupGateway>(service: &NotebookService<G>, topic: &str) -> RpcValue {
    match service.get_notes(topic) {
        NotesLookup::Notes(notes) => {
            RpcValue::Notes(notes.into_iter().map(|note| note.into_tuple()).collect())
        }
        NotesLookup::TopicNotFound { topic } => {
            RpcValue::Text(format!("Topic '{topic}' not found."))
        }
        NotesLookup::Empty { topic } => {
            RpcValue::Text(format!("No notes found under topic '{topic}'."))
        }
    }
}

/// Looks up `topic` externally and caches a hit as a note.
pub fn fetch_and_cache<G: LookupGateway>(service: &NotebookService<G>, topic: &str) -> String {
    match service.fetch_and_cache(topic) {
        Ok(FetchOutcome::Cached { article, .. }) => cached_confirmation(&article),
        Ok(FetchOutcome::NotFound { topic }) => format!("No article found for '{topic}'."),
        Err(NotebookError::Validation { field }) => validation_message(field),
        Err(NotebookError::Lookup(err)) => format!("Error fetching article: {err}"),
        Err(err @ NotebookError::Store(_)) => format!("Error adding note: {err}"),
    }
}

/// Routes one request by method name with positional string params.
///
/// Accepts `addNote(topic, title, text)`, `getNotes(topic)` and
/// `fetchAndCache(topic)`; `fetchWikipedia` is kept as an alias of the latter.
pub fn dispatch<G: LookupGateway>(
    service: &NotebookService<G>,
    method: &str,
    params: &[Value],
) -> RpcValue {
    let result = match method {
        "addNote" => string_params::<3>(method, params)
            .map(|[topic, title, text]| RpcValue::Text(add_note(service, topic, title, text))),
        "getNotes" => string_params::<1>(method, params).map(|[topic]| get_notes(service, topic)),
        "fetchAndCache" | "fetchWikipedia" => string_params::<1>(method, params)
            .map(|[topic]| RpcValue::Text(fetch_and_cache(service, topic))),
        other => Err(format!("Unknown method '{other}'.")),
    };

    result.unwrap_or_else(|message| {
        warn!("event=rpc_dispatch module=rpc status=rejected method={method}");
        RpcValue::Text(message)
    })
}

fn string_params<'a, const N: usize>(
    method: &str,
    params: &'a [Value],
) -> Result<[&'a str; N], String> {
    if params.len() != N {
        return Err(format!(
            "Method '{method}' expects {N} parameter(s), got {}.",
            params.len()
        ));
    }
    let mut values = [""; N];
    for (slot, (index, param)) in values.iter_mut().zip(params.iter().enumerate()) {
        *slot = param.as_str().ok_or_else(|| {
            format!("Method '{method}' parameter {} must be a string.", index + 1)
        })?;
    }
    Ok(values)
}

fn validation_message(field: &str) -> String {
    format!("Invalid request: {field} is required.")
}

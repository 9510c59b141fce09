#![allow(dead_code)]

use notebook_core::{
    Article, FileStore, LookupError, LookupGateway, LookupOutcome, LookupResult, NotebookService,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use tempfile::TempDir;

/// Canned gateway answer, keyed by exact query.
pub enum Scripted {
    Hit { title: &'static str, page_id: u64, summary: &'static str },
    Miss,
    Fail,
    Timeout,
}

/// In-memory gateway double recording every query.
#[derive(Default)]
pub struct ScriptedGateway {
    answers: HashMap<String, Scripted>,
    pub queries: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    pub fn with(mut self, query: &str, answer: Scripted) -> Self {
        self.answers.insert(query.to_string(), answer);
        self
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().len()
    }
}

impl LookupGateway for ScriptedGateway {
    fn lookup(&self, query: &str) -> LookupResult<LookupOutcome> {
        self.queries.lock().push(query.to_string());
        match self.answers.get(query) {
            Some(Scripted::Hit { title, page_id, summary }) => Ok(LookupOutcome::Found(Article {
                title: title.to_string(),
                page_id: *page_id,
                summary: summary.to_string(),
                reference_url: format!("https://en.wikipedia.org/?curid={page_id}"),
            })),
            Some(Scripted::Miss) | None => Ok(LookupOutcome::NotFound),
            Some(Scripted::Fail) => Err(LookupError::Transport("connection refused".to_string())),
            Some(Scripted::Timeout) => Err(LookupError::Timeout),
        }
    }
}

pub struct Fixture {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notes.json");
        Self { dir, path }
    }

    pub fn store(&self) -> FileStore {
        FileStore::new(&self.path)
    }

    pub fn service(&self, gateway: ScriptedGateway) -> NotebookService<ScriptedGateway> {
        NotebookService::open(self.store(), gateway).expect("open service")
    }
}

//! Notebook command-line driver.
//!
//! # Responsibility
//! - Run one notebook request against the local store and print the result.
//! - Flush the store before exit.

use clap::{Parser, Subcommand};
use log::error;
use notebook_core::{init_logging, FileStore, NotebookConfig, NotebookService, WikipediaGateway};
use notebook_rpc::dispatch;
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "notebook", version, about = "Topic-based note storage")]
struct Cli {
    /// TOML config file; `NOTEBOOK_*` variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print the transport value as JSON instead of plain text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a note under a topic.
    Add {
        topic: String,
        title: String,
        text: String,
    },
    /// List all notes under a topic.
    Get { topic: String },
    /// Look a topic up in the encyclopedia and file the summary as a note.
    Fetch { topic: String },
}

impl Command {
    /// Method name and positional params as a transport would send them.
    fn into_request(self) -> (&'static str, Vec<Value>) {
        match self {
            Self::Add { topic, title, text } => (
                "addNote",
                vec![Value::from(topic), Value::from(title), Value::from(text)],
            ),
            Self::Get { topic } => ("getNotes", vec![Value::from(topic)]),
            Self::Fetch { topic } => ("fetchAndCache", vec![Value::from(topic)]),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let config = NotebookConfig::load(cli.config.as_deref()).map_err(|err| err.to_string())?;
    if let Some(dir) = config.log.dir.as_deref() {
        init_logging(config.log.level.as_str(), dir).map_err(|err| err.to_string())?;
    }

    let gateway = WikipediaGateway::new(&config.lookup).map_err(|err| err.to_string())?;
    let service = NotebookService::open(FileStore::new(&config.store_path), gateway)
        .map_err(|err| format!("failed to open store: {err}"))?;

    let (method, params) = cli.command.into_request();
    let value = dispatch(&service, method, &params);

    if cli.json {
        let encoded = serde_json::to_string_pretty(&value).map_err(|err| err.to_string())?;
        println!("{encoded}");
    } else {
        println!("{}", value.render());
    }

    service.close().map_err(|err| {
        error!("event=store_close module=cli status=error error={err}");
        format!("failed to flush store: {err}")
    })
}

use anyhow::Context;
use clap::{Parser, Subcommand};
use hub_core::observability::init_tracing;
use hub_dashboard::config::get_configuration;
use hub_dashboard::dashboard::{FetchOutcome, FilterController};
use hub_dashboard::models::DocumentDraft;
use hub_dashboard::services::{Credential, DocumentClient, editor};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "hub-dashboard", about = "Browse and edit documents in the team hub")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print one page of the document list as JSON.
    List {
        /// Free-text filter over title, content, summary and tags.
        #[arg(long)]
        search: Option<String>,
        /// Tag to filter by; repeat for several.
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Print a single document.
    Show { id: String },
    /// Create a document, or update one when --id is given.
    Save {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "hub-dashboard",
        &configuration.logging.level,
        configuration.logging.json,
    );

    let client = Arc::new(DocumentClient::new(&configuration.backend)?);
    let credential = configuration.auth.token.clone().map(Credential::from);

    match cli.command {
        Command::List {
            search,
            tags,
            page,
            limit,
        } => {
            let controller =
                FilterController::new(client, credential, configuration.dashboard.clone());
            log_outcome("initialize", controller.initialize().await);

            for tag in tags {
                log_outcome("toggle_tag", controller.toggle_tag(tag).await);
            }
            if let Some(term) = search {
                log_outcome("set_search_term", controller.set_search_term(term).await);
            }
            if let Some(limit) = limit {
                log_outcome("on_limit_change", controller.on_limit_change(limit).await);
            }
            if let Some(page) = page {
                log_outcome("on_page_change", controller.on_page_change(page).await);
            }

            let view = controller.view();
            println!("{}", serde_json::to_string_pretty(&view)?);

            if let Some(error) = view.error {
                eprintln!("{}", error.message);
                return Ok(ExitCode::FAILURE);
            }
            info!(
                shown = view.documents.len(),
                total = view.pagination.total,
                "Listed documents"
            );
        }
        Command::Show { id } => {
            let credential = credential.context("Authentication required")?;
            let document = client.get_document(&credential, &id).await?;
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        Command::Save { id, title, content } => {
            let credential = credential.context("Authentication required")?;
            let draft = DocumentDraft::new(title, content);
            let saved = editor::save_draft(&client, &credential, id.as_deref(), &draft).await?;
            println!("{}", serde_json::to_string_pretty(&saved)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn log_outcome(intent: &str, outcome: FetchOutcome) {
    match outcome {
        FetchOutcome::Failed(err) => tracing::warn!(intent, error = %err, "Intent failed"),
        other => tracing::debug!(intent, outcome = ?other, "Intent applied"),
    }
}

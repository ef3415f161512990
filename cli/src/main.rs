use anyhow::Context;
use clap::Parser;
use colored::*;
use std::io;
use std::process;
use std::sync::Arc;
use tracing::info;
use tripdarzee_core::client::GeminiClient;
use tripdarzee_core::session::ChatSession;
use tripdarzee_places::PlacesLookup;

mod app;
mod cli;
mod config;
mod logging;
mod output;
mod router;

use crate::app::{App, run_interactive_chat};
use crate::cli::Args;
use crate::config::{AppConfig, DEFAULT_LOG_LEVEL};
use crate::logging::{init_tracing, log_error};
use crate::output::print_greeting;
use crate::router::Router;

/// Reports a fatal startup error once on stderr and exits with status 1
fn exit_with_error(message: &str, hint: Option<&str>) -> ! {
    log_error(message);
    if let Some(hint) = hint {
        eprintln!("{}", hint.red());
    }
    process::exit(1)
}

/// Main function - loads configuration, greets the user and runs the chat loop
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before reading any API keys
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = match AppConfig::load(&args) {
        Ok(config) => config,
        Err(e) => exit_with_error(&format!("{:#}", e), None),
    };

    init_tracing(config.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL));

    // The chat API key is mandatory; fail before the loop starts
    let gemini = match GeminiClient::new(config.gemini.clone()) {
        Ok(client) => client,
        Err(e) => exit_with_error(
            &format!("Failed to initialize Gemini client: {}", e),
            Some("Set GEMINI_API_KEY (or add it to a .env file) and try again."),
        ),
    };

    let provider = config
        .places
        .build_provider()
        .context("Failed to initialize places provider")?;
    let router = Router::new(config.chat.router.unwrap_or_default());
    info!(
        model = gemini.model_name(),
        places_provider = provider.name(),
        router = ?router.mode(),
        "TravelMitra ready"
    );

    let session = ChatSession::with_window(Arc::new(gemini), config.chat.window());
    let mut app = App::new(
        router,
        PlacesLookup::new(provider),
        config.places.radius(),
        session,
    );

    let stdout = io::stdout();
    print_greeting(&mut stdout.lock()).context("Failed to write greeting")?;

    let stdin = io::stdin();
    run_interactive_chat(&mut app, stdin.lock(), stdout.lock()).await
}

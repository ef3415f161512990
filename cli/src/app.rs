use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{BufRead, Write};
use std::time::Duration;
use tracing::{debug, error, info};
use tripdarzee_core::session::{ChatSession, Transcript};
use tripdarzee_places::{PlaceQuery, PlacesLookup};

use crate::output::{
    DIDNT_UNDERSTAND, GOODBYE, print_bot_reply, print_prompt, service_failure,
};
use crate::router::{Action, Router};

/// The assistant: a router in front of the places lookup and the chat session
pub struct App {
    router: Router,
    places: PlacesLookup,
    radius_meters: u32,
    session: ChatSession,
}

impl App {
    pub fn new(router: Router, places: PlacesLookup, radius_meters: u32, session: ChatSession) -> Self {
        Self {
            router,
            places,
            radius_meters,
            session,
        }
    }

    /// Produces the reply for one line of input. Backend failures become an
    /// apology; the transcript only changes when a chat turn succeeds.
    pub async fn handle_line(&mut self, input: &str) -> String {
        match self.router.route(input) {
            Action::LookupRequest {
                place_type,
                location_text,
            } => {
                let query = PlaceQuery::new(place_type, location_text).with_radius(self.radius_meters);
                match self.places.lookup_query(&query).await {
                    Ok(message) => message,
                    Err(e) => {
                        error!(provider = self.places.provider_name(), "Places lookup failed: {}", e);
                        service_failure("the maps service")
                    }
                }
            }
            Action::ConversationTurn { text } => match self.session.turn(&text).await {
                Ok(reply) => reply,
                Err(e) => {
                    error!("Chat turn failed: {}", e);
                    service_failure("the chat service")
                }
            },
            Action::Unparseable { input } => {
                info!(input = %input, "Could not parse lookup request");
                DIDNT_UNDERSTAND.to_string()
            }
        }
    }

    pub fn transcript(&self) -> &Transcript {
        self.session.transcript()
    }
}

fn is_exit_command(input: &str) -> bool {
    let input = input.trim();
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}

fn waiting_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message("TravelMitra is thinking...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Runs the console loop until `exit`, `quit` or end of input
pub async fn run_interactive_chat<R, W>(app: &mut App, mut input: R, mut output: W) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    loop {
        print_prompt(&mut output).context("Failed to flush stdout")?;

        let mut line = String::new();
        let read = input.read_line(&mut line).context("Failed to read input")?;
        if read == 0 {
            debug!("End of input");
            writeln!(output).context("Failed to write output")?;
            break;
        }

        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }

        if is_exit_command(line) {
            print_bot_reply(&mut output, GOODBYE).context("Failed to write output")?;
            break;
        }

        let spinner = waiting_spinner();
        let reply = app.handle_line(line).await;
        spinner.finish_and_clear();

        print_bot_reply(&mut output, &reply).context("Failed to write output")?;
    }

    info!(transcript_len = app.transcript().len(), "Chat session finished");
    Ok(())
}

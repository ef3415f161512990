use clap::Parser;
use std::path::PathBuf;
use tripdarzee_places::PlacesProviderKind;

use crate::router::RouterMode;

/// TravelMitra, the TripDarzee travel assistant
///
/// Chat about trip plans, or ask "Find <type> near <location>" to list nearby places.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML config file (defaults to ~/.config/tripdarzee/config.toml)
    #[arg(short, long, env = "TRIPDARZEE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Maps backend used for place lookups: google or rest
    #[arg(long)]
    pub places_provider: Option<PlacesProviderKind>,

    /// Base URL of the maps backend
    #[arg(long)]
    pub places_base_url: Option<String>,

    /// How "find <type> near <location>" requests are recognised
    #[arg(long, value_enum)]
    pub router: Option<RouterMode>,

    /// Send at most this many past messages with each chat request
    #[arg(long)]
    pub history_window: Option<usize>,

    /// Search radius for place lookups, in meters
    #[arg(long)]
    pub radius: Option<u32>,

    /// Gemini model to chat with
    #[arg(short, long)]
    pub model: Option<String>,

    /// Log level used when RUST_LOG is not set (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

//! Decides whether a line of input is a places lookup or a chat turn.

use clap::ValueEnum;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// `find <type> near <location...>`, case-insensitive
    static ref LOOKUP_GRAMMAR: Regex =
        Regex::new(r"(?i)^find\s+(?P<kind>\S+)\s+near\s+(?P<location>\S.*)$").unwrap();
}

/// How lookup requests are recognised
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RouterMode {
    /// Whole-word grammar: `find <type> near <location>`
    #[default]
    Strict,
    /// Substring trigger on "find" and "near" with positional tokens
    Legacy,
}

/// What to do with one line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    LookupRequest {
        place_type: String,
        location_text: String,
    },
    ConversationTurn {
        text: String,
    },
    /// Looked like a lookup request but could not be parsed as one
    Unparseable {
        input: String,
    },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Router {
    mode: RouterMode,
}

impl Router {
    pub fn new(mode: RouterMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> RouterMode {
        self.mode
    }

    pub fn route(&self, input: &str) -> Action {
        match self.mode {
            RouterMode::Strict => route_strict(input),
            RouterMode::Legacy => route_legacy(input),
        }
    }
}

fn conversation(input: &str) -> Action {
    Action::ConversationTurn {
        text: input.to_string(),
    }
}

fn unparseable(input: &str) -> Action {
    Action::Unparseable {
        input: input.to_string(),
    }
}

fn route_strict(input: &str) -> Action {
    let trimmed = input.trim();

    if let Some(captures) = LOOKUP_GRAMMAR.captures(trimmed) {
        let location_text = captures["location"]
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        return Action::LookupRequest {
            place_type: captures["kind"].to_string(),
            location_text,
        };
    }

    let mut words = trimmed.split_whitespace();
    let starts_with_find = words
        .next()
        .is_some_and(|word| word.eq_ignore_ascii_case("find"));
    if starts_with_find && words.any(|word| word.eq_ignore_ascii_case("near")) {
        return unparseable(input);
    }

    conversation(input)
}

/// Any input containing both "find" and "near" is taken to be
/// `<verb> <type> <anything> <location...>`. "underneath" contains "near", so
/// "find my keys underneath the sofa" is routed as a lookup.
fn route_legacy(input: &str) -> Action {
    let lowered = input.to_lowercase();
    if !(lowered.contains("find") && lowered.contains("near")) {
        return conversation(input);
    }

    let words: Vec<&str> = input.split_whitespace().collect();
    if words.len() < 4 {
        return unparseable(input);
    }

    Action::LookupRequest {
        place_type: words[1].to_string(),
        location_text: words[3..].join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(place_type: &str, location_text: &str) -> Action {
        Action::LookupRequest {
            place_type: place_type.to_string(),
            location_text: location_text.to_string(),
        }
    }

    const BOTH_MODES: [RouterMode; 2] = [RouterMode::Strict, RouterMode::Legacy];

    #[test]
    fn test_plain_chat_is_passed_through_unchanged() {
        let inputs = [
            "Plan a 5 day trip to Kerala",
            "  leading and trailing spaces  ",
            "Where can I FIND good street food?",
            "Is Agra NEAR Delhi?",
            "",
            "नमस्ते, मुझे गोवा जाना है",
        ];
        for mode in BOTH_MODES {
            let router = Router::new(mode);
            for input in inputs {
                assert_eq!(
                    router.route(input),
                    Action::ConversationTurn {
                        text: input.to_string()
                    },
                    "mode {:?}, input {:?}",
                    mode,
                    input
                );
            }
        }
    }

    #[test]
    fn test_find_hotels_near_paris() {
        for mode in BOTH_MODES {
            assert_eq!(
                Router::new(mode).route("Find hotels near Paris"),
                lookup("hotels", "Paris")
            );
        }
    }

    #[test]
    fn test_multi_word_location_is_joined_with_single_spaces() {
        for mode in BOTH_MODES {
            assert_eq!(
                Router::new(mode).route("Find restaurants near New   York City"),
                lookup("restaurants", "New York City")
            );
        }
    }

    #[test]
    fn test_place_type_keeps_original_case() {
        for mode in BOTH_MODES {
            assert_eq!(
                Router::new(mode).route("FIND Cafes NEAR Connaught Place"),
                lookup("Cafes", "Connaught Place")
            );
        }
    }

    #[test]
    fn test_legacy_underneath_false_positive() {
        let router = Router::new(RouterMode::Legacy);
        assert_eq!(
            router.route("find my keys underneath the sofa"),
            lookup("my", "underneath the sofa")
        );
    }

    #[test]
    fn test_strict_underneath_is_conversation() {
        let router = Router::new(RouterMode::Strict);
        let input = "find my keys underneath the sofa";
        assert_eq!(
            router.route(input),
            Action::ConversationTurn {
                text: input.to_string()
            }
        );
    }

    #[test]
    fn test_legacy_does_not_check_third_token() {
        let router = Router::new(RouterMode::Legacy);
        assert_eq!(
            router.route("Find hotels around Nearby Goa"),
            lookup("hotels", "Nearby Goa")
        );
    }

    #[test]
    fn test_legacy_short_input_is_unparseable() {
        let router = Router::new(RouterMode::Legacy);
        for input in ["find near", "findnear", "find hotels near"] {
            assert_eq!(
                router.route(input),
                Action::Unparseable {
                    input: input.to_string()
                }
            );
        }
    }

    #[test]
    fn test_strict_malformed_lookup_is_unparseable() {
        let router = Router::new(RouterMode::Strict);
        for input in ["find near Paris", "Find hotels near", "find cheap hotels near Paris"] {
            assert_eq!(
                router.route(input),
                Action::Unparseable {
                    input: input.to_string()
                },
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_strict_tolerates_surrounding_whitespace() {
        let router = Router::new(RouterMode::Strict);
        assert_eq!(
            router.route("   find museums near  Old Delhi  "),
            lookup("museums", "Old Delhi")
        );
    }

    #[test]
    fn test_default_mode_is_strict() {
        assert_eq!(Router::default().mode(), RouterMode::Strict);
    }
}

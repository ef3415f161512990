use colored::*;
use std::io::{self, Write};
use tripdarzee_core::persona::GREETING;

pub const DIDNT_UNDERSTAND: &str =
    "Sorry, I didn't understand that. Try something like \"Find hotels near Paris\".";
pub const GOODBYE: &str = "Goodbye! Have a wonderful trip.";

/// Apology shown when a backend call fails mid-turn
pub fn service_failure(service: &str) -> String {
    format!(
        "Sorry, something went wrong while contacting {}. Please try again.",
        service
    )
}

/// Print one reply line, prefixed with `Bot: `
pub fn print_bot_reply<W: Write>(out: &mut W, reply: &str) -> io::Result<()> {
    writeln!(out, "{}: {}", "Bot".blue().bold(), reply)
}

pub fn print_greeting<W: Write>(out: &mut W) -> io::Result<()> {
    print_bot_reply(out, GREETING)
}

/// Show the input prompt without a trailing newline
pub fn print_prompt<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "{}: ", "You".green().bold())?;
    out.flush()
}

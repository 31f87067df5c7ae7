//! Translation of game records from the internal notation (`<num><g|s>`
//! move headers) into the game-database notation (`<num><w|b>`).
//!
//! Only the header side letter changes; step and placement tokens are kept
//! verbatim, with runs of whitespace collapsed to single spaces.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("invalid side: {0:?}")]
    InvalidSide(String),
    #[error("unsupported internal side: {0:?}")]
    UnsupportedSide(String),
    #[error("line does not look like an internal move line '<num><g|s> ...': {0:?}")]
    BadLine(String),
}

fn header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?P<num>\d+)\s*(?P<side>[gGsS])(?:\s+(?P<rest>.*))?\s*$")
            .expect("move header pattern is valid")
    })
}

/// Internal `g`/`s` (either case) to database `w`/`b`.
pub fn internal_side_to_db_side(side: &str) -> Result<char, NotationError> {
    let mut chars = side.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return Err(NotationError::InvalidSide(side.to_string()));
    };
    match c.to_ascii_lowercase() {
        'g' => Ok('w'),
        's' => Ok('b'),
        _ => Err(NotationError::UnsupportedSide(side.to_string())),
    }
}

/// Translate one move line, e.g. `"9s de6w Re5n"` -> `"9b de6w Re5n"`.
pub fn translate_move_line(line: &str) -> Result<String, NotationError> {
    let caps = header_re()
        .captures(line)
        .ok_or_else(|| NotationError::BadLine(line.to_string()))?;
    let num = &caps["num"];
    let db_side = internal_side_to_db_side(&caps["side"])?;
    let rest = caps
        .name("rest")
        .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();

    if rest.is_empty() {
        Ok(format!("{num}{db_side}"))
    } else {
        Ok(format!("{num}{db_side} {rest}"))
    }
}

pub fn translate_game_lines<I, S>(lines: I) -> Result<Vec<String>, NotationError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .map(|line| translate_move_line(line.as_ref()))
        .collect()
}

/// Translate a newline-separated game; blank lines are dropped.
pub fn translate_game_string(game: &str) -> Result<String, NotationError> {
    let lines = translate_game_lines(game.lines().filter(|l| !l.trim().is_empty()))?;
    Ok(lines.join("\n"))
}

#[cfg(test)]
#[path = "notation_tests.rs"]
mod notation_tests;

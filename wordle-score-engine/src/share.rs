//! Parsing of the result text Wordle puts on the clipboard when sharing,
//! e.g. `Wordle 1,234 3/6*` followed by the emoji grid.

use crate::record::{DayOffset, Outcome};
use regex::Regex;
use std::sync::OnceLock;

fn share_header() -> Option<&'static Regex> {
    static HEADER: OnceLock<Option<Regex>> = OnceLock::new();
    HEADER
        .get_or_init(|| {
            Regex::new(r"(?m)^\s*Wordle\s+([0-9][0-9,.\u{202F}\u{00A0} ]*?)\s+([1-6Xx])/6(\*?)").ok()
        })
        .as_ref()
}

/// Day and outcome read from a shared result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareResult {
    pub day: DayOffset,
    pub outcome: Outcome,
    pub hard_mode: bool,
}

/// Returns `None` when the text does not contain a recognizable result.
#[must_use]
pub fn parse_share_text(text: &str) -> Option<ShareResult> {
    let caps = share_header()?.captures(text)?;
    let digits: String = caps
        .get(1)?
        .as_str()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    let day = digits.parse::<DayOffset>().ok().filter(|day| *day >= 1)?;
    let outcome = caps.get(2)?.as_str().parse::<Outcome>().ok()?;
    let hard_mode = caps.get(3).is_some_and(|m| !m.as_str().is_empty());
    Some(ShareResult {
        day,
        outcome,
        hard_mode,
    })
}

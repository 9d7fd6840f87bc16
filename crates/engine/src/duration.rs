//! Duration-string helpers.
//!
//! Lesson duration hints are free text ("45 min", "2h"). Parsing them is
//! a narrowly-scoped fallback heuristic used only when a lesson is
//! completed without recorded timer time; the primary time source is the
//! timer itself.

use regex::Regex;

/// Minutes logged when neither the timer nor the duration hint yields a
/// usable value.
pub const DEFAULT_LOG_MINUTES: u32 = 5;

/// Parse a free-text duration hint into minutes.
///
/// Recognizes `N min`/`minutes`/`m` and `N h`/`hours`/`heures` (hours
/// are checked first so "2h" does not fall through). Anything else is
/// `None`; the caller applies [`DEFAULT_LOG_MINUTES`].
pub fn parse_duration_hint(hint: &str) -> Option<u32> {
    let hours = Regex::new(r"(?i)(\d+)\s*(hours?|heures?|h)\b").ok()?;
    if let Some(caps) = hours.captures(hint) {
        let n: u32 = caps[1].parse().ok()?;
        return Some(n * 60);
    }

    let minutes = Regex::new(r"(?i)(\d+)\s*(minutes?|min|m)\b").ok()?;
    if let Some(caps) = minutes.captures(hint) {
        return caps[1].parse().ok();
    }

    None
}

/// Format elapsed milliseconds for display: `m:ss`, or `h:mm:ss` from
/// one hour up.
pub fn format_elapsed(ms: i64) -> String {
    let total_secs = (ms.max(0)) / 1000;
    let secs = total_secs % 60;
    let mins = (total_secs / 60) % 60;
    let hours = total_secs / 3600;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}

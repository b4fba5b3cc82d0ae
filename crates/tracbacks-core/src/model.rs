//! Ticket identifiers, reference matches, and the trackback message type.

use serde::{Deserialize, Serialize};
use std::{fmt, num::ParseIntError, str::FromStr};

/// Sentinel that opens every generated trackback.
///
/// Renders as a styled block in the host's wiki markup and doubles as the
/// loop-guard: comments starting with it are never scanned.
pub const MAGIC_MARKER: &str = "{{{\n#!html\n<div class=\"tracback\"></div>\n}}}\n";

/// Text placed between the marker and the source ticket number.
pub const TRACBACK_PREFIX: &str = "This ticket has been referenced in ticket #";

/// A ticket number in the host tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(pub u64);

impl TicketId {
    /// The bare decimal form, as it appears after `#` or `ticket:`.
    #[must_use]
    pub fn digits(self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for TicketId {
    fn from(n: u64) -> Self {
        Self(n)
    }
}

impl FromStr for TicketId {
    type Err = ParseIntError;

    /// Accepts `12`, `#12`, or `ticket:12`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s
            .strip_prefix('#')
            .or_else(|| s.strip_prefix("ticket:"))
            .unwrap_or(s);
        digits.parse().map(Self)
    }
}

/// One reference token located in a (redacted) comment.
///
/// All offsets are byte offsets. Redaction never changes byte length, so the
/// same offsets are valid in the original comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceMatch<'a> {
    /// Start of the whole token, including any leading whitespace.
    pub token_start: usize,
    /// Start of the captured digit run.
    pub index: usize,
    /// Length of the whole token, boundary whitespace included.
    pub len: usize,
    /// The captured digit run, verbatim.
    pub digits: &'a str,
}

impl ReferenceMatch<'_> {
    /// The full matched token text.
    #[must_use]
    pub fn token<'t>(&self, text: &'t str) -> &'t str {
        text.get(self.token_start..self.token_start + self.len)
            .unwrap_or_default()
    }
}

/// Ordered excerpts quoted for one referenced ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExcerptSet(Vec<String>);

impl ExcerptSet {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, excerpt: String) {
        self.0.push(excerpt);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// A generated trackback comment, ready to be saved on the target ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TrackbackMessage(String);

impl TrackbackMessage {
    /// Assemble the marker, prefix, source ticket and excerpt blocks.
    #[must_use]
    pub fn new(source: TicketId, excerpts: &ExcerptSet) -> Self {
        let body: usize = excerpts.iter().map(str::len).sum();
        let mut text =
            String::with_capacity(MAGIC_MARKER.len() + TRACBACK_PREFIX.len() + 24 + body);
        text.push_str(MAGIC_MARKER);
        text.push_str(TRACBACK_PREFIX);
        text.push_str(&source.digits());
        text.push(':');
        for excerpt in excerpts.iter() {
            text.push_str(excerpt);
        }
        Self(text)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TrackbackMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether `comment` was generated by this crate.
#[must_use]
pub fn is_trackback(comment: &str) -> bool {
    comment.starts_with(MAGIC_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_id_parses_common_spellings() {
        assert_eq!("12".parse::<TicketId>().ok(), Some(TicketId(12)));
        assert_eq!("#12".parse::<TicketId>().ok(), Some(TicketId(12)));
        assert_eq!(" ticket:012 ".parse::<TicketId>().ok(), Some(TicketId(12)));
        assert!("bn-12".parse::<TicketId>().is_err());
    }

    #[test]
    fn ticket_id_display_and_digits() {
        assert_eq!(TicketId(7).to_string(), "#7");
        assert_eq!(TicketId(7).digits(), "7");
    }

    #[test]
    fn message_starts_with_marker_even_without_excerpts() {
        let msg = TrackbackMessage::new(TicketId(3), &ExcerptSet::new());
        assert!(is_trackback(msg.as_str()));
        assert!(msg.as_str().ends_with("This ticket has been referenced in ticket #3:"));
    }

    #[test]
    fn message_keeps_excerpt_order() {
        let mut set = ExcerptSet::new();
        set.push("\n> first\n".into());
        set.push("\n> second\n".into());
        let msg = TrackbackMessage::new(TicketId(9), &set).into_string();
        let first = msg.find("first").expect("first excerpt present");
        let second = msg.find("second").expect("second excerpt present");
        assert!(first < second);
    }
}

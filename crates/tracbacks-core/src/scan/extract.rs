use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::model::{ReferenceMatch, TicketId};

/// `#123` or `ticket:123`, set off by whitespace, a word boundary, or the
/// ends of the text.
///
/// Alternation is leftmost-first, so a whitespace character on either side
/// is consumed into the token when one is present.
static TICKET_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\b|\s)(?:#|ticket:)([0-9]+)(?:\s|\b|$)")
        .expect("ticket reference regex is a compile-time constant and must be valid")
});

/// Every reference token in `text`, in order of appearance.
pub fn reference_matches(text: &str) -> impl Iterator<Item = ReferenceMatch<'_>> {
    TICKET_REFERENCE.captures_iter(text).filter_map(|caps| {
        let token = caps.get(0)?;
        let digits = caps.get(1)?;
        Some(ReferenceMatch {
            token_start: token.start(),
            index: digits.start(),
            len: token.len(),
            digits: digits.as_str(),
        })
    })
}

/// Distinct ticket ids referenced in already-redacted text.
#[must_use]
pub fn extract_references(redacted: &str) -> BTreeSet<TicketId> {
    reference_matches(redacted)
        .filter_map(|m| match m.digits.parse::<u64>() {
            Ok(n) => Some(TicketId(n)),
            Err(err) => {
                debug!(digits = m.digits, error = %err, "ignoring unparseable ticket reference");
                None
            }
        })
        .collect()
}

//! Quoted context windows around each reference to a target ticket.

use crate::config::ExcerptConfig;
use crate::model::{ExcerptSet, ReferenceMatch, TicketId, TrackbackMessage};

use super::extract::reference_matches;

const ELLIPSIS: &str = "...";

/// Positions of every token in `redacted` whose digits spell `target`.
///
/// The comparison is textual: `#007` does not match ticket 7.
pub fn find_ref(redacted: &str, target: TicketId) -> impl Iterator<Item = ReferenceMatch<'_>> {
    let digits = target.digits();
    reference_matches(redacted).filter(move |m| m.digits == digits)
}

/// One excerpt block per reference to `target`, in order of appearance.
///
/// Positions come from `redacted`; the quoted text comes from `original`.
#[must_use]
pub fn excerpts_for(
    original: &str,
    redacted: &str,
    target: TicketId,
    config: &ExcerptConfig,
) -> ExcerptSet {
    let chars = CharIndex::new(original);
    let mut set = ExcerptSet::new();
    for m in find_ref(redacted, target) {
        let index = chars.char_at(m.index);
        let more = m.token(redacted).chars().count();
        set.push(excerpt_block(&chars, index, more, config));
    }
    set
}

/// The full trackback that `source` leaves on `target`.
#[must_use]
pub fn build_trackback(
    source: TicketId,
    original: &str,
    redacted: &str,
    target: TicketId,
    config: &ExcerptConfig,
) -> TrackbackMessage {
    TrackbackMessage::new(source, &excerpts_for(original, redacted, target, config))
}

/// Render `[index - context, index + more + context)` of the indexed text.
///
/// Windows that would stop within `weed_buffer` characters of either end are
/// shown without an ellipsis on that side.
fn excerpt_block(
    chars: &CharIndex<'_>,
    index: usize,
    more: usize,
    config: &ExcerptConfig,
) -> String {
    let total = chars.len();
    let (start, left) = match index.checked_sub(config.context_chars) {
        Some(start) if start > config.weed_buffer => (start, ELLIPSIS),
        _ => (0, ""),
    };
    let end = index + more + config.context_chars;
    let right = if end + config.weed_buffer >= total {
        ""
    } else {
        ELLIPSIS
    };

    let excerpt: String = chars
        .slice(start, end)
        .chars()
        .map(|c| if matches!(c, '\n' | '\r') { ' ' } else { c })
        .collect();

    format!("\n> {left}{excerpt}{right}\n")
}

/// Byte offset of every character in a text, built once per target.
struct CharIndex<'a> {
    text: &'a str,
    starts: Vec<usize>,
}

impl<'a> CharIndex<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            starts: text.char_indices().map(|(i, _)| i).collect(),
        }
    }

    const fn len(&self) -> usize {
        self.starts.len()
    }

    /// Character position of byte offset `byte`.
    fn char_at(&self, byte: usize) -> usize {
        self.starts.partition_point(|&b| b < byte)
    }

    fn byte_at(&self, char_pos: usize) -> usize {
        self.starts.get(char_pos).copied().unwrap_or(self.text.len())
    }

    /// Characters `[start, end)`, clamped to the text.
    fn slice(&self, start: usize, end: usize) -> &'a str {
        self.text
            .get(self.byte_at(start)..self.byte_at(end))
            .unwrap_or_default()
    }
}

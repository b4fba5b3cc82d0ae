//! Offset-preserving masking of code blocks and inline code spans.
//!
//! References inside `{{{ ... }}}` blocks or `` `...` `` spans are not real
//! references. Rather than cutting them out, every matched byte is replaced
//! with an ASCII space so that offsets found in the redacted text still point
//! at the same characters in the original comment.

use std::ops::Range;
use std::sync::LazyLock;

const FENCE_OPEN: &[u8; 3] = b"{{{";
const FENCE_CLOSE: &[u8; 3] = b"}}}";

/// `` ` `` ... `` ` ``, shortest span, newlines included.
static INLINE_SPAN: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"(?s)`.*?`")
        .expect("inline span regex is a compile-time constant and must be valid")
});

/// The two masking passes, in the order [`redact_all`] applies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redaction {
    /// Wiki processor / preformatted block.
    FencedBlock,
    /// Backtick code span.
    InlineSpan,
}

impl Redaction {
    pub const ALL: [Self; 2] = [Self::FencedBlock, Self::InlineSpan];

    /// Leftmost match at or after `from`.
    fn find_from(self, text: &str, from: usize) -> Option<Range<usize>> {
        match self {
            Self::FencedBlock => find_fenced_block(text.as_bytes(), from),
            Self::InlineSpan => INLINE_SPAN.find_at(text, from).map(|m| m.range()),
        }
    }

    /// Where the next search may start once `masked` has been blanked.
    ///
    /// Blanking a fenced block can remove the `{{{` that kept an enclosing
    /// opener from matching, so that pass always rescans from the start.
    /// Backtick spans cannot re-pair across a blanked span.
    const fn resume_at(self, masked: &Range<usize>) -> usize {
        match self {
            Self::FencedBlock => 0,
            Self::InlineSpan => masked.end,
        }
    }
}

/// Blank every match of `pattern` until none remain.
///
/// The result has the same byte length as `text`, and every byte outside a
/// masked span is unchanged.
#[must_use]
pub fn redact(pattern: Redaction, text: &str) -> String {
    let mut out = text.to_owned();
    let mut from = 0;
    while let Some(span) = pattern.find_from(&out, from) {
        blank(&mut out, &span);
        from = pattern.resume_at(&span);
    }
    out
}

/// Apply every [`Redaction`] in order, each pass seeing the previous output.
#[must_use]
pub fn redact_all(text: &str) -> String {
    Redaction::ALL
        .into_iter()
        .fold(text.to_owned(), |acc, pattern| redact(pattern, &acc))
}

/// Leftmost `{{{` ... `}}}` at or after `from`, ending at the first closer,
/// whose interior never starts another `{{{`.
///
/// Runs in a single forward sweep so block size has no bearing on whether a
/// match is found.
fn find_fenced_block(bytes: &[u8], from: usize) -> Option<Range<usize>> {
    let mut open = find_seq(bytes, FENCE_OPEN, from)?;
    loop {
        let body = open + FENCE_OPEN.len();
        let close = find_seq(bytes, FENCE_CLOSE, body)?;
        match rfind_seq(&bytes[body..close], FENCE_OPEN) {
            None => return Some(open..close + FENCE_CLOSE.len()),
            // Every opener that would enclose the inner one fails the same
            // way; only openers overlapping it are still candidates.
            Some(inner) => {
                let inner = body + inner;
                open = find_seq(bytes, FENCE_OPEN, (open + 1).max(inner - 2))?;
            }
        }
    }
}

fn find_seq(bytes: &[u8], needle: &[u8; 3], from: usize) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| from + i)
}

fn rfind_seq(bytes: &[u8], needle: &[u8; 3]) -> Option<usize> {
    bytes.windows(needle.len()).rposition(|w| w == needle)
}

fn blank(text: &mut String, span: &Range<usize>) {
    text.replace_range(span.clone(), &" ".repeat(span.len()));
}

//! Reference scanning: redact code, extract ticket references, quote them.
//!
//! # Pipeline
//!
//! 1. [`redact::redact_all`] blanks `{{{...}}}` blocks and `` `...` `` spans
//!    with spaces, keeping byte offsets stable.
//! 2. [`extract::extract_references`] collects the distinct ticket ids in the
//!    redacted text; the source ticket is dropped.
//! 3. [`excerpt::build_trackback`] locates each id again in the redacted text
//!    and quotes the original text around it.
//!
//! Comments that are themselves trackbacks stop at step 0.

pub mod excerpt;
pub mod extract;
pub mod redact;

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::config::ExcerptConfig;
use crate::model::{TicketId, TrackbackMessage, is_trackback};

pub use excerpt::{build_trackback, excerpts_for, find_ref};
pub use extract::{extract_references, reference_matches};
pub use redact::{Redaction, redact, redact_all};

/// A trackback waiting to be saved on `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingTrackback {
    pub target: TicketId,
    pub message: TrackbackMessage,
}

/// Everything learned from scanning one comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub source: TicketId,
    /// The comment was a generated trackback and was not scanned.
    pub loop_guarded: bool,
    /// The comment with code blocks and spans blanked out.
    #[serde(skip)]
    pub redacted: String,
    /// Referenced tickets other than `source`, ascending.
    pub references: BTreeSet<TicketId>,
    /// One message per entry in `references`, same order.
    pub trackbacks: Vec<PendingTrackback>,
}

impl ScanResult {
    fn guarded(source: TicketId) -> Self {
        Self {
            source,
            loop_guarded: true,
            redacted: String::new(),
            references: BTreeSet::new(),
            trackbacks: Vec::new(),
        }
    }

    /// Whether the scan produced anything to post.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trackbacks.is_empty()
    }
}

/// Runs the redact / extract / excerpt pipeline with fixed excerpt settings.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    excerpt: ExcerptConfig,
}

impl Scanner {
    #[must_use]
    pub const fn new(excerpt: ExcerptConfig) -> Self {
        Self { excerpt }
    }

    #[must_use]
    pub const fn excerpt_config(&self) -> &ExcerptConfig {
        &self.excerpt
    }

    /// Scan `comment`, written on ticket `source`.
    #[must_use]
    pub fn scan(&self, source: TicketId, comment: &str) -> ScanResult {
        if is_trackback(comment) {
            debug!(%source, "comment is a trackback, not scanning");
            return ScanResult::guarded(source);
        }

        let redacted = redact_all(comment);
        let mut references = extract_references(&redacted);
        if references.remove(&source) {
            debug!(%source, "dropped self-reference");
        }

        let trackbacks = references
            .iter()
            .map(|&target| PendingTrackback {
                target,
                message: build_trackback(source, comment, &redacted, target, &self.excerpt),
            })
            .collect();

        ScanResult {
            source,
            loop_guarded: false,
            redacted,
            references,
            trackbacks,
        }
    }
}

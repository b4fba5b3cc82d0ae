//! Ticket-change hooks that post trackbacks through a [`TicketStore`].
//!
//! The host owns the event loop and calls one of the `on_ticket_*` methods
//! per notification. Nothing here is fatal: missing targets and store
//! failures are logged, recorded in the returned [`DispatchReport`], and the
//! remaining targets are still processed.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::TracbackConfig;
use crate::error::HostError;
use crate::host::{DESCRIPTION_FIELD, REPORTER_FIELD, Ticket, TicketStore};
use crate::model::TicketId;
use crate::scan::Scanner;

/// Why a notification produced no trackbacks at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Scanning is switched off in config.
    Disabled,
    /// No comment text came with the change.
    NoComment,
    /// The comment is itself a trackback.
    LoopGuard,
    /// The ticket was deleted.
    Deleted,
}

/// What happened to one referenced ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrackbackStatus {
    Posted,
    Missing,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    pub target: TicketId,
    #[serde(flatten)]
    pub status: TrackbackStatus,
}

/// Summary of one hook invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub source: TicketId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<SkipReason>,
    pub outcomes: Vec<DispatchOutcome>,
}

impl DispatchReport {
    const fn skipped(source: TicketId, reason: SkipReason) -> Self {
        Self {
            source,
            skipped: Some(reason),
            outcomes: Vec::new(),
        }
    }

    /// Targets that received a trackback.
    pub fn posted(&self) -> impl Iterator<Item = TicketId> + '_ {
        self.outcomes
            .iter()
            .filter(|o| o.status == TrackbackStatus::Posted)
            .map(|o| o.target)
    }

    #[must_use]
    pub fn posted_count(&self) -> usize {
        self.posted().count()
    }
}

/// Handles ticket notifications from the host.
#[derive(Debug, Clone)]
pub struct TracbackListener {
    scanner: Scanner,
    enabled: bool,
}

impl Default for TracbackListener {
    fn default() -> Self {
        Self::new(&TracbackConfig::default())
    }
}

impl TracbackListener {
    #[must_use]
    pub fn new(config: &TracbackConfig) -> Self {
        Self {
            scanner: Scanner::new(config.excerpt.clone()),
            enabled: config.scan.enabled,
        }
    }

    #[must_use]
    pub const fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    /// A new ticket: its description is scanned as if it were a comment by
    /// the reporter.
    pub fn on_ticket_created<S>(&self, store: &mut S, ticket: &Ticket) -> DispatchReport
    where
        S: TicketStore + ?Sized,
    {
        let author = ticket.value(REPORTER_FIELD).unwrap_or_default();
        self.on_ticket_changed(store, ticket, ticket.value(DESCRIPTION_FIELD), author, None)
    }

    /// A ticket changed, optionally with a new comment by `author`.
    ///
    /// `old_values` is accepted for parity with the host's notification and
    /// does not affect the result.
    pub fn on_ticket_changed<S>(
        &self,
        store: &mut S,
        ticket: &Ticket,
        comment: Option<&str>,
        author: &str,
        _old_values: Option<&BTreeMap<String, String>>,
    ) -> DispatchReport
    where
        S: TicketStore + ?Sized,
    {
        if !self.enabled {
            return DispatchReport::skipped(ticket.id, SkipReason::Disabled);
        }
        let Some(comment) = comment else {
            return DispatchReport::skipped(ticket.id, SkipReason::NoComment);
        };

        let scan = self.scanner.scan(ticket.id, comment);
        if scan.loop_guarded {
            return DispatchReport::skipped(ticket.id, SkipReason::LoopGuard);
        }

        let mut outcomes = Vec::with_capacity(scan.trackbacks.len());
        for pending in scan.trackbacks {
            let target = pending.target;
            let status = match store.load_ticket(target) {
                Ok(t) => match store.save_comment(&t, author, pending.message.as_str()) {
                    Ok(()) => {
                        info!(source = %ticket.id, %target, "trackback posted");
                        TrackbackStatus::Posted
                    }
                    Err(err) => {
                        warn!(
                            source = %ticket.id,
                            %target,
                            code = %err.code(),
                            error = %err,
                            "failed to save trackback"
                        );
                        TrackbackStatus::Failed {
                            reason: err.to_string(),
                        }
                    }
                },
                Err(HostError::NotFound(_)) => {
                    debug!(source = %ticket.id, %target, "referenced ticket does not exist");
                    TrackbackStatus::Missing
                }
                Err(err) => {
                    warn!(
                        source = %ticket.id,
                        %target,
                        code = %err.code(),
                        error = %err,
                        "failed to load referenced ticket"
                    );
                    TrackbackStatus::Failed {
                        reason: err.to_string(),
                    }
                }
            };
            outcomes.push(DispatchOutcome { target, status });
        }

        DispatchReport {
            source: ticket.id,
            skipped: None,
            outcomes,
        }
    }

    /// Deleted tickets leave their trackbacks in place.
    #[must_use]
    pub const fn on_ticket_deleted(&self, ticket: &Ticket) -> DispatchReport {
        DispatchReport::skipped(ticket.id, SkipReason::Deleted)
    }
}

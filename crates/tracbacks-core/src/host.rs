//! The narrow contract between the listener and the host ticket tracker.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::HostError;
use crate::model::TicketId;

/// Field holding a ticket's description.
pub const DESCRIPTION_FIELD: &str = "description";
/// Field holding the user who opened a ticket.
pub const REPORTER_FIELD: &str = "reporter";

/// A ticket as the host hands it to the listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

impl Ticket {
    #[must_use]
    pub const fn new(id: TicketId) -> Self {
        Self {
            id,
            values: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_value(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    #[must_use]
    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }
}

/// Read/append access to the host's tickets.
pub trait TicketStore {
    /// Load ticket `id`.
    ///
    /// # Errors
    ///
    /// [`HostError::NotFound`] when no such ticket exists; any other variant
    /// for storage failures.
    fn load_ticket(&self, id: TicketId) -> Result<Ticket, HostError>;

    /// Append a comment to `ticket`, attributed to `author`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if the comment could not be persisted.
    fn save_comment(&mut self, ticket: &Ticket, author: &str, text: &str)
    -> Result<(), HostError>;
}

/// One comment in a [`MemoryStore`] ticket's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredComment {
    pub author: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTicket {
    #[serde(default)]
    pub values: BTreeMap<String, String>,
    #[serde(default)]
    pub comments: Vec<StoredComment>,
}

/// A [`TicketStore`] held entirely in memory. Serializes to a JSON-friendly
/// map keyed by ticket number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    tickets: BTreeMap<TicketId, StoredTicket>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace ticket `id` with the given field values.
    pub fn insert<K, V>(&mut self, id: TicketId, values: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        let values = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.tickets.insert(
            id,
            StoredTicket {
                values,
                comments: Vec::new(),
            },
        );
    }

    #[must_use]
    pub fn contains(&self, id: TicketId) -> bool {
        self.tickets.contains_key(&id)
    }

    #[must_use]
    pub fn ticket(&self, id: TicketId) -> Option<&StoredTicket> {
        self.tickets.get(&id)
    }

    /// Comments on ticket `id`, oldest first. Empty for unknown tickets.
    #[must_use]
    pub fn comments(&self, id: TicketId) -> &[StoredComment] {
        self.tickets.get(&id).map_or(&[], |t| t.comments.as_slice())
    }

    pub fn ids(&self) -> impl Iterator<Item = TicketId> + '_ {
        self.tickets.keys().copied()
    }
}

impl TicketStore for MemoryStore {
    fn load_ticket(&self, id: TicketId) -> Result<Ticket, HostError> {
        self.tickets
            .get(&id)
            .map(|stored| Ticket {
                id,
                values: stored.values.clone(),
            })
            .ok_or(HostError::NotFound(id))
    }

    fn save_comment(
        &mut self,
        ticket: &Ticket,
        author: &str,
        text: &str,
    ) -> Result<(), HostError> {
        let stored = self
            .tickets
            .get_mut(&ticket.id)
            .ok_or(HostError::NotFound(ticket.id))?;
        stored.comments.push(StoredComment {
            author: author.to_owned(),
            text: text.to_owned(),
        });
        Ok(())
    }
}

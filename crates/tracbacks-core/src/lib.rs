//! tracbacks-core library.
//!
//! Detects references such as `#123` or `ticket:123` in ticket comments and
//! posts a quoted back-reference ("trackback") on each referenced ticket.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums with stable [`error::ErrorCode`]s; nothing
//!   in the scan path can fail.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod config;
pub mod error;
pub mod host;
pub mod listener;
pub mod model;
pub mod scan;

pub use config::{ExcerptConfig, ScanConfig, TracbackConfig};
pub use error::{ConfigError, ErrorCode, HostError};
pub use host::{MemoryStore, Ticket, TicketStore};
pub use listener::{DispatchReport, SkipReason, TracbackListener, TrackbackStatus};
pub use model::{MAGIC_MARKER, TRACBACK_PREFIX, TicketId, TrackbackMessage, is_trackback};
pub use scan::{ScanResult, Scanner};

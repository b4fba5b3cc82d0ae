//! `tb apply` — append a comment to a stored ticket and post its trackbacks.

use crate::cmd::{read_comment, write_report};
use crate::output::{OutputMode, render};
use crate::store::{load_store, save_store};
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use tracbacks_core::{TicketId, TicketStore, TracbackConfig, TracbackListener};

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// JSON ticket store to read and update.
    #[arg(long, value_name = "FILE")]
    pub store: PathBuf,

    /// Ticket receiving the comment (`12` or `#12`).
    #[arg(short, long)]
    pub ticket: TicketId,

    /// Comment author, also credited on the trackbacks.
    #[arg(short, long)]
    pub author: String,

    /// File holding the comment. Reads stdin when omitted or `-`.
    pub file: Option<PathBuf>,
}

pub fn run_apply(
    args: &ApplyArgs,
    config: &TracbackConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let mut store = load_store(&args.store)?;
    let ticket = store
        .load_ticket(args.ticket)
        .with_context(|| format!("Cannot comment on {}", args.ticket))?;
    let comment = read_comment(args.file.as_deref())?;

    store
        .save_comment(&ticket, &args.author, &comment)
        .with_context(|| format!("Failed to add comment to {}", ticket.id))?;

    let listener = TracbackListener::new(config);
    let report =
        listener.on_ticket_changed(&mut store, &ticket, Some(&comment), &args.author, None);

    save_store(&args.store, &store)?;
    render(output, &report, write_report)
}

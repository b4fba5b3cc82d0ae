//! `tb created` — run the ticket-created hook for a stored ticket.

use crate::cmd::write_report;
use crate::output::{OutputMode, render};
use crate::store::{load_store, save_store};
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use tracbacks_core::{TicketId, TicketStore, TracbackConfig, TracbackListener};

#[derive(Args, Debug)]
pub struct CreatedArgs {
    /// JSON ticket store to read and update.
    #[arg(long, value_name = "FILE")]
    pub store: PathBuf,

    /// The newly created ticket (`12` or `#12`).
    #[arg(short, long)]
    pub ticket: TicketId,
}

pub fn run_created(
    args: &CreatedArgs,
    config: &TracbackConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let mut store = load_store(&args.store)?;
    let ticket = store
        .load_ticket(args.ticket)
        .with_context(|| format!("Cannot run created hook for {}", args.ticket))?;

    let report = TracbackListener::new(config).on_ticket_created(&mut store, &ticket);

    save_store(&args.store, &store)?;
    render(output, &report, write_report)
}

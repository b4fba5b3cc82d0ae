//! `tb scan` — dry-run the reference scanner over one comment.

use crate::cmd::read_comment;
use crate::output::{OutputMode, render};
use clap::Args;
use std::path::PathBuf;
use tracbacks_core::{Scanner, TicketId, TracbackConfig};

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Ticket the comment was written on (`12` or `#12`).
    #[arg(short, long)]
    pub ticket: TicketId,

    /// File holding the comment. Reads stdin when omitted or `-`.
    pub file: Option<PathBuf>,
}

pub fn run_scan(
    args: &ScanArgs,
    config: &TracbackConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let comment = read_comment(args.file.as_deref())?;
    let result = Scanner::new(config.excerpt.clone()).scan(args.ticket, &comment);

    render(output, &result, |r, w| {
        if r.loop_guarded {
            return writeln!(w, "{}: comment is a trackback, nothing to post", r.source);
        }
        if r.references.is_empty() {
            return writeln!(w, "{}: no references", r.source);
        }
        let listed: Vec<String> = r.references.iter().map(ToString::to_string).collect();
        writeln!(w, "references: {}", listed.join(", "))?;
        for pending in &r.trackbacks {
            writeln!(w)?;
            writeln!(w, "--- trackback for {} ---", pending.target)?;
            writeln!(w, "{}", pending.message)?;
        }
        Ok(())
    })
}

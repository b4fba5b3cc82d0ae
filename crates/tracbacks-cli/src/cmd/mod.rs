pub mod apply;
pub mod created;
pub mod scan;

use anyhow::{Context, Result};
use std::io::{self, Read, Write};
use std::path::Path;
use tracbacks_core::listener::{DispatchReport, SkipReason, TrackbackStatus};

/// Read a comment body from `file`, or stdin when absent or `-`.
pub fn read_comment(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read comment from {}", path.display())),
        _ => {
            let mut body = String::new();
            io::stdin()
                .read_to_string(&mut body)
                .context("Failed to read comment from stdin")?;
            Ok(body)
        }
    }
}

const fn skip_label(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::Disabled => "scanning is disabled",
        SkipReason::NoComment => "no comment text",
        SkipReason::LoopGuard => "comment is a trackback",
        SkipReason::Deleted => "ticket was deleted",
    }
}

/// Human rendering of a [`DispatchReport`].
pub fn write_report(report: &DispatchReport, w: &mut dyn Write) -> io::Result<()> {
    let source = report.source;
    if let Some(reason) = report.skipped {
        return writeln!(w, "{source}: skipped ({})", skip_label(reason));
    }
    if report.outcomes.is_empty() {
        return writeln!(w, "{source}: no references");
    }
    for outcome in &report.outcomes {
        let target = outcome.target;
        match &outcome.status {
            TrackbackStatus::Posted => writeln!(w, "{source}: posted trackback on {target}")?,
            TrackbackStatus::Missing => writeln!(w, "{source}: {target} does not exist, skipped")?,
            TrackbackStatus::Failed { reason } => {
                writeln!(w, "{source}: failed on {target}: {reason}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracbacks_core::TicketId;
    use tracbacks_core::listener::DispatchOutcome;

    fn rendered(report: &DispatchReport) -> String {
        let mut buf = Vec::new();
        write_report(report, &mut buf).expect("write");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn report_lists_each_outcome() {
        let report = DispatchReport {
            source: TicketId(1),
            skipped: None,
            outcomes: vec![
                DispatchOutcome {
                    target: TicketId(2),
                    status: TrackbackStatus::Posted,
                },
                DispatchOutcome {
                    target: TicketId(3),
                    status: TrackbackStatus::Missing,
                },
            ],
        };
        assert_eq!(
            rendered(&report),
            "#1: posted trackback on #2\n#1: #3 does not exist, skipped\n"
        );
    }

    #[test]
    fn skipped_report_names_reason() {
        let report = DispatchReport {
            source: TicketId(4),
            skipped: Some(SkipReason::LoopGuard),
            outcomes: Vec::new(),
        };
        assert_eq!(rendered(&report), "#4: skipped (comment is a trackback)\n");
    }
}

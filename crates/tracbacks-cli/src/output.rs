//! Shared output layer: human text or stable JSON for every command.

use serde::Serialize;
use std::io::{self, Write};
use tracbacks_core::{ConfigError, ErrorCode, HostError};

/// The output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Render `value` as pretty JSON, or through `human` for terminal output.
pub fn render<T, F>(mode: OutputMode, value: &T, human: F) -> anyhow::Result<()>
where
    T: Serialize,
    F: FnOnce(&T, &mut dyn Write) -> io::Result<()>,
{
    let stdout = io::stdout();
    let mut w = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut w, value)?;
            writeln!(w)?;
        }
        OutputMode::Human => human(value, &mut w)?,
    }
    w.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct ErrorOutput<'a> {
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<&'a str>,
}

/// Best-effort machine code for an error chain.
pub fn error_code(err: &anyhow::Error) -> ErrorCode {
    err.chain()
        .find_map(|cause| {
            cause
                .downcast_ref::<HostError>()
                .map(HostError::code)
                .or_else(|| cause.downcast_ref::<ConfigError>().map(ConfigError::code))
        })
        .unwrap_or(ErrorCode::InternalUnexpected)
}

/// Report a failed command on stderr.
pub fn render_error(mode: OutputMode, err: &anyhow::Error) -> anyhow::Result<()> {
    let code = error_code(err);
    let stderr = io::stderr();
    let mut w = stderr.lock();
    match mode {
        OutputMode::Json => {
            let out = ErrorOutput {
                error: format!("{err:#}"),
                code: code.code(),
                hint: code.hint(),
            };
            serde_json::to_writer(&mut w, &out)?;
            writeln!(w)?;
        }
        OutputMode::Human => {
            writeln!(w, "error[{code}]: {err:#}")?;
            if let Some(hint) = code.hint() {
                writeln!(w, "hint: {hint}")?;
            }
        }
    }
    w.flush()?;
    Ok(())
}

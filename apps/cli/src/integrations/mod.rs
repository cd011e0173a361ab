//! # Integrations
//!
//! Collaborators outside the process: the document viewer and the printer.
//!
//! ```text
//! workflow::generate() ──► Invoice_0007.pdf
//!                               │
//!            ┌──────────────────┴──────────────────┐
//!            ▼                                     ▼
//!   Previewer                              PrintBackend
//!   ├── TextPreview  (stdout)              ├── LpBackend      (lpstat / lp)
//!   └── SystemViewer (xdg-open/open/start) └── SpoolerBackend (PowerShell)
//! ```
//!
//! Failures here surface as [`IntegrationError`]. They never touch the draft
//! or the document that was already written.

pub mod preview;
pub mod print;

use std::io;
use std::process::Command;

use thiserror::Error;
use tracing::debug;

pub use preview::{Previewer, SystemViewer, TextPreview};
pub use print::{resolve_printer, select_backend, LpBackend, PrintBackend, SpoolerBackend};

#[derive(Debug, Error)]
pub enum IntegrationError {
    /// The helper program could not be started (usually not installed).
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The helper program ran and reported failure.
    #[error("{program} failed ({status}): {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("Preview failed: {0}")]
    Preview(String),
}

pub type IntegrationResult<T> = Result<T, IntegrationError>;

/// Runs a helper program to completion and returns its stdout.
pub(crate) fn run_command(program: &str, args: &[&str]) -> IntegrationResult<String> {
    debug!(program, ?args, "Running helper");

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| IntegrationError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(IntegrationError::Failed {
            program: program.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_spawn_error() {
        let err = run_command("invoicer-no-such-helper-program", &[]).unwrap_err();
        assert!(matches!(err, IntegrationError::Spawn { .. }));
    }
}

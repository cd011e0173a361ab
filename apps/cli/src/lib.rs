//! # Invoicer CLI
//!
//! Command-line shell around the invoicer crates.
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        invoicer (this crate)                            │
//! │                                                                         │
//! │  main.rs ────► parse args, init tracing, map AppError to exit code     │
//! │                                                                         │
//! │  commands/ ──► new, show, item, set, generate, preview, print, ...     │
//! │                                                                         │
//! │  workflow.rs ► validate ─► compute ─► assemble ─► write ─► log         │
//! │                                                                         │
//! │  state/ ─────► ConfigState (toml + env), Session (draft file)          │
//! │                                                                         │
//! │  integrations/ ► Previewer, PrintBackend (OS processes)                │
//! │                                                                         │
//! │  output.rs ──► text tables or --format json                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//!                                  │
//!             ┌────────────────────┼────────────────────┐
//!             ▼                    ▼                    ▼
//!      invoicer-core        invoicer-store       invoicer-document
//!      (money, totals,      (record log,         (layout, PDF)
//!       validation)          numbering)
//! ```
//!
//! ## Typical Session
//! ```text
//! $ invoicer new --buyer-name "Globex Ltd" --buyer-address "4 Harbour Street"
//! $ invoicer item add -d Widget -q 2 -p 10.00
//! $ invoicer item add -d Service -q 1 -p 50.00
//! $ invoicer generate
//! Invoice saved to: invoices/Invoice_0001.pdf (1 page)
//! ```

pub mod commands;
pub mod error;
pub mod integrations;
pub mod output;
pub mod state;
pub mod workflow;

use tracing_subscriber::EnvFilter;

pub use commands::{Cli, OutputFormat};
pub use error::{AppError, ErrorCode};

/// Runs a parsed command line.
pub fn run(cli: Cli) -> Result<(), AppError> {
    commands::execute(cli)
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so stdout carries only command output.
///
/// ## Log Levels
/// - Default: warnings, plus info from the invoicer crates
/// - `-v`: debug from the invoicer crates
/// - `RUST_LOG` overrides both, e.g. `RUST_LOG=invoicer_store=trace`
pub fn init_tracing(verbose: bool) {
    let default = if verbose {
        "warn,invoicer=debug"
    } else {
        "warn,invoicer=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

//! # CLI Commands Module
//!
//! Argument definitions and dispatch for the `invoicer` binary.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (Cli, dispatch, AppContext)
//! ├── draft.rs    ◄─── new, show, set, reset
//! ├── item.rs     ◄─── item add / edit / remove / clear
//! └── invoice.rs  ◄─── generate, preview, print, printers, next-number, history, amount
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  $ invoicer item add -d Widget -q 2 -p 10.00                            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Cli::parse()  ──►  AppContext::from_cli()                              │
//! │                       config.toml ◄ INVOICER_* ◄ --output-dir           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  item::run(&ctx, cmd) -> Result<ItemChange, AppError>                   │
//! │         │   load session ─► validate + mutate ─► save session           │
//! │         ▼                                                               │
//! │  output::emit(format, &view, render_text)                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  stdout: text table, or JSON with --format json                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers return data; only [`execute`] prints.

pub mod draft;
pub mod invoice;
pub mod item;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use invoicer_core::CurrencyFormat;
use invoicer_document::LayoutOptions;
use invoicer_store::Store;

use crate::error::AppError;
use crate::integrations::{select_backend, SystemViewer, TextPreview};
use crate::output;
use crate::state::{ConfigState, Session};

/// Invoice drafting and PDF generation
#[derive(Parser, Debug)]
#[command(name = "invoicer")]
#[command(version)]
#[command(about = "Draft invoices, compute totals and generate numbered PDF documents")]
#[command(long_about = "Draft invoices, compute totals and generate numbered PDF documents.\n\n\
    The draft lives in a JSON file between commands. `generate` writes \
    Invoice_NNNN.pdf into the output directory, appends a row to invoices.csv \
    and moves the draft on to the next invoice number.")]
pub struct Cli {
    /// Draft file (default: invoice-draft.json)
    #[arg(long, global = true)]
    pub draft: Option<PathBuf>,

    /// Directory for documents and the record log (env: INVOICER_OUTPUT_DIR)
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Config file (env: INVOICER_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a new draft with the next invoice number
    New {
        #[arg(long)]
        buyer_name: Option<String>,

        #[arg(long)]
        buyer_address: Option<String>,

        /// Tax percentage (default from config)
        #[arg(long, allow_hyphen_values = true)]
        tax: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        /// Replace an existing draft
        #[arg(long)]
        force: bool,
    },

    /// Show the draft and its totals
    Show,

    /// Edit line items
    #[command(subcommand)]
    Item(item::ItemCommands),

    /// Edit draft details
    Set(draft::SetArgs),

    /// Write the PDF, log it, and advance the invoice number
    Generate,

    /// Generate, then show the document
    Preview {
        /// Open the PDF in the system viewer instead of printing page 1 as text
        #[arg(long)]
        open: bool,
    },

    /// Generate, then send the document to a printer
    Print {
        /// Printer name (default: configured printer, then system default)
        #[arg(short, long)]
        printer: Option<String>,
    },

    /// List available printers
    Printers,

    /// Show the number the next invoice will get
    NextNumber,

    /// List logged invoices
    History,

    /// Show an amount formatted with the configured currency
    Amount {
        /// Amount text, e.g. 1234.5 or ₹1,234.50
        #[arg(allow_hyphen_values = true)]
        text: String,
    },

    /// Start over with an empty draft (keeps seller info)
    Reset,
}

// =============================================================================
// Context
// =============================================================================

/// Everything a handler needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: ConfigState,
    pub store: Store,
    pub draft_path: PathBuf,
}

impl AppContext {
    /// Loads configuration and applies command-line overrides.
    pub fn from_cli(cli: &Cli) -> Result<Self, AppError> {
        let mut config = ConfigState::load(cli.config.as_deref())?;
        if let Some(dir) = &cli.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(path) = &cli.draft {
            config.draft_path = path.clone();
        }
        Ok(AppContext::new(config))
    }

    pub fn new(config: ConfigState) -> Self {
        AppContext {
            store: Store::new(config.store_config()),
            draft_path: config.draft_path.clone(),
            config,
        }
    }

    pub fn load_session(&self) -> Result<Session, AppError> {
        Ok(Session::load(&self.draft_path)?)
    }

    pub fn currency(&self) -> Result<CurrencyFormat, AppError> {
        Ok(self.config.currency()?)
    }

    pub fn layout_options(&self) -> Result<LayoutOptions, AppError> {
        Ok(self.config.layout_options()?)
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Runs the parsed command and prints its result.
pub fn execute(cli: Cli) -> Result<(), AppError> {
    let ctx = AppContext::from_cli(&cli)?;
    let format = cli.format;
    debug!(
        draft = %ctx.draft_path.display(),
        output_dir = %ctx.store.output_dir().display(),
        "Context ready"
    );

    let currency = ctx.currency()?;

    match cli.command {
        Commands::New {
            buyer_name,
            buyer_address,
            tax,
            notes,
            force,
        } => {
            let view = draft::new(
                &ctx,
                draft::NewArgs {
                    buyer_name,
                    buyer_address,
                    tax,
                    notes,
                    force,
                },
            )?;
            output::emit(format, &view, || output::render_draft(&view, &currency))
        }
        Commands::Show => {
            let view = draft::show(&ctx)?;
            output::emit(format, &view, || output::render_draft(&view, &currency))
        }
        Commands::Item(cmd) => {
            let change = item::run(&ctx, cmd)?;
            output::emit(format, &change, || output::render_item_change(&change, &currency))
        }
        Commands::Set(args) => {
            let view = draft::set(&ctx, args)?;
            output::emit(format, &view, || output::render_draft(&view, &currency))
        }
        Commands::Generate => {
            let outcome = invoice::generate(&ctx)?;
            output::warn_record(&outcome);
            output::emit(format, &outcome, || output::render_generated(&outcome, &currency))
        }
        Commands::Preview { open } => {
            if open {
                let outcome = invoice::preview(&ctx, &mut SystemViewer)?;
                output::warn_record(&outcome);
                return output::emit(format, &outcome, || {
                    output::render_generated(&outcome, &currency)
                });
            }

            match format {
                OutputFormat::Text => {
                    let outcome = invoice::preview(&ctx, &mut TextPreview::stdout())?;
                    output::warn_record(&outcome);
                    Ok(())
                }
                OutputFormat::Json => {
                    let mut previewer = TextPreview::new(Vec::new());
                    let outcome = invoice::preview(&ctx, &mut previewer)?;
                    output::warn_record(&outcome);
                    let page = String::from_utf8_lossy(&previewer.into_inner()).into_owned();
                    output::print_json(&invoice::PreviewView {
                        outcome,
                        preview: Some(page),
                    })
                }
            }
        }
        Commands::Print { printer } => {
            let backend = select_backend();
            let job = invoice::print(&ctx, backend.as_ref(), printer.as_deref())?;
            output::warn_record(&job.outcome);
            output::emit(format, &job, || output::render_print_job(&job, &currency))
        }
        Commands::Printers => {
            let backend = select_backend();
            let view = invoice::printers(backend.as_ref())?;
            output::emit(format, &view, || output::render_printers(&view))
        }
        Commands::NextNumber => {
            let view = invoice::next_number(&ctx);
            output::emit(format, &view, || view.label.clone())
        }
        Commands::History => {
            let records = invoice::history(&ctx)?;
            output::emit(format, &records, || output::render_history(&records, &currency))
        }
        Commands::Amount { text } => {
            let view = invoice::amount(&ctx, &text)?;
            output::emit(format, &view, || view.formatted.clone())
        }
        Commands::Reset => {
            let view = draft::reset(&ctx)?;
            output::emit(format, &view, || output::render_draft(&view, &currency))
        }
    }
}

/// Turns literal `\n` sequences typed on the command line into newlines.
pub(crate) fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

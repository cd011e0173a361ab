//! Invoicer entry point.
//!
//! Usage:
//!   invoicer new           - Start a draft with the next invoice number
//!   invoicer item add      - Add a line item
//!   invoicer show          - Show the draft and totals
//!   invoicer generate      - Write Invoice_NNNN.pdf and log it
//!   invoicer preview       - Generate, then show page 1
//!   invoicer print         - Generate, then print
//!   invoicer history       - List logged invoices

use std::process::ExitCode;

use clap::Parser;
use invoicer_cli_lib::{output, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    invoicer_cli_lib::init_tracing(cli.verbose);

    let format = cli.format;
    match invoicer_cli_lib::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&e, format);
            ExitCode::from(e.exit_code())
        }
    }
}

//! # Printing
//!
//! Sends a generated document to a printer through the platform's own tools.
//!
//! ## Backend Selection
//! ```text
//! select_backend()
//!   ├── Windows ──► SpoolerBackend
//!   │                 list:    Get-Printer
//!   │                 default: Win32_Printer where Default=true
//!   │                 print:   Start-Process -Verb PrintTo
//!   └── otherwise ─► LpBackend
//!                     list:    lpstat -a
//!                     default: lpstat -d
//!                     print:   lp [-d printer] file
//! ```
//!
//! ## Printer Resolution
//! `--printer NAME` wins, then the configured printer, then whatever the
//! backend reports as the system default. With none of those the job goes
//! to the spooler without a destination and the OS picks.

use std::path::Path;

use tracing::{info, warn};

use super::{run_command, IntegrationResult};

/// A way to enumerate printers and submit jobs.
pub trait PrintBackend {
    /// Short name for logs and `printers` output.
    fn name(&self) -> &'static str;

    fn list_printers(&self) -> IntegrationResult<Vec<String>>;

    /// The system default printer, if one is set.
    fn default_printer(&self) -> IntegrationResult<Option<String>>;

    /// Submits `path` to `printer`, or to the system default when `None`.
    fn print(&self, path: &Path, printer: Option<&str>) -> IntegrationResult<()>;
}

/// Picks the backend for the platform this binary was built for.
pub fn select_backend() -> Box<dyn PrintBackend> {
    if cfg!(windows) {
        Box::new(SpoolerBackend)
    } else {
        Box::new(LpBackend)
    }
}

/// Chooses the destination printer.
pub fn resolve_printer(
    requested: Option<&str>,
    configured: Option<&str>,
    backend: &dyn PrintBackend,
) -> Option<String> {
    if let Some(name) = requested.or(configured) {
        return Some(name.to_string());
    }

    match backend.default_printer() {
        Ok(default) => default,
        Err(e) => {
            warn!(backend = backend.name(), "Cannot query default printer: {}", e);
            None
        }
    }
}

// =============================================================================
// CUPS / lp
// =============================================================================

/// Unix printing through the CUPS command-line tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct LpBackend;

impl PrintBackend for LpBackend {
    fn name(&self) -> &'static str {
        "lp"
    }

    fn list_printers(&self) -> IntegrationResult<Vec<String>> {
        run_command("lpstat", &["-a"]).map(|out| parse_lpstat_printers(&out))
    }

    fn default_printer(&self) -> IntegrationResult<Option<String>> {
        run_command("lpstat", &["-d"]).map(|out| parse_lpstat_default(&out))
    }

    fn print(&self, path: &Path, printer: Option<&str>) -> IntegrationResult<()> {
        let file = path.to_string_lossy();
        let mut args = Vec::new();
        if let Some(name) = printer {
            args.push("-d");
            args.push(name);
        }
        args.push(file.as_ref());

        let out = run_command("lp", &args)?;
        info!(path = %path.display(), printer = ?printer, "Print job submitted: {}", out.trim());
        Ok(())
    }
}

/// Printer names from `lpstat -a`, one per line:
/// `Office_Laser accepting requests since Mon 19 Oct 2026`.
pub fn parse_lpstat_printers(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// Default printer from `lpstat -d`:
/// `system default destination: Office_Laser` or
/// `no system default destination`.
pub fn parse_lpstat_default(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let (label, name) = line.split_once(':')?;
        if !label.trim().ends_with("default destination") {
            return None;
        }
        Some(name.trim().to_string()).filter(|n| !n.is_empty())
    })
}

// =============================================================================
// Windows Spooler
// =============================================================================

/// Windows printing through the print spooler, driven by PowerShell.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpoolerBackend;

impl SpoolerBackend {
    fn powershell(script: &str) -> IntegrationResult<String> {
        run_command(
            "powershell",
            &["-NoProfile", "-NonInteractive", "-Command", script],
        )
    }
}

impl PrintBackend for SpoolerBackend {
    fn name(&self) -> &'static str {
        "spooler"
    }

    fn list_printers(&self) -> IntegrationResult<Vec<String>> {
        Self::powershell("Get-Printer | Select-Object -ExpandProperty Name")
            .map(|out| non_empty_lines(&out))
    }

    fn default_printer(&self) -> IntegrationResult<Option<String>> {
        Self::powershell(
            "Get-CimInstance -ClassName Win32_Printer -Filter 'Default=true' | Select-Object -ExpandProperty Name",
        )
        .map(|out| non_empty_lines(&out).into_iter().next())
    }

    fn print(&self, path: &Path, printer: Option<&str>) -> IntegrationResult<()> {
        let script = print_to_script(path, printer);
        Self::powershell(&script)?;
        info!(path = %path.display(), printer = ?printer, "Print job submitted");
        Ok(())
    }
}

/// `Start-Process` command handing the file to its registered print verb.
fn print_to_script(path: &Path, printer: Option<&str>) -> String {
    let file = ps_quote(&path.to_string_lossy());
    match printer {
        Some(name) => format!(
            "Start-Process -FilePath {} -Verb PrintTo -ArgumentList {} -Wait",
            file,
            ps_quote(&format!("\"{}\"", name))
        ),
        None => format!("Start-Process -FilePath {} -Verb Print -Wait", file),
    }
}

/// Single-quoted PowerShell literal.
fn ps_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

fn non_empty_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

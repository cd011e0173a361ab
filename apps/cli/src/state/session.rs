//! # Session State
//!
//! The draft invoice being edited, persisted between commands as JSON.
//!
//! ## Session Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Operations                                   │
//! │                                                                         │
//! │  CLI Command              Session Method          Draft Change          │
//! │  ───────────              ──────────────          ────────────          │
//! │                                                                         │
//! │  new ────────────────────► create() ────────────► fresh draft          │
//! │                                                                         │
//! │  item add ───────────────► add_item() ──────────► items.push(item)     │
//! │                                                                         │
//! │  item edit 2 ────────────► edit_item() ─────────► items[1] = edited    │
//! │                                                                         │
//! │  item remove 2 ──────────► remove_item() ───────► items.remove(1)      │
//! │                                                                         │
//! │  item clear ─────────────► clear_items() ───────► items.clear()        │
//! │                                                                         │
//! │  show ───────────────────► totals() ────────────► (read only)          │
//! │                                                                         │
//! │  reset ──────────────────► reset() ─────────────► empty draft, next #  │
//! │                                                                         │
//! │  Every mutation validates first; on error the draft is untouched.      │
//! │  The command layer calls save() only after a mutation succeeded.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use invoicer_core::validation::{
    parse_quantity, parse_unit_price, validate_description, validate_line_item,
};
use invoicer_core::{
    compute, ComputedTotals, CoreError, CoreResult, CurrencyFormat, InvoiceDraft, LineItem,
    TaxRate,
};

/// Draft file errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No draft at {}; run `invoicer new` first", path.display())]
    Missing { path: PathBuf },

    #[error("Cannot read draft {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Draft {} is not valid: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot save draft {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("A draft already exists at {}; use --force to replace it", path.display())]
    Exists { path: PathBuf },
}

/// Field changes for `item edit`. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ItemEdit {
    pub description: Option<String>,
    pub quantity: Option<String>,
    pub unit_price: Option<String>,
}

/// A draft bound to the file it lives in.
#[derive(Debug, Clone)]
pub struct Session {
    path: PathBuf,
    draft: InvoiceDraft,
}

impl Session {
    /// Starts a session for a fresh draft.
    ///
    /// Refuses to replace an existing draft file unless `force` is set.
    /// Nothing is written until [`Session::save`].
    pub fn create(
        path: impl Into<PathBuf>,
        draft: InvoiceDraft,
        force: bool,
    ) -> Result<Self, SessionError> {
        let path = path.into();
        if path.exists() && !force {
            return Err(SessionError::Exists { path });
        }
        Ok(Session { path, draft })
    }

    /// Loads the draft stored at `path`.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SessionError::Missing { path })
            }
            Err(source) => return Err(SessionError::Read { path, source }),
        };

        let draft = serde_json::from_slice(&bytes)
            .map_err(|source| SessionError::Parse {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), "Loaded draft");
        Ok(Session { path, draft })
    }

    /// Writes the draft through a temp file and rename.
    pub fn save(&self) -> Result<(), SessionError> {
        let save_err = |source: io::Error| SessionError::Save {
            path: self.path.clone(),
            source,
        };

        let json = serde_json::to_vec_pretty(&self.draft)
            .map_err(|e| save_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(save_err)?;
        tmp.write_all(&json).map_err(save_err)?;
        tmp.write_all(b"\n").map_err(save_err)?;
        tmp.persist(&self.path).map_err(|e| save_err(e.error))?;

        debug!(path = %self.path.display(), sequence_number = self.draft.sequence_number, "Saved draft");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn draft(&self) -> &InvoiceDraft {
        &self.draft
    }

    /// Direct access for metadata edits (`set`). Callers validate first.
    pub fn draft_mut(&mut self) -> &mut InvoiceDraft {
        &mut self.draft
    }

    /// Live totals for the current items and tax rate.
    pub fn totals(&self) -> ComputedTotals {
        compute(&self.draft.items, self.draft.tax_rate)
    }

    /// Validates and appends a line item.
    ///
    /// `unit_price` may carry the configured currency symbol.
    ///
    /// ## Returns
    /// - `Ok(&LineItem)` the stored item
    /// - `Err(CoreError::Validation)` for bad description, quantity or price
    pub fn add_item(
        &mut self,
        description: &str,
        quantity: &str,
        unit_price: &str,
        currency: &CurrencyFormat,
    ) -> CoreResult<&LineItem> {
        let item = validate_line_item(description, quantity, unit_price, currency)?;
        self.draft.items.push(item);

        let index = self.draft.items.len() - 1;
        Ok(&self.draft.items[index])
    }

    /// Replaces fields of item `index` (1-based).
    ///
    /// All given fields are validated before any is applied.
    pub fn edit_item(
        &mut self,
        index: usize,
        edit: ItemEdit,
        currency: &CurrencyFormat,
    ) -> CoreResult<&LineItem> {
        let slot = self.slot(index)?;
        let current = &self.draft.items[slot];

        let description = match edit.description.as_deref() {
            Some(text) => validate_description(text)?,
            None => current.description.clone(),
        };
        let quantity = match edit.quantity.as_deref() {
            Some(text) => parse_quantity(text)?,
            None => current.quantity,
        };
        let unit_price = match edit.unit_price.as_deref() {
            Some(text) => parse_unit_price(text, currency)?,
            None => current.unit_price,
        };

        self.draft.items[slot] = LineItem::new(description, quantity, unit_price);
        Ok(&self.draft.items[slot])
    }

    /// Removes item `index` (1-based) and returns it.
    pub fn remove_item(&mut self, index: usize) -> CoreResult<LineItem> {
        let slot = self.slot(index)?;
        Ok(self.draft.items.remove(slot))
    }

    /// Removes every item; returns how many there were.
    pub fn clear_items(&mut self) -> usize {
        let count = self.draft.items.len();
        self.draft.items.clear();
        count
    }

    /// Replaces the draft with an empty one for the next invoice.
    ///
    /// Keeps the seller block; buyer, items and notes are cleared.
    pub fn reset(&mut self, sequence_number: u32, date: NaiveDate, tax_rate: TaxRate) {
        let seller_info = std::mem::take(&mut self.draft.seller_info);
        self.draft = InvoiceDraft::new(sequence_number, date, seller_info, tax_rate);
        info!(sequence_number, "Draft reset");
    }

    /// Maps a 1-based index onto the item vector.
    fn slot(&self, index: usize) -> CoreResult<usize> {
        let count = self.draft.items.len();
        if index == 0 || index > count {
            return Err(CoreError::ItemNotFound { index, count });
        }
        Ok(index - 1)
    }
}

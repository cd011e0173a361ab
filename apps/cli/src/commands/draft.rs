//! Draft commands: `new`, `show`, `set`, `reset`.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Args;
use serde::Serialize;
use tracing::info;

use invoicer_core::validation::{parse_date, validate_sequence_number, validate_tax_percent};
use invoicer_core::{ComputedTotals, InvoiceDraft};

use super::{unescape_newlines, AppContext};
use crate::error::AppError;
use crate::state::{Session, SessionError};

/// Arguments of `new`.
#[derive(Debug, Clone, Default)]
pub struct NewArgs {
    pub buyer_name: Option<String>,
    pub buyer_address: Option<String>,
    pub tax: Option<String>,
    pub notes: Option<String>,
    pub force: bool,
}

/// Arguments of `set`. Omitted flags leave the field as it is.
#[derive(Args, Debug, Clone, Default)]
pub struct SetArgs {
    /// Seller block; `\n` starts a new line
    #[arg(long)]
    pub seller: Option<String>,

    #[arg(long)]
    pub buyer_name: Option<String>,

    /// Buyer address; `\n` starts a new line
    #[arg(long)]
    pub buyer_address: Option<String>,

    /// Tax percentage
    #[arg(long, allow_hyphen_values = true)]
    pub tax: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Invoice date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Invoice number
    #[arg(long)]
    pub number: Option<u32>,
}

/// A draft with its live totals.
#[derive(Debug, Clone, Serialize)]
pub struct DraftView {
    pub path: PathBuf,
    pub draft: InvoiceDraft,
    pub totals: ComputedTotals,
}

impl DraftView {
    pub fn of(session: &Session) -> Self {
        DraftView {
            path: session.path().to_path_buf(),
            draft: session.draft().clone(),
            totals: session.totals(),
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Creates a draft numbered by the sequence allocator and dated today.
pub fn new(ctx: &AppContext, args: NewArgs) -> Result<DraftView, AppError> {
    let tax_rate = match args.tax.as_deref() {
        Some(text) => validate_tax_percent(text)?,
        None => ctx.config.default_tax_rate(),
    };

    let number = ctx.store.sequence().next_number();
    let mut draft = InvoiceDraft::new(number, today(), ctx.config.seller_info.clone(), tax_rate);
    if let Some(name) = args.buyer_name {
        draft.buyer_name = name.trim().to_string();
    }
    if let Some(address) = args.buyer_address {
        draft.buyer_address = unescape_newlines(address.trim());
    }
    if let Some(notes) = args.notes {
        draft.notes = unescape_newlines(notes.trim());
    }

    let session = Session::create(&ctx.draft_path, draft, args.force)?;
    session.save()?;

    info!(sequence_number = number, path = %session.path().display(), "Draft created");
    Ok(DraftView::of(&session))
}

pub fn show(ctx: &AppContext) -> Result<DraftView, AppError> {
    let session = ctx.load_session()?;
    Ok(DraftView::of(&session))
}

/// Updates draft details. Every given value is checked before any is
/// applied.
pub fn set(ctx: &AppContext, args: SetArgs) -> Result<DraftView, AppError> {
    let mut session = ctx.load_session()?;

    let tax_rate = args.tax.as_deref().map(validate_tax_percent).transpose()?;
    let date = args.date.as_deref().map(parse_date).transpose()?;
    if let Some(number) = args.number {
        validate_sequence_number(number)?;
    }

    let draft = session.draft_mut();
    if let Some(seller) = args.seller {
        draft.seller_info = unescape_newlines(seller.trim());
    }
    if let Some(name) = args.buyer_name {
        draft.buyer_name = name.trim().to_string();
    }
    if let Some(address) = args.buyer_address {
        draft.buyer_address = unescape_newlines(address.trim());
    }
    if let Some(notes) = args.notes {
        draft.notes = unescape_newlines(notes.trim());
    }
    if let Some(rate) = tax_rate {
        draft.tax_rate = rate;
    }
    if let Some(date) = date {
        draft.date = date;
    }
    if let Some(number) = args.number {
        draft.sequence_number = number;
    }

    session.save()?;
    Ok(DraftView::of(&session))
}

/// Replaces the draft with an empty one for the next number, keeping the
/// seller block. Starts a fresh draft if there is none.
pub fn reset(ctx: &AppContext) -> Result<DraftView, AppError> {
    let mut session = match Session::load(&ctx.draft_path) {
        Ok(session) => session,
        Err(SessionError::Missing { .. }) => {
            let draft = InvoiceDraft::new(
                0,
                today(),
                ctx.config.seller_info.clone(),
                ctx.config.default_tax_rate(),
            );
            Session::create(&ctx.draft_path, draft, true)?
        }
        Err(e) => return Err(e.into()),
    };

    let number = ctx.store.sequence().next_number();
    session.reset(number, today(), ctx.config.default_tax_rate());
    session.save()?;
    Ok(DraftView::of(&session))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::context;
    use crate::error::ErrorCode;
    use invoicer_core::{InvoiceRecord, Money};
    use tempfile::TempDir;

    fn new_args(buyer: &str) -> NewArgs {
        NewArgs {
            buyer_name: Some(buyer.to_string()),
            buyer_address: Some("4 Harbour Street".to_string()),
            ..NewArgs::default()
        }
    }

    #[test]
    fn test_new_uses_config_and_allocator() {
        let tmp = TempDir::new().unwrap();
        let ctx = context(&tmp);

        let view = new(&ctx, new_args("Globex Ltd")).unwrap();
        assert_eq!(view.draft.sequence_number, 1);
        assert_eq!(view.draft.seller_info, "Acme Traders\nMumbai");
        assert_eq!(view.draft.tax_rate.bps(), 1800);
        assert_eq!(view.draft.buyer_name, "Globex Ltd");
        assert!(view.totals.grand_total.is_zero());
        assert!(ctx.draft_path.exists());
    }

    #[test]
    fn test_new_continues_from_log() {
        let tmp = TempDir::new().unwrap();
        let ctx = context(&tmp);
        ctx.store
            .records()
            .append(&InvoiceRecord {
                sequence_number: 7,
                date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
                buyer: "Initech".to_string(),
                subtotal: Money::from_cents(100),
                tax: Money::from_cents(18),
                total: Money::from_cents(118),
            })
            .unwrap();

        let view = new(&ctx, new_args("Globex Ltd")).unwrap();
        assert_eq!(view.draft.sequence_number, 8);
    }

    #[test]
    fn test_new_refuses_to_overwrite() {
        let tmp = TempDir::new().unwrap();
        let ctx = context(&tmp);
        new(&ctx, new_args("Globex Ltd")).unwrap();

        let err = new(&ctx, new_args("Initech")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(show(&ctx).unwrap().draft.buyer_name, "Globex Ltd");

        let args = NewArgs {
            force: true,
            ..new_args("Initech")
        };
        assert_eq!(new(&ctx, args).unwrap().draft.buyer_name, "Initech");
    }

    #[test]
    fn test_new_with_bad_tax_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let ctx = context(&tmp);
        let args = NewArgs {
            tax: Some("-5".to_string()),
            ..new_args("Globex Ltd")
        };

        let err = new(&ctx, args).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(!ctx.draft_path.exists());
    }

    #[test]
    fn test_show_without_draft() {
        let tmp = TempDir::new().unwrap();
        let err = show(&context(&tmp)).unwrap_err();
        assert_eq!(err.code, ErrorCode::DraftError);
    }

    #[test]
    fn test_set_is_all_or_nothing() {
        let tmp = TempDir::new().unwrap();
        let ctx = context(&tmp);
        new(&ctx, new_args("Globex Ltd")).unwrap();

        let err = set(
            &ctx,
            SetArgs {
                buyer_name: Some("Initech".to_string()),
                date: Some("19/10/2026".to_string()),
                ..SetArgs::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(show(&ctx).unwrap().draft.buyer_name, "Globex Ltd");

        let view = set(
            &ctx,
            SetArgs {
                seller: Some("Acme\\nPune".to_string()),
                tax: Some("5".to_string()),
                date: Some("2026-11-01".to_string()),
                number: Some(42),
                ..SetArgs::default()
            },
        )
        .unwrap();
        assert_eq!(view.draft.seller_info, "Acme\nPune");
        assert_eq!(view.draft.tax_rate.bps(), 500);
        assert_eq!(view.draft.date, NaiveDate::from_ymd_opt(2026, 11, 1).unwrap());
        assert_eq!(view.draft.sequence_number, 42);
        assert_eq!(show(&ctx).unwrap().draft.sequence_number, 42);
    }

    #[test]
    fn test_set_rejects_zero_number() {
        let tmp = TempDir::new().unwrap();
        let ctx = context(&tmp);
        new(&ctx, new_args("Globex Ltd")).unwrap();

        let args = SetArgs {
            number: Some(0),
            ..SetArgs::default()
        };
        assert_eq!(set(&ctx, args).unwrap_err().code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_reset_keeps_seller_and_clears_buyer() {
        let tmp = TempDir::new().unwrap();
        let ctx = context(&tmp);
        new(&ctx, new_args("Globex Ltd")).unwrap();
        set(
            &ctx,
            SetArgs {
                seller: Some("Custom Seller".to_string()),
                tax: Some("5".to_string()),
                ..SetArgs::default()
            },
        )
        .unwrap();

        let view = reset(&ctx).unwrap();
        assert_eq!(view.draft.seller_info, "Custom Seller");
        assert!(view.draft.buyer_name.is_empty());
        assert_eq!(view.draft.tax_rate.bps(), 1800);
        assert_eq!(view.draft.sequence_number, 1);
    }

    #[test]
    fn test_reset_without_draft_starts_one() {
        let tmp = TempDir::new().unwrap();
        let ctx = context(&tmp);

        let view = reset(&ctx).unwrap();
        assert_eq!(view.draft.sequence_number, 1);
        assert_eq!(view.draft.seller_info, "Acme Traders\nMumbai");
        assert!(ctx.draft_path.exists());
    }
}

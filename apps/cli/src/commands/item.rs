//! Line item commands: `item add | edit | remove | clear`.
//!
//! Indices are 1-based, matching the `#` column on the document.

use clap::Subcommand;
use serde::Serialize;
use tracing::info;

use invoicer_core::{ComputedTotals, LineItem};

use super::AppContext;
use crate::error::AppError;
use crate::state::{ItemEdit, Session};

/// Item subcommands
#[derive(Subcommand, Debug)]
pub enum ItemCommands {
    /// Add a line item
    Add {
        #[arg(short, long)]
        description: String,

        #[arg(short, long, allow_hyphen_values = true)]
        quantity: String,

        /// Unit price, e.g. 10.00 or 1,250.50 with the configured symbol
        #[arg(short, long, allow_hyphen_values = true)]
        price: String,
    },

    /// Change fields of a line item
    Edit {
        /// Item number as shown by `show`
        index: usize,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long, allow_hyphen_values = true)]
        quantity: Option<String>,

        #[arg(short, long, allow_hyphen_values = true)]
        price: Option<String>,
    },

    /// Remove a line item
    Remove {
        /// Item number as shown by `show`
        index: usize,
    },

    /// Remove all line items
    Clear,
}

/// What an item command did, with the totals after it.
#[derive(Debug, Clone, Serialize)]
pub struct ItemChange {
    pub action: ItemAction,

    /// 1-based index of the affected item; `None` for `clear`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<LineItem>,

    /// Items removed by `clear`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<usize>,

    pub item_count: usize,
    pub totals: ComputedTotals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemAction {
    Added,
    Updated,
    Removed,
    Cleared,
}

/// Applies an item command to the saved draft.
///
/// A rejected change leaves the draft file untouched.
pub fn run(ctx: &AppContext, command: ItemCommands) -> Result<ItemChange, AppError> {
    let mut session = ctx.load_session()?;
    let currency = ctx.currency()?;

    let (action, index, item, removed) = match command {
        ItemCommands::Add {
            description,
            quantity,
            price,
        } => {
            let item = session.add_item(&description, &quantity, &price, &currency)?.clone();
            let index = session.draft().items.len();
            (ItemAction::Added, Some(index), Some(item), None)
        }
        ItemCommands::Edit {
            index,
            description,
            quantity,
            price,
        } => {
            let edit = ItemEdit {
                description,
                quantity,
                unit_price: price,
            };
            let item = session.edit_item(index, edit, &currency)?.clone();
            (ItemAction::Updated, Some(index), Some(item), None)
        }
        ItemCommands::Remove { index } => {
            let item = session.remove_item(index)?;
            (ItemAction::Removed, Some(index), Some(item), None)
        }
        ItemCommands::Clear => {
            let removed = session.clear_items();
            (ItemAction::Cleared, None, None, Some(removed))
        }
    };

    session.save()?;
    info!(action = ?action, index = ?index, "Line items changed");

    Ok(change(&session, action, index, item, removed))
}

fn change(
    session: &Session,
    action: ItemAction,
    index: Option<usize>,
    item: Option<LineItem>,
    removed: Option<usize>,
) -> ItemChange {
    ItemChange {
        action,
        index,
        item,
        removed,
        item_count: session.draft().items.len(),
        totals: session.totals(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::draft::{self, NewArgs};
    use crate::commands::test_support::context;
    use crate::error::ErrorCode;
    use invoicer_core::Money;
    use tempfile::TempDir;

    fn add(description: &str, quantity: &str, price: &str) -> ItemCommands {
        ItemCommands::Add {
            description: description.to_string(),
            quantity: quantity.to_string(),
            price: price.to_string(),
        }
    }

    fn ready_context(tmp: &TempDir) -> AppContext {
        let ctx = context(tmp);
        draft::new(&ctx, NewArgs::default()).unwrap();
        ctx
    }

    #[test]
    fn test_add_items_updates_totals() {
        let tmp = TempDir::new().unwrap();
        let ctx = ready_context(&tmp);

        run(&ctx, add("Widget", "2", "10.00")).unwrap();
        let change = run(&ctx, add("Service", "1", "50.00")).unwrap();

        assert_eq!(change.action, ItemAction::Added);
        assert_eq!(change.index, Some(2));
        assert_eq!(change.item_count, 2);
        assert_eq!(change.totals.subtotal, Money::from_cents(7000));
        assert_eq!(change.totals.tax_amount, Money::from_cents(1260));
        assert_eq!(change.totals.grand_total, Money::from_cents(8260));
    }

    #[test]
    fn test_zero_quantity_is_rejected_and_not_saved() {
        let tmp = TempDir::new().unwrap();
        let ctx = ready_context(&tmp);
        run(&ctx, add("Widget", "2", "10.00")).unwrap();

        let err = run(&ctx, add("Gadget", "0", "5.00")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(ctx.load_session().unwrap().draft().items.len(), 1);
    }

    #[test]
    fn test_price_accepts_configured_symbol() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = context(&tmp);
        ctx.config.currency_symbol = "$".to_string();
        draft::new(&ctx, NewArgs::default()).unwrap();

        let change = run(&ctx, add("Widget", "3", "$10")).unwrap();
        assert_eq!(change.item.unwrap().unit_price, Money::from_cents(1000));
        assert_eq!(change.totals.subtotal, Money::from_cents(3000));

        let err = run(&ctx, add("Widget", "1", "₹10")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_large_quantity_is_accepted() {
        let tmp = TempDir::new().unwrap();
        let ctx = ready_context(&tmp);

        let change = run(&ctx, add("Bolt", "100000", "0.25")).unwrap();
        assert_eq!(change.totals.subtotal, Money::from_cents(2_500_000));
    }

    #[test]
    fn test_edit_remove_clear() {
        let tmp = TempDir::new().unwrap();
        let ctx = ready_context(&tmp);
        run(&ctx, add("Widget", "2", "10.00")).unwrap();
        run(&ctx, add("Bolt", "10", "0.25")).unwrap();

        let change = run(
            &ctx,
            ItemCommands::Edit {
                index: 2,
                description: None,
                quantity: Some("4".to_string()),
                price: None,
            },
        )
        .unwrap();
        assert_eq!(change.action, ItemAction::Updated);
        assert_eq!(change.item.unwrap().line_total(), Money::from_cents(100));

        let change = run(&ctx, ItemCommands::Remove { index: 1 }).unwrap();
        assert_eq!(change.item.unwrap().description, "Widget");
        assert_eq!(change.item_count, 1);

        let change = run(&ctx, ItemCommands::Clear).unwrap();
        assert_eq!(change.removed, Some(1));
        assert!(ctx.load_session().unwrap().draft().items.is_empty());
    }

    #[test]
    fn test_bad_index_is_validation_error() {
        let tmp = TempDir::new().unwrap();
        let ctx = ready_context(&tmp);

        let err = run(&ctx, ItemCommands::Remove { index: 3 }).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "No line item #3 (draft has 0 items)");
    }
}

//! The update coordinator: the single entry point through which user actions
//! mutate the dataset and reach the store.

use shared::{
    domain::{OrderId, OrderLine},
    error::{ApiError, ErrorCode},
    protocol::{OrderDraft, UpdateOutcome, UpdateTrigger},
};
use storage::TsvStore;

/// Status shown after a successful Add.
pub const MSG_ORDER_ADDED: &str = "Order added!";
/// Status shown after grid edits are persisted.
pub const MSG_CHANGES_SAVED: &str = "Changes saved!";
/// Status shown when the Add form is incomplete; no mutation happens.
pub const MSG_FILL_ALL_FIELDS: &str = "Fill in all fields!";

#[derive(Clone)]
pub struct ApiContext {
    pub store: TsvStore,
}

/// What one update cycle produced.
///
/// `committed` is the replacement authoritative row set, present exactly when
/// a mutation was accepted and persisted; the serving layer installs it as
/// the new in-memory state. `outcome` is the page-facing view of the same
/// cycle; after an edit commit it omits the rows the grid already displays.
#[derive(Debug, Clone)]
pub struct UpdateResult {
    pub committed: Option<Vec<OrderLine>>,
    pub outcome: UpdateOutcome,
}

/// Next id for a user-added order: one past the current maximum, starting at
/// 1 for an empty dataset.
pub fn next_order_id(rows: &[OrderLine]) -> OrderId {
    OrderId(rows.iter().map(|row| row.order_id.0).max().map_or(1, |max| max + 1))
}

/// Dispatches exactly one trigger. Exactly one store write happens per
/// accepted trigger; a validation failure writes nothing.
pub fn apply_update(ctx: &ApiContext, trigger: UpdateTrigger) -> Result<UpdateResult, ApiError> {
    match trigger {
        UpdateTrigger::AddRequested { rows, form } => add_order(ctx, rows, &form),
        UpdateTrigger::EditCommitted { rows } => commit_edits(ctx, rows),
    }
}

fn add_order(
    ctx: &ApiContext,
    mut rows: Vec<OrderLine>,
    form: &OrderDraft,
) -> Result<UpdateResult, ApiError> {
    let (Some(item_name), Some(quantity), Some(item_price)) = (
        present(&form.item_name),
        present(&form.quantity),
        present(&form.item_price),
    ) else {
        return Ok(UpdateResult {
            committed: None,
            outcome: UpdateOutcome {
                rows: None,
                message: Some(MSG_FILL_ALL_FIELDS.to_string()),
            },
        });
    };

    let order = OrderLine {
        order_id: next_order_id(&rows),
        quantity: quantity.to_string(),
        item_name: item_name.to_string(),
        choice_description: String::new(),
        item_price: item_price.to_string(),
    };
    rows.push(order);
    persist(ctx, &rows)?;

    Ok(UpdateResult {
        committed: Some(rows.clone()),
        outcome: UpdateOutcome {
            rows: Some(rows),
            message: Some(MSG_ORDER_ADDED.to_string()),
        },
    })
}

fn commit_edits(ctx: &ApiContext, rows: Vec<OrderLine>) -> Result<UpdateResult, ApiError> {
    persist(ctx, &rows)?;
    Ok(UpdateResult {
        committed: Some(rows),
        outcome: UpdateOutcome {
            rows: None,
            message: Some(MSG_CHANGES_SAVED.to_string()),
        },
    })
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn persist(ctx: &ApiContext, rows: &[OrderLine]) -> Result<(), ApiError> {
    ctx.store.save(rows).map_err(internal)
}

fn internal(error: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, error.to_string())
}

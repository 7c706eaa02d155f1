use serde::{Deserialize, Serialize};

use crate::domain::OrderLine;

/// Raw Add-form fields as captured by the page. A field the user never
/// touched arrives as `None`; nothing is trimmed on the way in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub item_name: Option<String>,
    pub quantity: Option<String>,
    pub item_price: Option<String>,
}

/// The discrete user action that starts one update cycle. Both variants carry
/// the grid's current row set, which may already reflect unsaved in-place
/// edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum UpdateTrigger {
    AddRequested {
        rows: Vec<OrderLine>,
        form: OrderDraft,
    },
    EditCommitted {
        rows: Vec<OrderLine>,
    },
}

/// The two page-facing outputs of one update cycle. `None` means "leave that
/// part of the page untouched" rather than "clear it".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOutcome {
    pub rows: Option<Vec<OrderLine>>,
    pub message: Option<String>,
}

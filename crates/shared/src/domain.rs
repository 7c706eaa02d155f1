use serde::{Deserialize, Serialize};

/// Row identity within the dataset. Unique at all times; new ids are assigned
/// monotonically as one past the current maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub i64);

/// One purchase-order line as displayed and edited in the grid.
///
/// `quantity` and `item_price` are kept exactly as entered; nothing in the
/// system parses them into numeric or currency types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub order_id: OrderId,
    pub quantity: String,
    pub item_name: String,
    pub choice_description: String,
    pub item_price: String,
}

//! Tab-separated codec for the order dataset.
//!
//! The on-disk and remote formats are identical: a header row followed by one
//! line per order. Columns are resolved by header name, so column order in a
//! source file does not matter; rendering always emits the canonical order.

use shared::domain::{OrderId, OrderLine};
use thiserror::Error;

pub const COLUMNS: [&str; 5] = [
    "order_id",
    "quantity",
    "item_name",
    "choice_description",
    "item_price",
];

#[derive(Debug, Error)]
pub enum TsvError {
    #[error("missing header row")]
    MissingHeader,
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("line {line}: invalid order_id '{value}'")]
    InvalidOrderId { line: usize, value: String },
}

struct ColumnMap {
    order_id: Option<usize>,
    quantity: usize,
    item_name: usize,
    choice_description: usize,
    item_price: usize,
}

fn resolve_columns(header: &[&str]) -> Result<ColumnMap, TsvError> {
    let find = |name: &'static str| {
        header
            .iter()
            .position(|column| *column == name)
            .ok_or(TsvError::MissingColumn(name))
    };
    Ok(ColumnMap {
        // order_id is the one column a remote payload may lack; it gets
        // synthesized from row position instead.
        order_id: header.iter().position(|column| *column == "order_id"),
        quantity: find("quantity")?,
        item_name: find("item_name")?,
        choice_description: find("choice_description")?,
        item_price: find("item_price")?,
    })
}

/// Parses a header-first TSV document into order lines.
///
/// Rows shorter than the header are padded with empty cells, CR line endings
/// are tolerated and blank lines are skipped. When the source carries no
/// `order_id` column, ids are synthesized as the 1-based row position.
pub fn parse(input: &str) -> Result<Vec<OrderLine>, TsvError> {
    let mut lines = input.lines();
    let header_line = lines.next().ok_or(TsvError::MissingHeader)?;
    let header: Vec<&str> = header_line
        .trim_end_matches('\r')
        .split('\t')
        .map(str::trim)
        .collect();
    let columns = resolve_columns(&header)?;

    let mut rows = Vec::new();
    for (index, line) in lines.enumerate() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split('\t').collect();
        let cell = |at: usize| cells.get(at).copied().unwrap_or_default().to_string();

        let order_id = match columns.order_id {
            Some(at) => {
                let raw = cells.get(at).copied().unwrap_or_default().trim();
                let id = raw.parse::<i64>().map_err(|_| TsvError::InvalidOrderId {
                    line: index + 2,
                    value: raw.to_string(),
                })?;
                OrderId(id)
            }
            None => OrderId(index as i64 + 1),
        };

        rows.push(OrderLine {
            order_id,
            quantity: cell(columns.quantity),
            item_name: cell(columns.item_name),
            choice_description: cell(columns.choice_description),
            item_price: cell(columns.item_price),
        });
    }
    Ok(rows)
}

/// Renders rows in the canonical column order. Deterministic: equal input
/// yields byte-identical output.
pub fn render(rows: &[OrderLine]) -> String {
    let mut out = String::new();
    out.push_str(&COLUMNS.join("\t"));
    out.push('\n');
    for row in rows {
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\n",
            row.order_id.0, row.quantity, row.item_name, row.choice_description, row.item_price
        ));
    }
    out
}

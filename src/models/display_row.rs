use crate::models::transaction::TransactionKind;

/// Color attribute attached to the `kind` cell of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    Positive,
    Negative,
}

impl RowStyle {
    pub fn for_kind(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Income => RowStyle::Positive,
            TransactionKind::Expense => RowStyle::Negative,
        }
    }
}

/// A transaction shaped for rendering. Every field is already text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub id: String,
    pub date: String,
    pub kind: String,
    pub style: RowStyle,
    pub category: String,
    pub amount: String,
    pub description: String,
}

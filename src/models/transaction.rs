use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;

/// Categories offered by the entry form. Stored categories are free-form.
pub const SUGGESTED_CATEGORIES: [&str; 6] = [
    "Salary",
    "Food",
    "Transport",
    "Entertainment",
    "Shopping",
    "Other",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Value written to the `kind` column.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub category: String,
    pub amount: Decimal,
    pub description: String,
}

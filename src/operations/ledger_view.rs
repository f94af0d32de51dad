use crate::db::repository::LedgerStore;
use crate::error::{LedgerError, LedgerResult};
use crate::models::display_row::{DisplayRow, RowStyle};
use crate::models::transaction::{Transaction, TransactionKind};
use crate::operations::format::{format_currency, format_date};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::{error, info, warn};

/// Dates outside this range do not sort correctly as stored text.
pub const MIN_YEAR: i32 = 0;
pub const MAX_YEAR: i32 = 9999;

/// Sits between the tracker screen and the store: validates entries and
/// projects stored transactions into display rows.
#[derive(Debug)]
pub struct LedgerViewModel {
    store: LedgerStore,
    rows: Vec<DisplayRow>,
}

impl LedgerViewModel {
    pub fn new(store: LedgerStore) -> Self {
        Self {
            store,
            rows: Vec::new(),
        }
    }

    /// Validates and records one entry, then reloads the rows.
    ///
    /// On `Ok` the caller resets its amount and description inputs. A
    /// `Validation` error means nothing was written; `SavedNotReloaded`
    /// means the entry is stored and only the displayed rows are stale.
    pub fn submit_entry(
        &mut self,
        kind: TransactionKind,
        date: NaiveDate,
        category: &str,
        amount: Decimal,
        description: &str,
    ) -> LedgerResult<i64> {
        if let Err(err) = validate_entry(date, category, amount) {
            warn!(kind = kind.as_str(), %amount, "entry rejected: {}", err);
            return Err(err);
        }

        let id = self
            .store
            .append(date, kind, category.trim(), amount, description)
            .inspect_err(|e| error!("append failed: {}", e))?;
        info!(id, kind = kind.as_str(), %date, "entry recorded");

        self.refresh().map_err(|e| LedgerError::SavedNotReloaded {
            id,
            reason: e.to_string(),
        })?;
        Ok(id)
    }

    /// Reloads every transaction from the store. The previous rows are kept
    /// when the store fails.
    pub fn refresh(&mut self) -> LedgerResult<&[DisplayRow]> {
        let transactions = self
            .store
            .list_all()
            .inspect_err(|e| error!("reload failed: {}", e))?;
        self.rows = transactions.iter().map(project_row).collect();
        Ok(&self.rows)
    }

    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    #[cfg(test)]
    pub fn stored_count(&self) -> LedgerResult<usize> {
        self.store.count()
    }
}

fn validate_entry(date: NaiveDate, category: &str, amount: Decimal) -> LedgerResult<()> {
    if amount.is_zero() {
        return Err(LedgerError::Validation("amount must be non-zero".to_string()));
    }
    if category.trim().is_empty() {
        return Err(LedgerError::Validation("category must not be empty".to_string()));
    }
    if !(MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        return Err(LedgerError::Validation(format!(
            "date must be between years {:04} and {}",
            MIN_YEAR, MAX_YEAR
        )));
    }
    Ok(())
}

pub fn project_row(transaction: &Transaction) -> DisplayRow {
    DisplayRow {
        id: transaction.id.to_string(),
        date: format_date(transaction.date),
        kind: transaction.kind.label().to_string(),
        style: RowStyle::for_kind(transaction.kind),
        category: transaction.category.clone(),
        amount: format_currency(transaction.amount),
        description: transaction.description.clone(),
    }
}

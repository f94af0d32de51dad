use crate::db::connection;
use crate::error::{LedgerError, LedgerResult};
use crate::models::transaction::{Transaction, TransactionKind};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Append-only SQLite storage for transactions.
///
/// Holds a single connection for its whole lifetime. Not meant to be shared
/// between threads or writers.
#[derive(Debug)]
pub struct LedgerStore {
    conn: Connection,
}

impl LedgerStore {
    /// Opens (or creates) the database file at `path` and makes sure the
    /// schema exists.
    pub fn open(path: &Path) -> LedgerResult<Self> {
        let conn = connection::establish_connection(path)
            .map_err(|e| LedgerError::persistence("Failed to open ledger database", e))?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> LedgerResult<Self> {
        let conn = connection::establish_test_connection()
            .map_err(|e| LedgerError::persistence("Failed to open ledger database", e))?;
        Ok(Self { conn })
    }

    /// Idempotent; safe to call on every startup.
    pub fn initialize(&self) -> LedgerResult<()> {
        connection::ensure_schema(&self.conn)
            .map_err(|e| LedgerError::persistence("Failed to create transactions table", e))
    }

    /// Persists one record and returns the id assigned to it.
    pub fn append(
        &mut self,
        date: NaiveDate,
        kind: TransactionKind,
        category: &str,
        amount: Decimal,
        description: &str,
    ) -> LedgerResult<i64> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| LedgerError::persistence("Failed to begin transaction", e))?;

        tx.execute(
            "INSERT INTO transactions (date, kind, category, amount, description) VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                date.format("%Y-%m-%d").to_string(),
                kind.as_str(),
                category,
                amount.to_string(),
                description,
            ],
        )
        .map_err(|e| LedgerError::persistence("Failed to insert transaction", e))?;
        let id = tx.last_insert_rowid();

        tx.commit()
            .map_err(|e| LedgerError::persistence("Failed to commit transaction", e))?;

        debug!(id, %date, kind = kind.as_str(), "transaction appended");
        Ok(id)
    }

    /// Returns a fresh snapshot of every record, newest date first and
    /// newest insert first within a day.
    pub fn list_all(&self) -> LedgerResult<Vec<Transaction>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, date, kind, category, amount, description FROM transactions ORDER BY date DESC, id DESC",
            )
            .map_err(|e| LedgerError::persistence("Failed to prepare statement", e))?;

        let transaction_iter = stmt
            .query_map([], transaction_from_row)
            .map_err(|e| LedgerError::persistence("Failed to query transactions", e))?;

        let mut transactions = Vec::new();
        for transaction in transaction_iter {
            transactions.push(
                transaction.map_err(|e| LedgerError::persistence("Failed to parse transaction", e))?,
            );
        }

        debug!(count = transactions.len(), "transactions loaded");
        Ok(transactions)
    }

    pub fn count(&self) -> LedgerResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let id: i64 = row.get(0)?;
    let date_str: String = row.get(1)?;
    let kind_str: String = row.get(2)?;
    let amount_str: String = row.get(4)?;

    Ok(Transaction {
        id,
        date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?,
        kind: parse_kind(id, &kind_str),
        category: row.get(3)?,
        amount: Decimal::from_str(&amount_str)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?,
        description: row.get(5)?,
    })
}

/// Anything that is not recognisably income is shown as an expense.
fn parse_kind(id: i64, value: &str) -> TransactionKind {
    match value.to_lowercase().as_str() {
        "income" => TransactionKind::Income,
        "expense" => TransactionKind::Expense,
        other => {
            warn!(id, kind = other, "unknown transaction kind, treating as expense");
            TransactionKind::Expense
        }
    }
}

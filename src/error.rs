use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Input broke a business rule. Nothing was written.
    #[error("{0}")]
    Validation(String),
    /// The backing storage could not be read or written.
    #[error("{0}")]
    Persistence(String),
    /// The entry was committed but the rows could not be reloaded.
    #[error("Entry #{id} was saved but reloading failed: {reason}")]
    SavedNotReloaded { id: i64, reason: String },
}

impl LedgerError {
    pub fn persistence(context: &str, err: impl std::fmt::Display) -> Self {
        LedgerError::Persistence(format!("{}: {}", context, err))
    }
}

impl From<rusqlite::Error> for LedgerError {
    fn from(err: rusqlite::Error) -> Self {
        LedgerError::persistence("Storage error", err)
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;

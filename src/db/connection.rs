use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

const CREATE_TRANSACTIONS_TABLE: &str = "CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL CHECK (date GLOB '[0-9][0-9][0-9][0-9]-[0-9][0-9]-[0-9][0-9]'),
    kind TEXT NOT NULL,
    category TEXT NOT NULL CHECK (length(trim(category)) > 0),
    amount TEXT NOT NULL CHECK (CAST(amount AS REAL) <> 0),
    description TEXT NOT NULL DEFAULT ''
)";

pub fn establish_connection(path: &Path) -> rusqlite::Result<Connection> {
    debug!(path = %path.display(), "opening ledger database");
    Connection::open(path)
}

/// Creates the transactions table when it is missing. Existing rows are
/// never touched.
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(CREATE_TRANSACTIONS_TABLE, [])?;
    Ok(())
}

#[cfg(test)]
pub fn establish_test_connection() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    ensure_schema(&conn)?;
    Ok(conn)
}

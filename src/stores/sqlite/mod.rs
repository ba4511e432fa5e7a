//! Implements the stores on top of a SQLite connection.

mod category;
mod transaction;

pub use category::create_category_table;
pub use transaction::create_transaction_table;

use rusqlite::Connection;

use crate::{Error, stores::Ledger};

/// Stores categories and transactions in a SQLite database.
///
/// The ledger borrows the connection, so the caller decides how long the
/// connection is held, e.g. for the duration of one request.
#[derive(Debug, Clone, Copy)]
pub struct SQLiteLedger<'a> {
    connection: &'a Connection,
}

impl<'a> SQLiteLedger<'a> {
    /// Create a ledger for the SQLite `connection`.
    ///
    /// The tables must have been created with [initialize](crate::initialize_db).
    pub fn new(connection: &'a Connection) -> Self {
        Self { connection }
    }
}

impl Ledger for SQLiteLedger<'_> {
    /// Run `f` inside a SQL transaction that is committed only if `f` succeeds.
    ///
    /// # Errors
    /// Returns the error from `f`, or an [Error::SqlError] if the SQL
    /// transaction could not be started or committed, e.g. because another
    /// one is already active on the connection.
    fn atomically<T, F>(&self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&Self) -> Result<T, Error>,
    {
        let transaction = self.connection.unchecked_transaction()?;

        // Dropping `transaction` without committing rolls it back.
        let result = f(self)?;

        transaction.commit()?;

        Ok(result)
    }
}

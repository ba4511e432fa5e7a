//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, csv_import::UploadDir, db::initialize};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// Where uploaded CSV files are kept while they are imported.
    pub uploads: UploadDir,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, uploads: UploadDir) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            uploads,
        })
    }

    /// Close the database connection.
    ///
    /// If other clones of the state still hold the connection, it is left
    /// open and closed when the last clone is dropped.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if SQLite could not close the connection,
    /// or an [Error::DatabaseLockError] if the lock was poisoned.
    pub fn close(self) -> Result<(), Error> {
        let mutex = match Arc::try_unwrap(self.db_connection) {
            Ok(mutex) => mutex,
            Err(_) => {
                tracing::warn!("Database connection is still in use, it will close when dropped");
                return Ok(());
            }
        };

        mutex
            .into_inner()
            .map_err(|_| Error::DatabaseLockError)?
            .close()
            .map_err(|(_, error)| Error::SqlError(error))?;

        tracing::debug!("Closed database connection.");

        Ok(())
    }
}

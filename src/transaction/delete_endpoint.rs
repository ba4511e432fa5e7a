use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    stores::{SQLiteLedger, TransactionStore},
};

/// Delete the transaction with the ID `id`.
///
/// The transaction's category is left in place even if no other transaction
/// uses it.
///
/// # Errors
/// Returns [Error::NotFound] if there is no transaction with the ID `id`.
pub fn delete_transaction<S>(id: TransactionId, store: &S) -> Result<(), Error>
where
    S: TransactionStore + ?Sized,
{
    let transaction = store.get_transaction(id)?;
    store.delete_transaction(transaction.id)?;

    tracing::info!("Deleted transaction {id}");

    Ok(())
}

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction, responds with 204 No Content.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<StatusCode, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_transaction(transaction_id, &SQLiteLedger::new(&connection))?;

    Ok(StatusCode::NO_CONTENT)
}

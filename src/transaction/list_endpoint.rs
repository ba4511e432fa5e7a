//! Lists every transaction together with the current balance.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    stores::{SQLiteLedger, TransactionStore},
    transaction::{Balance, Transaction},
};

/// All transactions and the balance they add up to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionList {
    /// Every stored transaction in creation order.
    pub transactions: Vec<Transaction>,
    /// The balance over `transactions`.
    pub balance: Balance,
}

/// Read all transactions and the balance from `store`.
pub fn list_transactions<S>(store: &S) -> Result<TransactionList, Error>
where
    S: TransactionStore + ?Sized,
{
    Ok(TransactionList {
        transactions: store.get_all_transactions()?,
        balance: store.get_balance()?,
    })
}

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with all transactions and the balance.
pub async fn get_transactions_endpoint(
    State(state): State<ListTransactionsState>,
) -> Result<Json<TransactionList>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let list = list_transactions(&SQLiteLedger::new(&connection))?;

    Ok(Json(list))
}

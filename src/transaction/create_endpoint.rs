//! Creating transactions, the balance check and the route handler.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{CategoryTitle, get_or_create_category},
    stores::{Ledger, SQLiteLedger},
    transaction::{NewTransaction, Transaction, TransactionForm, TransactionType, validate_value},
};

/// Create a transaction from the fields in `form`.
///
/// The category is looked up by title and created if it does not exist.
/// Both writes happen in one unit of work, so a failure leaves no new rows.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidTransactionType] if the type is not "income" or "outcome",
/// - [Error::InvalidValue] if the value is negative or not finite,
/// - [Error::EmptyCategoryTitle] if the category title is blank,
/// - [Error::InsufficientBalance] if an outcome would make the balance negative,
/// - or any error from the store.
pub fn create_transaction<L: Ledger>(form: TransactionForm, ledger: &L) -> Result<Transaction, Error> {
    ledger.atomically(|ledger| record_transaction(form, ledger))
}

/// Validate `form` and write the transaction and any new category.
///
/// The caller is responsible for wrapping this in [Ledger::atomically].
pub(crate) fn record_transaction<L: Ledger>(
    form: TransactionForm,
    ledger: &L,
) -> Result<Transaction, Error> {
    let transaction_type: TransactionType = form.transaction_type.parse()?;
    let value = validate_value(form.value)?;
    let category_title = CategoryTitle::new(&form.category)?;

    if transaction_type == TransactionType::Outcome {
        let balance = ledger.get_balance()?;

        if balance.total - value < 0.0 {
            tracing::debug!(
                "Rejected outcome of {value} with an available balance of {}",
                balance.total
            );
            return Err(Error::InsufficientBalance { balance, value });
        }
    }

    let category = get_or_create_category(category_title, ledger)?;

    let transaction = ledger.create_transaction(NewTransaction {
        title: form.title,
        value,
        transaction_type,
        category_id: category.id,
    })?;

    tracing::info!(
        "Created {} transaction {} of {} in category \"{}\"",
        transaction.transaction_type,
        transaction.id,
        transaction.value,
        category.title
    );

    Ok(transaction)
}

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction, responds with the created
/// transaction.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    form: Result<Json<TransactionForm>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let Json(form) = form.map_err(|rejection| {
        tracing::debug!("Rejected transaction form: {rejection}");
        Error::InvalidRequestBody(rejection.body_text())
    })?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = create_transaction(form, &SQLiteLedger::new(&connection))?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

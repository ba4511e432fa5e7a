//! Defines the transaction store trait.

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{Balance, NewTransaction, Transaction},
};

/// Handles the creation, retrieval and removal of transactions.
pub trait TransactionStore {
    /// Create a new transaction in the store.
    fn create_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Retrieve a transaction from the store.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no transaction with the ID `id`.
    fn get_transaction(&self, id: TransactionId) -> Result<Transaction, Error>;

    /// Retrieve every transaction in the order they were created.
    fn get_all_transactions(&self) -> Result<Vec<Transaction>, Error>;

    /// Remove a transaction from the store.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no transaction with the ID `id`.
    fn delete_transaction(&self, id: TransactionId) -> Result<(), Error>;

    /// Sum the income and outcome of every stored transaction.
    fn get_balance(&self) -> Result<Balance, Error>;
}

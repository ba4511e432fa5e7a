//! An in-memory ledger for testing the workflows without a database.

use std::cell::RefCell;

use crate::{
    Error,
    category::{Category, CategoryTitle},
    database_id::TransactionId,
    stores::{CategoryStore, Ledger, TransactionStore},
    transaction::{Balance, NewTransaction, Transaction},
};

#[derive(Debug, Default, Clone)]
struct MemoryState {
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
    last_category_id: i64,
    last_transaction_id: i64,
}

/// Keeps categories and transactions in vectors.
///
/// [Ledger::atomically] snapshots the state and restores it on error.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    state: RefCell<MemoryState>,
}

impl CategoryStore for MemoryLedger {
    fn get_category_by_title(&self, title: &CategoryTitle) -> Result<Option<Category>, Error> {
        Ok(self
            .state
            .borrow()
            .categories
            .iter()
            .find(|category| &category.title == title)
            .cloned())
    }

    fn create_category(&self, title: CategoryTitle) -> Result<Category, Error> {
        let mut state = self.state.borrow_mut();
        state.last_category_id += 1;

        let category = Category {
            id: state.last_category_id,
            title,
        };
        state.categories.push(category.clone());

        Ok(category)
    }

    fn get_all_categories(&self) -> Result<Vec<Category>, Error> {
        let mut categories = self.state.borrow().categories.clone();
        categories.sort_by(|a, b| a.title.as_ref().cmp(b.title.as_ref()));

        Ok(categories)
    }
}

impl TransactionStore for MemoryLedger {
    fn create_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction, Error> {
        let mut state = self.state.borrow_mut();

        if !state
            .categories
            .iter()
            .any(|category| category.id == new_transaction.category_id)
        {
            return Err(Error::InvalidCategory(new_transaction.category_id));
        }

        state.last_transaction_id += 1;
        let transaction = Transaction {
            id: state.last_transaction_id,
            title: new_transaction.title,
            value: new_transaction.value,
            transaction_type: new_transaction.transaction_type,
            category_id: new_transaction.category_id,
        };
        state.transactions.push(transaction.clone());

        Ok(transaction)
    }

    fn get_transaction(&self, id: TransactionId) -> Result<Transaction, Error> {
        self.state
            .borrow()
            .transactions
            .iter()
            .find(|transaction| transaction.id == id)
            .cloned()
            .ok_or(Error::NotFound)
    }

    fn get_all_transactions(&self) -> Result<Vec<Transaction>, Error> {
        Ok(self.state.borrow().transactions.clone())
    }

    fn delete_transaction(&self, id: TransactionId) -> Result<(), Error> {
        let mut state = self.state.borrow_mut();
        let count_before = state.transactions.len();
        state.transactions.retain(|transaction| transaction.id != id);

        if state.transactions.len() == count_before {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    fn get_balance(&self) -> Result<Balance, Error> {
        Ok(Balance::tally(self.state.borrow().transactions.iter().map(
            |transaction| (transaction.transaction_type, transaction.value),
        )))
    }
}

impl Ledger for MemoryLedger {
    fn atomically<T, F>(&self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&Self) -> Result<T, Error>,
    {
        let snapshot = self.state.borrow().clone();

        f(self).inspect_err(|_| {
            *self.state.borrow_mut() = snapshot;
        })
    }
}

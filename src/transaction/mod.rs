//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the derived `Balance`
//! - The creation and deletion workflows
//! - Route handlers for the transaction API

mod balance;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod list_endpoint;

pub use balance::Balance;
pub use self::core::{
    NewTransaction, Transaction, TransactionForm, TransactionType, map_transaction_row,
    validate_value,
};
pub use create_endpoint::{create_transaction, create_transaction_endpoint};
pub(crate) use create_endpoint::record_transaction;
pub use delete_endpoint::{delete_transaction, delete_transaction_endpoint};
pub use list_endpoint::{TransactionList, get_transactions_endpoint};

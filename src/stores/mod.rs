//! Contains traits and implementations for objects that store the domain models.
//!
//! The workflows only talk to the traits in this module, so the SQLite backend
//! can be swapped for an in-memory one in tests.

mod category;
mod ledger;
mod transaction;

#[cfg(test)]
pub mod memory;
pub mod sqlite;

pub use category::CategoryStore;
pub use ledger::Ledger;
pub use sqlite::SQLiteLedger;
pub use transaction::TransactionStore;

//! Defines the ledger trait, a unit of work over all the stores.

use crate::{
    Error,
    stores::{CategoryStore, TransactionStore},
};

/// Access to every store with support for all-or-nothing writes.
pub trait Ledger: CategoryStore + TransactionStore {
    /// Run `f` so that either all of its writes are kept or none are.
    ///
    /// The writes are kept if `f` returns `Ok` and discarded if it returns
    /// `Err`, in which case the error is passed on to the caller.
    ///
    /// Calls to `atomically` must not be nested.
    fn atomically<T, F>(&self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&Self) -> Result<T, Error>;
}

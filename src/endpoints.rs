//! The API endpoints URIs.

/// The route to create and list transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route to delete a transaction.
pub const DELETE_TRANSACTION: &str = "/transactions/{transaction_id}";
/// The route to import transactions from a CSV file.
pub const IMPORT: &str = "/transactions/import";
/// The route to list categories.
pub const CATEGORIES: &str = "/categories";

//! Defines the core data models for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::{CategoryId, TransactionId},
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether a transaction adds money to or removes money from the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, increases the balance.
    Income,
    /// Money spent, decreases the balance.
    Outcome,
}

impl TransactionType {
    /// The canonical lowercase name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Outcome => "outcome",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    /// Parse exactly "income" or "outcome".
    ///
    /// # Errors
    /// Returns [Error::InvalidTransactionType] for any other string, including
    /// differently cased or padded variants.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "outcome" => Ok(TransactionType::Outcome),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// An income or outcome, i.e. an event where money was either earned or spent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub title: String,
    /// The amount of money earned or spent, never negative.
    pub value: f64,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The ID of the category the transaction belongs to.
    pub category_id: CategoryId,
}

impl Transaction {
    /// The value with the sign it contributes to the balance: positive for
    /// income, negative for outcome.
    pub fn signed_value(&self) -> f64 {
        match self.transaction_type {
            TransactionType::Income => self.value,
            TransactionType::Outcome => -self.value,
        }
    }
}

/// A validated transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// A text description of what the transaction was for.
    pub title: String,
    /// The amount of money, never negative.
    pub value: f64,
    /// Whether the money was earned or spent.
    pub transaction_type: TransactionType,
    /// The category the transaction belongs to.
    pub category_id: CategoryId,
}

/// The fields a client provides to create a transaction.
///
/// The type and category are kept as raw strings and validated by
/// [create_transaction](crate::create_transaction).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionForm {
    /// A text description of what the transaction was for.
    pub title: String,
    /// The amount of money earned or spent.
    pub value: f64,
    /// Either "income" or "outcome".
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// The title of the category, created if it does not exist.
    pub category: String,
}

/// Check that `value` can be stored as a transaction value.
///
/// # Errors
/// Returns [Error::InvalidValue] if `value` is negative, NaN or infinite.
pub fn validate_value(value: f64) -> Result<f64, Error> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidValue(value))
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Map a database row to a Transaction.
///
/// Expects the columns `id, title, value, type, category_id` in that order.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let title = row.get(1)?;
    let value = row.get(2)?;
    let transaction_type = row.get(3)?;
    let category_id = row.get(4)?;

    Ok(Transaction {
        id,
        title,
        value,
        transaction_type,
        category_id,
    })
}

// ============================================================================
// TESTS
// ============================================================================

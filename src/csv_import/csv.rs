//! Parses CSV files of transactions.
//!
//! The expected layout is a header line followed by rows with the columns
//! `title, type, value, category`, e.g.
//!
//! ```text
//! title, type, value, category
//! Loan, income, 1500, Others
//! Website Hosting, outcome, 50, Others
//! Ice cream, outcome, 3, Food
//! ```

use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    transaction::{Balance, TransactionForm, TransactionType},
};

const COLUMN_COUNT: usize = 4;

/// A row of a CSV file before it has been validated.
///
/// The type and category are validated when the row is turned into a
/// transaction, the value only has to be a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvTransaction {
    /// A text description of what the transaction was for.
    pub title: String,
    /// Should be "income" or "outcome".
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// The amount of money earned or spent.
    pub value: f64,
    /// The title of the category.
    pub category: String,
}

impl From<CsvTransaction> for TransactionForm {
    fn from(row: CsvTransaction) -> Self {
        TransactionForm {
            title: row.title,
            value: row.value,
            transaction_type: row.transaction_type,
            category: row.category,
        }
    }
}

/// The rows of a CSV file and the balance they add up to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvImport {
    /// The rows in the order they appear in the file.
    pub transactions: Vec<CsvTransaction>,
    /// The sum of every income row and every outcome row.
    ///
    /// Rows with a type other than "income" or "outcome" are not counted.
    pub balance: Balance,
}

impl CsvImport {
    /// Add the rows of `other` after the rows of `self` and sum the balances.
    pub fn append(&mut self, other: CsvImport) {
        self.transactions.extend(other.transactions);
        self.balance = Balance::new(
            self.balance.income + other.balance.income,
            self.balance.outcome + other.balance.outcome,
        );
    }
}

/// Parse CSV `data`, skipping the header line and trimming every field.
///
/// # Errors
/// Returns an [Error::InvalidCSV] if a row does not have exactly four
/// columns, a value is not a number or the data is otherwise malformed.
pub fn parse_csv(data: &[u8]) -> Result<CsvImport, Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(data);

    let mut transactions = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|error| Error::InvalidCSV(error.to_string()))?;
        let line = record.position().map_or(0, |position| position.line());

        if record.len() != COLUMN_COUNT {
            return Err(Error::InvalidCSV(format!(
                "line {line}: expected {COLUMN_COUNT} columns but found {}",
                record.len()
            )));
        }

        let transaction: CsvTransaction = record
            .deserialize(None)
            .map_err(|error| Error::InvalidCSV(format!("line {line}: {error}")))?;

        transactions.push(transaction);
    }

    let balance = Balance::tally(transactions.iter().filter_map(|transaction| {
        transaction
            .transaction_type
            .parse::<TransactionType>()
            .ok()
            .map(|transaction_type| (transaction_type, transaction.value))
    }));

    tracing::debug!(
        "Parsed {} rows with a net balance of {}",
        transactions.len(),
        balance.total
    );

    Ok(CsvImport {
        transactions,
        balance,
    })
}

//! The balance derived from a set of transactions.

use serde::{Deserialize, Serialize};

use crate::transaction::TransactionType;

/// The sums of income and outcome and the difference between them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// The sum of all income values.
    pub income: f64,
    /// The sum of all outcome values.
    pub outcome: f64,
    /// `income - outcome`.
    pub total: f64,
}

impl Balance {
    /// Create a balance from the income and outcome sums.
    pub fn new(income: f64, outcome: f64) -> Self {
        Self {
            income,
            outcome,
            total: income - outcome,
        }
    }

    /// Sum every value into the income or outcome side according to its type.
    pub fn tally<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (TransactionType, f64)>,
    {
        let (income, outcome) =
            entries
                .into_iter()
                .fold((0.0, 0.0), |(income, outcome), (transaction_type, value)| {
                    match transaction_type {
                        TransactionType::Income => (income + value, outcome),
                        TransactionType::Outcome => (income, outcome + value),
                    }
                });

        Self::new(income, outcome)
    }
}

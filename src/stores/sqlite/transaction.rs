//! Implements a SQLite backed transaction store.

use rusqlite::Connection;

use crate::{
    Error,
    database_id::TransactionId,
    stores::{SQLiteLedger, TransactionStore},
    transaction::{Balance, NewTransaction, Transaction, map_transaction_row},
};

impl TransactionStore for SQLiteLedger<'_> {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidCategory] if `category_id` does not refer to a valid category,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction, Error> {
        let category_id = new_transaction.category_id;

        self.connection
            .prepare(
                "INSERT INTO \"transaction\" (title, value, type, category_id)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id, title, value, type, category_id",
            )?
            .query_row(
                (
                    new_transaction.title,
                    new_transaction.value,
                    new_transaction.transaction_type,
                    new_transaction.category_id,
                ),
                map_transaction_row,
            )
            .map_err(|error| match error {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error {
                        code: _,
                        extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                    },
                    _,
                ) => Error::InvalidCategory(category_id),
                error => error.into(),
            })
    }

    /// Retrieve a transaction from the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] there is some other SQL error.
    fn get_transaction(&self, id: TransactionId) -> Result<Transaction, Error> {
        self.connection
            .prepare(
                "SELECT id, title, value, type, category_id FROM \"transaction\" WHERE id = :id",
            )?
            .query_row(&[(":id", &id)], map_transaction_row)
            .map_err(|error| error.into())
    }

    /// Retrieve all transactions in the database ordered by ID.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is a SQL error.
    fn get_all_transactions(&self) -> Result<Vec<Transaction>, Error> {
        self.connection
            .prepare(
                "SELECT id, title, value, type, category_id FROM \"transaction\" ORDER BY id ASC",
            )?
            .query_map([], map_transaction_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
            .collect()
    }

    /// Delete the transaction with the ID `id` from the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] there is some other SQL error.
    fn delete_transaction(&self, id: TransactionId) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .execute("DELETE FROM \"transaction\" WHERE id = :id", &[(":id", &id)])?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    /// Sum the income and outcome of all transactions in the database.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is a SQL error.
    fn get_balance(&self) -> Result<Balance, Error> {
        self.connection
            .query_row(
                "SELECT
                    COALESCE(SUM(CASE WHEN type = 'income' THEN value END), 0.0),
                    COALESCE(SUM(CASE WHEN type = 'outcome' THEN value END), 0.0)
                 FROM \"transaction\"",
                [],
                |row| Ok(Balance::new(row.get(0)?, row.get(1)?)),
            )
            .map_err(|error| error.into())
    }
}

/// Create the transaction table in the database.
///
/// The category table must be created first.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                value REAL NOT NULL CHECK (value >= 0),
                type TEXT NOT NULL CHECK (type IN ('income', 'outcome')),
                category_id INTEGER NOT NULL,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE
                )",
        (),
    )?;

    // Ensure the sequence starts at 1. `sqlite_sequence` has no unique key.
    connection.execute(
        "INSERT INTO sqlite_sequence (name, seq)
         SELECT 'transaction', 0
         WHERE NOT EXISTS (SELECT 1 FROM sqlite_sequence WHERE name = 'transaction')",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_category ON \"transaction\"(category_id);",
        (),
    )?;

    Ok(())
}

#[cfg(test)]
mod transaction_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        category::CategoryTitle,
        db::initialize,
        stores::{CategoryStore, SQLiteLedger, TransactionStore},
        transaction::{Balance, NewTransaction, TransactionType},
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn new_transaction(
        value: f64,
        transaction_type: TransactionType,
        category_id: i64,
    ) -> NewTransaction {
        NewTransaction {
            title: "Test".to_owned(),
            value,
            transaction_type,
            category_id,
        }
    }

    #[test]
    fn reinitializing_keeps_a_single_sequence_row() {
        let connection = get_test_connection();
        initialize(&connection).unwrap();

        let sequence_rows: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_sequence WHERE name = 'transaction'",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(sequence_rows, 1);
    }

    #[test]
    fn ids_are_not_reused_after_reinitializing() {
        let connection = get_test_connection();
        let store = SQLiteLedger::new(&connection);
        let category = store
            .create_category(CategoryTitle::new_unchecked("Job"))
            .unwrap();
        let first = store
            .create_transaction(new_transaction(1.0, TransactionType::Income, category.id))
            .unwrap();
        store.delete_transaction(first.id).unwrap();

        initialize(&connection).unwrap();
        let second = store
            .create_transaction(new_transaction(1.0, TransactionType::Income, category.id))
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[test]
    fn create_succeeds() {
        let connection = get_test_connection();
        let store = SQLiteLedger::new(&connection);
        let category = store
            .create_category(CategoryTitle::new_unchecked("Job"))
            .unwrap();

        let result = store.create_transaction(new_transaction(
            12.3,
            TransactionType::Income,
            category.id,
        ));

        match result {
            Ok(transaction) => {
                assert_eq!(transaction.value, 12.3);
                assert_eq!(transaction.transaction_type, TransactionType::Income);
                assert_eq!(transaction.category_id, category.id);
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_fails_on_invalid_category_id() {
        let connection = get_test_connection();
        let store = SQLiteLedger::new(&connection);

        let result = store.create_transaction(new_transaction(1.0, TransactionType::Income, 42));

        assert_eq!(result, Err(Error::InvalidCategory(42)));
    }

    #[test]
    fn get_transaction_round_trips() {
        let connection = get_test_connection();
        let store = SQLiteLedger::new(&connection);
        let category = store
            .create_category(CategoryTitle::new_unchecked("Job"))
            .unwrap();
        let inserted = store
            .create_transaction(new_transaction(5.0, TransactionType::Outcome, category.id))
            .unwrap();

        let selected = store.get_transaction(inserted.id);

        assert_eq!(selected, Ok(inserted));
    }

    #[test]
    fn get_missing_transaction_returns_not_found() {
        let connection = get_test_connection();
        let store = SQLiteLedger::new(&connection);

        assert_eq!(store.get_transaction(1337), Err(Error::NotFound));
    }

    #[test]
    fn delete_removes_transaction() {
        let connection = get_test_connection();
        let store = SQLiteLedger::new(&connection);
        let category = store
            .create_category(CategoryTitle::new_unchecked("Job"))
            .unwrap();
        let transaction = store
            .create_transaction(new_transaction(5.0, TransactionType::Income, category.id))
            .unwrap();

        store.delete_transaction(transaction.id).unwrap();

        assert_eq!(store.get_transaction(transaction.id), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_transaction_returns_not_found() {
        let connection = get_test_connection();
        let store = SQLiteLedger::new(&connection);

        assert_eq!(store.delete_transaction(1337), Err(Error::NotFound));
    }

    #[test]
    fn balance_of_empty_store_is_zero() {
        let connection = get_test_connection();
        let store = SQLiteLedger::new(&connection);

        assert_eq!(store.get_balance(), Ok(Balance::default()));
    }

    #[test]
    fn balance_sums_income_and_outcome() {
        let connection = get_test_connection();
        let store = SQLiteLedger::new(&connection);
        let category = store
            .create_category(CategoryTitle::new_unchecked("Misc"))
            .unwrap();
        for (value, transaction_type) in [
            (1000.0, TransactionType::Income),
            (250.0, TransactionType::Income),
            (400.0, TransactionType::Outcome),
            (50.0, TransactionType::Outcome),
        ] {
            store
                .create_transaction(new_transaction(value, transaction_type, category.id))
                .unwrap();
        }

        let balance = store.get_balance().unwrap();

        assert_eq!(balance, Balance::new(1250.0, 450.0));
        assert_eq!(balance.total, 800.0);
    }

    #[test]
    fn get_all_transactions_keeps_creation_order() {
        let connection = get_test_connection();
        let store = SQLiteLedger::new(&connection);
        let category = store
            .create_category(CategoryTitle::new_unchecked("Misc"))
            .unwrap();
        let first = store
            .create_transaction(new_transaction(1.0, TransactionType::Income, category.id))
            .unwrap();
        let second = store
            .create_transaction(new_transaction(2.0, TransactionType::Income, category.id))
            .unwrap();

        let transactions = store.get_all_transactions().unwrap();

        assert_eq!(transactions, vec![first, second]);
    }
}

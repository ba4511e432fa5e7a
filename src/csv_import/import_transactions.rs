use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{
        FromRef, Multipart, State,
        multipart::{Field, MultipartRejection},
    },
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    csv_import::{
        UploadDir,
        csv::{CsvImport, parse_csv},
    },
    stores::{Ledger, SQLiteLedger},
    transaction::{Transaction, record_transaction},
};

/// Read and parse the uploaded CSV file named `file_name`.
///
/// # Errors
/// Returns an [Error::UploadIo] if the file cannot be read or an
/// [Error::InvalidCSV] if it is malformed.
pub async fn load_csv_file(uploads: &UploadDir, file_name: &str) -> Result<CsvImport, Error> {
    let data = uploads.read(file_name).await?;

    parse_csv(&data)
}

/// Create a transaction for every row of `csv_import`, in file order.
///
/// The import is all or nothing: it is rejected up front if the file's net
/// balance would make the ledger's balance negative, and if any row fails
/// validation every row created before it is rolled back, along with any
/// categories the import created.
///
/// # Errors
/// This function will return a:
/// - [Error::ImportExceedsBalance] if the file would make the balance negative,
/// - or the error of the first row that could not be created.
pub fn import_csv<L: Ledger>(csv_import: CsvImport, ledger: &L) -> Result<Vec<Transaction>, Error> {
    let balance = ledger.get_balance()?;

    if balance.total + csv_import.balance.total < 0.0 {
        tracing::debug!(
            "Rejected import with a net balance of {} against an available balance of {}",
            csv_import.balance.total,
            balance.total
        );
        return Err(Error::ImportExceedsBalance {
            balance,
            file_balance: csv_import.balance,
        });
    }

    let row_count = csv_import.transactions.len();

    let transactions = ledger.atomically(|ledger| {
        csv_import
            .transactions
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                record_transaction(row.into(), ledger).inspect_err(|error| {
                    tracing::debug!("Row {} of {row_count} failed: {error}", index + 1)
                })
            })
            .collect::<Result<Vec<_>, _>>()
    })?;

    tracing::info!("Imported {} transactions", transactions.len());

    Ok(transactions)
}

/// The state needed for importing transactions.
#[derive(Debug, Clone)]
pub struct ImportState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Where uploaded files are stored while they are imported.
    pub uploads: UploadDir,
}

impl FromRef<AppState> for ImportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            uploads: state.uploads.clone(),
        }
    }
}

/// Route handler for importing transactions from uploaded CSV files.
///
/// Every file part of the multipart form must be a CSV file, other fields are
/// ignored. The files are saved to the upload directory, imported together in
/// form order as one unit of work and then removed again.
pub async fn import_transactions_endpoint(
    State(state): State<ImportState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Vec<Transaction>>), Error> {
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!("Rejected import form: {rejection}");
        Error::MultipartError(rejection.body_text())
    })?;

    let mut file_names = Vec::new();
    let result = import_multipart(&state, &mut multipart, &mut file_names).await;

    for file_name in &file_names {
        if let Err(error) = state.uploads.remove(file_name).await {
            tracing::warn!("Could not clean up upload: {error}");
        }
    }

    Ok((StatusCode::CREATED, Json(result?)))
}

/// Save every file part of `multipart`, recording the saved names in
/// `file_names` so the caller can clean up, then import them.
async fn import_multipart(
    state: &ImportState,
    multipart: &mut Multipart,
    file_names: &mut Vec<String>,
) -> Result<Vec<Transaction>, Error> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?
    {
        let Some(original_name) = field.file_name().map(str::to_owned) else {
            tracing::debug!("Skipping form field {:?} without a file", field.name());
            continue;
        };

        let data = parse_multipart_field(field, &original_name).await?;
        file_names.push(state.uploads.save(&original_name, &data).await?);
    }

    if file_names.is_empty() {
        return Err(Error::MultipartError(
            "the form did not contain a file".to_owned(),
        ));
    }

    let mut csv_import = CsvImport::default();
    for file_name in file_names.iter() {
        csv_import.append(load_csv_file(&state.uploads, file_name).await?);
    }

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    import_csv(csv_import, &SQLiteLedger::new(&connection))
}

async fn parse_multipart_field(field: Field<'_>, file_name: &str) -> Result<Vec<u8>, Error> {
    let is_csv = field.content_type() == Some("text/csv")
        || file_name.to_lowercase().ends_with(".csv");
    if !is_csv {
        tracing::debug!("Rejected upload '{file_name}' that is not a CSV file");
        return Err(Error::NotCSV);
    }

    let data = match field.bytes().await {
        Ok(data) => data.to_vec(),
        Err(error) => {
            tracing::error!("Could not read data from multipart form field: {error}");
            return Err(Error::MultipartError(
                "Could not read data from multipart form field.".to_owned(),
            ));
        }
    };

    tracing::debug!("Received file '{}' that is {} bytes", file_name, data.len());

    Ok(data)
}

#[cfg(test)]
mod import_csv_tests {
    use rusqlite::Connection;

    use crate::{
        Balance, Error,
        csv_import::{csv::parse_csv, import_csv},
        db::initialize,
        stores::{CategoryStore, SQLiteLedger, TransactionStore, memory::MemoryLedger},
        transaction::{TransactionForm, TransactionType, create_transaction},
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn seed_income(value: f64, ledger: &impl crate::stores::Ledger) {
        create_transaction(
            TransactionForm {
                title: "Opening balance".to_owned(),
                value,
                transaction_type: "income".to_owned(),
                category: "Savings".to_owned(),
            },
            ledger,
        )
        .unwrap();
    }

    #[test]
    fn imports_rows_and_updates_balance() {
        let connection = get_test_connection();
        let ledger = SQLiteLedger::new(&connection);
        let csv_import = parse_csv(
            b"title,type,value,category\n\
            Salary,income,1000,Job\n\
            Rent,outcome,400,Housing\n",
        )
        .unwrap();

        let transactions = import_csv(csv_import, &ledger).expect("Could not import CSV");

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].title, "Salary");
        assert_eq!(transactions[0].transaction_type, TransactionType::Income);
        assert_eq!(transactions[1].title, "Rent");
        assert_eq!(transactions[1].transaction_type, TransactionType::Outcome);
        assert_eq!(ledger.get_balance().unwrap().total, 600.0);
    }

    #[test]
    fn rejects_import_that_would_make_balance_negative() {
        let connection = get_test_connection();
        let ledger = SQLiteLedger::new(&connection);
        seed_income(100.0, &ledger);
        let csv_import = parse_csv(
            b"title,type,value,category\n\
            Laptop,outcome,500,Electronics\n",
        )
        .unwrap();

        let result = import_csv(csv_import, &ledger);

        assert_eq!(
            result,
            Err(Error::ImportExceedsBalance {
                balance: Balance::new(100.0, 0.0),
                file_balance: Balance::new(0.0, 500.0),
            })
        );
        assert_eq!(ledger.get_all_transactions().unwrap().len(), 1);
        assert_eq!(ledger.get_all_categories().unwrap().len(), 1);
    }

    #[test]
    fn pre_check_counts_every_row_of_a_type() {
        let ledger = MemoryLedger::default();
        seed_income(100.0, &ledger);
        // Only the last outcome would be counted if rows overwrote each other.
        let csv_import = parse_csv(
            b"title,type,value,category\n\
            Rent,outcome,90,Housing\n\
            Coffee,outcome,20,Food\n",
        )
        .unwrap();

        let result = import_csv(csv_import, &ledger);

        assert!(
            matches!(result, Err(Error::ImportExceedsBalance { .. })),
            "got {result:?}"
        );
    }

    #[test]
    fn row_failure_rolls_back_whole_import() {
        let connection = get_test_connection();
        let ledger = SQLiteLedger::new(&connection);
        seed_income(100.0, &ledger);
        let csv_import = parse_csv(
            b"title,type,value,category\n\
            Salary,income,1000,Job\n\
            Rent,outcome,400,Housing\n\
            Mystery,expense,10,Unknown\n",
        )
        .unwrap();

        let result = import_csv(csv_import, &ledger);

        assert_eq!(
            result,
            Err(Error::InvalidTransactionType("expense".to_owned()))
        );
        assert_eq!(ledger.get_all_transactions().unwrap().len(), 1);
        assert_eq!(ledger.get_balance().unwrap().total, 100.0);
        assert_eq!(
            ledger.get_all_categories().unwrap().len(),
            1,
            "categories created by the import should be rolled back"
        );
    }

    #[test]
    fn running_balance_is_checked_row_by_row() {
        let ledger = MemoryLedger::default();
        // The file nets to +500, but the outcome comes before the income.
        let csv_import = parse_csv(
            b"title,type,value,category\n\
            Rent,outcome,500,Housing\n\
            Salary,income,1000,Job\n",
        )
        .unwrap();

        let result = import_csv(csv_import, &ledger);

        assert!(
            matches!(result, Err(Error::InsufficientBalance { .. })),
            "got {result:?}"
        );
        assert_eq!(ledger.get_all_transactions().unwrap(), vec![]);
    }

    #[test]
    fn categories_created_by_earlier_rows_are_reused() {
        let connection = get_test_connection();
        let ledger = SQLiteLedger::new(&connection);
        let csv_import = parse_csv(
            b"title,type,value,category\n\
            Salary,income,1000,Job\n\
            Bonus,income,200,Job\n\
            Lunch,outcome,15,Food\n",
        )
        .unwrap();

        let transactions = import_csv(csv_import, &ledger).unwrap();

        let categories = ledger.get_all_categories().unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(transactions[0].category_id, transactions[1].category_id);
        assert_ne!(transactions[0].category_id, transactions[2].category_id);
    }

    #[test]
    fn imported_values_add_up_to_store_balance() {
        let ledger = MemoryLedger::default();
        seed_income(50.0, &ledger);
        let csv_import = parse_csv(
            b"title,type,value,category\n\
            Salary,income,1000.5,Job\n\
            Rent,outcome,400.25,Housing\n\
            Gift,income,20,Misc\n",
        )
        .unwrap();

        import_csv(csv_import, &ledger).unwrap();

        let signed_sum: f64 = ledger
            .get_all_transactions()
            .unwrap()
            .iter()
            .map(|transaction| transaction.signed_value())
            .sum();
        assert_eq!(ledger.get_balance().unwrap().total, signed_sum);
    }

    #[test]
    fn empty_file_imports_nothing() {
        let ledger = MemoryLedger::default();
        let csv_import = parse_csv(b"title,type,value,category\n").unwrap();

        let transactions = import_csv(csv_import, &ledger).unwrap();

        assert!(transactions.is_empty());
    }
}

//! A personal finance ledger.
//!
//! Records income and outcome transactions grouped by category, keeps the
//! running balance non-negative and imports transactions in bulk from CSV
//! files.
//!
//! This library provides a JSON REST API over a SQLite database.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod category;
mod csv_import;
mod database_id;
mod db;
mod endpoints;
mod logging;
mod not_found;
mod routing;
mod stores;
mod transaction;

pub use app_state::AppState;
pub use category::{Category, CategoryTitle};
pub use csv_import::{
    CsvImport, CsvTransaction, UploadDir, import_csv, load_csv_file, parse_csv,
};
pub use database_id::{CategoryId, DatabaseId, TransactionId};
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use routing::build_router;
pub use stores::{CategoryStore, Ledger, SQLiteLedger, TransactionStore};
pub use transaction::{
    Balance, NewTransaction, Transaction, TransactionForm, TransactionType, create_transaction,
    delete_transaction,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The transaction type was something other than "income" or "outcome".
    #[error("\"{0}\" is not a valid transaction type, expected \"income\" or \"outcome\"")]
    InvalidTransactionType(String),

    /// The transaction value was negative, NaN or infinite.
    #[error("{0} is not a valid transaction value, it must be a non-negative number")]
    InvalidValue(f64),

    /// An empty string was used as a category title.
    #[error("Category title cannot be empty")]
    EmptyCategoryTitle,

    /// Recording the outcome would make the balance negative.
    ///
    /// Carries the balance as it was before the outcome was considered.
    #[error(
        "an outcome of {value} exceeds the available balance of {}",
        .balance.total
    )]
    InsufficientBalance {
        /// The balance before the rejected outcome.
        balance: Balance,
        /// The value of the rejected outcome.
        value: f64,
    },

    /// The net value of a CSV import would make the balance negative.
    #[error("The balance of the csv file exceeds the available balance.")]
    ImportExceedsBalance {
        /// The balance of the store before the import.
        balance: Balance,
        /// The net balance of the rows in the CSV file.
        file_balance: Balance,
    },

    /// The request body was missing, too large or did not have the expected
    /// shape, e.g. a JSON object without a "type" field.
    #[error("Invalid request body: {0}")]
    InvalidRequestBody(String),

    /// The category ID used to create a transaction did not match a category.
    #[error("the category ID {0} does not refer to a valid category")]
    InvalidCategory(CategoryId),

    /// The multipart form could not be parsed as a list of CSV files.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// The multipart form did not contain a CSV file.
    #[error("File is not a CSV")]
    NotCSV,

    /// The CSV had issues that prevented it from being parsed.
    #[error("Could not parse the CSV file: {0}")]
    InvalidCSV(String),

    /// A file name referred to something other than a plain file in the
    /// upload directory.
    #[error("\"{0}\" is not a valid upload file name")]
    InvalidFileName(String),

    /// An uploaded file could not be written, read or removed.
    #[error("upload file error: {0}")]
    UploadIo(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl Error {
    /// The HTTP status code that best describes the error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidTransactionType(_)
            | Error::InvalidValue(_)
            | Error::EmptyCategoryTitle
            | Error::InsufficientBalance { .. }
            | Error::ImportExceedsBalance { .. }
            | Error::InvalidRequestBody(_)
            | Error::MultipartError(_)
            | Error::NotCSV
            | Error::InvalidCSV(_)
            | Error::InvalidFileName(_) => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::InvalidCategory(_)
            | Error::UploadIo(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self {
            Error::NotFound => "Transaction not found".to_owned(),
            // Internal errors are not intended to be shown to the client.
            error if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("An unexpected error occurred: {}", error);
                "Internal server error".to_owned()
            }
            error => error.to_string(),
        };

        (status, Json(json!({ "status": "error", "message": message }))).into_response()
    }
}

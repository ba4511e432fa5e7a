//! Importing transactions in bulk from uploaded CSV files.

mod csv;
mod import_transactions;
mod upload;

pub use self::csv::{CsvImport, CsvTransaction, parse_csv};
pub use import_transactions::{import_csv, import_transactions_endpoint, load_csv_file};
pub use upload::UploadDir;

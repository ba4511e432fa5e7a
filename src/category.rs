//! Categories group transactions, e.g. 'Groceries', 'Rent', 'Salary'.
//!
//! Categories are created on demand the first time a transaction refers to
//! them by title and are never edited or deleted.

use std::{
    fmt::Display,
    sync::{Arc, Mutex},
};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    database_id::CategoryId,
    stores::{CategoryStore, SQLiteLedger},
};

/// The title of a category, never empty and free of surrounding whitespace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryTitle(String);

impl CategoryTitle {
    /// Create a category title, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryTitle] if `title` is
    /// empty or only whitespace.
    pub fn new(title: &str) -> Result<Self, Error> {
        let title = title.trim();

        if title.is_empty() {
            Err(Error::EmptyCategoryTitle)
        } else {
            Ok(Self(title.to_string()))
        }
    }

    /// Create a category title without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(title: &str) -> Self {
        Self(title.to_string())
    }
}

impl AsRef<str> for CategoryTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named group of transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,

    /// The unique title of the category.
    pub title: CategoryTitle,
}

/// Find the category titled `title`, creating it if it does not exist yet.
///
/// A newly created category is persisted before it is returned so later
/// lookups in the same unit of work see it.
pub fn get_or_create_category<S>(title: CategoryTitle, store: &S) -> Result<Category, Error>
where
    S: CategoryStore + ?Sized,
{
    if let Some(category) = store.get_category_by_title(&title)? {
        return Ok(category);
    }

    let category = store.create_category(title)?;
    tracing::debug!("Created category {} \"{}\"", category.id, category.title);

    Ok(category)
}

/// The state needed to list categories.
#[derive(Debug, Clone)]
pub struct CategoryState {
    /// The database connection for reading categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that returns all categories ordered by title.
pub async fn get_categories_endpoint(
    State(state): State<CategoryState>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = SQLiteLedger::new(&connection).get_all_categories()?;

    Ok(Json(categories))
}

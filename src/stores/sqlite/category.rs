//! Implements a SQLite backed category store.

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    category::{Category, CategoryTitle},
    stores::{CategoryStore, SQLiteLedger},
};

impl CategoryStore for SQLiteLedger<'_> {
    /// Retrieve the category with the title `title` from the database.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get_category_by_title(&self, title: &CategoryTitle) -> Result<Option<Category>, Error> {
        self.connection
            .prepare("SELECT id, title FROM category WHERE title = :title;")?
            .query_row(&[(":title", title.as_ref())], map_category_row)
            .optional()
            .map_err(|error| error.into())
    }

    /// Create a category in the database.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error, including
    /// when a category with the same title already exists.
    fn create_category(&self, title: CategoryTitle) -> Result<Category, Error> {
        self.connection
            .execute("INSERT INTO category (title) VALUES (?1);", (title.as_ref(),))?;

        let id = self.connection.last_insert_rowid();

        Ok(Category { id, title })
    }

    /// Retrieve all categories in the database, ordered by title.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get_all_categories(&self) -> Result<Vec<Category>, Error> {
        self.connection
            .prepare("SELECT id, title FROM category ORDER BY title ASC;")?
            .query_map([], map_category_row)?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect()
    }
}

/// Create the category table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL UNIQUE
        );",
        (),
    )?;

    Ok(())
}

fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_title: String = row.get(1)?;
    let title = CategoryTitle::new_unchecked(&raw_title);

    Ok(Category { id, title })
}

//! Defines the category store trait.

use crate::{
    Error,
    category::{Category, CategoryTitle},
};

/// Creates and retrieves transaction categories.
pub trait CategoryStore {
    /// Get the category with exactly the title `title`, if there is one.
    fn get_category_by_title(&self, title: &CategoryTitle) -> Result<Option<Category>, Error>;

    /// Create a new category and add it to the store.
    ///
    /// Titles are unique, callers should check that the title is not taken
    /// with [CategoryStore::get_category_by_title] first.
    fn create_category(&self, title: CategoryTitle) -> Result<Category, Error>;

    /// Get all categories ordered by title.
    fn get_all_categories(&self) -> Result<Vec<Category>, Error>;
}

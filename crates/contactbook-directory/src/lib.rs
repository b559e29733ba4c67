//! # contactbook-directory
//!
//! CRUD, search and favorite operations over the contact store.
//!
//! [`ContactDirectory`] is the contract consumed by the spreadsheet engine
//! and the daemon; [`SqliteDirectory`] implements it on top of
//! `contactbook-db`. Every mutation runs in its own SQLite transaction, so a
//! contact is never left without its intended method set.

pub mod sqlite;
pub mod validate;

pub use sqlite::SqliteDirectory;

use contactbook_db::DbError;
use contactbook_types::{Contact, ContactDraft, ContactId};

/// Directory error types.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("contact not found: {0}")]
    NotFound(ContactId),

    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("persistence failure: {0}")]
    Persistence(#[from] DbError),
}

impl From<rusqlite::Error> for DirectoryError {
    fn from(e: rusqlite::Error) -> Self {
        DirectoryError::Persistence(DbError::Sqlite(e))
    }
}

pub type Result<T> = std::result::Result<T, DirectoryError>;

/// Contact directory operations.
pub trait ContactDirectory {
    /// All contacts, favorites first, then by name.
    fn list_all(&self) -> Result<Vec<Contact>>;

    /// Favorite contacts by name.
    fn list_favorites(&self) -> Result<Vec<Contact>>;

    /// Contacts whose name, company or position contains `term`, ignoring
    /// case. A blank term lists everything.
    fn search(&self, term: &str) -> Result<Vec<Contact>>;

    /// One contact with its methods.
    fn get(&self, id: ContactId) -> Result<Option<Contact>>;

    /// Validate and store a new contact with its methods.
    fn create(&self, draft: &ContactDraft) -> Result<Contact>;

    /// Validate and store several contacts, all or nothing.
    fn create_many(&self, drafts: &[ContactDraft]) -> Result<Vec<Contact>>;

    /// Overwrite a contact and replace its whole method set.
    fn update(&self, id: ContactId, draft: &ContactDraft) -> Result<Contact>;

    /// Remove a contact and its methods. Returns whether it existed.
    fn delete(&self, id: ContactId) -> Result<bool>;

    /// Flip the favorite flag.
    fn toggle_favorite(&self, id: ContactId) -> Result<Contact>;

    /// Number of stored contacts.
    fn count(&self) -> Result<u64>;
}

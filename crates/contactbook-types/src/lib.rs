//! # contactbook-types
//!
//! Shared domain types used across the contactbook workspace: contacts,
//! their typed contact methods, and the import report produced by the
//! spreadsheet engine.

pub mod contact;
pub mod import;
pub mod method;

pub use contact::{Contact, ContactDraft};
pub use import::{ImportError, ImportReport};
pub use method::{ContactMethod, ContactMethodType, MethodDraft};

/// Store-assigned contact identifier.
pub type ContactId = i64;

/// Store-assigned contact method identifier.
pub type MethodId = i64;

/// Maximum length of a contact name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of a company name, in characters.
pub const MAX_COMPANY_LEN: usize = 200;

/// Maximum length of a position, in characters.
pub const MAX_POSITION_LEN: usize = 100;

/// Maximum length of a photo path, in characters.
pub const MAX_PHOTO_PATH_LEN: usize = 500;

/// Maximum length of a contact method label, in characters.
pub const MAX_LABEL_LEN: usize = 50;

/// Maximum length of a contact method value, in characters.
pub const MAX_VALUE_LEN: usize = 500;

/// Localized token for a favorite contact in spreadsheets.
pub const FAVORITE_YES: &str = "是";

/// Localized token for a non-favorite contact in spreadsheets.
pub const FAVORITE_NO: &str = "否";

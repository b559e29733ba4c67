//! Contact records.

use serde::{Deserialize, Serialize};

use crate::method::{ContactMethod, MethodDraft};
use crate::ContactId;

/// A stored contact with its contact methods loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub company: Option<String>,
    pub position: Option<String>,
    pub notes: Option<String>,
    pub is_favorite: bool,
    /// Avatar image path. Carried through storage, not interpreted.
    pub photo_path: Option<String>,
    pub created_at: u64,
    pub updated_at: u64,
    /// Methods in insertion order.
    pub methods: Vec<ContactMethod>,
}

/// Contact fields as submitted for create/update, or produced by import.
///
/// Carries no identity and no timestamps; the store assigns those.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub photo_path: Option<String>,
    #[serde(default)]
    pub methods: Vec<MethodDraft>,
}

impl ContactDraft {
    /// Start a draft with just a name.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Append a method, builder style.
    pub fn with_method(mut self, method: MethodDraft) -> Self {
        self.methods.push(method);
        self
    }
}

impl From<&Contact> for ContactDraft {
    fn from(contact: &Contact) -> Self {
        Self {
            name: contact.name.clone(),
            company: contact.company.clone(),
            position: contact.position.clone(),
            notes: contact.notes.clone(),
            is_favorite: contact.is_favorite,
            photo_path: contact.photo_path.clone(),
            methods: contact.methods.iter().map(MethodDraft::from).collect(),
        }
    }
}

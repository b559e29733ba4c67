//! Contact methods and the type <-> display-label table.

use serde::{Deserialize, Serialize};

use crate::{ContactId, MethodId};

/// Kind of a contact method.
///
/// Discriminants are the values persisted in the `contact_methods.kind`
/// column and must not be reordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactMethodType {
    /// Mobile phone.
    Phone = 0,
    /// Landline or office phone.
    Telephone = 1,
    Email = 2,
    #[serde(rename = "wechat")]
    WeChat = 3,
    #[serde(rename = "qq")]
    QQ = 4,
    Address = 5,
    Other = 6,
}

/// Display labels used in spreadsheets, one entry per type.
///
/// Both directions of the mapping are derived from this table.
const DISPLAY_LABELS: [(ContactMethodType, &str); 7] = [
    (ContactMethodType::Phone, "手机"),
    (ContactMethodType::Telephone, "电话"),
    (ContactMethodType::Email, "邮箱"),
    (ContactMethodType::WeChat, "微信"),
    (ContactMethodType::QQ, "QQ"),
    (ContactMethodType::Address, "地址"),
    (ContactMethodType::Other, "其他"),
];

impl ContactMethodType {
    /// All types in discriminant order.
    pub const ALL: [ContactMethodType; 7] = [
        ContactMethodType::Phone,
        ContactMethodType::Telephone,
        ContactMethodType::Email,
        ContactMethodType::WeChat,
        ContactMethodType::QQ,
        ContactMethodType::Address,
        ContactMethodType::Other,
    ];

    /// Localized label written to spreadsheets.
    pub fn display_label(self) -> &'static str {
        DISPLAY_LABELS
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, label)| *label)
            .unwrap_or("其他")
    }

    /// Resolve a spreadsheet label. Blank or unknown text maps to `Other`.
    pub fn from_display_label(label: &str) -> Self {
        let label = label.trim();
        DISPLAY_LABELS
            .iter()
            .find(|(_, text)| *text == label)
            .map(|(kind, _)| *kind)
            .unwrap_or(ContactMethodType::Other)
    }

    /// Integer code persisted in the database.
    pub fn code(self) -> i64 {
        self as i64
    }

    /// Decode a persisted integer code.
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.code() == code)
    }
}

/// A stored contact method.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMethod {
    pub id: MethodId,
    pub contact_id: ContactId,
    pub kind: ContactMethodType,
    /// Disambiguation text such as "work" or "personal".
    pub label: Option<String>,
    pub value: String,
    /// Preferred method of its type. Several methods may claim it.
    pub is_primary: bool,
    pub created_at: u64,
}

/// A contact method as submitted for create/update, or produced by import.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDraft {
    pub kind: ContactMethodType,
    #[serde(default)]
    pub label: Option<String>,
    pub value: String,
    #[serde(default)]
    pub is_primary: bool,
}

impl MethodDraft {
    /// Build a non-primary method draft.
    pub fn new(kind: ContactMethodType, label: Option<&str>, value: &str) -> Self {
        Self {
            kind,
            label: label.map(str::to_string),
            value: value.to_string(),
            is_primary: false,
        }
    }
}

impl From<&ContactMethod> for MethodDraft {
    fn from(method: &ContactMethod) -> Self {
        Self {
            kind: method.kind,
            label: method.label.clone(),
            value: method.value.clone(),
            is_primary: method.is_primary,
        }
    }
}

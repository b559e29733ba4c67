//! Field validation applied before any write.

use contactbook_types::{
    ContactDraft, MethodDraft, MAX_COMPANY_LEN, MAX_LABEL_LEN, MAX_NAME_LEN, MAX_PHOTO_PATH_LEN,
    MAX_POSITION_LEN, MAX_VALUE_LEN,
};

use crate::{DirectoryError, Result};

/// Check a draft against the field limits.
pub fn draft(draft: &ContactDraft) -> Result<()> {
    contact_fields(draft)?;
    draft.methods.iter().try_for_each(method)
}

/// Trimmed copy of `draft`, checked against the field limits.
///
/// Blank optional fields become `None`. This is what gets stored.
pub fn normalized(draft: &ContactDraft) -> Result<ContactDraft> {
    let clean = ContactDraft {
        name: draft.name.trim().to_string(),
        company: trimmed(&draft.company),
        position: trimmed(&draft.position),
        notes: trimmed(&draft.notes),
        is_favorite: draft.is_favorite,
        photo_path: trimmed(&draft.photo_path),
        methods: draft
            .methods
            .iter()
            .map(|m| MethodDraft {
                kind: m.kind,
                label: trimmed(&m.label),
                value: m.value.trim().to_string(),
                is_primary: m.is_primary,
            })
            .collect(),
    };
    self::draft(&clean)?;
    Ok(clean)
}

fn trimmed(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Check the contact's own fields, ignoring its methods.
pub fn contact_fields(draft: &ContactDraft) -> Result<()> {
    if draft.name.trim().is_empty() {
        return Err(invalid("name", "name must not be empty"));
    }
    max_len("name", &draft.name, MAX_NAME_LEN)?;
    if let Some(company) = &draft.company {
        max_len("company", company, MAX_COMPANY_LEN)?;
    }
    if let Some(position) = &draft.position {
        max_len("position", position, MAX_POSITION_LEN)?;
    }
    if let Some(path) = &draft.photo_path {
        max_len("photo_path", path, MAX_PHOTO_PATH_LEN)?;
    }
    Ok(())
}

/// Check one contact method.
pub fn method(method: &MethodDraft) -> Result<()> {
    if method.value.trim().is_empty() {
        return Err(invalid("value", "contact method value must not be empty"));
    }
    max_len("value", &method.value, MAX_VALUE_LEN)?;
    if let Some(label) = &method.label {
        max_len("label", label, MAX_LABEL_LEN)?;
    }
    Ok(())
}

fn max_len(field: &'static str, text: &str, limit: usize) -> Result<()> {
    let len = text.chars().count();
    if len > limit {
        return Err(invalid(
            field,
            &format!("{len} characters exceeds the limit of {limit}"),
        ));
    }
    Ok(())
}

fn invalid(field: &'static str, message: &str) -> DirectoryError {
    DirectoryError::Validation {
        field,
        message: message.to_string(),
    }
}

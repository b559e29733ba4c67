//! Contact directory command handlers.

use std::sync::Arc;

use contactbook_directory::ContactDirectory;
use contactbook_types::ContactDraft;
use serde_json::Value;

use super::{directory_error, Result, flag_param, id_param, str_param};
use crate::rpc::RpcError;
use crate::DaemonState;

fn draft_param(params: &Value) -> std::result::Result<ContactDraft, RpcError> {
    let raw = params
        .get("contact")
        .cloned()
        .ok_or_else(|| RpcError::invalid_params("contact required"))?;
    serde_json::from_value(raw).map_err(|e| RpcError::invalid_params(&e.to_string()))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result {
    serde_json::to_value(value).map_err(|e| RpcError::internal_error(&e.to_string()))
}

/// List contacts, optionally filtered by a search term or favorites.
pub async fn list_contacts(state: &Arc<DaemonState>, params: &Value) -> Result {
    let directory = state.directory.lock().await;

    let contacts = if flag_param(params, "favorites_only") {
        directory.list_favorites()
    } else if let Some(term) = str_param(params, "search") {
        directory.search(term)
    } else {
        directory.list_all()
    }
    .map_err(directory_error)?;

    to_json(&contacts)
}

/// Fetch one contact with its methods.
pub async fn get_contact(state: &Arc<DaemonState>, params: &Value) -> Result {
    let id = id_param(params)?;
    let directory = state.directory.lock().await;
    match directory.get(id).map_err(directory_error)? {
        Some(contact) => to_json(&contact),
        None => Err(RpcError::contact_not_found(id)),
    }
}

/// Create a contact.
pub async fn create_contact(state: &Arc<DaemonState>, params: &Value) -> Result {
    let draft = draft_param(params)?;
    let directory = state.directory.lock().await;
    let contact = directory.create(&draft).map_err(directory_error)?;
    to_json(&contact)
}

/// Overwrite a contact and its method set.
pub async fn update_contact(state: &Arc<DaemonState>, params: &Value) -> Result {
    let id = id_param(params)?;
    let draft = draft_param(params)?;
    let directory = state.directory.lock().await;
    let contact = directory.update(id, &draft).map_err(directory_error)?;
    to_json(&contact)
}

/// Delete a contact.
pub async fn delete_contact(state: &Arc<DaemonState>, params: &Value) -> Result {
    let id = id_param(params)?;
    let directory = state.directory.lock().await;
    let deleted = directory.delete(id).map_err(directory_error)?;
    Ok(serde_json::json!({"deleted": deleted}))
}

/// Flip a contact's favorite flag.
pub async fn toggle_favorite(state: &Arc<DaemonState>, params: &Value) -> Result {
    let id = id_param(params)?;
    let directory = state.directory.lock().await;
    let contact = directory.toggle_favorite(id).map_err(directory_error)?;
    Ok(serde_json::json!({"id": contact.id, "is_favorite": contact.is_favorite}))
}

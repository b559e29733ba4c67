//! IPC command handlers.
//!
//! Each submodule implements the commands for one IPC category.

pub mod contacts;
pub mod diagnostics;
pub mod transfer;

use contactbook_directory::DirectoryError;
use serde_json::Value;

use crate::rpc::RpcError;

/// Handler outcome: a JSON result or a wire error.
pub(crate) type Result = std::result::Result<Value, RpcError>;

/// Map a directory failure onto its wire error.
pub(crate) fn directory_error(err: DirectoryError) -> RpcError {
    match err {
        DirectoryError::NotFound(id) => RpcError::contact_not_found(id),
        DirectoryError::Validation { field, message } => {
            RpcError::validation_failed(field, &message)
        }
        DirectoryError::Persistence(e) => RpcError::internal_error(&format!("db error: {e}")),
    }
}

/// Required integer `id` parameter.
pub(crate) fn id_param(params: &Value) -> std::result::Result<i64, RpcError> {
    params
        .get("id")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| RpcError::invalid_params("id required"))
}

/// Optional boolean parameter, false when absent.
pub(crate) fn flag_param(params: &Value, key: &str) -> bool {
    params.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
}

/// Optional string parameter.
pub(crate) fn str_param<'a>(params: &'a Value, key: &str) -> Option<&'a str> {
    params.get(key).and_then(|v| v.as_str())
}

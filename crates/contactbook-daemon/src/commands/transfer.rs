//! Spreadsheet import/export command handlers.
//!
//! Workbooks travel either through a file path on the daemon's host or
//! inline as base64 in the request/response.

use std::path::Path;
use std::sync::Arc;

use base64::Engine;
use contactbook_directory::ContactDirectory;
use contactbook_sheet::SheetError;
use serde_json::Value;
use tracing::info;

use super::{directory_error, Result, flag_param, str_param};
use crate::rpc::RpcError;
use crate::DaemonState;

const BASE64: base64::engine::GeneralPurpose = base64::engine::general_purpose::STANDARD;

fn sheet_error(err: SheetError) -> RpcError {
    match err {
        SheetError::Workbook(e) => RpcError::import_failed(&e.to_string()),
        SheetError::Write(e) => RpcError::internal_error(&format!("workbook write error: {e}")),
        SheetError::Directory(e) => directory_error(e),
    }
}

fn is_xlsx(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"))
}

/// Write workbook bytes to `path` if given, else return them inline.
async fn deliver(bytes: Vec<u8>, path: Option<&str>, mut result: Value) -> Result {
    match path {
        Some(path) => {
            tokio::fs::write(path, &bytes)
                .await
                .map_err(|e| RpcError::internal_error(&format!("write {path}: {e}")))?;
            result["path"] = Value::from(path);
        }
        None => {
            result["data_base64"] = Value::from(BASE64.encode(&bytes));
        }
    }
    Ok(result)
}

/// Export contacts (all, or favorites only) to a workbook.
pub async fn export_contacts(state: &Arc<DaemonState>, params: &Value) -> Result {
    let directory = state.directory.lock().await;
    let contacts = if flag_param(params, "favorites_only") {
        directory.list_favorites()
    } else {
        directory.list_all()
    }
    .map_err(directory_error)?;
    drop(directory);

    if contacts.is_empty() {
        return Err(RpcError::nothing_to_export());
    }

    let bytes = contactbook_sheet::export(&contacts).map_err(sheet_error)?;
    info!("Exported {} contacts ({} bytes)", contacts.len(), bytes.len());

    deliver(
        bytes,
        str_param(params, "path"),
        serde_json::json!({"count": contacts.len()}),
    )
    .await
}

/// Import a workbook given by path or inline base64.
pub async fn import_contacts(state: &Arc<DaemonState>, params: &Value) -> Result {
    let bytes = if let Some(path) = str_param(params, "path") {
        if !is_xlsx(Path::new(path)) {
            return Err(RpcError::invalid_params("only .xlsx files can be imported"));
        }
        tokio::fs::read(path)
            .await
            .map_err(|e| RpcError::import_failed(&format!("read {path}: {e}")))?
    } else if let Some(data) = str_param(params, "data_base64") {
        BASE64
            .decode(data)
            .map_err(|e| RpcError::invalid_params(&format!("data_base64: {e}")))?
    } else {
        return Err(RpcError::invalid_params("path or data_base64 required"));
    };

    let directory = state.directory.lock().await;
    let summary = contactbook_sheet::import_into(&*directory, &bytes).map_err(sheet_error)?;
    let report = &summary.report;

    Ok(serde_json::json!({
        "total_count": report.total_count,
        "success_count": report.success_count,
        "error_count": report.error_count(),
        "is_success": report.is_success(),
        "is_structural_failure": report.is_structural_failure(),
        "errors": report.errors,
        "imported": summary.created.len(),
    }))
}

/// Produce the blank import template.
pub async fn download_template(params: &Value) -> Result {
    let bytes = contactbook_sheet::export_template().map_err(sheet_error)?;
    deliver(bytes, str_param(params, "path"), serde_json::json!({})).await
}

use serde_json::json;
use std::path::PathBuf;

use crate::backup;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};

fn required_path(req: &Request, key: &str) -> Result<PathBuf, serde_json::Value> {
    match req.params.get(key).and_then(|v| v.as_str()) {
        Some(v) => Ok(PathBuf::from(v)),
        None => Err(err(
            &req.id,
            "bad_params",
            format!("missing {}", key),
            None,
        )),
    }
}

fn handle_export_bundle(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let workspace = match required_path(req, "workspacePath") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let out_path = match required_path(req, "outPath") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match backup::export_workspace_bundle(&workspace, &out_path) {
        Ok(summary) => {
            tracing::info!(path = %out_path.to_string_lossy(), "workspace bundle exported");
            ok(
                &req.id,
                json!({
                    "bundleFormat": summary.bundle_format,
                    "entryCount": summary.entry_count,
                }),
            )
        }
        Err(e) => err(&req.id, "backup_failed", format!("{e:?}"), None),
    }
}

fn handle_import_bundle(_state: &mut AppState, req: &Request) -> serde_json::Value {
    let workspace = match required_path(req, "workspacePath") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let in_path = match required_path(req, "inPath") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match backup::import_workspace_bundle(&in_path, &workspace) {
        Ok(summary) => {
            tracing::info!(path = %in_path.to_string_lossy(), "workspace bundle imported");
            ok(
                &req.id,
                json!({ "bundleFormatDetected": summary.bundle_format_detected }),
            )
        }
        Err(e) => err(&req.id, "backup_failed", format!("{e:?}"), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "backup.exportWorkspaceBundle" => Some(handle_export_bundle(state, req)),
        "backup.importWorkspaceBundle" => Some(handle_import_bundle(state, req)),
        _ => None,
    }
}

use chrono::Utc;
use serde_json::json;
use std::path::PathBuf;

use crate::export;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};

struct HandlerErr {
    code: &'static str,
    message: String,
    details: Option<serde_json::Value>,
}

impl HandlerErr {
    fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

fn write_text_file(path: &str, contents: &str) -> Result<(), HandlerErr> {
    let out = PathBuf::from(path);
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent).map_err(|e| HandlerErr {
            code: "export_failed",
            message: e.to_string(),
            details: Some(json!({ "path": path })),
        })?;
    }
    std::fs::write(&out, contents).map_err(|e| HandlerErr {
        code: "export_failed",
        message: e.to_string(),
        details: Some(json!({ "path": path })),
    })?;
    Ok(())
}

/// Exports the roster in stored order. The shell re-sends through
/// `students.ranking` first if it wants ranked output written instead.
fn handle_export_csv(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    let records = store.list();
    let Some(csv) = export::export_csv(&records) else {
        return err(&req.id, "empty_export", "no student data to export", None);
    };
    let suggested = export::export_filename(Utc::now());

    let mut result = json!({
        "csv": csv,
        "suggestedFilename": suggested,
        "rowCount": records.len(),
    });
    if let Some(out_path) = req.params.get("outPath").and_then(|v| v.as_str()) {
        if let Err(e) = write_text_file(out_path, &csv) {
            return e.response(&req.id);
        }
        tracing::info!(path = %out_path, rows = records.len(), "csv exported");
        result["path"] = json!(out_path);
    }
    ok(&req.id, result)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "exchange.exportCsv" => Some(handle_export_csv(state, req)),
        _ => None,
    }
}

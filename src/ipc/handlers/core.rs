use anyhow::Context;
use serde_json::json;
use std::path::{Path, PathBuf};

use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::store::{JsonFileStorage, NewStudent, RecordStore};

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string())
        }),
    )
}

/// Points the daemon at a workspace directory, creating it if needed. The
/// roster blob lives inside; all record methods operate on it from here on.
pub fn select_workspace(state: &mut AppState, path: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("failed to create workspace {}", path.to_string_lossy()))?;
    state.store = Some(RecordStore::new(JsonFileStorage::new(path)));
    state.workspace = Some(path.to_path_buf());
    tracing::info!(workspace = %path.to_string_lossy(), "workspace selected");
    Ok(())
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };

    if let Err(e) = select_workspace(state, &path) {
        return err(&req.id, "workspace_open_failed", format!("{e:?}"), None);
    }

    let seed = req
        .params
        .get("seedIfEmpty")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    let mut seeded = false;
    if seed {
        if let Some(store) = state.store.as_ref() {
            if store.list().is_empty() {
                if let Err(e) = seed_sample_roster(store) {
                    return err(&req.id, "save_failed", format!("{e:?}"), None);
                }
                seeded = true;
            }
        }
    }

    ok(
        &req.id,
        json!({ "workspacePath": path.to_string_lossy(), "seeded": seeded }),
    )
}

fn seed_sample_roster(store: &RecordStore<JsonFileStorage>) -> anyhow::Result<()> {
    store.create(NewStudent {
        roll: "R001".to_string(),
        name: "Alice Rao".to_string(),
        class_name: "10A".to_string(),
        marks: [85.0, 92.0, 78.0, 88.0, 90.0],
    })?;
    store.create(NewStudent {
        roll: "R002".to_string(),
        name: "Bikram Singh".to_string(),
        class_name: "10A".to_string(),
        marks: [72.0, 65.0, 70.0, 68.0, 74.0],
    })?;
    Ok(())
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        _ => None,
    }
}

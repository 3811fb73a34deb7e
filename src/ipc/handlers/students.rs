use serde_json::json;

use crate::calc::{self, MARK_COUNT};
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::query;
use crate::store::{NewStudent, StudentPatch};

/// Marks arrive as a JSON array of exactly MARK_COUNT entries; each entry
/// goes through the lenient coercion, so `"abc"` lands as 0 rather than an
/// error. A wrong count is the shell's bug and gets `bad_params`.
fn parse_marks(value: Option<&serde_json::Value>) -> Result<[f64; MARK_COUNT], String> {
    let Some(entries) = value.and_then(|v| v.as_array()) else {
        return Err("missing marks array".to_string());
    };
    if entries.len() != MARK_COUNT {
        return Err(format!("marks must have exactly {} entries", MARK_COUNT));
    }
    let mut marks = [0.0; MARK_COUNT];
    for (slot, entry) in marks.iter_mut().zip(entries.iter()) {
        *slot = calc::coerce_mark(entry);
    }
    Ok(marks)
}

fn required_text(req: &Request, key: &str) -> Result<String, String> {
    let Some(raw) = req.params.get(key).and_then(|v| v.as_str()) else {
        return Err(format!("missing {}", key));
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(format!("{} must not be empty", key));
    }
    Ok(trimmed.to_string())
}

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let query_text = req
        .params
        .get("query")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let records = store.list();
    let students = query::filter(&records, query_text);
    ok(&req.id, json!({ "students": students }))
}

fn handle_ranking(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let students = query::rank(&store.list());
    ok(&req.id, json!({ "students": students }))
}

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    let roll = match required_text(req, "roll") {
        Ok(v) => v,
        Err(msg) => return err(&req.id, "bad_params", msg, None),
    };
    let name = match required_text(req, "name") {
        Ok(v) => v,
        Err(msg) => return err(&req.id, "bad_params", msg, None),
    };
    let class_name = req
        .params
        .get("className")
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let marks = match parse_marks(req.params.get("marks")) {
        Ok(v) => v,
        Err(msg) => return err(&req.id, "bad_params", msg, None),
    };

    // Same-roll records are permitted, but only once the shell has asked the
    // user; the flag is that confirmation.
    let allow_duplicate = req
        .params
        .get("allowDuplicateRoll")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    if !allow_duplicate {
        let roll_lc = roll.to_lowercase();
        if store.list().iter().any(|r| r.roll.to_lowercase() == roll_lc) {
            return err(
                &req.id,
                "duplicate_roll",
                "a student with this roll already exists",
                Some(json!({ "roll": roll })),
            );
        }
    }

    match store.create(NewStudent {
        roll,
        name,
        class_name,
        marks,
    }) {
        Ok(student) => {
            tracing::info!(id = %student.id, roll = %student.roll, "student created");
            ok(&req.id, json!({ "student": student }))
        }
        Err(e) => err(&req.id, "save_failed", format!("{e:?}"), None),
    }
}

fn handle_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let Some(student_id) = req.params.get("studentId").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing studentId", None);
    };
    let Some(patch_fields) = req.params.get("patch").and_then(|v| v.as_object()) else {
        return err(&req.id, "bad_params", "missing patch object", None);
    };

    let mut patch = StudentPatch::default();
    if let Some(v) = patch_fields.get("roll") {
        match v.as_str().map(str::trim) {
            Some(t) if !t.is_empty() => patch.roll = Some(t.to_string()),
            _ => return err(&req.id, "bad_params", "roll must not be empty", None),
        }
    }
    if let Some(v) = patch_fields.get("name") {
        match v.as_str().map(str::trim) {
            Some(t) if !t.is_empty() => patch.name = Some(t.to_string()),
            _ => return err(&req.id, "bad_params", "name must not be empty", None),
        }
    }
    if let Some(v) = patch_fields.get("className") {
        let Some(t) = v.as_str() else {
            return err(&req.id, "bad_params", "className must be a string", None);
        };
        patch.class_name = Some(t.trim().to_string());
    }
    if patch_fields.contains_key("marks") {
        let marks = match parse_marks(patch_fields.get("marks")) {
            Ok(v) => v,
            Err(msg) => return err(&req.id, "bad_params", msg, None),
        };
        // Derivation happens here, at the call site that assembles the
        // patch; the store merges derived fields as given.
        let summary = calc::derive(&marks);
        patch.marks = Some(marks);
        patch.percentage = Some(summary.percentage);
        patch.grade = Some(summary.grade);
    }

    match store.update(student_id, patch) {
        Ok(updated) => ok(&req.id, json!({ "updated": updated })),
        Err(e) => err(&req.id, "save_failed", format!("{e:?}"), None),
    }
}

fn handle_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let Some(student_id) = req.params.get("studentId").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing studentId", None);
    };
    match store.delete(student_id) {
        Ok(deleted) => ok(&req.id, json!({ "deleted": deleted })),
        Err(e) => err(&req.id, "save_failed", format!("{e:?}"), None),
    }
}

fn handle_clear_all(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match store.clear() {
        Ok(()) => {
            tracing::info!("roster cleared");
            ok(&req.id, json!({ "cleared": true }))
        }
        Err(e) => err(&req.id, "save_failed", format!("{e:?}"), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_list(state, req)),
        "students.ranking" => Some(handle_ranking(state, req)),
        "students.create" => Some(handle_create(state, req)),
        "students.update" => Some(handle_update(state, req)),
        "students.delete" => Some(handle_delete(state, req)),
        "roster.clearAll" => Some(handle_clear_all(state, req)),
        _ => None,
    }
}

use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_rosterd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn rosterd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    if value.get("ok").and_then(|v| v.as_bool()) == Some(false) {
        let code = value
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        assert_ne!(
            code, "not_implemented",
            "unexpected unknown method for {}",
            method
        );
    }
    value
}

#[test]
fn router_dispatch_smoke_covers_handler_families() {
    let workspace = temp_dir("rosterd-router-smoke");
    let bundle_out = workspace.join("smoke-backup.roster.zip");
    let csv_out = workspace.join("smoke-export.csv");

    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let health = request(&mut stdin, &mut reader, "1", "health", json!({}));
    assert!(health
        .get("result")
        .and_then(|r| r.get("version"))
        .and_then(|v| v.as_str())
        .is_some());

    let _ = request(
        &mut stdin,
        &mut reader,
        "2",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let created = request(
        &mut stdin,
        &mut reader,
        "3",
        "students.create",
        json!({
            "roll": "R900",
            "name": "Smoke Student",
            "className": "10A",
            "marks": [50, 60, 70, 80, 90]
        }),
    );
    let student_id = created
        .get("result")
        .and_then(|v| v.get("student"))
        .and_then(|v| v.get("id"))
        .and_then(|v| v.as_str())
        .expect("student id")
        .to_string();

    let _ = request(&mut stdin, &mut reader, "4", "students.list", json!({}));
    let _ = request(
        &mut stdin,
        &mut reader,
        "5",
        "students.list",
        json!({ "query": "smoke" }),
    );
    let _ = request(&mut stdin, &mut reader, "6", "students.ranking", json!({}));
    let _ = request(
        &mut stdin,
        &mut reader,
        "7",
        "students.update",
        json!({
            "studentId": student_id,
            "patch": { "name": "Smoke Updated" }
        }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "8",
        "exchange.exportCsv",
        json!({ "outPath": csv_out.to_string_lossy() }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "9",
        "backup.exportWorkspaceBundle",
        json!({
            "workspacePath": workspace.to_string_lossy(),
            "outPath": bundle_out.to_string_lossy()
        }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "10",
        "backup.importWorkspaceBundle",
        json!({
            "workspacePath": workspace.to_string_lossy(),
            "inPath": bundle_out.to_string_lossy()
        }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "11",
        "students.delete",
        json!({ "studentId": student_id }),
    );
    let _ = request(&mut stdin, &mut reader, "12", "roster.clearAll", json!({}));

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}

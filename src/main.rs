mod backup;
mod calc;
mod export;
mod ipc;
mod query;
mod store;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;

/// Sidecar daemon for the student evaluation shell. Speaks line-delimited
/// JSON on stdin/stdout; stderr carries logs so the protocol channel stays
/// clean.
#[derive(Parser)]
#[command(name = "rosterd", version, about = "Student roster sidecar daemon")]
struct Cli {
    /// Workspace directory to select at startup. The shell can still switch
    /// with workspace.select.
    #[arg(long)]
    workspace: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("rosterd=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut state = ipc::AppState::new();
    if let Some(workspace) = cli.workspace {
        if let Err(e) = ipc::select_workspace(&mut state, &workspace) {
            tracing::warn!(error = %e, "startup workspace not selected");
        }
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply without id; send a best-effort error object.
                tracing::warn!(error = %e, "unparseable request line");
                let _ = writeln!(
                    stdout,
                    "{{\"ok\":false,\"error\":{{\"code\":\"bad_json\",\"message\":\"{}\"}}}}",
                    e
                );
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
}

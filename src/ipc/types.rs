use std::path::PathBuf;

use serde::Deserialize;

use crate::store::{JsonFileStorage, RecordStore};

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub store: Option<RecordStore<JsonFileStorage>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            workspace: None,
            store: None,
        }
    }
}

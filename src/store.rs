use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calc::{self, Grade, MARK_COUNT};

pub const ROSTER_FILE: &str = "students.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: String,
    pub roll: String,
    pub name: String,
    #[serde(default)]
    pub class_name: String,
    pub marks: [f64; MARK_COUNT],
    pub percentage: f64,
    pub grade: Grade,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewStudent {
    pub roll: String,
    pub name: String,
    pub class_name: String,
    pub marks: [f64; MARK_COUNT],
}

/// Full-field patch. Derived fields travel with the marks: the call site
/// that changes `marks` supplies the matching `percentage`/`grade`; the
/// store merges without re-deriving.
#[derive(Debug, Clone, Default)]
pub struct StudentPatch {
    pub roll: Option<String>,
    pub name: Option<String>,
    pub class_name: Option<String>,
    pub marks: Option<[f64; MARK_COUNT]>,
    pub percentage: Option<f64>,
    pub grade: Option<Grade>,
}

/// Whole-roster persistence. The backing medium holds one serialized blob;
/// every mutation is a full read-modify-write through this seam.
pub trait Storage {
    /// Missing or unreadable backing data degrades to an empty roster.
    fn load(&self) -> Vec<StudentRecord>;
    fn save(&self, records: &[StudentRecord]) -> anyhow::Result<()>;
}

pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(workspace: &Path) -> Self {
        Self {
            path: roster_path(workspace),
        }
    }
}

pub fn roster_path(workspace: &Path) -> PathBuf {
    workspace.join(ROSTER_FILE)
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Vec<StudentRecord> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_default()
    }

    fn save(&self, records: &[StudentRecord]) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(records).context("serialize roster")?;
        fs::write(&self.path, text)
            .with_context(|| format!("write roster {}", self.path.to_string_lossy()))?;
        Ok(())
    }
}

pub struct RecordStore<S: Storage> {
    storage: S,
}

impl<S: Storage> RecordStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn list(&self) -> Vec<StudentRecord> {
        self.storage.load()
    }

    /// Appends a record with freshly derived percentage/grade and a new id.
    /// Roll collisions are allowed here; the shell decides whether to ask
    /// first.
    pub fn create(&self, fields: NewStudent) -> anyhow::Result<StudentRecord> {
        let summary = calc::derive(&fields.marks);
        let record = StudentRecord {
            id: Uuid::new_v4().to_string(),
            roll: fields.roll,
            name: fields.name,
            class_name: fields.class_name,
            marks: fields.marks,
            percentage: summary.percentage,
            grade: summary.grade,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        };
        let mut records = self.storage.load();
        records.push(record.clone());
        self.storage.save(&records)?;
        Ok(record)
    }

    /// Merges the provided fields into the matching record. An unknown id is
    /// a no-op returning `false`, not an error.
    pub fn update(&self, id: &str, patch: StudentPatch) -> anyhow::Result<bool> {
        let mut records = self.storage.load();
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };
        if let Some(roll) = patch.roll {
            record.roll = roll;
        }
        if let Some(name) = patch.name {
            record.name = name;
        }
        if let Some(class_name) = patch.class_name {
            record.class_name = class_name;
        }
        if let Some(marks) = patch.marks {
            record.marks = marks;
        }
        if let Some(percentage) = patch.percentage {
            record.percentage = percentage;
        }
        if let Some(grade) = patch.grade {
            record.grade = grade;
        }
        self.storage.save(&records)?;
        Ok(true)
    }

    /// Removes the matching record. Unknown id is a no-op returning `false`.
    pub fn delete(&self, id: &str) -> anyhow::Result<bool> {
        let mut records = self.storage.load();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.storage.save(&records)?;
        Ok(true)
    }

    pub fn clear(&self) -> anyhow::Result<()> {
        self.storage.save(&[])
    }
}

use chrono::{DateTime, Utc};

use crate::store::StudentRecord;

pub const CSV_HEADER: &str = "Roll,Name,Class,S1,S2,S3,S4,S5,Percentage,Grade";

/// Serializes the roster in the supplied order. An empty roster is a
/// distinct nothing-to-export outcome, never a header-only document.
pub fn export_csv(records: &[StudentRecord]) -> Option<String> {
    if records.is_empty() {
        return None;
    }
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');
    for r in records {
        let mut fields: Vec<String> = Vec::with_capacity(10);
        fields.push(csv_quote(&r.roll));
        fields.push(csv_quote(&r.name));
        fields.push(csv_quote(&r.class_name));
        for m in &r.marks {
            fields.push(m.to_string());
        }
        fields.push(r.percentage.to_string());
        fields.push(r.grade.letter().to_string());
        csv.push_str(&fields.join(","));
        csv.push('\n');
    }
    Some(csv)
}

pub fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Download name the shell offers for an export: the ISO-8601 second
/// timestamp with `:` and `T` flattened to `-`.
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("students_{}.csv", now.format("%Y-%m-%d-%H-%M-%S"))
}

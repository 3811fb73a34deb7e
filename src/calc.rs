use serde::{Deserialize, Serialize};

/// Every record carries exactly this many subject marks (S1..S5).
pub const MARK_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "F")]
    F,
}

impl Grade {
    pub fn letter(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::C => "C",
            Grade::F => "F",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.letter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkSummary {
    pub percentage: f64,
    pub grade: Grade,
}

/// Lenient mark coercion for shell input: numbers pass through, numeric
/// strings parse, everything else (including non-finite values) becomes 0.
/// Invalid input is never an error.
pub fn coerce_mark(value: &serde_json::Value) -> f64 {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        serde_json::Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Percentage rounds to two decimals on the scaled value, half-up:
/// `round(total / max_total * 10000) / 100`. Grading runs on the rounded
/// percentage, so a raw ratio that rounds up to a boundary takes the
/// boundary's grade.
pub fn derive(marks: &[f64]) -> MarkSummary {
    let mut total = 0.0;
    for m in marks {
        if m.is_finite() {
            total += m;
        }
    }
    let max_total = (marks.len() * 100) as f64;
    let percentage = if max_total > 0.0 {
        ((total / max_total) * 10000.0).round() / 100.0
    } else {
        0.0
    };
    MarkSummary {
        percentage,
        grade: grade_for(percentage),
    }
}

fn grade_for(percentage: f64) -> Grade {
    if percentage >= 90.0 {
        Grade::APlus
    } else if percentage >= 80.0 {
        Grade::A
    } else if percentage >= 70.0 {
        Grade::BPlus
    } else if percentage >= 60.0 {
        Grade::B
    } else if percentage >= 50.0 {
        Grade::C
    } else {
        Grade::F
    }
}

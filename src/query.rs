use std::cmp::Ordering;

use crate::store::StudentRecord;

/// Substring search over name and roll. The query is trimmed and
/// lower-cased; an empty query matches everything. Matches keep their
/// stored relative order.
pub fn filter<'a>(records: &'a [StudentRecord], query: &str) -> Vec<&'a StudentRecord> {
    let q = query.trim().to_lowercase();
    records
        .iter()
        .filter(|r| {
            if q.is_empty() {
                return true;
            }
            r.name.to_lowercase().contains(&q) || r.roll.to_lowercase().contains(&q)
        })
        .collect()
}

/// Percentage-descending ranking. The sort is stable, so equal percentages
/// keep their prior relative order and re-ranking a ranked list is a no-op.
pub fn rank(records: &[StudentRecord]) -> Vec<StudentRecord> {
    let mut ranked = records.to_vec();
    ranked.sort_by(|a, b| {
        b.percentage
            .partial_cmp(&a.percentage)
            .unwrap_or(Ordering::Equal)
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::Grade;

    fn record(roll: &str, name: &str, percentage: f64) -> StudentRecord {
        StudentRecord {
            id: format!("id-{roll}"),
            roll: roll.to_string(),
            name: name.to_string(),
            class_name: "10A".to_string(),
            marks: [0.0; 5],
            percentage,
            grade: Grade::F,
            created_at: "2025-09-01T00:00:00Z".to_string(),
        }
    }

    fn roster() -> Vec<StudentRecord> {
        vec![
            record("R001", "Alice Rao", 86.6),
            record("R002", "Bikram Singh", 69.8),
            record("R003", "Carla Alim", 69.8),
            record("R004", "Dev Kumar", 92.0),
        ]
    }

    #[test]
    fn empty_query_is_identity() {
        let records = roster();
        let out = filter(&records, "");
        assert_eq!(out.len(), records.len());
        for (got, want) in out.iter().zip(records.iter()) {
            assert_eq!(got.id, want.id);
        }
    }

    #[test]
    fn whitespace_query_is_identity() {
        let records = roster();
        assert_eq!(filter(&records, "   ").len(), records.len());
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let records = roster();
        let out = filter(&records, "ali");
        let names: Vec<&str> = out.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alice Rao", "Carla Alim"]);

        let out = filter(&records, "r00");
        assert_eq!(out.len(), 4, "roll matches too");

        assert!(filter(&records, "zzz").is_empty());
    }

    #[test]
    fn filter_matches_roll() {
        let records = roster();
        let out = filter(&records, "R004");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Dev Kumar");
    }

    #[test]
    fn rank_orders_by_percentage_descending() {
        let records = roster();
        let ranked = rank(&records);
        let percentages: Vec<f64> = ranked.iter().map(|r| r.percentage).collect();
        assert_eq!(percentages, vec![92.0, 86.6, 69.8, 69.8]);
    }

    #[test]
    fn rank_ties_keep_stored_order() {
        let ranked = rank(&roster());
        assert_eq!(ranked[2].roll, "R002");
        assert_eq!(ranked[3].roll, "R003");
    }

    #[test]
    fn rank_is_idempotent() {
        let once = rank(&roster());
        let twice = rank(&once);
        assert_eq!(once, twice);
    }
}

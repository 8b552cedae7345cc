//! Roster-level invariants that a single record cannot express.

use std::collections::HashSet;

use crate::core::validation::validate_input;
use crate::technician::Technician;

/// Check invariants over a whole roster:
/// - ids are non-empty and unique
/// - `createdAt <= updatedAt`
/// - every record satisfies the field constraints
pub fn validate_roster(records: &[Technician]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, record) in records.iter().enumerate() {
        let label = record_label(index, record);

        if record.id.is_empty() {
            errors.push(format!("{}: id must not be empty", label));
        } else if !seen.insert(record.id.as_str()) {
            errors.push(format!("duplicate id '{}' at {}", record.id, label));
        }

        if record.created_at > record.updated_at {
            errors.push(format!(
                "{}: createdAt {} is after updatedAt {}",
                label,
                record.created_at.to_rfc3339(),
                record.updated_at.to_rfc3339()
            ));
        }

        for violation in validate_input(&record.to_input()) {
            errors.push(format!("{}: {}", label, violation));
        }
    }

    errors
}

fn record_label(index: usize, record: &Technician) -> String {
    if record.id.is_empty() {
        format!("technicians[{}]", index)
    } else {
        format!("technicians[{}] ({})", index, record.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{at, tech};

    #[test]
    fn valid_roster_has_no_errors() {
        let roster = vec![tech("a", "Ana"), tech("b", "Bruno")];
        assert!(validate_roster(&roster).is_empty());
    }

    #[test]
    fn reports_duplicate_ids_and_inverted_stamps() {
        let mut late = tech("b", "Bruno");
        late.created_at = at(200);
        late.updated_at = at(100);
        let roster = vec![tech("a", "Ana"), tech("a", "Ana again"), late];

        let errors = validate_roster(&roster);
        assert!(errors.iter().any(|err| err.contains("duplicate id 'a'")));
        assert!(errors.iter().any(|err| err.contains("createdAt")));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn reports_field_violations_with_record_label() {
        let mut bad = tech("x", "");
        bad.rating = 9.0;
        let errors = validate_roster(&[bad]);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|err| err.starts_with("technicians[0] (x)")));
    }

    #[test]
    fn reports_empty_id() {
        let errors = validate_roster(&[tech("", "Ana")]);
        assert_eq!(errors, vec!["technicians[0]: id must not be empty".to_string()]);
    }
}

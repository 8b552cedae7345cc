//! Field constraints for technician input.

use crate::technician::NewTechnician;

pub const MAX_RATING: f64 = 5.0;

/// Check field constraints for a create or update request:
/// - `name` is non-empty after trimming
/// - minute metrics are finite and non-negative
/// - `rating` is finite and within `[0, 5]`
///
/// Returns one message per violation, in field order.
pub fn validate_input(input: &NewTechnician) -> Vec<String> {
    let mut errors = Vec::new();

    if input.name.trim().is_empty() {
        errors.push("name must not be empty".to_string());
    }

    check_minutes("avgServiceTime", input.avg_service_time, &mut errors);
    check_minutes("firstResponseTime", input.first_response_time, &mut errors);

    if !input.rating.is_finite() || !(0.0..=MAX_RATING).contains(&input.rating) {
        errors.push(format!(
            "rating must be within [0, {}], got {}",
            MAX_RATING, input.rating
        ));
    }

    errors
}

fn check_minutes(field: &str, value: f64, errors: &mut Vec<String>) {
    if !value.is_finite() || value < 0.0 {
        errors.push(format!("{field} must be a non-negative number, got {value}"));
    }
}

//! Small numeric helpers shared by the scorers and analytics

/// Round to one decimal place, halves away from zero
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to the nearest integer with halves going up (`2.5 -> 3`, `-2.5 -> -2`)
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

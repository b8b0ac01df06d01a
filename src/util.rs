/// Percentage of `part` in `whole`, rounded to one decimal place.
/// Returns 0.0 when `whole` is zero.
pub fn percentage(part: usize, whole: usize) -> f64 {
    match whole {
        positive if positive > 0 => round1(part as f64 / whole as f64 * 100.0),
        _ => 0.0,
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Rounds to 2 decimal places. All monetary figures leaving this backend go
/// through here so per-position numbers and totals agree with the frontend.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

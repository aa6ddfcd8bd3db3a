use super::config::RoundingMode;

/// Rescale a raw total onto 0-100 against `max_possible_score`, rounded to
/// two decimals. Out-of-range inputs map out of range; nothing is clamped.
pub fn scale_score(raw: f64, max_possible_score: f64, rounding: RoundingMode) -> f64 {
    round_to_cents(raw / max_possible_score * 100.0, rounding)
}

/// Round to two decimal places, deciding against the exact binary value of
/// `value` rather than the already-rounded product `value * 100`.
pub fn round_to_cents(value: f64, rounding: RoundingMode) -> f64 {
    let lower = (value * 100.0).floor();
    // Single rounding, so the sign of `value * 100 - (lower + 0.5)` is exact.
    let diff = value.mul_add(100.0, -(lower + 0.5));
    let cents = if diff > 0.0 {
        lower + 1.0
    } else if diff < 0.0 {
        lower
    } else {
        match rounding {
            RoundingMode::HalfEven if lower % 2.0 == 0.0 => lower,
            RoundingMode::HalfEven | RoundingMode::HalfUp => lower + 1.0,
        }
    };
    cents / 100.0
}

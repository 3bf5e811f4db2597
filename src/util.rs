use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Formats an axis value with a precision suited to the tick spacing.
pub fn format_value(value: f64, step: f64) -> String {
    if !value.is_finite() {
        return "NaN".to_owned();
    }

    let decimals = if step >= 1.0 || step <= 0.0 {
        0
    } else {
        (-step.log10().floor()) as usize
    };
    let value = if value.abs() < step * 1e-6 { 0.0 } else { value };
    format!("{value:.decimals$}")
}

/// Tick spacing of 1, 2 or 5 times a power of ten, close to `span / target_ticks`.
pub fn nice_tick_step(span: f64, target_ticks: usize) -> f64 {
    if !span.is_finite() || span <= 0.0 || target_ticks == 0 {
        return 1.0;
    }

    let raw = span / target_ticks as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let nice = if residual < 1.5 {
        1.0
    } else if residual < 3.5 {
        2.0
    } else if residual < 7.5 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Deterministic pair in [-1, 1]² derived from a key.
pub fn stable_pair(key: impl Hash) -> (f64, f64) {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    let hash = hasher.finish();

    let x = (hash & 0xffff_ffff) as f64 / u32::MAX as f64;
    let y = ((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_steps_are_round() {
        assert_eq!(nice_tick_step(100.0, 10), 10.0);
        assert_eq!(nice_tick_step(7.0, 10), 0.5);
        assert_eq!(nice_tick_step(0.0, 10), 1.0);
        assert_eq!(nice_tick_step(f64::NAN, 10), 1.0);
    }

    #[test]
    fn values_follow_step_precision() {
        assert_eq!(format_value(12.0, 5.0), "12");
        assert_eq!(format_value(0.25, 0.05), "0.25");
        assert_eq!(format_value(f64::NAN, 1.0), "NaN");
    }

    #[test]
    fn stable_pair_is_deterministic_and_bounded() {
        let (x, y) = stable_pair(("track", 3));
        assert_eq!((x, y), stable_pair(("track", 3)));
        assert!((-1.0..=1.0).contains(&x));
        assert!((-1.0..=1.0).contains(&y));
    }
}

//! Shared helpers: value mapping and time sources.

pub mod clock;

// -------------------------------------------------------------------------------------------------

/// Linearly maps `value` from range `in_min..in_max` into range `out_min..out_max`.
///
/// Values outside of the input range are extrapolated, not clamped. A degenerate input
/// range (`in_min == in_max`) maps everything to `out_min`.
pub fn map_range(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    let in_range = in_max - in_min;
    if in_range == 0.0 {
        return out_min;
    }
    (value - in_min) * (out_max - out_min) / in_range + out_min
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_range_endpoints() {
        assert_eq!(map_range(-1.0, -1.0, 1.0, 0.0, 1.0), 0.0);
        assert_eq!(map_range(1.0, -1.0, 1.0, 0.0, 1.0), 1.0);
        assert_eq!(map_range(20.0, 20.0, 80.0, -5.0, 5.0), -5.0);
        assert_eq!(map_range(80.0, 20.0, 80.0, -5.0, 5.0), 5.0);
    }

    #[test]
    fn map_range_linearity() {
        assert_eq!(map_range(0.0, -1.0, 1.0, 0.0, 1.0), 0.5);
        assert_eq!(map_range(500.0, 0.0, 2000.0, 0.0, 1.0), 0.25);
        assert_eq!(map_range(50.0, 20.0, 80.0, 0.0, 1.0), 0.5);
        // inverted output range
        assert_eq!(map_range(0.25, 0.0, 1.0, 1.0, 0.0), 0.75);
    }

    #[test]
    fn map_range_degenerate_input() {
        let value = map_range(12.0, 0.0, 0.0, 0.0, 1.0);
        assert_eq!(value, 0.0);
        assert!(!value.is_nan());
    }
}

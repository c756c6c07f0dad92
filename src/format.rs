//! Text shown next to route previews.

/// Placeholder for a missing or invalid value.
pub const MISSING: &str = "—";

/// Elapsed time as `05m07s`, or `01h02m03s` from one hour up.
///
/// Fractions of a second are dropped. Anything but a finite value of zero
/// or more gives [`MISSING`].
pub fn duration(seconds: Option<f64>) -> String {
    let Some(seconds) = seconds.filter(|s| s.is_finite() && *s >= 0.0) else {
        return MISSING.to_string();
    };

    let total = seconds.floor() as u64;
    let (hours, minutes, seconds) = (total / 3600, total % 3600 / 60, total % 60);
    if hours > 0 {
        format!("{hours:02}h{minutes:02}m{seconds:02}s")
    } else {
        format!("{minutes:02}m{seconds:02}s")
    }
}

/// Pace in seconds per kilometre as `4'05''`.
///
/// Seconds are rounded to the nearest whole second; a value that rounds to
/// 60 rolls over into the next minute. Anything but a positive finite
/// value gives [`MISSING`].
pub fn pace(seconds_per_km: Option<f64>) -> String {
    let Some(pace) = seconds_per_km.filter(|s| s.is_finite() && *s > 0.0) else {
        return MISSING.to_string();
    };

    let total = pace.round() as u64;
    format!("{}'{:02}''", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_under_an_hour() {
        assert_eq!(duration(Some(307.0)), "05m07s");
        assert_eq!(duration(Some(0.0)), "00m00s");
        assert_eq!(duration(Some(59.9)), "00m59s");
    }

    #[test]
    fn test_duration_with_hours() {
        assert_eq!(duration(Some(3723.0)), "01h02m03s");
        assert_eq!(duration(Some(36000.0)), "10h00m00s");
    }

    #[test]
    fn test_duration_missing_or_invalid() {
        assert_eq!(duration(None), MISSING);
        assert_eq!(duration(Some(-1.0)), MISSING);
        assert_eq!(duration(Some(f64::NAN)), MISSING);
    }

    #[test]
    fn test_pace() {
        assert_eq!(pace(Some(245.0)), "4'05''");
        assert_eq!(pace(Some(300.4)), "5'00''");
        assert_eq!(pace(Some(59.6)), "1'00''");
    }

    #[test]
    fn test_pace_missing_or_invalid() {
        assert_eq!(pace(None), MISSING);
        assert_eq!(pace(Some(0.0)), MISSING);
        assert_eq!(pace(Some(-300.0)), MISSING);
        assert_eq!(pace(Some(f64::INFINITY)), MISSING);
    }
}

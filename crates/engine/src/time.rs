use crate::error::{EngineError, Result};

/// Validates a `[start, end)` range in seconds.
///
/// Both bounds must be finite, `start` must be non-negative and strictly
/// before `end`.
///
/// # Example
/// ```
/// use engine::time::ensure_range;
///
/// assert!(ensure_range(5.0, 15.0).is_ok());
/// assert!(ensure_range(15.0, 15.0).is_err());
/// ```
pub fn ensure_range(start: f64, end: f64) -> Result<()> {
    if !start.is_finite() || !end.is_finite() || start < 0.0 || start >= end {
        return Err(EngineError::InvalidRange { start, end });
    }
    Ok(())
}

/// Clamps a playhead position into `[0, duration]`.
pub fn clamp_playhead(seconds: f64, duration: f64) -> f64 {
    if seconds.is_nan() {
        return 0.0;
    }
    seconds.clamp(0.0, duration.max(0.0))
}

/// Converts a human-friendly timestamp into seconds.
///
/// Accepted shapes are `SS`, `MM:SS` and `HH:MM:SS`, where the last
/// component may carry up to three fractional digits.
///
/// # Example
/// ```
/// use engine::time::parse_timestamp;
///
/// assert_eq!(parse_timestamp("1:08").unwrap(), 68.0);
/// assert_eq!(parse_timestamp("00:05").unwrap(), 5.0);
/// ```
pub fn parse_timestamp(input: &str) -> Result<f64> {
    let invalid = || EngineError::InvalidTimestamp {
        input: input.to_string(),
    };

    let trimmed = input.trim();
    let parts: Vec<&str> = trimmed.split(':').collect();
    if parts.is_empty() || parts.len() > 3 {
        return Err(invalid());
    }

    let (last, leading) = parts.split_last().ok_or_else(invalid)?;
    let (whole, fraction) = match last.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (*last, None),
    };

    let mut seconds = 0.0;
    for (index, part) in leading.iter().enumerate() {
        // Only the leading component may be wider than two digits.
        if index > 0 && part.len() > 2 {
            return Err(invalid());
        }
        seconds = seconds * 60.0 + parse_digits(part).ok_or_else(invalid)?;
    }

    if !leading.is_empty() && whole.len() > 2 {
        return Err(invalid());
    }
    seconds = seconds * 60.0 + parse_digits(whole).ok_or_else(invalid)?;

    if let Some(fraction) = fraction {
        if fraction.len() > 3 {
            return Err(invalid());
        }
        let digits = parse_digits(fraction).ok_or_else(invalid)?;
        seconds += digits / 10f64.powi(fraction.len() as i32);
    }

    Ok(seconds)
}

/// Formats seconds as zero-padded `mm:ss`.
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() {
        seconds.max(0.0).floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

fn parse_digits(part: &str) -> Option<f64> {
    if part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    part.parse::<u64>().ok().map(|value| value as f64)
}

#[cfg(test)]
mod tests {
    use super::{clamp_playhead, ensure_range, format_timestamp, parse_timestamp};
    use crate::error::EngineError;

    #[test]
    fn ensure_range_rejects_reversed_and_negative_ranges() {
        assert!(matches!(
            ensure_range(10.0, 5.0),
            Err(EngineError::InvalidRange { .. })
        ));
        assert!(ensure_range(-1.0, 5.0).is_err());
        assert!(ensure_range(0.0, f64::INFINITY).is_err());
        assert!(ensure_range(0.0, 0.5).is_ok());
    }

    #[test]
    fn clamp_playhead_keeps_position_inside_duration() {
        assert_eq!(clamp_playhead(-3.0, 20.0), 0.0);
        assert_eq!(clamp_playhead(25.0, 20.0), 20.0);
        assert_eq!(clamp_playhead(7.5, 20.0), 7.5);
        assert_eq!(clamp_playhead(f64::NAN, 20.0), 0.0);
        assert_eq!(clamp_playhead(4.0, 0.0), 0.0);
    }

    #[test]
    fn parse_timestamp_handles_common_shapes() {
        assert_eq!(parse_timestamp("20").expect("seconds"), 20.0);
        assert_eq!(parse_timestamp("0:20").expect("mm:ss"), 20.0);
        assert_eq!(parse_timestamp("1:30").expect("mm:ss"), 90.0);
        assert_eq!(parse_timestamp("1:00:05").expect("hh:mm:ss"), 3605.0);
        let fractional = parse_timestamp("1:08.37").expect("fractional");
        assert!((fractional - 68.37).abs() < 1e-9);
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        for input in ["", "abc", "1:2:3:4", "1:234", "5.1234", "-3", "1:", ":30"] {
            assert!(
                matches!(
                    parse_timestamp(input),
                    Err(EngineError::InvalidTimestamp { .. })
                ),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn format_timestamp_pads_minutes_and_seconds() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(65.9), "01:05");
        assert_eq!(format_timestamp(-2.0), "00:00");
    }
}

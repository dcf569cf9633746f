//! Countdown display formatting.

/// Convert total seconds into `HH:MM:SS`.
///
/// Each field is zero-padded to two digits; the hours field widens on its
/// own past 99 hours.
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_is_all_zeros() {
        assert_eq!(format_hms(0), "00:00:00");
    }

    #[test]
    fn under_a_minute() {
        assert_eq!(format_hms(59), "00:00:59");
    }

    #[test]
    fn full_countdown_length() {
        assert_eq!(format_hms(4500), "01:15:00");
    }

    #[test]
    fn each_field_populated() {
        assert_eq!(format_hms(3661), "01:01:01");
    }

    #[test]
    fn hours_field_widens_past_99() {
        assert_eq!(format_hms(360_000), "100:00:00");
    }

    proptest! {
        #[test]
        fn fields_recompose_to_input(secs in 0u64..360_000) {
            let text = format_hms(secs);
            let parts: Vec<u64> = text
                .split(':')
                .map(|p| p.parse().unwrap())
                .collect();
            prop_assert_eq!(parts.len(), 3);
            prop_assert!(parts[1] < 60 && parts[2] < 60);
            prop_assert_eq!(parts[0] * 3600 + parts[1] * 60 + parts[2], secs);
        }
    }
}

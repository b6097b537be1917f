use std::time::Duration;

/// Legacy "H:MM" battery-time format: whole hours, minutes zero-padded to
/// two digits when below ten.
pub fn format_hours_minutes(duration: Duration) -> String {
    let total_minutes = duration.as_secs() / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    format!("{hours}:{minutes:02}")
}

pub fn format_gib(gib: f64) -> String {
    format!("{gib:.2}GB")
}

pub fn format_watts(watts: f64) -> String {
    format!("{watts:3.2}W")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_below_ten_are_zero_padded() {
        assert_eq!(format_hours_minutes(Duration::from_secs(5 * 3600)), "5:00");
        assert_eq!(
            format_hours_minutes(Duration::from_secs(3600 + 9 * 60)),
            "1:09"
        );
    }

    #[test]
    fn minutes_ten_and_up_are_not_padded() {
        assert_eq!(
            format_hours_minutes(Duration::from_secs(2 * 3600 + 10 * 60)),
            "2:10"
        );
        assert_eq!(
            format_hours_minutes(Duration::from_secs(59 * 60)),
            "0:59"
        );
    }

    #[test]
    fn seconds_truncate_toward_zero() {
        assert_eq!(format_hours_minutes(Duration::from_secs(59)), "0:00");
        assert_eq!(format_hours_minutes(Duration::from_secs(61)), "0:01");
    }

    #[test]
    fn gib_and_watts_use_two_decimals() {
        assert_eq!(format_gib(7.5), "7.50GB");
        assert_eq!(format_watts(12.345), "12.35W");
    }
}

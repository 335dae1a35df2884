use std::time::Duration;

pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Size in megabytes rounded to two decimals, for log output.
pub fn megabytes(bytes: u64) -> f64 {
    let mb = bytes as f64 / 1_048_576.0;
    (mb * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn format_duration_zero() {
        assert_eq!(format_duration(Duration::from_secs(0)), "00:00:00");
    }

    #[test]
    fn format_duration_rollover() {
        assert_eq!(format_duration(Duration::from_secs(61)), "00:01:01");
        assert_eq!(format_duration(Duration::from_secs(3661)), "01:01:01");
    }

    #[test]
    fn megabytes_rounds_to_two_decimals() {
        assert_eq!(megabytes(0), 0.0);
        assert_eq!(megabytes(1_048_576), 1.0);
        assert_eq!(megabytes(1_300_000), 1.24);
    }
}

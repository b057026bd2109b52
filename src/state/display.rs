//! Display projection of timer state

use super::TimerStatus;

/// `HH:MM:SS` of a configured duration; hours are not wrapped at 24
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// `HH:MM:SS.d` of a remaining time in milliseconds
pub fn format_remaining(remaining_ms: u64) -> String {
    let deciseconds = (remaining_ms % 1000) / 100;
    format!("{}.{}", format_duration(remaining_ms / 1000), deciseconds)
}

/// Pick the format for the current status
pub fn project(status: TimerStatus, total_seconds: u64, remaining_ms: u64) -> String {
    match status {
        TimerStatus::Idle => format_duration(total_seconds),
        TimerStatus::Running => format_remaining(remaining_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_format() {
        assert_eq!(format_duration(0), "00:00:00");
        assert_eq!(format_duration(3661), "01:01:01");
        assert_eq!(format_duration(59), "00:00:59");
    }

    #[test]
    fn hours_are_unbounded() {
        assert_eq!(format_duration(100 * 3600 + 5), "100:00:05");
        assert_eq!(format_duration(25 * 3600), "25:00:00");
    }

    #[test]
    fn running_format_truncates_to_deciseconds() {
        assert_eq!(format_remaining(3_725_000), "01:02:05.0");
        assert_eq!(format_remaining(5050), "00:00:05.0");
        assert_eq!(format_remaining(5199), "00:00:05.1");
        assert_eq!(format_remaining(999), "00:00:00.9");
        assert_eq!(format_remaining(0), "00:00:00.0");
    }

    #[test]
    fn projection_depends_on_status() {
        assert_eq!(project(TimerStatus::Idle, 3725, 100), "01:02:05");
        assert_eq!(project(TimerStatus::Running, 3725, 3_725_000), "01:02:05.0");
    }
}

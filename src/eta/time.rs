use std::time::Duration;

/// Formats a duration as `0:SS`, `M:SS` or `H:MM:SS`. Sub-second parts are
/// dropped.
pub fn pretty_time(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (hours, rest) = (secs / 3600, secs % 3600);
    let (mins, secs) = (rest / 60, rest % 60);

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}

/// Same as [`pretty_time`] but blank when there is nothing to show yet.
pub fn pretty_eta(duration: Option<Duration>) -> String {
    duration.map(pretty_time).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> String {
        pretty_time(Duration::from_secs(n))
    }

    #[test]
    fn under_a_minute() {
        assert_eq!(secs(0), "0:00");
        assert_eq!(secs(45), "0:45");
        assert_eq!(secs(59), "0:59");
    }

    #[test]
    fn minutes() {
        assert_eq!(secs(60), "1:00");
        assert_eq!(secs(125), "2:05");
        assert_eq!(secs(3599), "59:59");
    }

    #[test]
    fn hours() {
        assert_eq!(secs(3600), "1:00:00");
        assert_eq!(secs(3725), "1:02:05");
        assert_eq!(secs(36_000 + 61), "10:01:01");
    }

    #[test]
    fn fractions_are_truncated() {
        assert_eq!(pretty_time(Duration::from_millis(45_999)), "0:45");
    }

    #[test]
    fn missing_eta_is_blank() {
        assert_eq!(pretty_eta(None), "");
        assert_eq!(pretty_eta(Some(Duration::from_secs(3))), "0:03");
    }
}

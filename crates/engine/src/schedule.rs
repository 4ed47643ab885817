use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

/// The next candle-close boundary strictly after `now`, UTC-aligned.
///
/// Boundaries are multiples of the interval since the Unix epoch, which
/// matches the exchange's kline alignment for intraday intervals.
pub fn next_close(now: DateTime<Utc>, interval: Duration) -> DateTime<Utc> {
    let secs = interval.as_secs() as i64;
    let next = (now.timestamp().div_euclid(secs) + 1) * secs;
    Utc.timestamp_opt(next, 0).unwrap()
}

/// How long to sleep until the next boundary of `interval`.
pub fn until_next_close(interval: Duration) -> Duration {
    let now = Utc::now();
    (next_close(now, interval) - now)
        .to_std()
        .unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, h, m, s).unwrap()
    }

    #[test]
    fn five_minute_boundaries_are_aligned() {
        let interval = Duration::from_secs(300);
        assert_eq!(next_close(at(10, 2, 17), interval), at(10, 5, 0));
        assert_eq!(next_close(at(10, 4, 59), interval), at(10, 5, 0));
    }

    #[test]
    fn exact_boundary_schedules_the_following_close() {
        let interval = Duration::from_secs(300);
        assert_eq!(next_close(at(10, 5, 0), interval), at(10, 10, 0));
    }

    #[test]
    fn hourly_boundaries_land_on_the_hour() {
        let interval = Duration::from_secs(3600);
        assert_eq!(next_close(at(10, 59, 59), interval), at(11, 0, 0));
        assert_eq!(next_close(at(10, 0, 1), interval), at(11, 0, 0));
    }

    #[test]
    fn wait_never_exceeds_the_interval() {
        let interval = Duration::from_secs(300);
        let wait = until_next_close(interval);
        assert!(wait <= interval);
    }
}

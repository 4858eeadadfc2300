//! The calendar-year window a report covers.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// One calendar year, `Jan 1 00:00:00` through `Dec 31 23:59:59` UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearWindow {
    year: i32,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl YearWindow {
    /// Window for `year`, or `None` if chrono cannot represent it.
    pub fn new(year: i32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)?
            .and_hms_opt(0, 0, 0)?
            .and_utc();
        let end = NaiveDate::from_ymd_opt(year, 12, 31)?
            .and_hms_opt(23, 59, 59)?
            .and_utc();
        Some(Self { year, start, end })
    }

    /// Window for the current year.
    pub fn current() -> Self {
        let year = Utc::now().year();
        // The current year is always representable.
        Self::new(year).unwrap_or(Self {
            year,
            start: DateTime::<Utc>::MIN_UTC,
            end: DateTime::<Utc>::MAX_UTC,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Inclusive start.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Inclusive end.
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Start as the RFC 3339 string GitHub's `DateTime` scalar expects.
    pub fn from_param(&self) -> String {
        self.start.to_rfc3339()
    }

    /// End as the RFC 3339 string GitHub's `DateTime` scalar expects.
    pub fn to_param(&self) -> String {
        self.end.to_rfc3339()
    }

    /// Whether an RFC 3339 timestamp falls inside the window.
    pub fn contains(&self, timestamp: &str) -> bool {
        DateTime::parse_from_rfc3339(timestamp)
            .map(|ts| {
                let ts = ts.with_timezone(&Utc);
                ts >= self.start && ts <= self.end
            })
            .unwrap_or(false)
    }

    /// Whether an RFC 3339 timestamp is strictly before the window start.
    /// Unparseable timestamps are not.
    pub fn is_before_start(&self, timestamp: &str) -> bool {
        DateTime::parse_from_rfc3339(timestamp)
            .map(|ts| ts.with_timezone(&Utc) < self.start)
            .unwrap_or(false)
    }

    /// Display name, e.g. "2025".
    pub fn display_name(&self) -> String {
        self.year.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_bounds() {
        let window = YearWindow::new(2024).unwrap();
        assert_eq!(window.from_param(), "2024-01-01T00:00:00+00:00");
        assert_eq!(window.to_param(), "2024-12-31T23:59:59+00:00");
        assert_eq!(window.display_name(), "2024");
    }

    #[test]
    fn test_contains_and_before_start() {
        let window = YearWindow::new(2024).unwrap();
        assert!(window.contains("2024-12-31T23:59:59Z"));
        assert!(!window.contains("2025-01-01T00:00:00Z"));
        assert!(window.is_before_start("2023-12-31T23:59:59Z"));
        assert!(!window.is_before_start("2024-03-01T00:00:00Z"));
        assert!(!window.is_before_start("garbage"));
    }

    #[test]
    fn test_unrepresentable_year() {
        assert!(YearWindow::new(i32::MAX).is_none());
    }
}

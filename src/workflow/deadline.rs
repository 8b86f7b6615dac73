//! Compliance period deadline arithmetic
//!
//! A compliance period is a calendar year. Reports may be returned to the
//! supplier until the start of the following year plus a grace window.
//! Everything here is derived from the clock reading passed in, so a report
//! opened years after its period is always past the deadline.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;

pub const DEFAULT_GRACE_PERIOD_DAYS: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplianceDeadline {
    grace_period_days: u32,
}

impl Default for ComplianceDeadline {
    fn default() -> Self {
        Self::new(DEFAULT_GRACE_PERIOD_DAYS)
    }
}

impl ComplianceDeadline {
    pub fn new(grace_period_days: u32) -> Self {
        Self { grace_period_days }
    }

    pub fn grace_period_days(&self) -> u32 {
        self.grace_period_days
    }

    /// Start of the year after `compliance_period`, plus the grace window
    pub fn deadline_for(&self, compliance_period: &str) -> Option<DateTime<Utc>> {
        let year = parse_period(compliance_period)?;
        let next_year = year.checked_add(1)?;
        let start = NaiveDate::from_ymd_opt(next_year, 1, 1)?
            .and_hms_opt(0, 0, 0)?
            .and_utc();
        start.checked_add_signed(Duration::days(i64::from(self.grace_period_days)))
    }

    /// Unparseable periods count as past: late transitions stay unavailable
    pub fn is_past(&self, compliance_period: &str, now: DateTime<Utc>) -> bool {
        match self.deadline_for(compliance_period) {
            Some(deadline) => now > deadline,
            None => {
                tracing::warn!(compliance_period, "Unrecognised compliance period");
                true
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub fn number(&self) -> u8 {
        match self {
            Quarter::Q1 => 1,
            Quarter::Q2 => 2,
            Quarter::Q3 => 3,
            Quarter::Q4 => 4,
        }
    }

    fn from_month(month: u32) -> Self {
        match month {
            1..=3 => Quarter::Q1,
            4..=6 => Quarter::Q2,
            7..=9 => Quarter::Q3,
            _ => Quarter::Q4,
        }
    }
}

/// Quarter an early-issuance report is currently reporting on.
/// Once the period's year is over this stays at Q4 regardless of how
/// many years have passed.
pub fn reporting_quarter(compliance_period: &str, now: DateTime<Utc>) -> Option<Quarter> {
    let year = parse_period(compliance_period)?;
    let quarter = if now.year() > year {
        Quarter::Q4
    } else if now.year() < year {
        Quarter::Q1
    } else {
        Quarter::from_month(now.month())
    };
    Some(quarter)
}

fn parse_period(compliance_period: &str) -> Option<i32> {
    compliance_period.trim().parse::<i32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_deadline_is_next_year_plus_grace() {
        let deadline = ComplianceDeadline::new(90);
        let expected = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
        assert_eq!(deadline.deadline_for("2024"), Some(expected));

        let no_grace = ComplianceDeadline::new(0);
        let expected = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(no_grace.deadline_for(" 2024 "), Some(expected));
    }

    #[test]
    fn test_is_past_around_boundary() {
        let deadline = ComplianceDeadline::new(90);

        assert!(!deadline.is_past("2024", at(2024, 6, 1)));
        assert!(!deadline.is_past("2024", at(2025, 3, 31)));
        assert!(deadline.is_past("2024", at(2025, 4, 1)));
    }

    #[test]
    fn test_long_closed_period_stays_past() {
        let deadline = ComplianceDeadline::default();

        // Viewed in later years, including the same calendar quarter
        assert!(deadline.is_past("2020", at(2021, 6, 1)));
        assert!(deadline.is_past("2020", at(2026, 1, 15)));
        assert!(deadline.is_past("2020", at(2031, 2, 1)));
    }

    #[test]
    fn test_malformed_period_is_past() {
        let deadline = ComplianceDeadline::default();
        assert!(deadline.is_past("", at(2024, 1, 1)));
        assert!(deadline.is_past("twenty-twenty", at(2024, 1, 1)));
        assert_eq!(deadline.deadline_for("abc"), None);
    }

    #[test]
    fn test_reporting_quarter_within_period() {
        assert_eq!(reporting_quarter("2025", at(2025, 2, 10)), Some(Quarter::Q1));
        assert_eq!(reporting_quarter("2025", at(2025, 5, 10)), Some(Quarter::Q2));
        assert_eq!(reporting_quarter("2025", at(2025, 8, 10)), Some(Quarter::Q3));
        assert_eq!(reporting_quarter("2025", at(2025, 11, 10)), Some(Quarter::Q4));
    }

    #[test]
    fn test_reporting_quarter_clamps_after_period() {
        // Early months of a later year must not read as Q1
        assert_eq!(reporting_quarter("2024", at(2025, 1, 5)), Some(Quarter::Q4));
        assert_eq!(reporting_quarter("2020", at(2026, 2, 1)), Some(Quarter::Q4));
        assert_eq!(reporting_quarter("2027", at(2026, 7, 1)), Some(Quarter::Q1));
        assert_eq!(reporting_quarter("n/a", at(2026, 7, 1)), None);
    }
}

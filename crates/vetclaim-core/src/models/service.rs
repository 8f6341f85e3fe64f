use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::lenient::deserialize_string_or_empty;
use crate::calculator::ServiceDateRange;

/// Service dates as entered: ISO `YYYY-MM-DD` strings, possibly blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ServiceDates {
    /// Entry on duty.
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub eod: String,
    /// Release from active duty.
    #[serde(default, deserialize_with = "deserialize_string_or_empty")]
    pub rad: String,
}

/// Parse the date part of an ISO string; a trailing time is ignored.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let date_part = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

impl ServiceDates {
    pub fn new(eod: impl Into<String>, rad: impl Into<String>) -> Self {
        Self {
            eod: eod.into(),
            rad: rad.into(),
        }
    }

    pub fn entry(&self) -> Option<NaiveDate> {
        parse_iso_date(&self.eod)
    }

    pub fn release(&self) -> Option<NaiveDate> {
        parse_iso_date(&self.rad)
    }

    /// Both dates entered, whether or not they parse.
    pub fn is_complete(&self) -> bool {
        !self.eod.trim().is_empty() && !self.rad.trim().is_empty()
    }

    /// The validated range, or `None` if either date is missing, invalid,
    /// or release does not come after entry.
    pub fn range(&self) -> Option<ServiceDateRange> {
        ServiceDateRange::from_options(self.entry(), self.release())
    }

    /// Key recorded once the presumptive prompt was shown for these dates.
    pub fn prompt_key(&self) -> String {
        format!("{}|{}", self.eod, self.rad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_requires_release_after_entry() {
        assert!(ServiceDates::new("2001-01-01", "2005-06-30").range().is_some());
        assert!(ServiceDates::new("2005-06-30", "2005-06-30").range().is_none());
        assert!(ServiceDates::new("2005-06-30", "2001-01-01").range().is_none());
    }

    #[test]
    fn test_blank_or_garbage_dates() {
        let dates = ServiceDates::new("", "2005-06-30");
        assert!(!dates.is_complete());
        assert!(dates.range().is_none());

        let dates = ServiceDates::new("01/02/2003", "2005-06-30");
        assert!(dates.is_complete());
        assert!(dates.entry().is_none());
        assert!(dates.range().is_none());
    }

    #[test]
    fn test_datetime_suffix_ignored() {
        assert_eq!(
            parse_iso_date("1991-08-02T00:00:00.000Z"),
            NaiveDate::from_ymd_opt(1991, 8, 2)
        );
    }

    #[test]
    fn test_prompt_key() {
        assert_eq!(
            ServiceDates::new("1990-01-01", "1994-01-01").prompt_key(),
            "1990-01-01|1994-01-01"
        );
    }
}

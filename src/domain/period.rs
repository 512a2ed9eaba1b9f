use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One published archive month.
///
/// The MMSDM archive is keyed by calendar month; every lookup names the
/// period it reads from. Ordering compares year first, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// First month with a published archive.
    pub const FIRST_PUBLISHED: Period = Period {
        year: 2009,
        month: 7,
    };

    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Most recent month expected to have a published archive. Monthly data
    /// is published roughly two months in arrears.
    pub fn latest_published() -> Self {
        Self::from_date(Local::now().date_naive())
            .previous()
            .previous()
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The `YYYYMM` stamp used in published archive file names.
    pub fn archive_stamp(&self) -> String {
        format!("{:04}{:02}", self.year, self.month)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or("invalid period; expected YYYY-MM")?;
        let year: i32 = year.parse().map_err(|_| "invalid year")?;
        let month: u32 = month.parse().map_err(|_| "invalid month")?;
        Period::new(year, month).ok_or("invalid month; expected 1..=12")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_new_rejects_invalid_month() {
        assert!(Period::new(2023, 0).is_none());
        assert!(Period::new(2023, 13).is_none());
        assert!(Period::new(2023, 6).is_some());
    }

    #[rstest]
    #[case(2023, 6, "202306")]
    #[case(2023, 11, "202311")]
    #[case(2009, 7, "200907")]
    fn test_archive_stamp(#[case] year: i32, #[case] month: u32, #[case] expected: &str) {
        let period = Period::new(year, month).unwrap();
        assert_eq!(period.archive_stamp(), expected);
    }

    #[test]
    fn test_previous_wraps_year() {
        let jan = Period::new(2023, 1).unwrap();
        assert_eq!(jan.previous(), Period::new(2022, 12).unwrap());
        let jun = Period::new(2023, 6).unwrap();
        assert_eq!(jun.previous(), Period::new(2023, 5).unwrap());
    }

    #[test]
    fn test_ordering() {
        let a = Period::new(2022, 12).unwrap();
        let b = Period::new(2023, 1).unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_display_round_trip() {
        let period = Period::new(2023, 6).unwrap();
        assert_eq!(period.to_string(), "2023-06");
        assert_eq!("2023-06".parse::<Period>().unwrap(), period);
        assert!("2023-13".parse::<Period>().is_err());
        assert!("202306".parse::<Period>().is_err());
    }

    #[test]
    fn test_latest_published_is_in_the_past() {
        let latest = Period::latest_published();
        let today = Period::from_date(Local::now().date_naive());
        assert!(latest < today);
    }
}

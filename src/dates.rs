use std::{fmt, str::FromStr};

use chrono::prelude::*;
use chrono::Months;

use crate::error::PageviewError;

/// Earliest date for which the pageview API has backfilled data.
pub const BACKFILL_START: NaiveDate = match NaiveDate::from_ymd_opt(2015, 7, 1) {
    Some(date) => date,
    None => panic!("invalid backfill date"),
};

// same bounds as a four digit calendar year
const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

// the per-article endpoint wants an hour suffix even for daily granularity
const WIRE_FORMAT: &str = "%Y%m%d00";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidDateError {
    #[error("year {0} is out of range")]
    YearOutOfRange(i32),
    #[error("month must be in 1..12")]
    MonthOutOfRange(u32),
    #[error("day is out of range for month")]
    DayOutOfRange { year: i32, month: u32, day: u32 },
    /// A window around the date would leave the range chrono can represent.
    #[error("window around {0} is not representable")]
    Unrepresentable(NaiveDate),
}

/// Checks that `(year, month, day)` names a real calendar date.
///
/// The fields are checked in order, so the error always names the first offending one.
pub fn validate_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, InvalidDateError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(InvalidDateError::YearOutOfRange(year));
    }
    if !(1..=12).contains(&month) {
        return Err(InvalidDateError::MonthOutOfRange(month));
    }

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(InvalidDateError::DayOutOfRange { year, month, day })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Week,
    Month,
}

impl FromStr for Granularity {
    type Err = PageviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("week") {
            Ok(Granularity::Week)
        } else if s.eq_ignore_ascii_case("month") {
            Ok(Granularity::Month)
        } else {
            Err(PageviewError::InvalidGranularity(s.to_owned()))
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Week => write!(f, "week"),
            Granularity::Month => write!(f, "month"),
        }
    }
}

/// Inclusive range of calendar days a query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Window for `granularity` around the given day.
    ///
    /// * `Month` - first to last day of the month, `day` only takes part in validation.
    /// * `Week` - Monday to Sunday of the ISO week containing the day.
    pub fn resolve(
        year: i32,
        month: u32,
        day: u32,
        granularity: Granularity,
    ) -> Result<Self, InvalidDateError> {
        let date = validate_date(year, month, day)?;

        match granularity {
            Granularity::Month => Self::month_of(date),
            Granularity::Week => Ok(Self::week_of(date)),
        }
    }

    pub fn month_of(date: NaiveDate) -> Result<Self, InvalidDateError> {
        let unrepresentable = InvalidDateError::Unrepresentable(date);

        let start = date.with_day(1).ok_or(unrepresentable)?;
        // last day = first day of the next month minus one, which takes care of leap years
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or(unrepresentable)?;

        Ok(Self { start, end })
    }

    pub fn week_of(date: NaiveDate) -> Self {
        let week = date.week(Weekday::Mon);
        Self {
            start: week.first_day(),
            end: week.last_day(),
        }
    }

    /// From the backfill horizon up to and including `end`.
    ///
    /// Fails with [`PageviewError::NoData`] when `end` lies before the horizon, the API has
    /// nothing for such a range.
    pub fn since_backfill(end: NaiveDate) -> Result<Self, PageviewError> {
        if end < BACKFILL_START {
            return Err(PageviewError::NoData);
        }

        Ok(Self {
            start: BACKFILL_START,
            end,
        })
    }

    /// `(start, end)` formatted as `YYYYMMDD00`.
    pub fn wire_bounds(&self) -> (String, String) {
        (to_wire(self.start), to_wire(self.end))
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(|day| day <= &self.end)
    }
}

/// Formats a day the way the per-article endpoint expects its bounds.
///
/// # Arguments
///
/// * `date` - The day to format.
///
/// # Returns
///
/// `YYYYMMDD00`, the year zero-padded to four digits and a literal `00` hour.
pub fn to_wire(date: NaiveDate) -> String {
    date.format(WIRE_FORMAT).to_string()
}

/// Parses a `YYYYMMDDHH` record timestamp.
pub fn parse_timestamp(timestamp: &str) -> Result<NaiveDateTime, PageviewError> {
    if timestamp.len() != 10 || !timestamp.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PageviewError::InvalidTimestamp(timestamp.to_owned()));
    }

    // chrono refuses to build a time without minutes
    let with_minutes = format!("{timestamp}00");
    NaiveDateTime::parse_from_str(&with_minutes, "%Y%m%d%H%M")
        .map_err(|_| PageviewError::InvalidTimestamp(timestamp.to_owned()))
}

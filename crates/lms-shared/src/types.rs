//! Common types

use chrono::{DateTime, NaiveDate, Utc};

/// Calendar date of an instant, taken in UTC.
///
/// Every date-window comparison in the server goes through this so that
/// registration dates and "today" agree on the same day boundary.
pub fn utc_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

pub fn today_utc() -> NaiveDate {
    utc_date(Utc::now())
}

//! PrairieView timestamp parsing
//!
//! The instrument writes local wall-clock times without a zone, so
//! everything here is naive.

use crate::{Error, Result};
use chrono::{NaiveDateTime, NaiveTime};

/// Parse the acquisition start (`month/day/year hour:minute:second AM|PM`)
pub fn parse_scan_datetime(value: &str, format: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), format).map_err(|_| Error::InvalidTimestamp {
        value: value.to_string(),
        format: format.to_string(),
    })
}

/// Parse a time of day such as `13:42:29.7403616`
pub fn parse_time_of_day(value: &str, format: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), format).map_err(|_| Error::InvalidTimestamp {
        value: value.to_string(),
        format: format.to_string(),
    })
}

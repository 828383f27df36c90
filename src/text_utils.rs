use std::ops::Index;

use chrono::{NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;

fn to_int<T: std::str::FromStr>(num_str: &str, date_str: &str) -> Result<T, String> {
    match num_str.parse::<T>() {
        Ok(x) => Ok(x),
        Err(_) => Err(format!("Error parsing {} from the date {}", num_str, date_str)),
    }
}

/// Parses the calendar part of an ISO 8601 date, e.g. `2024-03-03` or `2024-03-03T10:00:00Z`.
pub fn parse_date(buf: &str) -> Result<NaiveDate, String> {
    lazy_static! {
        static ref DATE_REGEX: Regex = Regex::new(r"^\s*(\d{4})-(\d{1,2})-(\d{1,2})").unwrap();
    }

    let Some(caps) = DATE_REGEX.captures(buf) else {
        return Err(format!("Unable to parse date {}", buf));
    };

    let y: i32 = to_int(caps.index(1), buf)?;
    let m: u32 = to_int(caps.index(2), buf)?;
    let d: u32 = to_int(caps.index(3), buf)?;

    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| format!("Invalid date {}", buf))
}

/// Long en-US form, e.g. `March 3, 2024`. Input that isn't a date is returned as is.
pub fn format_date(date_str: &str) -> String {
    match parse_date(date_str) {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => date_str.to_string(),
    }
}

pub fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

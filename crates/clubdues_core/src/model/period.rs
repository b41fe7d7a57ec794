//! Billing period (`YYYY-MM`) and inclusive period ranges.
//!
//! # Invariants
//! - `Period` always renders in canonical `YYYY-MM` form.
//! - Ordering of `Period` equals lexicographic ordering of its canonical
//!   text, which equals chronological order.

use super::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static PERIOD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{1,2})$").expect("valid period regex"));

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Calendar year-month used as the unit of dues tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: u16,
    month: u8,
}

impl Period {
    /// Builds a period from numeric parts.
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        let year = validate_year(year)?;
        if !(1..=12).contains(&month) {
            return Err(ValidationError::InvalidPeriod(format!("{year:04}-{month}")));
        }
        Ok(Self {
            year,
            month: month as u8,
        })
    }

    /// Parses free-text period input into canonical form.
    ///
    /// Accepts `YYYY-MM` and `YYYY-M` after trimming; `2024-3` becomes
    /// `2024-03`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let invalid = || ValidationError::InvalidPeriod(trimmed.to_string());
        let caps = PERIOD_RE.captures(trimmed).ok_or_else(invalid)?;
        let year: i32 = caps[1].parse().map_err(|_| invalid())?;
        let month: u32 = caps[2].parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    /// Month number in `1..=12`.
    pub fn month(&self) -> u8 {
        self.month
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Period {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Period> for String {
    fn from(value: Period) -> Self {
        value.to_string()
    }
}

/// Inclusive `[from, to]` period filter.
///
/// A range with `from` after `to` is legal and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRange {
    pub from: Period,
    pub to: Period,
}

impl PeriodRange {
    pub fn new(from: Period, to: Period) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, period: Period) -> bool {
        self.from <= period && period <= self.to
    }
}

/// Validates a four-digit calendar year.
pub fn validate_year(year: i32) -> Result<u16, ValidationError> {
    if (1000..=9999).contains(&year) {
        Ok(year as u16)
    } else {
        Err(ValidationError::InvalidYear(year))
    }
}

/// English calendar name for a month number, `None` outside `1..=12`.
pub fn month_name(month: u8) -> Option<&'static str> {
    MONTH_NAMES.get(usize::from(month).checked_sub(1)?).copied()
}

//! Literal values
//!
//! Leaf values that appear in expressions and subsets: numbers, date labels
//! and color triples. Rendering lives in [`super::render`].

use crate::query::error::{QueryError, QueryResult};
use chrono::{Datelike, NaiveDate};

/// A numeric literal
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
}

impl Number {
    /// Get the value as f64
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Int(i) => *i as f64,
            Self::Float(f) => *f,
        }
    }

    /// False for NaN and the infinities, which have no query text form
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Int(_) => true,
            Self::Float(f) => f.is_finite(),
        }
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<f32> for Number {
    fn from(value: f32) -> Self {
        Self::Float(value as f64)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// A calendar label with a four digit year and optional month and day
///
/// Renders quoted and progressively more specific: `"2014"`, `"2014-07"`,
/// `"2014-07-15"`. Components are range checked individually; there is no
/// check of the day against the length of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateLabel {
    year: u16,
    month: Option<u8>,
    day: Option<u8>,
}

impl DateLabel {
    /// Create a date label from optional components
    pub fn new(year: i32, month: Option<u32>, day: Option<u32>) -> QueryResult<Self> {
        if !(1000..=9999).contains(&year) {
            return Err(QueryError::InvalidDate(format!(
                "year must have four digits, got {}",
                year
            )));
        }
        if let Some(m) = month {
            if !(1..=12).contains(&m) {
                return Err(QueryError::InvalidDate(format!(
                    "month must be between 1 and 12, got {}",
                    m
                )));
            }
        }
        if let Some(d) = day {
            if !(1..=31).contains(&d) {
                return Err(QueryError::InvalidDate(format!(
                    "day must be between 1 and 31, got {}",
                    d
                )));
            }
        }

        Ok(Self {
            year: year as u16,
            month: month.map(|m| m as u8),
            day: day.map(|d| d as u8),
        })
    }

    /// Year-only label
    pub fn year(year: i32) -> QueryResult<Self> {
        Self::new(year, None, None)
    }

    /// Year and month label
    pub fn year_month(year: i32, month: u32) -> QueryResult<Self> {
        Self::new(year, Some(month), None)
    }

    /// Full date label
    pub fn ymd(year: i32, month: u32, day: u32) -> QueryResult<Self> {
        Self::new(year, Some(month), Some(day))
    }

    /// Full date label from a chrono date
    pub fn from_naive_date(date: NaiveDate) -> QueryResult<Self> {
        Self::ymd(date.year(), date.month(), date.day())
    }

    pub fn get_year(&self) -> u16 {
        self.year
    }

    pub fn get_month(&self) -> Option<u8> {
        self.month
    }

    pub fn get_day(&self) -> Option<u8> {
        self.day
    }
}

/// An RGB color used as a switch result
///
/// Channels are checked independently against 0-255 and never change after
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Create a color, rejecting any channel outside 0-255
    pub fn new(red: i64, green: i64, blue: i64) -> QueryResult<Self> {
        Ok(Self {
            red: channel("red", red)?,
            green: channel("green", green)?,
            blue: channel("blue", blue)?,
        })
    }

    pub fn red(&self) -> u8 {
        self.red
    }

    pub fn green(&self) -> u8 {
        self.green
    }

    pub fn blue(&self) -> u8 {
        self.blue
    }
}

fn channel(name: &'static str, value: i64) -> QueryResult<u8> {
    u8::try_from(value).map_err(|_| QueryError::ColorOutOfRange {
        channel: name,
        value,
    })
}

//! Axis subset parser
//!
//! Parses the textual subset forms the serializer emits back into typed
//! values, so subsets can be given on the command line.
//!
//! # Supported Syntax
//!
//! ```text
//! Lat(53.08)
//! Lat(35:75)
//! ansi("2014-07")
//! ansi("2014-01":"2014-12")
//! ```

use nom::{
    branch::alt,
    bytes::complete::{take_while1, take_while_m_n},
    character::complete::{char, digit1, multispace0},
    combinator::{map, map_res, opt, recognize},
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use crate::query::axis::{AxisRange, AxisSubset, Bound};
use crate::query::error::{QueryError, QueryResult};
use crate::query::literal::{DateLabel, Number};

/// Parse `name(point)` or `name(lo:hi)`
pub fn parse_axis_subset(input: &str) -> QueryResult<AxisSubset> {
    let (name, range) = complete(input.trim(), subset)?;
    AxisSubset::new(name, range)
}

/// Parse `YYYY`, `YYYY-MM` or `YYYY-MM-DD`, with or without quotes
pub fn parse_date_label(input: &str) -> QueryResult<DateLabel> {
    let input = input.trim();
    let unquoted = input
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(input);
    let (year, month, day) = complete(unquoted, date_parts)?;
    DateLabel::new(year, month, day)
}

fn complete<'a, T>(
    input: &'a str,
    parser: impl Fn(&'a str) -> IResult<&'a str, T>,
) -> QueryResult<T> {
    match parser(input) {
        Ok(("", value)) => Ok(value),
        Ok((remaining, _)) => Err(QueryError::Parse(format!(
            "Unexpected input after subset: '{}'",
            remaining
        ))),
        Err(e) => Err(QueryError::Parse(format!("Parse error: {:?}", e))),
    }
}

fn subset(input: &str) -> IResult<&str, (&str, AxisRange)> {
    let (input, name) = axis_name(input)?;
    let (input, range) = delimited(
        pair(multispace0, char('(')),
        axis_range,
        pair(char(')'), multispace0),
    )(input)?;
    Ok((input, (name, range)))
}

fn axis_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

fn axis_range(input: &str) -> IResult<&str, AxisRange> {
    let (input, lo) = delimited(multispace0, bound, multispace0)(input)?;
    let (input, hi) = opt(preceded(
        char(':'),
        delimited(multispace0, bound, multispace0),
    ))(input)?;

    let range = match hi {
        Some(hi) => AxisRange::Interval(lo, hi),
        None => AxisRange::Point(lo),
    };
    Ok((input, range))
}

fn bound(input: &str) -> IResult<&str, Bound> {
    alt((
        map(quoted_date, Bound::Date),
        map(number, Bound::Number),
    ))(input)
}

fn quoted_date(input: &str) -> IResult<&str, DateLabel> {
    map_res(delimited(char('"'), date_parts, char('"')), |(y, m, d)| {
        DateLabel::new(y, m, d)
    })(input)
}

fn date_parts(input: &str) -> IResult<&str, (i32, Option<u32>, Option<u32>)> {
    let (input, year) = map_res(take_while_m_n(4, 4, |c: char| c.is_ascii_digit()), |s: &str| {
        s.parse::<i32>()
    })(input)?;
    let (input, month) = opt(preceded(char('-'), two_digits))(input)?;
    let (input, day) = match month {
        Some(_) => opt(preceded(char('-'), two_digits))(input)?,
        None => (input, None),
    };
    Ok((input, (year, month, day)))
}

fn two_digits(input: &str) -> IResult<&str, u32> {
    map_res(take_while_m_n(2, 2, |c: char| c.is_ascii_digit()), |s: &str| {
        s.parse::<u32>()
    })(input)
}

fn number(input: &str) -> IResult<&str, Number> {
    let (input, text) = recognize(tuple((
        opt(char('-')),
        digit1,
        opt(pair(char('.'), digit1)),
        opt(tuple((
            alt((char('e'), char('E'))),
            opt(alt((char('+'), char('-')))),
            digit1,
        ))),
    )))(input)?;

    let number = if text.contains(['.', 'e', 'E']) {
        text.parse::<f64>().map(Number::Float).ok()
    } else {
        text.parse::<i64>().map(Number::Int).ok()
    };

    match number {
        Some(n) => Ok((input, n)),
        None => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Digit,
        ))),
    }
}

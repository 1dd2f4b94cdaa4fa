use crate::fix::Fix;

use chrono::naive::NaiveDate;
use chrono::naive::NaiveTime;

use nom::branch::alt;
use nom::bytes::complete::take_while_m_n;
use nom::character::complete::char;
use nom::combinator::all_consuming;
use nom::combinator::map;
use nom::combinator::map_opt;
use nom::combinator::map_res;
use nom::combinator::opt;
use nom::number::complete::recognize_float;
use nom::sequence::preceded;
use nom::sequence::tuple;
use nom::IResult;

use thiserror::Error;

/// The one sentence type the receiver is polled for, recommended
/// minimum data from a multi-constellation receiver.
pub const SENTENCE_ID: &str = "$GNRMC";

/// An RMC sentence has at least talker, time, status, latitude,
/// latitude hemisphere, longitude, and longitude hemisphere.
const MIN_FIELDS: usize = 7;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("not a recognized position sentence")]
    UnrecognizedSentence,
    #[error("position sentence is missing required fields")]
    IncompleteFix,
    #[error("unparseable {field} {value:?}")]
    MalformedNumeric { field: &'static str, value: String },
    #[error("{field} {degrees} is outside its valid range")]
    OutOfRange { field: &'static str, degrees: f64 },
}

/// One decoded RMC sentence.
///
/// Only the position is required; the rest of the payload decodes to
/// `None` when absent or malformed.
#[derive(Clone, Debug, PartialEq)]
pub struct RmcData {
    pub fix: Fix,
    pub time: Option<NaiveTime>,
    pub valid: bool,
    pub speed_knots: Option<f64>,
    pub course_degrees: Option<f64>,
    pub date: Option<NaiveDate>,
}

/// Decodes one line of receiver output.
///
/// The trailing `*XX` checksum is carried in the final field and is
/// not validated.
pub fn decode(line: &str) -> Result<RmcData, DecodeError> {
    let fields: Vec<&str> = line.trim_end().split(',').collect();

    if fields[0] != SENTENCE_ID || fields.len() < MIN_FIELDS {
        return Err(DecodeError::UnrecognizedSentence);
    }

    let lat_raw = fields[3];
    let lat_hemisphere = fields[4];
    let lon_raw = fields[5];
    let lon_hemisphere = fields[6];

    if lat_raw.is_empty()
        || lat_hemisphere.is_empty()
        || lon_raw.is_empty()
        || lon_hemisphere.is_empty()
    {
        return Err(DecodeError::IncompleteFix);
    }

    let latitude = magnitude(lat, lat_raw, "latitude")? * sign(lat_hemisphere, "N");
    let longitude = magnitude(lon, lon_raw, "longitude")? * sign(lon_hemisphere, "E");

    if !(-90.0..=90.0).contains(&latitude) {
        return Err(DecodeError::OutOfRange {
            field: "latitude",
            degrees: latitude,
        });
    }

    if !(-180.0..=180.0).contains(&longitude) {
        return Err(DecodeError::OutOfRange {
            field: "longitude",
            degrees: longitude,
        });
    }

    Ok(RmcData {
        fix: Fix {
            latitude,
            longitude,
        },
        time: optional(time, fields.get(1)),
        valid: fields.get(2) == Some(&"A"),
        speed_knots: optional(flt64, fields.get(7)),
        course_degrees: optional(flt64, fields.get(8)),
        date: optional(date, fields.get(9)),
    })
}

fn magnitude<'a>(
    parser: fn(&'a str) -> IResult<&'a str, f64>,
    input: &'a str,
    field: &'static str,
) -> Result<f64, DecodeError> {
    match all_consuming(parser)(input) {
        Ok((_, degrees)) => Ok(degrees),
        Err(_) => Err(DecodeError::MalformedNumeric {
            field,
            value: input.to_string(),
        }),
    }
}

fn sign(hemisphere: &str, positive: &str) -> f64 {
    if hemisphere == positive {
        1.0
    } else {
        -1.0
    }
}

fn optional<'a, T>(
    parser: fn(&'a str) -> IResult<&'a str, T>,
    field: Option<&&'a str>,
) -> Option<T> {
    let input = match field {
        Some(f) => *f,
        None => return None,
    };

    match all_consuming(parser)(input) {
        Ok((_, value)) => Some(value),
        Err(_) => None,
    }
}

// Parses a ddmmyy date, pivoting two-digit years at 1980.
fn date(input: &str) -> IResult<&str, NaiveDate> {
    map_opt(
        tuple((two_digit, two_digit, two_digit)),
        |(day, month, year)| {
            let year = if year >= 80 { 1900 + year } else { 2000 + year };

            NaiveDate::from_ymd_opt(year as i32, month, day)
        },
    )(input)
}

fn flt64(input: &str) -> IResult<&str, f64> {
    map_res(recognize_float, |s: &str| s.parse())(input)
}

fn is_digit(chr: char) -> bool {
    chr.is_ascii_digit()
}

fn lat(input: &str) -> IResult<&str, f64> {
    map(tuple((two_digit, flt64)), |(d, m)| d as f64 + m / 60.0)(input)
}

fn lon(input: &str) -> IResult<&str, f64> {
    map(tuple((three_digit, flt64)), |(d, m)| d as f64 + m / 60.0)(input)
}

fn subsec(input: &str) -> IResult<&str, u32> {
    alt((three_digit, map(two_digit, |c| c * 10)))(input)
}

fn three_digit(input: &str) -> IResult<&str, u32> {
    map_res(take_while_m_n(3, 3, is_digit), |i: &str| i.parse())(input)
}

// Parses an hhmmss time with optional centisecond or millisecond
// subseconds.
fn time(input: &str) -> IResult<&str, NaiveTime> {
    map_opt(
        tuple((
            two_digit,
            two_digit,
            two_digit,
            opt(preceded(char('.'), subsec)),
        )),
        |(hour, minute, second, subsec)| {
            NaiveTime::from_hms_milli_opt(hour, minute, second, subsec.unwrap_or(0))
        },
    )(input)
}

fn two_digit(input: &str) -> IResult<&str, u32> {
    map_res(take_while_m_n(2, 2, is_digit), |i: &str| i.parse())(input)
}

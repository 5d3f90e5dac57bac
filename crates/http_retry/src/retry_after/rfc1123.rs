// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! HTTP date parsing for `Retry-After` values.
//!
//! Servers almost always send the IMF-fixdate form, so it is parsed by hand first.
//! Anything the fast path rejects goes to the general RFC 2822 parser, whose answer
//! is final.

use std::time::SystemTime;

use jiff::civil::{Date, DateTime, Time, Weekday};
use jiff::fmt::rfc2822;
use jiff::tz::Offset;

static RFC2822_PARSER: rfc2822::DateTimeParser = rfc2822::DateTimeParser::new();

/// Length of `Sun, 06 Nov 1994 08:49:37 GMT`.
const FIXED_WIDTH_LEN: usize = 29;

const MONTHS: [&[u8; 3]; 12] = [
    b"Jan", b"Feb", b"Mar", b"Apr", b"May", b"Jun", b"Jul", b"Aug", b"Sep", b"Oct", b"Nov", b"Dec",
];

/// Parses an RFC 1123 HTTP date such as `Sun, 06 Nov 1994 08:49:37 GMT`.
///
/// Dates with a numeric UTC offset, an omitted weekday or other variations allowed by
/// RFC 2822 are accepted as well. Returns `None` if the value is not a date.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, SystemTime};
///
/// use http_retry::parse_rfc1123;
///
/// let time = parse_rfc1123("Sun, 06 Nov 1994 08:49:37 GMT");
/// assert_eq!(time, Some(SystemTime::UNIX_EPOCH + Duration::from_secs(784_111_777)));
///
/// assert_eq!(parse_rfc1123("tomorrow"), None);
/// ```
#[must_use]
pub fn parse_rfc1123(value: &str) -> Option<SystemTime> {
    parse_fixed_width(value.as_bytes()).or_else(|| parse_general(value))
}

/// Fast path for the canonical fixed-width layout.
///
/// ```text
/// Sun, 06 Nov 1994 08:49:37 GMT
/// 0    5  8   12   17 20 23 26
/// ```
///
/// Offsets: weekday `0..3`, `", "` at `3..5`, day `5..7`, month `8..11`, year `12..16`,
/// hour `17..19`, minute `20..22`, second `23..25`, zone `26..29`. Single spaces sit at
/// `7`, `11`, `16` and `25`; colons at `19` and `22`.
fn parse_fixed_width(bytes: &[u8]) -> Option<SystemTime> {
    if bytes.len() != FIXED_WIDTH_LEN {
        return None;
    }

    if &bytes[3..5] != b", "
        || bytes[7] != b' '
        || bytes[11] != b' '
        || bytes[16] != b' '
        || bytes[19] != b':'
        || bytes[22] != b':'
        || bytes[25] != b' '
        || &bytes[26..29] != b"GMT"
    {
        return None;
    }

    let weekday = parse_weekday(&bytes[0..3])?;
    let day = parse_digits(&bytes[5..7])?;
    let month = parse_month(&bytes[8..11])?;
    let year = parse_digits(&bytes[12..16])?;
    let hour = parse_digits(&bytes[17..19])?;
    let minute = parse_digits(&bytes[20..22])?;
    let second = parse_digits(&bytes[23..25])?;

    let date = Date::new(i16::try_from(year).ok()?, month, i8::try_from(day).ok()?).ok()?;

    if date.weekday() != weekday {
        return None;
    }

    let time = Time::new(
        i8::try_from(hour).ok()?,
        i8::try_from(minute).ok()?,
        i8::try_from(second).ok()?,
        0,
    )
    .ok()?;

    let timestamp = Offset::UTC.to_timestamp(DateTime::from_parts(date, time)).ok()?;

    Some(timestamp.into())
}

/// General RFC 2822 / RFC 9110 parser; authoritative for everything the fast path skips.
fn parse_general(value: &str) -> Option<SystemTime> {
    RFC2822_PARSER.parse_timestamp(value).ok().map(SystemTime::from)
}

fn parse_digits(bytes: &[u8]) -> Option<u16> {
    bytes.iter().try_fold(0_u16, |acc, &b| {
        let digit = b.checked_sub(b'0').filter(|d| *d <= 9)?;
        Some(acc * 10 + u16::from(digit))
    })
}

fn parse_month(bytes: &[u8]) -> Option<i8> {
    let index = MONTHS.iter().position(|month| month.as_slice() == bytes)?;
    i8::try_from(index + 1).ok()
}

fn parse_weekday(bytes: &[u8]) -> Option<Weekday> {
    Some(match bytes {
        b"Mon" => Weekday::Monday,
        b"Tue" => Weekday::Tuesday,
        b"Wed" => Weekday::Wednesday,
        b"Thu" => Weekday::Thursday,
        b"Fri" => Weekday::Friday,
        b"Sat" => Weekday::Saturday,
        b"Sun" => Weekday::Sunday,
        _ => return None,
    })
}

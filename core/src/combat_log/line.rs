//! Timestamp prefix of a log line
//!
//! Lines look like `11/18 07:21:02.156  CAST: ...`. The log carries no year,
//! it is guessed once from the first line and reused for the whole run.

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

use super::error::ParseError;

/// `chrono` layout of the timestamp prefix (zero padded month, unpadded day).
pub const LOG_DATE_FORMAT: &str = "%m/%-d %H:%M:%S%.3f";

const CONTENT_SEPARATOR: &str = "  ";

#[derive(Debug, Clone, Default)]
pub struct LineDecoder {
    year: Option<i32>,
    /// Overrides the wall clock used for the year guess.
    reference_time: Option<NaiveDateTime>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reference_time(now: NaiveDateTime) -> Self {
        Self {
            year: None,
            reference_time: Some(now),
        }
    }

    pub fn with_year(year: i32) -> Self {
        Self {
            year: Some(year),
            reference_time: None,
        }
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    /// Split a raw line into its timestamp and content.
    ///
    /// The first successful call fixes the year for the rest of the run.
    pub fn decode<'a>(&mut self, line: &'a str) -> Result<(NaiveDateTime, &'a str), ParseError> {
        let (month, day, time, content) = split_line(line)?;

        let year = match self.year {
            Some(year) => year,
            None => {
                let year = self.guess_year(month, day, time, line)?;
                self.year = Some(year);
                year
            }
        };

        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            ParseError::InvalidTimestamp {
                segment: line.get(..18).unwrap_or(line).to_string(),
            }
        })?;

        Ok((date.and_time(time), content))
    }

    /// Exact inverse of [`LineDecoder::decode`].
    pub fn format_line(ts: &NaiveDateTime, content: &str) -> String {
        format!("{}{}{}", ts.format(LOG_DATE_FORMAT), CONTENT_SEPARATOR, content)
    }

    // Timestamps are never more than a day ahead of now (timezones). Pick last
    // year when this year would be in the future, otherwise whichever is closer.
    fn guess_year(&self, month: u32, day: u32, time: NaiveTime, line: &str) -> Result<i32, ParseError> {
        let now = self.reference_time.unwrap_or_else(|| Local::now().naive_local()) + Duration::hours(24);
        let this_year = now.year();

        let this = NaiveDate::from_ymd_opt(this_year, month, day).map(|d| d.and_time(time));
        let before = NaiveDate::from_ymd_opt(this_year - 1, month, day).map(|d| d.and_time(time));

        match (this, before) {
            (Some(this), _) if this > now => Ok(this_year - 1),
            (Some(this), Some(before)) => {
                if now - before < now - this {
                    Ok(this_year - 1)
                } else {
                    Ok(this_year)
                }
            }
            (Some(_), None) => Ok(this_year),
            // 02/29 outside a leap year
            (None, Some(_)) => Ok(this_year - 1),
            (None, None) => Err(ParseError::InvalidTimestamp {
                segment: line.get(..18).unwrap_or(line).to_string(),
            }),
        }
    }
}

fn digit(b: u8) -> Option<u32> {
    b.is_ascii_digit().then(|| (b - b'0') as u32)
}

fn invalid_format(line: &str) -> ParseError {
    ParseError::InvalidLineFormat {
        line: line.to_string(),
    }
}

// parse "MM/D HH:MM:SS.mmm  content"
fn split_line(line: &str) -> Result<(u32, u32, NaiveTime, &str), ParseError> {
    let b = line.as_bytes();
    if b.len() < 5 || b[2] != b'/' {
        return Err(invalid_format(line));
    }

    let month = digit(b[0])
        .zip(digit(b[1]))
        .map(|(t, o)| t * 10 + o)
        .ok_or_else(|| invalid_format(line))?;

    let day_end = memchr::memchr(b' ', b).ok_or_else(|| invalid_format(line))?;
    let day = match &b[3..day_end] {
        [d] => digit(*d),
        [t, o] if *t != b'0' => digit(*t).zip(digit(*o)).map(|(t, o)| t * 10 + o),
        _ => None,
    }
    .ok_or_else(|| invalid_format(line))?;

    let time_start = day_end + 1;
    let time_end = time_start + 12;
    if b.len() < time_end + CONTENT_SEPARATOR.len() || &b[time_end..time_end + 2] != CONTENT_SEPARATOR.as_bytes() {
        return Err(invalid_format(line));
    }

    let time = parse_time(&b[time_start..time_end]).ok_or_else(|| ParseError::InvalidTimestamp {
        segment: line.get(..time_end).unwrap_or(line).to_string(),
    })?;

    Ok((month, day, time, &line[time_end + CONTENT_SEPARATOR.len()..]))
}

// parse HH:MM:SS.mmm
fn parse_time(b: &[u8]) -> Option<NaiveTime> {
    if b.len() != 12 || b[2] != b':' || b[5] != b':' || b[8] != b'.' {
        return None;
    }

    let two = |i: usize| Some(digit(b[i])? * 10 + digit(b[i + 1])?);
    let hour = two(0)?;
    let minute = two(3)?;
    let second = two(6)?;
    let millis = digit(b[9])? * 100 + digit(b[10])? * 10 + digit(b[11])?;

    NaiveTime::from_hms_milli_opt(hour, minute, second, millis)
}

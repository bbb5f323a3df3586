//! Time keeping module for PineTime

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::{Error, Result};

/// Length of the digital time string, `YYYY-MM-DD HH:MM`
pub const TIME_TEXT_LEN: usize = 16;

/// Hour and minute sampled from the wall clock for one tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockTime {
    /// Hour of the day, 0–23
    pub hour: u8,
    /// Minute of the hour, 0–59
    pub minute: u8,
}

impl ClockTime {
    /// Create a clock time, `None` if either field is out of range
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }
}

impl From<&NaiveDateTime> for ClockTime {
    fn from(time: &NaiveDateTime) -> Self {
        // chrono guarantees hour() < 24 and minute() < 60
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }
}

/// Hour as shown on a 12-hour clock face, 1–12
fn twelve_hour(hour: u32) -> u32 {
    match hour % 12 {
        0 => 12,
        h => h,
    }
}

/// Write `time` as `YYYY-MM-DD HH:MM` into `buf`.
///
/// The hour is `00`–`23` in 24-hour style and `01`–`12` otherwise.
pub fn format_timestamp<'a>(
    buf: &'a mut [u8],
    time: &NaiveDateTime,
    is_24h_style: bool,
) -> Result<&'a str> {
    let hour = if is_24h_style {
        time.hour()
    } else {
        twelve_hour(time.hour())
    };

    format_no_std::show(
        buf,
        format_args!(
            "{:04}-{:02}-{:02} {:02}:{:02}",
            time.year(),
            time.month(),
            time.day(),
            hour,
            time.minute()
        ),
    )
    .map_err(|_| Error::Format)
}

/// Seconds left until the wall clock rolls over to the next minute
pub fn secs_until_next_minute(time: &NaiveDateTime) -> u64 {
    60 - time.second() as u64
}

#[cfg(feature = "firmware")]
pub use manager::{TimeManager, TimeReference};

#[cfg(feature = "firmware")]
mod manager {
    use chrono::{DateTime, NaiveDateTime};
    use embassy_time::Instant;

    #[derive(Clone, Copy)]
    pub struct TimeReference {
        /// Clock time
        time: NaiveDateTime,
        /// Related system time
        instant: Instant,
    }

    impl TimeReference {
        /// Create new time reference from a unix timestamp and a local offset,
        /// pinned to the current system time
        pub fn from_timestamp(secs: i64, utc_offset_secs: i32) -> Self {
            let time = DateTime::from_timestamp(secs + utc_offset_secs as i64, 0)
                .map(|utc| utc.naive_utc())
                .unwrap_or(NaiveDateTime::UNIX_EPOCH);

            Self {
                time,
                instant: Instant::now(),
            }
        }
    }

    /// Local wall clock derived from a reference point and the system timer
    #[derive(Clone, Copy)]
    pub struct TimeManager {
        reference: TimeReference,
    }

    impl TimeManager {
        /// Initialize time measurement on boot
        pub fn init(reference: TimeReference) -> Self {
            Self { reference }
        }

        /// Get current time
        pub fn get_time(&self) -> NaiveDateTime {
            let elapsed = Instant::now().duration_since(self.reference.instant);
            self.reference.time + chrono::Duration::microseconds(elapsed.as_micros() as i64)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2015, 1, 1)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    #[test]
    fn formats_24h_style() {
        let mut buf = [0u8; 32];
        let text = format_timestamp(&mut buf, &at(13, 5, 0), true).unwrap();
        assert_eq!(text, "2015-01-01 13:05");
        assert_eq!(text.len(), TIME_TEXT_LEN);
    }

    #[test]
    fn formats_12h_style() {
        let mut buf = [0u8; 32];
        assert_eq!(
            format_timestamp(&mut buf, &at(13, 5, 0), false).unwrap(),
            "2015-01-01 01:05"
        );
        assert_eq!(
            format_timestamp(&mut buf, &at(0, 30, 0), false).unwrap(),
            "2015-01-01 12:30"
        );
        assert_eq!(
            format_timestamp(&mut buf, &at(12, 0, 0), false).unwrap(),
            "2015-01-01 12:00"
        );
    }

    #[test]
    fn short_buffer_is_a_format_error() {
        let mut buf = [0u8; 8];
        assert_eq!(
            format_timestamp(&mut buf, &at(13, 5, 0), true),
            Err(Error::Format)
        );
    }

    #[test]
    fn samples_hour_and_minute() {
        assert_eq!(
            ClockTime::from(&at(23, 59, 59)),
            ClockTime { hour: 23, minute: 59 }
        );
        assert_eq!(ClockTime::new(24, 0), None);
        assert_eq!(ClockTime::new(6, 60), None);
    }

    #[test]
    fn counts_down_to_the_next_minute() {
        assert_eq!(secs_until_next_minute(&at(6, 30, 0)), 60);
        assert_eq!(secs_until_next_minute(&at(6, 30, 59)), 1);
    }
}

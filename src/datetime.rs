// Copyright (c) 2025 the ds3231-rtc project developers
//
// Permission is hereby granted, free of charge, to any person obtaining a
// copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL
// THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
// DEALINGS IN THE SOFTWARE.

//! Calendar date and time of day as kept by the DS3231.

use core::fmt;

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Date and time of day, decoded from (or about to be encoded into) the
/// DS3231's timekeeping registers.
///
/// `DateTime` is a plain value. It holds whatever the hardware returned, or
/// whatever the caller filled in before a write; no calendar validation
/// (leap years, days per month) is performed anywhere. [`Ds3231::set_datetime`]
/// does check that each field is inside the range the chip's registers can
/// represent.
///
/// [`Ds3231::set_datetime`]: ../ds3231/struct.Ds3231.html#method.set_datetime
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
pub struct DateTime {
    /// Seconds (0–59).
    pub seconds: u8,
    /// Minutes (0–59).
    pub minutes: u8,
    /// Hours (0–23). The chip's 12-hour mode isn't supported.
    pub hours: u8,
    /// Day of the week (1–7). The chip stores this value verbatim; which day
    /// is 1 is up to the caller. [`weekday_name`] assumes 1 = Sunday.
    ///
    /// [`weekday_name`]: #method.weekday_name
    pub weekday: u8,
    /// Day of the month (1–31), not validated against month or year.
    pub day: u8,
    /// Month (1–12).
    pub month: u8,
    /// Year (2000–2099). The chip stores a two-digit offset from 2000, so
    /// years outside this range can't be represented.
    pub year: u16,
}

impl DateTime {
    /// Returns an adapter that displays the time of day as `HH:MM:SS`.
    pub fn time(&self) -> Time<'_> {
        Time(self)
    }

    /// Returns an adapter that displays the date as `DD/MM/YYYY`.
    pub fn date(&self) -> Date<'_> {
        Date(self)
    }

    /// Returns the English name of the weekday, assuming 1 = Sunday.
    ///
    /// Any value outside 1–7 yields `"Unknown"`.
    pub fn weekday_name(&self) -> &'static str {
        match self.weekday {
            1..=7 => DAY_NAMES[usize::from(self.weekday) - 1],
            _ => "Unknown",
        }
    }

    // True when every field fits its register encoding. Calendar consistency
    // (day count per month) is deliberately not checked.
    pub(crate) fn is_representable(&self) -> bool {
        self.seconds <= 59
            && self.minutes <= 59
            && self.hours <= 23
            && (1..=7).contains(&self.weekday)
            && (1..=31).contains(&self.day)
            && (1..=12).contains(&self.month)
            && (2000..=2099).contains(&self.year)
    }
}

/// Displays `DD/MM/YYYY HH:MM:SS`.
impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date(), self.time())
    }
}

/// Zero-padded `HH:MM:SS` view of a [`DateTime`].
///
/// [`DateTime`]: struct.DateTime.html
#[derive(Debug, Copy, Clone)]
pub struct Time<'a>(&'a DateTime);

impl fmt::Display for Time<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.0.hours, self.0.minutes, self.0.seconds
        )
    }
}

/// Zero-padded `DD/MM/YYYY` view of a [`DateTime`].
///
/// [`DateTime`]: struct.DateTime.html
#[derive(Debug, Copy, Clone)]
pub struct Date<'a>(&'a DateTime);

impl fmt::Display for Date<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}/{:02}/{:04}",
            self.0.day, self.0.month, self.0.year
        )
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;

    use alloc::format;

    use super::*;

    fn sample() -> DateTime {
        DateTime {
            seconds: 3,
            minutes: 5,
            hours: 9,
            weekday: 7,
            day: 1,
            month: 2,
            year: 2025,
        }
    }

    #[test]
    fn time_is_zero_padded() {
        assert_eq!(format!("{}", sample().time()), "09:05:03");
    }

    #[test]
    fn date_is_zero_padded() {
        assert_eq!(format!("{}", sample().date()), "01/02/2025");
    }

    #[test]
    fn display_combines_date_and_time() {
        assert_eq!(format!("{}", sample()), "01/02/2025 09:05:03");
    }

    #[test]
    fn weekday_names() {
        let names = [
            "Sunday",
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
        ];

        for (weekday, name) in (1..=7).zip(names) {
            let datetime = DateTime {
                weekday,
                ..DateTime::default()
            };

            assert_eq!(datetime.weekday_name(), name);
        }
    }

    #[test]
    fn weekday_name_falls_back_to_unknown() {
        for weekday in [0, 8, 0xFF] {
            let datetime = DateTime {
                weekday,
                ..DateTime::default()
            };

            assert_eq!(datetime.weekday_name(), "Unknown");
        }
    }

    #[test]
    fn representable_ranges() {
        assert!(sample().is_representable());

        let cases = [
            DateTime { seconds: 60, ..sample() },
            DateTime { minutes: 60, ..sample() },
            DateTime { hours: 24, ..sample() },
            DateTime { weekday: 0, ..sample() },
            DateTime { weekday: 8, ..sample() },
            DateTime { day: 0, ..sample() },
            DateTime { day: 32, ..sample() },
            DateTime { month: 0, ..sample() },
            DateTime { month: 13, ..sample() },
            DateTime { year: 1999, ..sample() },
            DateTime { year: 2100, ..sample() },
        ];

        for datetime in cases {
            assert!(!datetime.is_representable(), "{:?}", datetime);
        }
    }
}

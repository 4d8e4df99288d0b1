// Copyright  (C) 2022, Hove and/or its affiliates. All rights reserved.
//
// This file is part of Navitia,
// the software to build cool stuff with public transport.
//
// Hope you'll enjoy and contribute to this project,
// powered by Hove (www.kisio.com).
// Help us simplify mobility and open public transport:
// a non ending quest to the responsive locomotion way of traveling!
//
// LICENCE: This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.
//
// Stay tuned using
// twitter @navitia
// channel `#navitia` on riot https://riot.im/app/#/room/#navitia:matrix.org
// https://groups.google.com/d/forum/navitia
// www.navitia.io

pub mod calendar;
pub mod days_patterns;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use static_assertions::const_assert;
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

pub use calendar::{Calendar, DaysSinceCalendarStart};
pub use days_patterns::{DaysPattern, DaysPatterns};

pub const SECONDS_IN_A_DAY: i32 = 24 * 60 * 60;

/// Schedules may run past midnight, but never beyond two days
/// after the start of their service day.
pub const MAX_SECONDS_IN_SERVICE_DAY: i32 = 2 * SECONDS_IN_A_DAY;

/// Number of service days a single search may scan.
pub const MAX_DAY_RANGE: u16 = 14;

/// Upper bound on the duration of a journey and on the search window.
pub const MAX_SEARCH_DURATION_IN_SECONDS: i32 = 7 * SECONDS_IN_A_DAY;

pub const MAX_DAYS_IN_CALENDAR: u16 = 10_000;

// The furthest point in time a search can reach is the last scanned day
// offset plus a full service day plus the search window and the longest journey.
// Everything must stay well inside the i32 range so that sums never overflow.
const_assert!(
    (MAX_DAY_RANGE as i64) * (SECONDS_IN_A_DAY as i64)
        + (MAX_SECONDS_IN_SERVICE_DAY as i64)
        + 2 * (MAX_SEARCH_DURATION_IN_SECONDS as i64)
        < (i32::MAX as i64) / 2
);

#[derive(Debug, Eq, PartialEq, Clone, Copy, Ord, PartialOrd, Hash, Default)]
pub struct PositiveDuration {
    pub(crate) seconds: u32,
}

impl PositiveDuration {
    pub fn zero() -> Self {
        Self { seconds: 0 }
    }

    pub const fn from_hms(hours: u32, minutes: u32, seconds: u32) -> PositiveDuration {
        let total_seconds = seconds + 60 * minutes + 60 * 60 * hours;
        PositiveDuration {
            seconds: total_seconds,
        }
    }

    pub const fn from_seconds(seconds: u32) -> PositiveDuration {
        PositiveDuration { seconds }
    }

    pub fn total_seconds(&self) -> u64 {
        self.seconds as u64
    }

    pub fn is_zero(&self) -> bool {
        self.seconds == 0
    }

    /// Number of seconds as a signed value, clamped into the range
    /// that can be safely added to a point in time.
    pub(crate) fn as_clamped_i32(&self) -> i32 {
        let max = MAX_SEARCH_DURATION_IN_SECONDS as u32;
        self.seconds.min(max) as i32
    }
}

impl Display for PositiveDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let hours = self.seconds / (60 * 60);
        let minutes_in_secs = self.seconds % (60 * 60);
        let minutes = minutes_in_secs / 60;
        let seconds = minutes_in_secs % 60;
        if hours != 0 {
            write!(f, "{}h{:02}m{:02}s", hours, minutes, seconds)
        } else if minutes != 0 {
            write!(f, "{}m{:02}s", minutes, seconds)
        } else {
            write!(f, "{}s", seconds)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unable to parse `{input}` as a duration. Expected format is HH:MM:SS")]
pub struct DurationParseError {
    input: String,
}

impl FromStr for PositiveDuration {
    type Err = DurationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || DurationParseError {
            input: s.to_string(),
        };
        let mut parts = s.trim().split(':');
        let mut next_number = || -> Result<u32, DurationParseError> {
            parts
                .next()
                .and_then(|part| part.parse::<u32>().ok())
                .ok_or_else(error)
        };
        let hours = next_number()?;
        let minutes = next_number()?;
        let seconds = next_number()?;
        if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
            return Err(error());
        }
        hours
            .checked_mul(60 * 60)
            .and_then(|hours_in_secs| hours_in_secs.checked_add(minutes * 60 + seconds))
            .map(PositiveDuration::from_seconds)
            .ok_or_else(error)
    }
}

impl Serialize for PositiveDuration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let hours = self.seconds / (60 * 60);
        let minutes = (self.seconds / 60) % 60;
        let seconds = self.seconds % 60;
        serializer.serialize_str(&format!("{:02}:{:02}:{:02}", hours, minutes, seconds))
    }
}

impl<'de> Deserialize<'de> for PositiveDuration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        PositiveDuration::from_str(&string).map_err(serde::de::Error::custom)
    }
}

impl std::ops::Add for PositiveDuration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            seconds: self.seconds.saturating_add(rhs.seconds),
        }
    }
}

impl std::ops::Mul<u32> for PositiveDuration {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        PositiveDuration {
            seconds: self.seconds.saturating_mul(rhs),
        }
    }
}

/// Time of a stop event in a trip schedule, counted from the start of the
/// trip's service day. May exceed 24h for trips running past midnight.
#[derive(Debug, Eq, PartialEq, Clone, Copy, Ord, PartialOrd, Hash)]
pub struct SecondsSinceServiceDayStart {
    pub(crate) seconds: i32,
}

impl SecondsSinceServiceDayStart {
    pub fn zero() -> Self {
        Self { seconds: 0 }
    }

    pub fn from_seconds(seconds: i32) -> Option<Self> {
        if (0..=MAX_SECONDS_IN_SERVICE_DAY).contains(&seconds) {
            Some(Self { seconds })
        } else {
            None
        }
    }

    pub fn total_seconds(&self) -> i32 {
        self.seconds
    }
}

impl Display for SecondsSinceServiceDayStart {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.seconds / 60 / 60,
            self.seconds / 60 % 60,
            self.seconds % 60
        )
    }
}

/// A point in time during a search, counted from the midnight
/// that starts the requested departure date.
/// Negative values refer to the day before.
#[derive(Debug, Eq, PartialEq, Clone, Copy, Ord, PartialOrd, Hash)]
pub struct SecondsSinceSearchDayStart {
    pub(crate) seconds: i32,
}

impl SecondsSinceSearchDayStart {
    pub fn zero() -> Self {
        Self { seconds: 0 }
    }

    pub fn from_seconds(seconds: i32) -> Self {
        Self { seconds }
    }

    pub fn total_seconds(&self) -> i32 {
        self.seconds
    }

    /// Time of a schedule event of a trip running on the service day
    /// that starts `day_offset` seconds after the search day start.
    pub fn from_service_day(day_offset: i32, time: SecondsSinceServiceDayStart) -> Self {
        Self {
            seconds: day_offset.saturating_add(time.seconds),
        }
    }

    pub fn duration_since(&self, start: &SecondsSinceSearchDayStart) -> Option<PositiveDuration> {
        self.seconds
            .checked_sub(start.seconds)
            .and_then(|seconds| u32::try_from(seconds).ok())
            .map(PositiveDuration::from_seconds)
    }

    pub fn saturating_sub(&self, duration: PositiveDuration) -> Self {
        Self {
            seconds: self.seconds.saturating_sub(duration.as_clamped_i32()),
        }
    }

    pub fn to_naive_datetime(&self, search_date: &NaiveDate) -> NaiveDateTime {
        search_date.and_time(chrono::NaiveTime::MIN)
            + chrono::Duration::seconds(i64::from(self.seconds))
    }
}

impl std::ops::Add<PositiveDuration> for SecondsSinceSearchDayStart {
    type Output = Self;

    fn add(self, rhs: PositiveDuration) -> Self::Output {
        Self {
            seconds: self.seconds.saturating_add(rhs.as_clamped_i32()),
        }
    }
}

impl Display for SecondsSinceSearchDayStart {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.seconds < 0 { "-" } else { "" };
        let seconds = self.seconds.unsigned_abs();
        write!(
            f,
            "{}{:02}:{:02}:{:02}",
            sign,
            seconds / 60 / 60,
            seconds / 60 % 60,
            seconds % 60
        )
    }
}

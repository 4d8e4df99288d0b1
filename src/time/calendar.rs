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

use super::MAX_DAYS_IN_CALENDAR;
use chrono::NaiveDate;

/// The range of dates covered by the services of a transit network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    first_date: NaiveDate, // first date which may be allowed
    last_date: NaiveDate,  // last date (included) which may be allowed
    nb_of_days: u16,       // == (last_date - first_date).num_days() + 1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DaysSinceCalendarStart {
    pub(crate) days: u16,
}

impl DaysSinceCalendarStart {
    pub fn idx(&self) -> usize {
        usize::from(self.days)
    }
}

impl Calendar {
    /// Returns `None` when `first_date > last_date` or when the range
    /// spans more than `MAX_DAYS_IN_CALENDAR` days.
    pub fn new(first_date: NaiveDate, last_date: NaiveDate) -> Option<Self> {
        if first_date > last_date {
            return None;
        }
        let nb_of_days_i64: i64 = (last_date - first_date).num_days() + 1;
        if nb_of_days_i64 >= i64::from(MAX_DAYS_IN_CALENDAR) {
            return None;
        }
        let nb_of_days = u16::try_from(nb_of_days_i64).ok()?;
        Some(Self {
            first_date,
            last_date,
            nb_of_days,
        })
    }

    pub fn nb_of_days(&self) -> u16 {
        self.nb_of_days
    }

    pub fn first_date(&self) -> &NaiveDate {
        &self.first_date
    }

    pub fn last_date(&self) -> &NaiveDate {
        &self.last_date
    }

    pub fn contains_date(&self, date: &NaiveDate) -> bool {
        self.first_date <= *date && *date <= self.last_date
    }

    pub fn days(&self) -> impl Iterator<Item = DaysSinceCalendarStart> {
        (0..self.nb_of_days).map(|days| DaysSinceCalendarStart { days })
    }

    pub fn to_naive_date(&self, day: &DaysSinceCalendarStart) -> NaiveDate {
        self.first_date + chrono::Duration::days(i64::from(day.days))
    }

    pub fn date_to_days_since_start(&self, date: &NaiveDate) -> Option<DaysSinceCalendarStart> {
        self.date_to_offset(date)
            .map(|offset| DaysSinceCalendarStart { days: offset })
    }

    pub(crate) fn date_to_offset(&self, date: &NaiveDate) -> Option<u16> {
        if !self.contains_date(date) {
            return None;
        }
        // date is inside [first_date, last_date] and the calendar
        // holds less than u16::MAX days, so the conversion cannot fail
        u16::try_from((*date - self.first_date).num_days()).ok()
    }
}

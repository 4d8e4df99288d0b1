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

use super::calendar::{Calendar, DaysSinceCalendarStart};
use chrono::NaiveDate;

/// Deduplicated sets of active days.
///
/// Services sharing the same active dates share one `DaysPattern`,
/// so that activation tests are a single bitset lookup.
#[derive(Debug, Clone)]
pub struct DaysPatterns {
    days_patterns: Vec<DaysPatternData>,
    nb_of_days: usize,
}

#[derive(Debug, Clone)]
struct DaysPatternData {
    allowed_dates: Vec<bool>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DaysPattern {
    idx: usize,
}

impl DaysPatterns {
    pub fn new(nb_of_days: usize) -> Self {
        Self {
            days_patterns: Vec::new(),
            nb_of_days,
        }
    }

    pub fn nb_of_patterns(&self) -> usize {
        self.days_patterns.len()
    }

    pub fn is_allowed(&self, days_pattern: &DaysPattern, day: &DaysSinceCalendarStart) -> bool {
        debug_assert!(days_pattern.idx < self.days_patterns.len());
        self.days_patterns[days_pattern.idx]
            .allowed_dates
            .get(day.idx())
            .copied()
            .unwrap_or(false)
    }

    pub fn nb_of_allowed_days(&self, days_pattern: &DaysPattern) -> usize {
        self.days_patterns[days_pattern.idx]
            .allowed_dates
            .iter()
            .filter(|allowed| **allowed)
            .count()
    }

    /// Dates outside of `calendar` are ignored.
    pub fn get_or_insert<'a, Dates>(&mut self, dates: Dates, calendar: &Calendar) -> DaysPattern
    where
        Dates: Iterator<Item = &'a NaiveDate>,
    {
        let mut allowed_dates = vec![false; self.nb_of_days];
        for date in dates {
            if let Some(offset) = calendar.date_to_offset(date) {
                if let Some(allowed) = allowed_dates.get_mut(usize::from(offset)) {
                    *allowed = true;
                }
            }
        }

        let has_days_pattern = self
            .days_patterns
            .iter()
            .position(|pattern| pattern.allowed_dates == allowed_dates);

        let idx = match has_days_pattern {
            Some(idx) => idx,
            None => {
                self.days_patterns.push(DaysPatternData { allowed_dates });
                self.days_patterns.len() - 1
            }
        };

        DaysPattern { idx }
    }
}

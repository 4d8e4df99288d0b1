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

//! Per search view over a [`TransitLayer`].
//!
//! A `RequestTransitData` keeps only the trip patterns that run on the scanned
//! dates and pass the search filters. Each retained pattern is a
//! [`MultiDayPattern`] : one list of running schedules per scanned day,
//! each day shifted by its offset from the search day start.
//! It also precomputes, once, the patterns touching each stop and the
//! walking durations of transfers for the requested walk speed.

use crate::{
    filters::PatternFilters,
    time::{
        PositiveDuration, SecondsSinceSearchDayStart, MAX_DAY_RANGE, SECONDS_IN_A_DAY,
    },
    transit_layer::{
        PatternIdx, StopIdx, TransferIdx, TransitLayer, TripPattern, TripSchedule,
    },
};
use chrono::NaiveDate;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidParameter {
    #[error("walk speed must be a finite and positive number of meters per second, got {0}")]
    WalkSpeed(f64),
    #[error("day range must be between 2 and {max}, got {value}")]
    DayRange { value: u16, max: u16 },
    #[error("the search window must not be empty")]
    EmptySearchWindow,
    #[error("the iteration step must not be zero")]
    ZeroIterationStep,
    #[error("{name} is {value}, it must not exceed {max}")]
    DurationTooLong {
        name: &'static str,
        value: PositiveDuration,
        max: PositiveDuration,
    },
    #[error("malformed mode filter : {0}")]
    ModeFilter(String),
    #[error("{name} must be a finite and non negative number, got {value}")]
    Reluctance { name: &'static str, value: f64 },
}

/// Index of a pattern among the patterns retained for one search.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct RequestPatternIdx {
    pub(crate) idx: usize,
}

impl RequestPatternIdx {
    pub fn get(&self) -> usize {
        self.idx
    }
}

/// A schedule running on a given scanned day of a `MultiDayPattern`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct TripOnDay {
    pub(crate) day: usize,
    pub(crate) schedule: usize,
}

#[derive(Debug, Clone)]
pub struct ServiceDay<'layer> {
    date: NaiveDate,
    // seconds from the search day start to the start of this service day
    day_offset: i32,
    schedules: &'layer [usize],
}

impl<'layer> ServiceDay<'layer> {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn day_offset(&self) -> i32 {
        self.day_offset
    }
}

#[derive(Debug, Clone)]
pub struct MultiDayPattern<'layer> {
    pattern_idx: PatternIdx,
    pattern: &'layer TripPattern,
    // ascending day offsets
    days: Vec<ServiceDay<'layer>>,
}

impl<'layer> MultiDayPattern<'layer> {
    pub fn pattern_idx(&self) -> PatternIdx {
        self.pattern_idx
    }

    pub fn pattern(&self) -> &'layer TripPattern {
        self.pattern
    }

    pub fn days(&self) -> &[ServiceDay<'layer>] {
        &self.days
    }

    pub fn nb_of_positions(&self) -> usize {
        self.pattern.nb_of_positions()
    }

    pub fn stop_at(&self, position: usize) -> StopIdx {
        self.pattern.stop_at(position)
    }

    pub fn nb_of_trips(&self) -> usize {
        self.days.iter().map(|day| day.schedules.len()).sum()
    }

    pub fn schedule(&self, trip: &TripOnDay) -> &'layer TripSchedule {
        self.pattern.schedule(trip.schedule)
    }

    pub fn service_date(&self, trip: &TripOnDay) -> NaiveDate {
        self.days[trip.day].date
    }

    pub fn board_time(&self, trip: &TripOnDay, position: usize) -> SecondsSinceSearchDayStart {
        let day_offset = self.days[trip.day].day_offset;
        SecondsSinceSearchDayStart::from_service_day(
            day_offset,
            self.schedule(trip).departure(position),
        )
    }

    pub fn debark_time(&self, trip: &TripOnDay, position: usize) -> SecondsSinceSearchDayStart {
        let day_offset = self.days[trip.day].day_offset;
        SecondsSinceSearchDayStart::from_service_day(
            day_offset,
            self.schedule(trip).arrival(position),
        )
    }

    /// The trip with the earliest departure at `position` among those
    /// departing at or after `waiting_time`, over all scanned days.
    pub fn earliest_trip_to_board_at(
        &self,
        waiting_time: &SecondsSinceSearchDayStart,
        position: usize,
    ) -> Option<(TripOnDay, SecondsSinceSearchDayStart)> {
        debug_assert!(position < self.nb_of_positions());
        let mut best: Option<(TripOnDay, SecondsSinceSearchDayStart)> = None;
        for (day_idx, day) in self.days.iter().enumerate() {
            let has_schedule = self.earliest_schedule_in_day(day, waiting_time, position);
            if let Some(schedule) = has_schedule {
                let trip = TripOnDay {
                    day: day_idx,
                    schedule,
                };
                let board_time = self.board_time(&trip, position);
                let is_better = best
                    .as_ref()
                    .map(|(_, best_time)| board_time < *best_time)
                    .unwrap_or(true);
                if is_better {
                    best = Some((trip, board_time));
                }
            }
        }
        best
    }

    fn earliest_schedule_in_day(
        &self,
        day: &ServiceDay<'layer>,
        waiting_time: &SecondsSinceSearchDayStart,
        position: usize,
    ) -> Option<usize> {
        // waiting time, expressed in the time frame of this service day
        let target = waiting_time.total_seconds().saturating_sub(day.day_offset);
        let departure = |schedule: usize| {
            self.pattern
                .schedule(schedule)
                .departure(position)
                .total_seconds()
        };
        if self.pattern.is_fifo() {
            let first_boardable =
                day.schedules.partition_point(|schedule| departure(*schedule) < target);
            day.schedules.get(first_boardable).copied()
        } else {
            day.schedules
                .iter()
                .copied()
                .filter(|schedule| departure(*schedule) >= target)
                .min_by_key(|schedule| departure(*schedule))
        }
    }
}

/// A transfer with its duration resolved for the walk speed of the search.
#[derive(Debug, Clone)]
pub struct RequestTransfer {
    pub(crate) transfer: TransferIdx,
    pub(crate) to: StopIdx,
    pub(crate) duration: PositiveDuration,
    pub(crate) cost: Option<u32>,
}

impl RequestTransfer {
    pub fn transfer_idx(&self) -> TransferIdx {
        self.transfer
    }

    pub fn to_stop(&self) -> StopIdx {
        self.to
    }

    pub fn duration(&self) -> PositiveDuration {
        self.duration
    }

    pub fn cost(&self) -> Option<u32> {
        self.cost
    }
}

/// Patterns to scan in the next round, each with the most upstream
/// position at which a boarding may happen.
/// Owned by a search, reused across rounds.
#[derive(Debug, Clone)]
pub struct TouchedPatterns {
    first_position: Vec<Option<usize>>,
    patterns: Vec<RequestPatternIdx>,
}

impl TouchedPatterns {
    pub fn new(nb_of_patterns: usize) -> Self {
        Self {
            first_position: vec![None; nb_of_patterns],
            patterns: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn insert(&mut self, pattern: RequestPatternIdx, position: usize) {
        match &mut self.first_position[pattern.idx] {
            Some(first_position) => {
                if position < *first_position {
                    *first_position = position;
                }
            }
            none => {
                *none = Some(position);
                self.patterns.push(pattern);
            }
        }
    }

    pub fn drain(&mut self) -> impl Iterator<Item = (RequestPatternIdx, usize)> + '_ {
        let first_position = &mut self.first_position;
        self.patterns.drain(..).filter_map(move |pattern| {
            first_position[pattern.idx]
                .take()
                .map(|position| (pattern, position))
        })
    }

    pub fn clear(&mut self) {
        for pattern in self.patterns.drain(..) {
            self.first_position[pattern.idx] = None;
        }
    }
}

pub struct RequestTransitData<'layer> {
    layer: &'layer TransitLayer,
    departure_date: NaiveDate,
    patterns: Vec<MultiDayPattern<'layer>>,
    // (pattern, position) pairs for each stop
    patterns_by_stop: Vec<Vec<(RequestPatternIdx, usize)>>,
    transfers_by_stop: Vec<Vec<RequestTransfer>>,
}

impl<'layer> RequestTransitData<'layer> {
    pub fn new(
        layer: &'layer TransitLayer,
        departure_date: NaiveDate,
        day_range: u16,
        filters: &PatternFilters,
        walk_speed: f64,
    ) -> Result<Self, InvalidParameter> {
        if !walk_speed.is_finite() || walk_speed <= 0.0 {
            return Err(InvalidParameter::WalkSpeed(walk_speed));
        }
        if !(2..=MAX_DAY_RANGE).contains(&day_range) {
            return Err(InvalidParameter::DayRange {
                value: day_range,
                max: MAX_DAY_RANGE,
            });
        }
        filters.modes.validate()?;

        let patterns = create_multi_day_patterns(layer, departure_date, day_range, filters);
        let patterns_by_stop = create_patterns_by_stop(layer.nb_of_stops(), &patterns);
        let transfers_by_stop = create_transfers_by_stop(layer, walk_speed);

        debug!(
            "{} trip patterns out of {} retained for a search on {} over {} days",
            patterns.len(),
            layer.nb_of_patterns(),
            departure_date,
            day_range
        );

        Ok(Self {
            layer,
            departure_date,
            patterns,
            patterns_by_stop,
            transfers_by_stop,
        })
    }

    pub fn layer(&self) -> &'layer TransitLayer {
        self.layer
    }

    pub fn departure_date(&self) -> NaiveDate {
        self.departure_date
    }

    pub fn nb_of_stops(&self) -> usize {
        self.patterns_by_stop.len()
    }

    pub fn nb_of_patterns(&self) -> usize {
        self.patterns.len()
    }

    pub fn pattern(&self, pattern: RequestPatternIdx) -> &MultiDayPattern<'layer> {
        &self.patterns[pattern.idx]
    }

    pub fn patterns(&self) -> impl Iterator<Item = (RequestPatternIdx, &MultiDayPattern<'layer>)> {
        self.patterns
            .iter()
            .enumerate()
            .map(|(idx, pattern)| (RequestPatternIdx { idx }, pattern))
    }

    /// Patterns stopping at `stop`, with the position of `stop` in each of them.
    /// A pattern visiting `stop` twice appears twice.
    pub fn patterns_at(&self, stop: StopIdx) -> &[(RequestPatternIdx, usize)] {
        &self.patterns_by_stop[stop.idx]
    }

    /// Records in `touched` every pattern stopping at one of `stops`.
    pub fn patterns_for_stops<Stops>(&self, stops: Stops, touched: &mut TouchedPatterns)
    where
        Stops: IntoIterator<Item = StopIdx>,
    {
        for stop in stops {
            for (pattern, position) in self.patterns_at(stop) {
                // boarding at the last position is useless
                if position + 1 < self.patterns[pattern.idx].nb_of_positions() {
                    touched.insert(*pattern, *position);
                }
            }
        }
    }

    pub fn transfers_for_stop(&self, stop: StopIdx) -> &[RequestTransfer] {
        &self.transfers_by_stop[stop.idx]
    }
}

fn create_multi_day_patterns<'layer>(
    layer: &'layer TransitLayer,
    departure_date: NaiveDate,
    day_range: u16,
    filters: &PatternFilters,
) -> Vec<MultiDayPattern<'layer>> {
    let mut days_by_pattern: Vec<Vec<ServiceDay<'layer>>> = vec![Vec::new(); layer.nb_of_patterns()];
    let mut is_filtered = vec![false; layer.nb_of_patterns()];
    for (pattern_idx, pattern) in layer.patterns() {
        if !filters.is_pattern_valid(pattern) {
            trace!("Pattern {} is excluded by the search filters", pattern.id());
            is_filtered[pattern_idx.idx] = true;
        }
    }

    // the day before the departure date is scanned for trips
    // that started yesterday and are still running
    let first_offset = -1i64;
    let last_offset = i64::from(day_range) - 2;
    for offset in first_offset..=last_offset {
        let has_date = departure_date.checked_add_signed(chrono::Duration::days(offset));
        let date = match has_date {
            Some(date) => date,
            None => continue,
        };
        // |offset| <= MAX_DAY_RANGE, so the product fits in an i32
        let day_offset = (offset as i32) * SECONDS_IN_A_DAY;
        for pattern_for_date in layer.trip_patterns_for_date(&date) {
            let pattern_idx = pattern_for_date.pattern();
            if is_filtered[pattern_idx.idx] {
                continue;
            }
            days_by_pattern[pattern_idx.idx].push(ServiceDay {
                date,
                day_offset,
                schedules: pattern_for_date.schedules(),
            });
        }
    }

    days_by_pattern
        .into_iter()
        .enumerate()
        .filter_map(|(idx, days)| {
            let pattern_idx = PatternIdx { idx };
            let pattern = layer.pattern(pattern_idx);
            if days.is_empty() {
                if !is_filtered[idx] {
                    trace!("Pattern {} has no trip running on the scanned dates", pattern.id());
                }
                None
            } else {
                Some(MultiDayPattern {
                    pattern_idx,
                    pattern,
                    days,
                })
            }
        })
        .collect()
}

fn create_patterns_by_stop(
    nb_of_stops: usize,
    patterns: &[MultiDayPattern<'_>],
) -> Vec<Vec<(RequestPatternIdx, usize)>> {
    let mut patterns_by_stop = vec![Vec::new(); nb_of_stops];
    for (idx, pattern) in patterns.iter().enumerate() {
        for (position, stop) in pattern.pattern.stops().iter().enumerate() {
            patterns_by_stop[stop.idx].push((RequestPatternIdx { idx }, position));
        }
    }
    patterns_by_stop
}

fn create_transfers_by_stop(layer: &TransitLayer, walk_speed: f64) -> Vec<Vec<RequestTransfer>> {
    layer
        .stops()
        .map(|(stop, _)| {
            layer
                .transfers_from(stop)
                .iter()
                .enumerate()
                .map(|(idx_in_stop, transfer)| {
                    let duration = transfer
                        .duration()
                        .unwrap_or_else(|| walking_duration(transfer.distance(), walk_speed));
                    RequestTransfer {
                        transfer: TransferIdx {
                            from: stop,
                            idx_in_stop,
                        },
                        to: transfer.to_stop(),
                        duration,
                        cost: transfer.cost(),
                    }
                })
                .collect()
        })
        .collect()
}

/// `walk_speed` must be positive, `distance` non negative.
pub(crate) fn walking_duration(distance: f64, walk_speed: f64) -> PositiveDuration {
    debug_assert!(walk_speed > 0.0);
    let seconds = (distance / walk_speed).ceil();
    if seconds.is_finite() && seconds >= 0.0 {
        // float to int casts saturate
        PositiveDuration::from_seconds(seconds as u32)
    } else {
        PositiveDuration::from_seconds(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walking_durations_are_rounded_up() {
        assert_eq!(walking_duration(100.0, 1.0), PositiveDuration::from_seconds(100));
        assert_eq!(walking_duration(100.0, 3.0), PositiveDuration::from_seconds(34));
        assert_eq!(walking_duration(0.0, 1.5), PositiveDuration::zero());
    }

    #[test]
    fn touched_patterns_keep_most_upstream_position() {
        let mut touched = TouchedPatterns::new(3);
        touched.insert(RequestPatternIdx { idx: 2 }, 4);
        touched.insert(RequestPatternIdx { idx: 0 }, 1);
        touched.insert(RequestPatternIdx { idx: 2 }, 1);
        touched.insert(RequestPatternIdx { idx: 2 }, 3);
        assert_eq!(touched.len(), 2);
        let drained: Vec<_> = touched.drain().collect();
        assert_eq!(
            drained,
            vec![
                (RequestPatternIdx { idx: 2 }, 1),
                (RequestPatternIdx { idx: 0 }, 1)
            ]
        );
        assert!(touched.is_empty());
        // drained patterns can be inserted again
        touched.insert(RequestPatternIdx { idx: 2 }, 5);
        assert_eq!(touched.drain().collect::<Vec<_>>(), vec![(RequestPatternIdx { idx: 2 }, 5)]);
    }
}

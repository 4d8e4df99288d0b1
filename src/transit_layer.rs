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

//! Immutable, array indexed snapshot of a [`TransitNetwork`](crate::model::TransitNetwork).
//!
//! Everything the search reads lives here : dense stop indices, trip patterns
//! with their schedules, transfers indexed by origin stop, service activation
//! per date, and the per-date lists of running schedules.
//! Once built, a `TransitLayer` is never mutated and can be shared
//! between concurrent searches.

mod init;
pub mod store;

pub use init::{BuildError, ScheduleError};
pub use store::TransitLayerStore;

use crate::{
    geometry::Coord,
    model::TransitMode,
    time::{Calendar, DaysPattern, DaysPatterns, PositiveDuration, SecondsSinceServiceDayStart},
};
use chrono::NaiveDate;
use std::collections::HashMap;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct StopIdx {
    pub(crate) idx: usize,
}

impl StopIdx {
    pub fn get(&self) -> usize {
        self.idx
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct PatternIdx {
    pub(crate) idx: usize,
}

impl PatternIdx {
    pub fn get(&self) -> usize {
        self.idx
    }
}

/// Identifies a transfer by its origin stop and its rank
/// among the transfers leaving that stop.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct TransferIdx {
    pub(crate) from: StopIdx,
    pub(crate) idx_in_stop: usize,
}

/// Integer proxy for a calendar service.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct ServiceCode {
    pub(crate) idx: u32,
}

#[derive(Debug, Clone)]
pub struct StopData {
    pub id: String,
    pub name: String,
    pub coord: Coord,
}

#[derive(Debug, Clone)]
pub struct TripSchedule {
    trip_id: String,
    service_code: ServiceCode,
    // (arrival, departure) for each position of the pattern
    times: Vec<(SecondsSinceServiceDayStart, SecondsSinceServiceDayStart)>,
}

impl TripSchedule {
    pub fn trip_id(&self) -> &str {
        &self.trip_id
    }

    pub fn service_code(&self) -> ServiceCode {
        self.service_code
    }

    pub fn nb_of_positions(&self) -> usize {
        self.times.len()
    }

    pub fn arrival(&self, position: usize) -> SecondsSinceServiceDayStart {
        self.times[position].0
    }

    pub fn departure(&self, position: usize) -> SecondsSinceServiceDayStart {
        self.times[position].1
    }

    fn first_departure(&self) -> SecondsSinceServiceDayStart {
        // a schedule always has at least two positions
        self.times[0].1
    }
}

/// A stopping pattern restricted to a single mode/submode.
#[derive(Debug, Clone)]
pub struct TripPattern {
    id: String,
    source_pattern_id: String,
    route_id: String,
    route_name: String,
    mode: TransitMode,
    submode: Option<String>,
    stops: Vec<StopIdx>,
    // sorted by first departure
    schedules: Vec<TripSchedule>,
    // true when no schedule overtakes another one
    fifo: bool,
}

impl TripPattern {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source_pattern_id(&self) -> &str {
        &self.source_pattern_id
    }

    pub fn route_id(&self) -> &str {
        &self.route_id
    }

    pub fn route_name(&self) -> &str {
        &self.route_name
    }

    pub fn mode(&self) -> TransitMode {
        self.mode
    }

    pub fn submode(&self) -> Option<&str> {
        self.submode.as_deref()
    }

    pub fn stops(&self) -> &[StopIdx] {
        &self.stops
    }

    pub fn stop_at(&self, position: usize) -> StopIdx {
        self.stops[position]
    }

    pub fn nb_of_positions(&self) -> usize {
        self.stops.len()
    }

    pub fn schedules(&self) -> &[TripSchedule] {
        &self.schedules
    }

    pub fn schedule(&self, idx: usize) -> &TripSchedule {
        &self.schedules[idx]
    }

    /// When true, schedules are sorted by departure time at every position
    /// and not only at the first one.
    pub fn is_fifo(&self) -> bool {
        self.fifo
    }
}

/// Outgoing walking transfer.
#[derive(Debug, Clone)]
pub struct Transfer {
    pub(crate) to: StopIdx,
    pub(crate) distance: f64,
    pub(crate) duration: Option<PositiveDuration>,
    pub(crate) cost: Option<u32>,
}

impl Transfer {
    pub fn to_stop(&self) -> StopIdx {
        self.to
    }

    /// walking distance in meters
    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn duration(&self) -> Option<PositiveDuration> {
        self.duration
    }

    pub fn cost(&self) -> Option<u32> {
        self.cost
    }
}

/// A trip pattern bound to one service date : only the schedules running
/// that day, in ascending first departure order.
#[derive(Debug, Clone)]
pub struct TripPatternForDate {
    pub(crate) pattern: PatternIdx,
    pub(crate) schedules: Vec<usize>,
}

impl TripPatternForDate {
    pub fn pattern(&self) -> PatternIdx {
        self.pattern
    }

    /// indices into the schedules of the pattern
    pub fn schedules(&self) -> &[usize] {
        &self.schedules
    }
}

#[derive(Debug)]
pub struct TransitLayer {
    stops: Vec<StopData>,
    stop_indices: HashMap<String, StopIdx>,

    patterns: Vec<TripPattern>,

    // indexed by origin stop
    transfers: Vec<Vec<Transfer>>,

    service_codes: HashMap<String, ServiceCode>,
    service_days: Vec<DaysPattern>,
    days_patterns: DaysPatterns,
    calendar: Option<Calendar>,

    // indexed by the day offset in `calendar`
    patterns_for_date: Vec<Vec<TripPatternForDate>>,
}

impl TransitLayer {
    pub fn nb_of_stops(&self) -> usize {
        self.stops.len()
    }

    pub fn stop_index(&self, stop_id: &str) -> Option<StopIdx> {
        self.stop_indices.get(stop_id).copied()
    }

    pub fn stop(&self, stop: StopIdx) -> &StopData {
        &self.stops[stop.idx]
    }

    pub fn stops(&self) -> impl Iterator<Item = (StopIdx, &StopData)> {
        self.stops
            .iter()
            .enumerate()
            .map(|(idx, data)| (StopIdx { idx }, data))
    }

    pub fn nb_of_patterns(&self) -> usize {
        self.patterns.len()
    }

    pub fn pattern(&self, pattern: PatternIdx) -> &TripPattern {
        &self.patterns[pattern.idx]
    }

    pub fn patterns(&self) -> impl Iterator<Item = (PatternIdx, &TripPattern)> {
        self.patterns
            .iter()
            .enumerate()
            .map(|(idx, pattern)| (PatternIdx { idx }, pattern))
    }

    pub fn transfers_from(&self, stop: StopIdx) -> &[Transfer] {
        &self.transfers[stop.idx]
    }

    pub fn transfer(&self, transfer: TransferIdx) -> &Transfer {
        &self.transfers[transfer.from.idx][transfer.idx_in_stop]
    }

    pub fn nb_of_transfers(&self) -> usize {
        self.transfers.iter().map(Vec::len).sum()
    }

    pub fn calendar(&self) -> Option<&Calendar> {
        self.calendar.as_ref()
    }

    pub fn service_code(&self, service_id: &str) -> Option<ServiceCode> {
        self.service_codes.get(service_id).copied()
    }

    pub fn is_service_active(&self, service_code: ServiceCode, date: &NaiveDate) -> bool {
        let has_day = self
            .calendar
            .as_ref()
            .and_then(|calendar| calendar.date_to_days_since_start(date));
        let has_days_pattern = self.service_days.get(service_code.idx as usize);
        match (has_day, has_days_pattern) {
            (Some(day), Some(days_pattern)) => self.days_patterns.is_allowed(days_pattern, &day),
            _ => false,
        }
    }

    /// Patterns with at least one schedule running on `date`.
    /// Empty when `date` is outside of the calendar.
    pub fn trip_patterns_for_date(&self, date: &NaiveDate) -> &[TripPatternForDate] {
        self.calendar
            .as_ref()
            .and_then(|calendar| calendar.date_to_days_since_start(date))
            .and_then(|day| self.patterns_for_date.get(day.idx()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

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

//! The entry point of a search : from access and egress legs and a departure
//! date-time to pareto optimal itineraries.

use crate::{
    access_egress::{AccessEgressLegs, SearchDirection, StopReach, StreetRouter, StreetRouterError},
    engine::{
        ArrivalTimeDominance, CostParams, DominanceFunction, ParetoDominance, RangeRaptor,
        SearchOutcome, SearchProfile, SearchQuery, SearchStats,
    },
    filters::PatternFilters,
    geometry::Coord,
    itinerary::Itinerary,
    path::{dedupe_by_pattern_sequence, extract_paths, Path},
    request_data::{InvalidParameter, RequestTransitData},
    time::{PositiveDuration, SecondsSinceSearchDayStart, MAX_SEARCH_DURATION_IN_SECONDS},
    transit_layer::TransitLayer,
};
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use std::time::{Duration, Instant, SystemTime};
use tracing::{debug, info};

pub const DEFAULT_MAX_NB_OF_TRANSFERS: u8 = 10;
pub const DEFAULT_SEARCH_WINDOW: PositiveDuration = PositiveDuration::from_hms(1, 0, 0);
pub const DEFAULT_ITERATION_STEP: PositiveDuration = PositiveDuration::from_hms(0, 1, 0);
pub const DEFAULT_DAY_RANGE: u16 = 3;
/// meters per second
pub const DEFAULT_WALK_SPEED: f64 = 1.12;
pub const DEFAULT_MIN_TRANSFER_TIME: PositiveDuration = PositiveDuration::from_hms(0, 1, 0);
pub const DEFAULT_MAX_JOURNEY_DURATION: PositiveDuration = PositiveDuration::from_hms(24, 0, 0);

#[derive(Debug, Clone)]
pub struct RoutingRequest {
    pub access: Vec<StopReach>,
    pub egress: Vec<StopReach>,
    pub departure_datetime: NaiveDateTime,
    /// departures are tried from `departure_datetime`
    /// to `departure_datetime + search_window`
    pub search_window: PositiveDuration,
    pub iteration_step: PositiveDuration,
    pub max_nb_of_transfers: u8,
    /// number of boardings allowed, `max_nb_of_transfers + 1` when None
    pub max_rounds: Option<u8>,
    /// number of service days scanned, the day before the departure date included
    pub day_range: u16,
    pub walk_speed: f64,
    pub min_transfer_time: PositiveDuration,
    pub max_journey_duration: PositiveDuration,
    pub costs: CostParams,
    pub search_profile: SearchProfile,
    pub filters: PatternFilters,
    /// when reached, the search stops and returns what it found so far
    pub deadline: Option<Instant>,
}

impl RoutingRequest {
    pub fn new(
        access: Vec<StopReach>,
        egress: Vec<StopReach>,
        departure_datetime: NaiveDateTime,
    ) -> Self {
        Self {
            access,
            egress,
            departure_datetime,
            search_window: DEFAULT_SEARCH_WINDOW,
            iteration_step: DEFAULT_ITERATION_STEP,
            max_nb_of_transfers: DEFAULT_MAX_NB_OF_TRANSFERS,
            max_rounds: None,
            day_range: DEFAULT_DAY_RANGE,
            walk_speed: DEFAULT_WALK_SPEED,
            min_transfer_time: DEFAULT_MIN_TRANSFER_TIME,
            max_journey_duration: DEFAULT_MAX_JOURNEY_DURATION,
            costs: CostParams::default(),
            search_profile: SearchProfile::default(),
            filters: PatternFilters::default(),
            deadline: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn max_rounds(&self) -> u8 {
        self.max_rounds
            .unwrap_or_else(|| self.max_nb_of_transfers.saturating_add(1))
    }

    pub fn validate(&self) -> Result<(), InvalidParameter> {
        if self.search_window.is_zero() {
            return Err(InvalidParameter::EmptySearchWindow);
        }
        if self.iteration_step.is_zero() {
            return Err(InvalidParameter::ZeroIterationStep);
        }
        let max = PositiveDuration::from_seconds(MAX_SEARCH_DURATION_IN_SECONDS as u32);
        let durations = [
            ("search_window", self.search_window),
            ("max_journey_duration", self.max_journey_duration),
            ("min_transfer_time", self.min_transfer_time),
        ];
        for (name, value) in durations {
            if value > max {
                return Err(InvalidParameter::DurationTooLong { name, value, max });
            }
        }
        let reluctances = [
            ("transit_reluctance", self.costs.transit_reluctance),
            ("wait_reluctance", self.costs.wait_reluctance),
            ("walk_reluctance", self.costs.walk_reluctance),
        ];
        for (name, value) in reluctances {
            if !value.is_finite() || value < 0.0 {
                return Err(InvalidParameter::Reluctance { name, value });
            }
        }
        if !self.walk_speed.is_finite() || self.walk_speed <= 0.0 {
            return Err(InvalidParameter::WalkSpeed(self.walk_speed));
        }
        self.filters.modes.validate()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoutingResponse {
    pub itineraries: Vec<Itinerary>,
    /// true when the deadline was reached : more itineraries may exist
    pub truncated: bool,
    pub stats: SearchStats,
}

#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error(transparent)]
    InvalidParameter(#[from] InvalidParameter),
    /// The departure date is neither in the calendar nor the day after its last date.
    #[error("the departure date {date} is outside of the calendar of the transit data")]
    DepartureDateOutOfCalendar { date: NaiveDate },
    #[error("could not compute access or egress legs")]
    StreetRouter(#[from] StreetRouterError),
}

/// Computes the pareto optimal itineraries of `request` on `layer`.
///
/// No itinerary is not an error : the response is then empty.
pub fn route(layer: &TransitLayer, request: &RoutingRequest) -> Result<RoutingResponse, RoutingError> {
    request.validate()?;
    let departure_date = request.departure_datetime.date();
    // the day after the calendar still serves trips running past its last midnight
    let is_in_calendar = layer
        .calendar()
        .map(|calendar| {
            calendar.contains_date(&departure_date)
                || departure_date.pred_opt().as_ref() == Some(calendar.last_date())
        })
        .unwrap_or(false);
    if !is_in_calendar {
        return Err(RoutingError::DepartureDateOutOfCalendar {
            date: departure_date,
        });
    }

    let data = RequestTransitData::new(
        layer,
        departure_date,
        request.day_range,
        &request.filters,
        request.walk_speed,
    )?;
    let access = AccessEgressLegs::new(layer, &request.access, SearchDirection::Access);
    let egress = AccessEgressLegs::new(layer, &request.egress, SearchDirection::Egress);

    let seconds_since_midnight = request.departure_datetime.time().num_seconds_from_midnight();
    let query = SearchQuery {
        access: &access,
        egress: &egress,
        // less than a day, fits in an i32
        earliest_departure: SecondsSinceSearchDayStart::from_seconds(seconds_since_midnight as i32),
        search_window: request.search_window,
        iteration_step: request.iteration_step,
        max_rounds: request.max_rounds(),
        max_journey_duration: request.max_journey_duration,
        min_transfer_time: request.min_transfer_time,
        costs: &request.costs,
        deadline: request.deadline,
    };

    debug!(
        "Start computing journeys departing at {} from {} stops to {} stops, {} profile",
        request.departure_datetime,
        access.len(),
        egress.len(),
        request.search_profile
    );
    let search_timer = SystemTime::now();
    let (paths, outcome) = match request.search_profile {
        SearchProfile::Standard => search(&data, ArrivalTimeDominance, &query, &access, &egress),
        SearchProfile::MultiCriteria => search(&data, ParetoDominance, &query, &access, &egress),
    };
    let elapsed_ms = search_timer
        .elapsed()
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0);

    let itineraries: Vec<Itinerary> = paths
        .iter()
        .map(|path| Itinerary::from_path(path, layer, &access, &egress, &departure_date))
        .collect();
    info!(
        "{} itineraries computed in {} ms with {} rounds{}",
        itineraries.len(),
        elapsed_ms,
        outcome.stats.nb_of_rounds,
        if outcome.truncated { ", search truncated" } else { "" }
    );
    for itinerary in &itineraries {
        debug!("{}", itinerary);
    }

    Ok(RoutingResponse {
        itineraries,
        truncated: outcome.truncated,
        stats: outcome.stats,
    })
}

/// Same as [`route`], the access and egress legs of `request` being
/// replaced by those `router` finds from `origin` and to `destination`.
pub fn route_with_street_router<Router>(
    layer: &TransitLayer,
    router: &Router,
    origin: &Coord,
    destination: &Coord,
    request: &RoutingRequest,
) -> Result<RoutingResponse, RoutingError>
where
    Router: StreetRouter + ?Sized,
{
    let access = router.reachable_stops(origin, SearchDirection::Access)?;
    let egress = router.reachable_stops(destination, SearchDirection::Egress)?;
    let request = RoutingRequest {
        access,
        egress,
        ..request.clone()
    };
    route(layer, &request)
}

fn search<D: DominanceFunction>(
    data: &RequestTransitData<'_>,
    dominance: D,
    query: &SearchQuery,
    access: &AccessEgressLegs,
    egress: &AccessEgressLegs,
) -> (Vec<Path>, SearchOutcome) {
    let mut engine = RangeRaptor::new(data, dominance);
    let outcome = engine.compute(query);
    let allow_transfer_only = query.max_rounds == 0;
    let paths = extract_paths(engine.state(), data, access, egress, allow_transfer_only);
    (dedupe_by_pattern_sequence(paths), outcome)
}

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

use serde::{Deserialize, Serialize};
use std::time::Duration;

use transit_raptor::{
    request, CostParams, InvalidParameter, ModeFilter, NaiveDateTime, PatternFilters,
    PositiveDuration, RoutingRequest, SearchProfile, StopReach,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestParams {
    /// maximum number of transfers in a journey
    #[serde(default = "default_max_nb_of_transfers")]
    pub max_nb_of_transfers: u8,

    /// journeys departing between the requested datetime
    /// and the requested datetime + search_window are looked for
    #[serde(default = "default_search_window")]
    pub search_window: PositiveDuration,

    /// gap between two departure times tried in the search window
    #[serde(default = "default_iteration_step")]
    pub iteration_step: PositiveDuration,

    /// number of service days to scan, starting the day before the departure date
    #[serde(default = "default_day_range")]
    pub day_range: u16,

    /// in meters per second
    #[serde(default = "default_walk_speed")]
    pub walk_speed: f64,

    /// minimum time between alighting a vehicle and boarding the next one
    #[serde(default = "default_min_transfer_time")]
    pub min_transfer_time: PositiveDuration,

    #[serde(default = "default_max_journey_duration")]
    pub max_journey_duration: PositiveDuration,

    #[serde(default)]
    pub costs: CostParams,

    /// standard : earliest arrival, fewest transfers, latest departure
    /// multi_criteria : also minimize the generalized cost
    #[serde(default)]
    pub search_profile: SearchProfile,

    /// allowed modes, as `mode` or `mode:submode`. Empty allows everything.
    #[serde(default)]
    pub allowed_modes: Vec<String>,

    #[serde(default)]
    pub banned_routes: Vec<String>,

    /// the search returns what it found so far after this delay
    #[serde(default)]
    pub timeout: Option<PositiveDuration>,
}

pub const DEFAULT_MAX_NB_OF_TRANSFERS: u8 = request::DEFAULT_MAX_NB_OF_TRANSFERS;
pub const DEFAULT_SEARCH_WINDOW: PositiveDuration = request::DEFAULT_SEARCH_WINDOW;
pub const DEFAULT_ITERATION_STEP: PositiveDuration = request::DEFAULT_ITERATION_STEP;
pub const DEFAULT_DAY_RANGE: u16 = request::DEFAULT_DAY_RANGE;
pub const DEFAULT_WALK_SPEED: f64 = request::DEFAULT_WALK_SPEED;
pub const DEFAULT_MIN_TRANSFER_TIME: PositiveDuration = request::DEFAULT_MIN_TRANSFER_TIME;
pub const DEFAULT_MAX_JOURNEY_DURATION: PositiveDuration = request::DEFAULT_MAX_JOURNEY_DURATION;

pub fn default_max_nb_of_transfers() -> u8 {
    DEFAULT_MAX_NB_OF_TRANSFERS
}

pub fn default_search_window() -> PositiveDuration {
    DEFAULT_SEARCH_WINDOW
}

pub fn default_iteration_step() -> PositiveDuration {
    DEFAULT_ITERATION_STEP
}

pub fn default_day_range() -> u16 {
    DEFAULT_DAY_RANGE
}

pub fn default_walk_speed() -> f64 {
    DEFAULT_WALK_SPEED
}

pub fn default_min_transfer_time() -> PositiveDuration {
    DEFAULT_MIN_TRANSFER_TIME
}

pub fn default_max_journey_duration() -> PositiveDuration {
    DEFAULT_MAX_JOURNEY_DURATION
}

impl Default for RequestParams {
    fn default() -> Self {
        Self {
            max_nb_of_transfers: default_max_nb_of_transfers(),
            search_window: default_search_window(),
            iteration_step: default_iteration_step(),
            day_range: default_day_range(),
            walk_speed: default_walk_speed(),
            min_transfer_time: default_min_transfer_time(),
            max_journey_duration: default_max_journey_duration(),
            costs: CostParams::default(),
            search_profile: SearchProfile::default(),
            allowed_modes: Vec::new(),
            banned_routes: Vec::new(),
            timeout: None,
        }
    }
}

impl RequestParams {
    pub fn filters(&self) -> Result<PatternFilters, InvalidParameter> {
        let modes = if self.allowed_modes.is_empty() {
            ModeFilter::all()
        } else {
            ModeFilter::parse(&self.allowed_modes)?
        };
        Ok(PatternFilters {
            modes,
            banned_routes: self.banned_routes.iter().cloned().collect(),
        })
    }

    /// A request with these parameters.
    /// The timeout starts when this function is called.
    pub fn to_request(
        &self,
        access: Vec<StopReach>,
        egress: Vec<StopReach>,
        departure_datetime: NaiveDateTime,
    ) -> Result<RoutingRequest, InvalidParameter> {
        let mut request = RoutingRequest::new(access, egress, departure_datetime);
        request.max_nb_of_transfers = self.max_nb_of_transfers;
        request.search_window = self.search_window;
        request.iteration_step = self.iteration_step;
        request.day_range = self.day_range;
        request.walk_speed = self.walk_speed;
        request.min_transfer_time = self.min_transfer_time;
        request.max_journey_duration = self.max_journey_duration;
        request.costs = self.costs.clone();
        request.search_profile = self.search_profile;
        request.filters = self.filters()?;
        if let Some(timeout) = self.timeout {
            request = request.with_timeout(Duration::from_secs(timeout.total_seconds()));
        }
        Ok(request)
    }
}

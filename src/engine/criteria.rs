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

use crate::time::{PositiveDuration, SecondsSinceSearchDayStart};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Criteria of an arrival at a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Criteria {
    pub arrival_time: SecondsSinceSearchDayStart,
    pub nb_of_trips: u8,
    pub cost: u32,
}

/// Criteria of an arrival at the destination, egress included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrivalCriteria {
    pub departure_time: SecondsSinceSearchDayStart,
    pub arrival_time: SecondsSinceSearchDayStart,
    pub nb_of_transfers: u8,
    pub cost: u32,
}

/// Decides when a set of criteria is at least as good as another one.
pub trait DominanceFunction {
    /// Returns true when `lower` is at least as good as `upper`
    /// on every criterion this function compares.
    fn is_lower(&self, lower: &Criteria, upper: &Criteria) -> bool;

    /// Same as `is_lower`, for arrivals at the destination.
    /// A later departure is better.
    fn is_lower_at_destination(&self, lower: &ArrivalCriteria, upper: &ArrivalCriteria) -> bool;

    fn profile(&self) -> SearchProfile;
}

/// Earliest arrival : stops only compare arrival times.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrivalTimeDominance;

impl DominanceFunction for ArrivalTimeDominance {
    fn is_lower(&self, lower: &Criteria, upper: &Criteria) -> bool {
        lower.arrival_time <= upper.arrival_time
    }

    fn is_lower_at_destination(&self, lower: &ArrivalCriteria, upper: &ArrivalCriteria) -> bool {
        lower.arrival_time <= upper.arrival_time
            && lower.departure_time >= upper.departure_time
            && lower.nb_of_transfers <= upper.nb_of_transfers
    }

    fn profile(&self) -> SearchProfile {
        SearchProfile::Standard
    }
}

/// Arrival time, number of trips and generalized cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParetoDominance;

impl DominanceFunction for ParetoDominance {
    fn is_lower(&self, lower: &Criteria, upper: &Criteria) -> bool {
        lower.arrival_time <= upper.arrival_time
            && lower.nb_of_trips <= upper.nb_of_trips
            && lower.cost <= upper.cost
    }

    fn is_lower_at_destination(&self, lower: &ArrivalCriteria, upper: &ArrivalCriteria) -> bool {
        lower.arrival_time <= upper.arrival_time
            && lower.departure_time >= upper.departure_time
            && lower.nb_of_transfers <= upper.nb_of_transfers
            && lower.cost <= upper.cost
    }

    fn profile(&self) -> SearchProfile {
        SearchProfile::MultiCriteria
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchProfile {
    Standard,
    MultiCriteria,
}

impl Default for SearchProfile {
    fn default() -> Self {
        Self::Standard
    }
}

impl FromStr for SearchProfile {
    type Err = SearchProfileConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let profile = match s {
            "standard" => SearchProfile::Standard,
            "multi_criteria" => SearchProfile::MultiCriteria,
            _ => {
                return Err(SearchProfileConfigError {
                    profile_name: s.to_string(),
                })
            }
        };
        Ok(profile)
    }
}

impl Display for SearchProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchProfile::Standard => write!(f, "standard"),
            SearchProfile::MultiCriteria => write!(f, "multi_criteria"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Bad search profile : `{profile_name}`")]
pub struct SearchProfileConfigError {
    profile_name: String,
}

/// Weights of the generalized cost.
///
/// Costs are expressed in seconds-equivalent units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CostParams {
    /// paid at each boarding
    pub boarding_cost: u32,
    /// paid at each boarding but the first one
    pub transfer_cost: u32,
    pub transit_reluctance: f64,
    /// applied to waiting times, except the wait before the first boarding
    pub wait_reluctance: f64,
    pub walk_reluctance: f64,
}

impl Default for CostParams {
    fn default() -> Self {
        Self {
            boarding_cost: 60,
            transfer_cost: 120,
            transit_reluctance: 1.0,
            wait_reluctance: 1.0,
            walk_reluctance: 2.0,
        }
    }
}

impl CostParams {
    pub fn walk(&self, duration: PositiveDuration) -> u32 {
        weighted(duration, self.walk_reluctance)
    }

    pub fn transit(&self, duration: PositiveDuration) -> u32 {
        weighted(duration, self.transit_reluctance)
    }

    pub fn wait(&self, duration: PositiveDuration) -> u32 {
        weighted(duration, self.wait_reluctance)
    }

    /// cost of a boarding made after `nb_of_trips` previous trips
    pub fn boarding(&self, nb_of_trips: u8) -> u32 {
        if nb_of_trips == 0 {
            self.boarding_cost
        } else {
            self.boarding_cost.saturating_add(self.transfer_cost)
        }
    }
}

fn weighted(duration: PositiveDuration, reluctance: f64) -> u32 {
    let cost = (duration.total_seconds() as f64 * reluctance).round();
    // float to int casts saturate, and NaN becomes 0
    cost as u32
}

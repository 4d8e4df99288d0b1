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

//! Bridges the street network and the transit search.
//!
//! The street router hands back, for an origin (or a destination), the stops
//! it can reach on foot. These are mapped here to real stop indices of a
//! [`TransitLayer`], one leg per stop.

use crate::{
    geometry::Coord,
    time::PositiveDuration,
    transit_layer::{StopIdx, TransitLayer},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Whether the street search starts at the origin or ends at the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchDirection {
    /// from the origin to the stops
    Access,
    /// from the stops to the destination
    Egress,
}

/// A stop reached by the street router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopReach {
    pub stop_id: String,
    pub duration: PositiveDuration,
    /// walking distance in meters
    pub distance: f64,
    /// replaces the walking cost of the leg when present
    #[serde(default)]
    pub cost: Option<u32>,
    #[serde(default)]
    pub geometry: Option<Vec<Coord>>,
}

impl StopReach {
    pub fn new(stop_id: &str, duration: PositiveDuration, distance: f64) -> Self {
        Self {
            stop_id: stop_id.to_string(),
            duration,
            distance,
            cost: None,
            geometry: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StreetRouterError {
    #[error("the place {0:?} is not connected to the street network")]
    Unreachable(Coord),
    #[error("street router failure")]
    Failure(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Street search collaborator.
pub trait StreetRouter {
    /// Stops reachable on foot from `place` (for `Access`),
    /// or from which `place` can be reached on foot (for `Egress`).
    fn reachable_stops(
        &self,
        place: &Coord,
        direction: SearchDirection,
    ) -> Result<Vec<StopReach>, StreetRouterError>;
}

/// A walking leg between the origin (or destination) and a stop.
#[derive(Debug, Clone)]
pub struct AccessEgress {
    stop: StopIdx,
    duration: PositiveDuration,
    distance: f64,
    cost: Option<u32>,
    geometry: Option<Vec<Coord>>,
}

impl AccessEgress {
    pub fn stop(&self) -> StopIdx {
        self.stop
    }

    pub fn duration(&self) -> PositiveDuration {
        self.duration
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn cost(&self) -> Option<u32> {
        self.cost
    }

    pub fn geometry(&self) -> Option<&[Coord]> {
        self.geometry.as_deref()
    }
}

/// Access (or egress) legs of a search, at most one per stop.
#[derive(Debug, Clone)]
pub struct AccessEgressLegs {
    legs: Vec<AccessEgress>,
    // index in `legs` of the leg of each stop of the layer
    leg_at_stop: Vec<Option<usize>>,
}

impl AccessEgressLegs {
    /// When a stop is reached several times, the shortest leg is kept.
    /// Stops unknown to `layer` are ignored.
    pub fn new(layer: &TransitLayer, reaches: &[StopReach], direction: SearchDirection) -> Self {
        let mut legs: Vec<AccessEgress> = Vec::with_capacity(reaches.len());
        let mut leg_at_stop = vec![None; layer.nb_of_stops()];
        for reach in reaches {
            let stop = match layer.stop_index(&reach.stop_id) {
                Some(stop) => stop,
                None => {
                    warn!(
                        "{:?} leg toward unknown stop {}. I ignore it.",
                        direction, reach.stop_id
                    );
                    continue;
                }
            };
            let leg = AccessEgress {
                stop,
                duration: reach.duration,
                distance: reach.distance,
                cost: reach.cost,
                geometry: reach.geometry.clone(),
            };
            match leg_at_stop[stop.idx] {
                Some(idx) => {
                    let current: &mut AccessEgress = &mut legs[idx];
                    if leg.duration < current.duration {
                        *current = leg;
                    }
                }
                None => {
                    leg_at_stop[stop.idx] = Some(legs.len());
                    legs.push(leg);
                }
            }
        }
        debug!(
            "{} {:?} legs from {} street reaches",
            legs.len(),
            direction,
            reaches.len()
        );
        Self { legs, leg_at_stop }
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    pub fn get(&self, idx: usize) -> &AccessEgress {
        &self.legs[idx]
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &AccessEgress)> {
        self.legs.iter().enumerate()
    }

    /// The leg of `stop`, with its index.
    pub fn at_stop(&self, stop: StopIdx) -> Option<(usize, &AccessEgress)> {
        self.leg_at_stop
            .get(stop.idx)
            .copied()
            .flatten()
            .map(|idx| (idx, &self.legs[idx]))
    }
}

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

//! The mutable transit network the routing snapshot is built from.
//!
//! Parsing feeds (GTFS, NeTEx...) into a `TransitNetwork` is done elsewhere.
//! This module only stores what the routing core needs to read.

use crate::{geometry::Coord, time::PositiveDuration};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt::Display, str::FromStr};
use typed_index_collection::{CollectionWithId, Id, Idx};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitMode {
    Air,
    Bus,
    CableCar,
    Coach,
    Ferry,
    Funicular,
    Gondola,
    Monorail,
    Rail,
    Subway,
    Tram,
    Trolleybus,
}

impl TransitMode {
    pub const ALL: [TransitMode; 12] = [
        TransitMode::Air,
        TransitMode::Bus,
        TransitMode::CableCar,
        TransitMode::Coach,
        TransitMode::Ferry,
        TransitMode::Funicular,
        TransitMode::Gondola,
        TransitMode::Monorail,
        TransitMode::Rail,
        TransitMode::Subway,
        TransitMode::Tram,
        TransitMode::Trolleybus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransitMode::Air => "air",
            TransitMode::Bus => "bus",
            TransitMode::CableCar => "cable_car",
            TransitMode::Coach => "coach",
            TransitMode::Ferry => "ferry",
            TransitMode::Funicular => "funicular",
            TransitMode::Gondola => "gondola",
            TransitMode::Monorail => "monorail",
            TransitMode::Rail => "rail",
            TransitMode::Subway => "subway",
            TransitMode::Tram => "tram",
            TransitMode::Trolleybus => "trolleybus",
        }
    }
}

impl Display for TransitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Bad transit mode : `{0}`")]
pub struct TransitModeParseError(String);

impl FromStr for TransitMode {
    type Err = TransitModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransitMode::ALL
            .iter()
            .find(|mode| mode.as_str() == s)
            .copied()
            .ok_or_else(|| TransitModeParseError(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: String,
    pub name: String,
    pub coord: Coord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub id: String,
    pub name: String,
    pub mode: TransitMode,
    pub submode: Option<String>,
}

/// A calendar service : the dates on which its trips run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub id: String,
    pub dates: BTreeSet<NaiveDate>,
}

/// Times in seconds since the start of the trip's service day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopTime {
    pub arrival_time: u32,
    pub departure_time: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub id: String,
    pub service_id: String,
    /// When `None`, the mode of the route is used.
    pub mode: Option<TransitMode>,
    /// When `None`, the submode of the route is used.
    pub submode: Option<String>,
    pub stop_times: Vec<StopTime>,
}

/// A stopping pattern : an ordered list of stops served by trips of a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub id: String,
    pub route_id: String,
    pub stop_ids: Vec<String>,
    pub trips: Vec<Trip>,
}

/// A walking connection from one stop to another.
/// Transfers are directed : the reverse connection must be added explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub from_stop_id: String,
    pub to_stop_id: String,
    /// walking distance in meters
    pub distance: Option<f64>,
    pub duration: Option<PositiveDuration>,
    pub cost: Option<u32>,
}

macro_rules! impl_with_id {
    ($ty:ty) => {
        impl Id<$ty> for $ty {
            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }
        }
    };
}

impl_with_id!(Stop);
impl_with_id!(Route);
impl_with_id!(Service);
impl_with_id!(Pattern);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("identifier `{0}` already exists")]
    IdentifierAlreadyExists(String),
    #[error("unknown pattern `{0}`")]
    UnknownPattern(String),
}

#[derive(Debug, Clone, Default)]
pub struct TransitNetwork {
    pub stops: CollectionWithId<Stop>,
    pub routes: CollectionWithId<Route>,
    pub services: CollectionWithId<Service>,
    pub patterns: CollectionWithId<Pattern>,
    pub transfers: Vec<Transfer>,
}

impl TransitNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stop(&mut self, stop: Stop) -> Result<Idx<Stop>, ModelError> {
        let id = stop.id.clone();
        self.stops
            .push(stop)
            .map_err(|_| ModelError::IdentifierAlreadyExists(id))
    }

    pub fn add_route(&mut self, route: Route) -> Result<Idx<Route>, ModelError> {
        let id = route.id.clone();
        self.routes
            .push(route)
            .map_err(|_| ModelError::IdentifierAlreadyExists(id))
    }

    pub fn add_service(&mut self, service: Service) -> Result<Idx<Service>, ModelError> {
        let id = service.id.clone();
        self.services
            .push(service)
            .map_err(|_| ModelError::IdentifierAlreadyExists(id))
    }

    pub fn add_pattern(&mut self, pattern: Pattern) -> Result<Idx<Pattern>, ModelError> {
        let id = pattern.id.clone();
        self.patterns
            .push(pattern)
            .map_err(|_| ModelError::IdentifierAlreadyExists(id))
    }

    pub fn add_trip(&mut self, pattern_id: &str, trip: Trip) -> Result<(), ModelError> {
        let mut pattern = self
            .patterns
            .get_mut(pattern_id)
            .ok_or_else(|| ModelError::UnknownPattern(pattern_id.to_string()))?;
        if pattern.trips.iter().any(|other| other.id == trip.id) {
            return Err(ModelError::IdentifierAlreadyExists(trip.id));
        }
        pattern.trips.push(trip);
        Ok(())
    }

    pub fn add_transfer(&mut self, transfer: Transfer) {
        self.transfers.push(transfer);
    }

    pub fn nb_of_trips(&self) -> usize {
        self.patterns.values().map(|pattern| pattern.trips.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(id: &str) -> Stop {
        Stop {
            id: id.to_string(),
            name: id.to_string(),
            coord: Coord::default(),
        }
    }

    #[test]
    fn identifiers_are_unique() {
        let mut network = TransitNetwork::new();
        network.add_stop(stop("A")).unwrap();
        assert_eq!(
            network.add_stop(stop("A")),
            Err(ModelError::IdentifierAlreadyExists("A".to_string()))
        );
        assert_eq!(network.stops.len(), 1);
    }

    #[test]
    fn trips_are_attached_to_existing_patterns() {
        let mut network = TransitNetwork::new();
        network
            .add_pattern(Pattern {
                id: "P".to_string(),
                route_id: "R".to_string(),
                stop_ids: vec!["A".to_string(), "B".to_string()],
                trips: Vec::new(),
            })
            .unwrap();
        let trip = Trip {
            id: "T".to_string(),
            service_id: "S".to_string(),
            mode: None,
            submode: None,
            stop_times: Vec::new(),
        };
        network.add_trip("P", trip.clone()).unwrap();
        assert!(network.add_trip("P", trip.clone()).is_err());
        assert_eq!(
            network.add_trip("Q", trip),
            Err(ModelError::UnknownPattern("Q".to_string()))
        );
        assert_eq!(network.nb_of_trips(), 1);
    }

    #[test]
    fn transit_modes_round_trip_through_strings() {
        for mode in TransitMode::ALL {
            assert_eq!(TransitMode::from_str(mode.as_str()), Ok(mode));
        }
        assert!(TransitMode::from_str("spaceship").is_err());
    }
}

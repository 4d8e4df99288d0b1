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

#![allow(dead_code)]
pub mod model_builder;

use anyhow::Error;
use launch::transit_raptor::{
    route, Itinerary, Leg, NaiveDateTime, PositiveDuration, RoutingRequest, RoutingResponse,
    StopReach, TransitLayer, TransitNetwork,
};
use model_builder::AsDateTime;

/// A walking leg of `seconds` between the origin (or destination) and `stop_id`.
pub fn reach(stop_id: &str, seconds: u32) -> StopReach {
    // walking at about 1 meter per second
    StopReach::new(stop_id, PositiveDuration::from_seconds(seconds), f64::from(seconds))
}

/// A request from `start` to `end`, both reached without walking.
pub fn make_request(datetime: impl AsDateTime, start: &str, end: &str) -> RoutingRequest {
    RoutingRequest::new(vec![reach(start, 0)], vec![reach(end, 0)], datetime.as_datetime())
}

pub fn build_and_solve(
    network: &TransitNetwork,
    request: &RoutingRequest,
) -> Result<RoutingResponse, Error> {
    let layer = TransitLayer::new(network)?;
    let response = route(&layer, request)?;
    Ok(response)
}

pub fn datetime(datetime: &str) -> NaiveDateTime {
    datetime.as_datetime()
}

/// (trip, board stop, debark stop) of each transit leg
pub fn transit_legs(itinerary: &Itinerary) -> Vec<(&str, &str, &str)> {
    itinerary
        .legs
        .iter()
        .filter_map(|leg| match leg {
            Leg::Transit { trip_id, from, to, .. } => {
                Some((trip_id.as_str(), from.stop_id.as_str(), to.stop_id.as_str()))
            }
            Leg::Walk { .. } => None,
        })
        .collect()
}

pub fn first_transit_leg(itinerary: &Itinerary) -> Option<&Leg> {
    itinerary
        .legs
        .iter()
        .find(|leg| matches!(leg, Leg::Transit { .. }))
}

pub fn route_ids(itinerary: &Itinerary) -> Vec<&str> {
    itinerary
        .legs
        .iter()
        .filter_map(|leg| match leg {
            Leg::Transit { route_id, .. } => Some(route_id.as_str()),
            Leg::Walk { .. } => None,
        })
        .collect()
}

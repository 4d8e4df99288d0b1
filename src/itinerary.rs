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

use crate::{
    access_egress::AccessEgressLegs,
    geometry::{distance_coord_to_coord, Coord},
    model::TransitMode,
    path::{Path, PathLeg},
    time::{PositiveDuration, SecondsSinceSearchDayStart},
    transit_layer::{StopIdx, TransitLayer},
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub stop_id: String,
    pub name: String,
    pub coord: Coord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkKind {
    Access,
    Transfer,
    Egress,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Leg {
    Walk {
        kind: WalkKind,
        /// None for the origin
        from: Option<Place>,
        /// None for the destination
        to: Option<Place>,
        departure: NaiveDateTime,
        arrival: NaiveDateTime,
        distance: f64,
        geometry: Vec<Coord>,
    },
    Transit {
        route_id: String,
        route_name: String,
        mode: TransitMode,
        submode: Option<String>,
        pattern_id: String,
        trip_id: String,
        service_date: NaiveDate,
        from: Place,
        to: Place,
        departure: NaiveDateTime,
        arrival: NaiveDateTime,
        /// the stops served, from `from` to `to`
        geometry: Vec<Coord>,
    },
}

impl Leg {
    pub fn departure(&self) -> NaiveDateTime {
        match self {
            Leg::Walk { departure, .. } | Leg::Transit { departure, .. } => *departure,
        }
    }

    pub fn arrival(&self) -> NaiveDateTime {
        match self {
            Leg::Walk { arrival, .. } | Leg::Transit { arrival, .. } => *arrival,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Itinerary {
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    pub duration: PositiveDuration,
    pub nb_of_transfers: u8,
    pub generalized_cost: u32,
    pub legs: Vec<Leg>,
}

impl Itinerary {
    pub fn nb_of_transit_legs(&self) -> usize {
        self.legs
            .iter()
            .filter(|leg| matches!(leg, Leg::Transit { .. }))
            .count()
    }

    /// Maps a path back to the stops, routes and trips of `layer`.
    /// `search_date` is the day whose midnight is the origin of the path times.
    pub fn from_path(
        path: &Path,
        layer: &TransitLayer,
        access: &AccessEgressLegs,
        egress: &AccessEgressLegs,
        search_date: &NaiveDate,
    ) -> Self {
        let datetime = |time: SecondsSinceSearchDayStart| time.to_naive_datetime(search_date);
        let legs = path
            .legs
            .iter()
            .map(|leg| match leg {
                PathLeg::Access {
                    access: access_idx,
                    stop,
                    departure_time,
                    arrival_time,
                } => {
                    let access_leg = access.get(*access_idx);
                    let to = place(layer, *stop);
                    let geometry = access_leg
                        .geometry()
                        .map(<[Coord]>::to_vec)
                        .unwrap_or_else(|| vec![to.coord]);
                    Leg::Walk {
                        kind: WalkKind::Access,
                        from: None,
                        to: Some(to),
                        departure: datetime(*departure_time),
                        arrival: datetime(*arrival_time),
                        distance: access_leg.distance(),
                        geometry,
                    }
                }
                PathLeg::Transfer {
                    transfer,
                    from_stop,
                    to_stop,
                    departure_time,
                    arrival_time,
                } => {
                    let from = place(layer, *from_stop);
                    let to = place(layer, *to_stop);
                    let geometry = vec![from.coord, to.coord];
                    Leg::Walk {
                        kind: WalkKind::Transfer,
                        from: Some(from),
                        to: Some(to),
                        departure: datetime(*departure_time),
                        arrival: datetime(*arrival_time),
                        distance: layer.transfer(*transfer).distance(),
                        geometry,
                    }
                }
                PathLeg::Transit {
                    pattern,
                    schedule,
                    service_date,
                    board_position,
                    debark_position,
                    board_stop,
                    debark_stop,
                    board_time,
                    debark_time,
                } => {
                    let trip_pattern = layer.pattern(*pattern);
                    let geometry = trip_pattern.stops()[*board_position..=*debark_position]
                        .iter()
                        .map(|stop| layer.stop(*stop).coord)
                        .collect();
                    Leg::Transit {
                        route_id: trip_pattern.route_id().to_string(),
                        route_name: trip_pattern.route_name().to_string(),
                        mode: trip_pattern.mode(),
                        submode: trip_pattern.submode().map(str::to_string),
                        pattern_id: trip_pattern.id().to_string(),
                        trip_id: trip_pattern.schedule(*schedule).trip_id().to_string(),
                        service_date: *service_date,
                        from: place(layer, *board_stop),
                        to: place(layer, *debark_stop),
                        departure: datetime(*board_time),
                        arrival: datetime(*debark_time),
                        geometry,
                    }
                }
                PathLeg::Egress {
                    egress: egress_idx,
                    stop,
                    departure_time,
                    arrival_time,
                } => {
                    let egress_leg = egress.get(*egress_idx);
                    let from = place(layer, *stop);
                    let geometry = egress_leg
                        .geometry()
                        .map(<[Coord]>::to_vec)
                        .unwrap_or_else(|| vec![from.coord]);
                    Leg::Walk {
                        kind: WalkKind::Egress,
                        from: Some(from),
                        to: None,
                        departure: datetime(*departure_time),
                        arrival: datetime(*arrival_time),
                        distance: egress_leg.distance(),
                        geometry,
                    }
                }
            })
            .collect();

        let duration = path
            .arrival_time
            .duration_since(&path.departure_time)
            .unwrap_or_else(PositiveDuration::zero);
        Itinerary {
            departure: datetime(path.departure_time),
            arrival: datetime(path.arrival_time),
            duration,
            nb_of_transfers: path.nb_of_transfers,
            generalized_cost: path.cost,
            legs,
        }
    }

    /// Length of the walking legs, in meters.
    pub fn walking_distance(&self) -> f64 {
        self.legs
            .iter()
            .map(|leg| match leg {
                Leg::Walk { distance, .. } => *distance,
                Leg::Transit { .. } => 0.0,
            })
            .sum()
    }

    /// Crow-fly length of the transit legs, in meters.
    pub fn transit_distance(&self) -> f64 {
        self.legs
            .iter()
            .map(|leg| match leg {
                Leg::Transit { geometry, .. } => geometry
                    .windows(2)
                    .map(|pair| distance_coord_to_coord(&pair[0], &pair[1]))
                    .sum(),
                Leg::Walk { .. } => 0.0,
            })
            .sum()
    }
}

fn place(layer: &TransitLayer, stop: StopIdx) -> Place {
    let data = layer.stop(stop);
    Place {
        stop_id: data.id.clone(),
        name: data.name.clone(),
        coord: data.coord,
    }
}

impl Display for Itinerary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Departure {}, arrival {} ({}), {} transfer(s), cost {}",
            self.departure, self.arrival, self.duration, self.nb_of_transfers, self.generalized_cost
        )?;
        for leg in &self.legs {
            match leg {
                Leg::Walk {
                    kind, from, to, ..
                } => {
                    let from = from.as_ref().map(|place| place.stop_id.as_str()).unwrap_or("origin");
                    let to = to.as_ref().map(|place| place.stop_id.as_str()).unwrap_or("destination");
                    writeln!(
                        f,
                        "  {:?} walk from {} at {} to {} at {}",
                        kind,
                        from,
                        leg.departure().time(),
                        to,
                        leg.arrival().time()
                    )?;
                }
                Leg::Transit {
                    mode,
                    route_name,
                    trip_id,
                    from,
                    to,
                    ..
                } => {
                    writeln!(
                        f,
                        "  {} {} ({}) from {} at {} to {} at {}",
                        mode,
                        route_name,
                        trip_id,
                        from.stop_id,
                        leg.departure().time(),
                        to.stop_id,
                        leg.arrival().time()
                    )?;
                }
            }
        }
        Ok(())
    }
}

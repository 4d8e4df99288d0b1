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

//! Provides an easy way to create a `TransitNetwork`
//!
//! ```ignore
//!  let network = ModelBuilder::default()
//!      .vj("toto", |vj| {
//!          vj.route("1")
//!            .st("A", "10:00:00", "10:01:00")
//!            .st("B", "11:00:00", "11:01:00");
//!      })
//!      .vj("tata", |vj| {
//!          vj.st("A", "10:00:00", "10:01:00")
//!            .st("D", "11:00:00", "11:01:00");
//!      })
//!      .build();
//! ```

use launch::transit_raptor::{
    chrono::NaiveDate,
    geometry::Coord,
    model::{Pattern, Route, Service, Stop, StopTime, Transfer, Trip},
    NaiveDateTime, PositiveDuration, TransitMode, TransitNetwork,
};
use std::collections::BTreeSet;

pub const DEFAULT_CALENDAR_ID: &str = "default_service";
pub const DEFAULT_ROUTE_ID: &str = "default_route";

/// Builder used to easily create a `TransitNetwork`
/// Note: if not explicitly set all the vehicle journeys
/// will be attached to a default calendar running on 2020-01-01
pub struct ModelBuilder {
    network: TransitNetwork,
}

/// Builder used to describe a new vehicle journey.
/// Its stop times are attached to a pattern of its route
/// when the closure given to `ModelBuilder::vj` returns.
pub struct VehicleJourneyBuilder<'a> {
    vj: &'a mut VehicleJourney,
}

pub struct VehicleJourney {
    id: String,
    route_id: String,
    service_id: String,
    mode: Option<TransitMode>,
    submode: Option<String>,
    stop_ids: Vec<String>,
    stop_times: Vec<StopTime>,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        let date = "2020-01-01";
        Self::new(date, date)
    }
}

impl ModelBuilder {
    pub fn new(start_date: impl AsDate, end_date: impl AsDate) -> Self {
        let start_date = start_date.as_date();
        let end_date = end_date.as_date();
        assert!(start_date <= end_date);
        let dates: Vec<_> = start_date
            .iter_days()
            .take_while(|date| *date <= end_date)
            .collect();
        let model_builder = Self {
            network: TransitNetwork::new(),
        };
        model_builder.calendar(DEFAULT_CALENDAR_ID, &dates)
    }

    /// Add a new vehicle journey to the network
    ///
    /// ```ignore
    /// let network = ModelBuilder::default()
    ///        .vj("toto", |vj_builder| {
    ///            vj_builder
    ///                .st("A", "10:00:00", "10:00:00")
    ///                .st("B", "11:00:00", "11:00:00");
    ///        })
    ///        .build();
    /// ```
    pub fn vj<F>(mut self, name: &str, mut vj_initer: F) -> Self
    where
        F: FnMut(VehicleJourneyBuilder),
    {
        let mut vj = VehicleJourney {
            id: name.to_string(),
            route_id: DEFAULT_ROUTE_ID.to_string(),
            service_id: DEFAULT_CALENDAR_ID.to_string(),
            mode: None,
            submode: None,
            stop_ids: Vec::new(),
            stop_times: Vec::new(),
        };
        vj_initer(VehicleJourneyBuilder { vj: &mut vj });
        self.add_vj(vj);
        self
    }

    /// Add a new route to the network.
    /// Routes referenced by a vehicle journey and not added explicitly
    /// are bus routes named after their id.
    ///
    /// ```ignore
    /// let network = ModelBuilder::default()
    ///      .route("l1", |r| {
    ///             r.name = "ligne 1".to_owned();
    ///             r.mode = TransitMode::Tram;
    ///         })
    ///      .vj("toto", |vj| {
    ///          vj.route("l1")
    ///            .st("A", "10:00:00", "10:00:00")
    ///            .st("B", "11:00:00", "11:00:00");
    ///      })
    ///      .build();
    /// ```
    pub fn route<F>(mut self, id: &str, mut route_initer: F) -> Self
    where
        F: FnMut(&mut Route),
    {
        let mut route = default_route(id);
        route_initer(&mut route);
        if self.network.routes.contains_id(id) {
            if let Some(mut existing) = self.network.routes.get_mut(id) {
                *existing = route;
            }
        } else {
            self.network
                .add_route(route)
                .unwrap_or_else(|_| panic!("route {} already exists", id));
        }
        self
    }

    /// Add a new stop, or modify an existing one.
    pub fn stop<F>(mut self, id: &str, mut stop_initer: F) -> Self
    where
        F: FnMut(&mut Stop),
    {
        self.get_or_create_stop(id);
        if let Some(mut stop) = self.network.stops.get_mut(id) {
            stop_initer(&mut *stop);
        }
        self
    }

    /// Add a calendar service running on `dates`
    pub fn calendar(mut self, id: &str, dates: &[impl AsDate]) -> Self {
        let dates: BTreeSet<NaiveDate> = dates.iter().map(AsDate::as_date).collect();
        if self.network.services.contains_id(id) {
            if let Some(mut service) = self.network.services.get_mut(id) {
                service.dates = dates;
            }
        } else {
            self.network
                .add_service(Service {
                    id: id.to_string(),
                    dates,
                })
                .unwrap_or_else(|_| panic!("calendar {} already exists", id));
        }
        self
    }

    pub fn add_transfer(self, from: &str, to: &str, transfer_duration: impl IntoTime) -> Self {
        let duration = PositiveDuration::from_seconds(transfer_duration.into_time());
        self.transfer(from, to, |transfer| {
            transfer.duration = Some(duration);
        })
    }

    pub fn transfer<F>(mut self, from: &str, to: &str, mut transfer_initer: F) -> Self
    where
        F: FnMut(&mut Transfer),
    {
        self.get_or_create_stop(from);
        self.get_or_create_stop(to);
        let mut transfer = Transfer {
            from_stop_id: from.to_string(),
            to_stop_id: to.to_string(),
            distance: None,
            duration: None,
            cost: None,
        };
        transfer_initer(&mut transfer);
        self.network.add_transfer(transfer);
        self
    }

    pub fn build(self) -> TransitNetwork {
        self.network
    }

    fn get_or_create_stop(&mut self, id: &str) {
        if self.network.stops.contains_id(id) {
            return;
        }
        // stops are laid on a line, about 111 meters apart
        let nb_of_stops = self.network.stops.len() as f64;
        self.network
            .add_stop(Stop {
                id: id.to_string(),
                name: id.to_string(),
                coord: Coord::new(2.0, 48.0 + 0.001 * nb_of_stops),
            })
            .unwrap_or_else(|_| panic!("stop {} already exists", id));
    }

    fn add_vj(&mut self, vj: VehicleJourney) {
        for stop_id in &vj.stop_ids {
            self.get_or_create_stop(stop_id);
        }
        if !self.network.routes.contains_id(&vj.route_id) {
            self.network
                .add_route(default_route(&vj.route_id))
                .unwrap_or_else(|_| panic!("route {} already exists", vj.route_id));
        }
        let existing_pattern = self
            .network
            .patterns
            .values()
            .find(|pattern| pattern.route_id == vj.route_id && pattern.stop_ids == vj.stop_ids)
            .map(|pattern| pattern.id.clone());
        let pattern_id = match existing_pattern {
            Some(pattern_id) => pattern_id,
            None => {
                let pattern_id = format!("{}:{}", vj.route_id, self.network.patterns.len());
                self.network
                    .add_pattern(Pattern {
                        id: pattern_id.clone(),
                        route_id: vj.route_id.clone(),
                        stop_ids: vj.stop_ids.clone(),
                        trips: Vec::new(),
                    })
                    .unwrap_or_else(|_| panic!("pattern {} already exists", pattern_id));
                pattern_id
            }
        };
        let trip = Trip {
            id: vj.id.clone(),
            service_id: vj.service_id,
            mode: vj.mode,
            submode: vj.submode,
            stop_times: vj.stop_times,
        };
        self.network
            .add_trip(&pattern_id, trip)
            .unwrap_or_else(|_| panic!("vj {} already exists", vj.id));
    }
}

fn default_route(id: &str) -> Route {
    Route {
        id: id.to_string(),
        name: id.to_string(),
        mode: TransitMode::Bus,
        submode: None,
    }
}

impl<'a> VehicleJourneyBuilder<'a> {
    pub fn route(self, id: &str) -> Self {
        self.vj.route_id = id.to_string();
        self
    }

    pub fn calendar(self, id: &str) -> Self {
        self.vj.service_id = id.to_string();
        self
    }

    /// Overrides the mode of the route for this vehicle journey
    pub fn mode(self, mode: TransitMode) -> Self {
        self.vj.mode = Some(mode);
        self
    }

    pub fn submode(self, submode: &str) -> Self {
        self.vj.submode = Some(submode.to_string());
        self
    }

    pub fn st(self, name: &str, arrival: impl IntoTime, departure: impl IntoTime) -> Self {
        self.vj.stop_ids.push(name.to_string());
        self.vj.stop_times.push(StopTime {
            arrival_time: arrival.into_time(),
            departure_time: departure.into_time(),
        });
        self
    }
}

/// Seconds since midnight, or a duration in seconds.
pub trait IntoTime {
    fn into_time(self) -> u32;
}

impl IntoTime for u32 {
    fn into_time(self) -> u32 {
        self
    }
}

/// "HH:MM:SS", hours may exceed 24 for trips running past midnight
impl IntoTime for &str {
    fn into_time(self) -> u32 {
        let parts: Vec<u32> = self
            .split(':')
            .map(|part| {
                part.parse()
                    .unwrap_or_else(|_| panic!("{} is not a valid time", self))
            })
            .collect();
        assert_eq!(parts.len(), 3, "{} is not a valid time", self);
        parts[0] * 60 * 60 + parts[1] * 60 + parts[2]
    }
}

pub trait AsDate {
    fn as_date(&self) -> NaiveDate;
}

impl AsDate for NaiveDate {
    fn as_date(&self) -> NaiveDate {
        *self
    }
}

impl AsDate for &NaiveDate {
    fn as_date(&self) -> NaiveDate {
        **self
    }
}

impl AsDate for &str {
    fn as_date(&self) -> NaiveDate {
        NaiveDate::parse_from_str(self, "%Y-%m-%d").expect("invalid date")
    }
}

pub trait AsDateTime {
    fn as_datetime(&self) -> NaiveDateTime;
}

impl AsDateTime for &str {
    fn as_datetime(&self) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(self, "%Y%m%dT%H%M%S").expect("invalid datetime")
    }
}

impl AsDateTime for NaiveDateTime {
    fn as_datetime(&self) -> NaiveDateTime {
        *self
    }
}

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

//! Range and multi-criteria RAPTOR public transit routing.
//!
//! A [`TransitNetwork`] is compiled once into an immutable [`TransitLayer`].
//! Each search then narrows the layer to a [`RequestTransitData`],
//! runs the [`engine`] over it, and maps the journeys found into [`Itinerary`]s.

pub mod access_egress;
pub mod engine;
pub mod filters;
pub mod geometry;
pub mod itinerary;
pub mod model;
pub mod path;
pub mod request;
pub mod request_data;
pub mod time;
pub mod transit_layer;

pub use chrono;
pub use chrono::{NaiveDate, NaiveDateTime};
pub use tracing;

pub use access_egress::{SearchDirection, StopReach, StreetRouter, StreetRouterError};
pub use engine::{CostParams, SearchProfile, SearchStats};
pub use filters::{ModeFilter, PatternFilters};
pub use itinerary::{Itinerary, Leg};
pub use model::{ModelError, TransitMode, TransitNetwork};
pub use path::BadPath;
pub use request::{route, route_with_street_router, RoutingError, RoutingRequest, RoutingResponse};
pub use request_data::{InvalidParameter, RequestTransitData};
pub use time::PositiveDuration;
pub use transit_layer::{BuildError, TransitLayer, TransitLayerStore};

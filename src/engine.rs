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

//! The round based search.
//!
//! A single engine, [`RangeRaptor`], is parameterized by a [`DominanceFunction`]
//! deciding which labels are kept at each stop and at the destination.

pub mod criteria;
pub mod journeys_tree;
pub mod pareto_front;
pub mod range_raptor;
pub mod search_state;

pub use criteria::{
    ArrivalCriteria, ArrivalTimeDominance, CostParams, Criteria, DominanceFunction,
    ParetoDominance, SearchProfile, SearchProfileConfigError,
};
pub use journeys_tree::{JourneysTree, Node, NodeId, Step};
pub use pareto_front::ParetoFront;
pub use range_raptor::{RangeRaptor, SearchOutcome, SearchQuery, SearchStats};
pub use search_state::{Arrived, SearchState};

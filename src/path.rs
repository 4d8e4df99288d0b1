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

//! Journeys extracted from a finished search.

use crate::{
    access_egress::AccessEgressLegs,
    engine::{ArrivalCriteria, Arrived, SearchState, Step},
    request_data::RequestTransitData,
    time::SecondsSinceSearchDayStart,
    transit_layer::{PatternIdx, StopIdx, TransferIdx},
};
use chrono::NaiveDate;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathLeg {
    Access {
        access: usize,
        stop: StopIdx,
        departure_time: SecondsSinceSearchDayStart,
        arrival_time: SecondsSinceSearchDayStart,
    },
    Transit {
        pattern: PatternIdx,
        schedule: usize,
        service_date: NaiveDate,
        board_position: usize,
        debark_position: usize,
        board_stop: StopIdx,
        debark_stop: StopIdx,
        board_time: SecondsSinceSearchDayStart,
        debark_time: SecondsSinceSearchDayStart,
    },
    Transfer {
        transfer: TransferIdx,
        from_stop: StopIdx,
        to_stop: StopIdx,
        departure_time: SecondsSinceSearchDayStart,
        arrival_time: SecondsSinceSearchDayStart,
    },
    Egress {
        egress: usize,
        stop: StopIdx,
        departure_time: SecondsSinceSearchDayStart,
        arrival_time: SecondsSinceSearchDayStart,
    },
}

impl PathLeg {
    pub fn departure_time(&self) -> SecondsSinceSearchDayStart {
        match self {
            PathLeg::Access { departure_time, .. }
            | PathLeg::Transfer { departure_time, .. }
            | PathLeg::Egress { departure_time, .. } => *departure_time,
            PathLeg::Transit { board_time, .. } => *board_time,
        }
    }

    pub fn arrival_time(&self) -> SecondsSinceSearchDayStart {
        match self {
            PathLeg::Access { arrival_time, .. }
            | PathLeg::Transfer { arrival_time, .. }
            | PathLeg::Egress { arrival_time, .. } => *arrival_time,
            PathLeg::Transit { debark_time, .. } => *debark_time,
        }
    }

    /// None for an access leg, which starts at the origin.
    pub fn start_stop(&self) -> Option<StopIdx> {
        match self {
            PathLeg::Access { .. } => None,
            PathLeg::Transit { board_stop, .. } => Some(*board_stop),
            PathLeg::Transfer { from_stop, .. } => Some(*from_stop),
            PathLeg::Egress { stop, .. } => Some(*stop),
        }
    }

    /// None for an egress leg, which ends at the destination.
    pub fn end_stop(&self) -> Option<StopIdx> {
        match self {
            PathLeg::Access { stop, .. } => Some(*stop),
            PathLeg::Transit { debark_stop, .. } => Some(*debark_stop),
            PathLeg::Transfer { to_stop, .. } => Some(*to_stop),
            PathLeg::Egress { .. } => None,
        }
    }

    pub fn is_transit(&self) -> bool {
        matches!(self, PathLeg::Transit { .. })
    }
}

/// A journey from the origin to the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub legs: Vec<PathLeg>,
    pub departure_time: SecondsSinceSearchDayStart,
    pub arrival_time: SecondsSinceSearchDayStart,
    pub nb_of_transfers: u8,
    pub cost: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BadPath {
    #[error("a path must start with an access leg and end with an egress leg")]
    Malformed,
    #[error("the path has no transit leg")]
    NoTransitLeg,
    #[error("leg {leg} debarks before boarding")]
    DebarkBeforeBoard { leg: usize },
    #[error("leg {leg} starts before the end of the previous leg")]
    TimeTravel { leg: usize },
    #[error("leg {leg} does not start at the stop where the previous leg ends")]
    Disconnected { leg: usize },
}

impl Path {
    pub fn nb_of_transit_legs(&self) -> usize {
        self.legs.iter().filter(|leg| leg.is_transit()).count()
    }

    /// Patterns boarded along the path, in order.
    pub fn patterns(&self) -> impl Iterator<Item = PatternIdx> + '_ {
        self.legs.iter().filter_map(|leg| match leg {
            PathLeg::Transit { pattern, .. } => Some(*pattern),
            _ => None,
        })
    }

    pub fn has_same_patterns(&self, other: &Path) -> bool {
        self.patterns().eq(other.patterns())
    }

    /// Checks the path is a sound journey : access first, egress last,
    /// legs chained in time and space, at least one transit leg unless
    /// `allow_transfer_only`.
    pub fn validate(&self, allow_transfer_only: bool) -> Result<(), BadPath> {
        let starts_with_access = matches!(self.legs.first(), Some(PathLeg::Access { .. }));
        let ends_with_egress = matches!(self.legs.last(), Some(PathLeg::Egress { .. }));
        if !starts_with_access || !ends_with_egress {
            return Err(BadPath::Malformed);
        }
        if !allow_transfer_only && self.nb_of_transit_legs() == 0 {
            return Err(BadPath::NoTransitLeg);
        }
        for (idx, leg) in self.legs.iter().enumerate() {
            if let PathLeg::Transit {
                board_position,
                debark_position,
                board_time,
                debark_time,
                ..
            } = leg
            {
                if board_position >= debark_position || board_time > debark_time {
                    return Err(BadPath::DebarkBeforeBoard { leg: idx });
                }
            }
        }
        for (idx, pair) in self.legs.windows(2).enumerate() {
            let (previous, next) = (&pair[0], &pair[1]);
            if next.departure_time() < previous.arrival_time() {
                return Err(BadPath::TimeTravel { leg: idx + 1 });
            }
            if next.start_stop() != previous.end_stop() {
                return Err(BadPath::Disconnected { leg: idx + 1 });
            }
        }
        Ok(())
    }
}

/// Reconstructs the journeys arrived at the destination.
/// Reads the state only, so extracting twice gives the same paths.
pub fn extract_paths(
    state: &SearchState,
    data: &RequestTransitData<'_>,
    access: &AccessEgressLegs,
    egress: &AccessEgressLegs,
    allow_transfer_only: bool,
) -> Vec<Path> {
    let mut paths = Vec::with_capacity(state.nb_of_arrived());
    for (arrived, criteria) in state.arrived_front().iter() {
        let path = create_path(state, data, access, egress, arrived, criteria);
        match path.validate(allow_transfer_only) {
            Ok(()) => paths.push(path),
            Err(err) => {
                trace!("Rejected journey {:?} : {}", path, err);
            }
        }
    }
    paths
}

fn create_path(
    state: &SearchState,
    data: &RequestTransitData<'_>,
    access: &AccessEgressLegs,
    egress: &AccessEgressLegs,
    arrived: &Arrived,
    criteria: &ArrivalCriteria,
) -> Path {
    let tree = state.tree();
    let mut nodes = Vec::new();
    let mut has_node = Some(arrived.node);
    while let Some(node) = has_node {
        nodes.push(node);
        has_node = tree.parent(node);
    }
    nodes.reverse();

    let mut legs = Vec::with_capacity(nodes.len() + 1);
    let mut current_time = criteria.departure_time;
    for node_id in nodes {
        let node = tree.node(node_id);
        let leg = match &node.step {
            Step::Access { access: access_idx } => {
                let arrival_time = current_time + access.get(*access_idx).duration();
                PathLeg::Access {
                    access: *access_idx,
                    stop: node.stop,
                    departure_time: current_time,
                    arrival_time,
                }
            }
            Step::Transfer {
                parent,
                transfer,
                duration,
            } => PathLeg::Transfer {
                transfer: *transfer,
                from_stop: tree.node(*parent).stop,
                to_stop: node.stop,
                departure_time: current_time,
                arrival_time: current_time + *duration,
            },
            Step::Transit {
                pattern,
                trip,
                board_position,
                debark_position,
                board_time,
                ..
            } => {
                let multi_day_pattern = data.pattern(*pattern);
                PathLeg::Transit {
                    pattern: multi_day_pattern.pattern_idx(),
                    schedule: trip.schedule,
                    service_date: multi_day_pattern.service_date(trip),
                    board_position: *board_position,
                    debark_position: *debark_position,
                    board_stop: multi_day_pattern.stop_at(*board_position),
                    debark_stop: node.stop,
                    board_time: *board_time,
                    debark_time: multi_day_pattern.debark_time(trip, *debark_position),
                }
            }
        };
        current_time = leg.arrival_time();
        legs.push(leg);
    }

    let egress_leg = egress.get(arrived.egress);
    legs.push(PathLeg::Egress {
        egress: arrived.egress,
        stop: egress_leg.stop(),
        departure_time: current_time,
        arrival_time: current_time + egress_leg.duration(),
    });

    Path {
        legs,
        departure_time: criteria.departure_time,
        arrival_time: criteria.arrival_time,
        nb_of_transfers: criteria.nb_of_transfers,
        cost: criteria.cost,
    }
}

/// Keeps, among the paths boarding the same sequence of patterns, those with
/// no other path departing later (or at the same time) and arriving earlier
/// (or at the same time). Among equal paths, the first one is kept.
/// The result is sorted by arrival time, then latest departure first.
pub fn dedupe_by_pattern_sequence(paths: Vec<Path>) -> Vec<Path> {
    let mut kept: Vec<Path> = Vec::with_capacity(paths.len());
    for path in paths {
        let is_dominated = kept.iter().any(|other| {
            other.has_same_patterns(&path)
                && other.departure_time >= path.departure_time
                && other.arrival_time <= path.arrival_time
        });
        if is_dominated {
            continue;
        }
        kept.retain(|other| {
            !(other.has_same_patterns(&path)
                && path.departure_time >= other.departure_time
                && path.arrival_time <= other.arrival_time)
        });
        kept.push(path);
    }
    kept.sort_by(|lhs, rhs| {
        lhs.arrival_time
            .cmp(&rhs.arrival_time)
            .then(rhs.departure_time.cmp(&lhs.departure_time))
            .then(lhs.nb_of_transfers.cmp(&rhs.nb_of_transfers))
            .then(lhs.cost.cmp(&rhs.cost))
    });
    kept
}

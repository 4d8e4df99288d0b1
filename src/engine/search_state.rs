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

use super::{
    criteria::{ArrivalCriteria, Criteria, DominanceFunction},
    journeys_tree::{JourneysTree, NodeId},
    pareto_front::ParetoFront,
};
use crate::{time::SecondsSinceSearchDayStart, transit_layer::StopIdx};

pub type StopFront = ParetoFront<NodeId, Criteria>;

/// A journey arrived at the destination : the last node before the egress leg,
/// and the index of the egress leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrived {
    pub node: NodeId,
    pub egress: usize,
}

pub type ArrivedFront = ParetoFront<Arrived, ArrivalCriteria>;

/// Labels of every stop for one round.
#[derive(Debug, Clone)]
pub struct RoundState {
    /// arrivals by vehicle
    pub(crate) transit: Vec<StopFront>,
    /// arrivals by vehicle, transfer or access
    pub(crate) all: Vec<StopFront>,

    pub(crate) stops_touched_by_transit: Vec<StopIdx>,
    is_touched_by_transit: Vec<bool>,
    pub(crate) stops_touched: Vec<StopIdx>,
    is_touched: Vec<bool>,
}

impl RoundState {
    fn new(nb_of_stops: usize) -> Self {
        Self {
            transit: vec![StopFront::new(); nb_of_stops],
            all: vec![StopFront::new(); nb_of_stops],
            stops_touched_by_transit: Vec::new(),
            is_touched_by_transit: vec![false; nb_of_stops],
            stops_touched: Vec::new(),
            is_touched: vec![false; nb_of_stops],
        }
    }

    pub(crate) fn touch_by_transit(&mut self, stop: StopIdx) {
        if !self.is_touched_by_transit[stop.idx] {
            self.is_touched_by_transit[stop.idx] = true;
            self.stops_touched_by_transit.push(stop);
        }
    }

    pub(crate) fn touch(&mut self, stop: StopIdx) {
        if !self.is_touched[stop.idx] {
            self.is_touched[stop.idx] = true;
            self.stops_touched.push(stop);
        }
    }

    pub(crate) fn clear_touched(&mut self) {
        for stop in self.stops_touched_by_transit.drain(..) {
            self.is_touched_by_transit[stop.idx] = false;
        }
        for stop in self.stops_touched.drain(..) {
            self.is_touched[stop.idx] = false;
        }
    }

    pub fn transit_front(&self, stop: StopIdx) -> &StopFront {
        &self.transit[stop.idx]
    }

    pub fn front(&self, stop: StopIdx) -> &StopFront {
        &self.all[stop.idx]
    }
}

/// Everything a search knows, kept across the iterations of a range search.
#[derive(Debug)]
pub struct SearchState {
    pub(crate) rounds: Vec<RoundState>,
    pub(crate) tree: JourneysTree,
    pub(crate) arrived_front: ArrivedFront,
    // incremented at each departure time of the range
    pub(crate) iteration: u32,
}

impl SearchState {
    /// One `RoundState` for round 0, plus one for each allowed boarding.
    pub fn new(nb_of_stops: usize, max_rounds: u8) -> Self {
        let nb_of_rounds = usize::from(max_rounds) + 1;
        Self {
            rounds: (0..nb_of_rounds)
                .map(|_| RoundState::new(nb_of_stops))
                .collect(),
            tree: JourneysTree::new(),
            arrived_front: ArrivedFront::new(),
            iteration: 0,
        }
    }

    pub fn nb_of_rounds(&self) -> usize {
        self.rounds.len()
    }

    pub fn round(&self, round: usize) -> &RoundState {
        &self.rounds[round]
    }

    pub fn tree(&self) -> &JourneysTree {
        &self.tree
    }

    pub fn arrived_front(&self) -> &ArrivedFront {
        &self.arrived_front
    }

    pub fn nb_of_arrived(&self) -> usize {
        self.arrived_front.len()
    }

    /// Best arrival time at `stop` with at most `round` rounds, by any mean.
    pub fn best_arrival_time(&self, stop: StopIdx, round: usize) -> Option<SecondsSinceSearchDayStart> {
        self.rounds
            .iter()
            .take(round + 1)
            .flat_map(|state| state.all[stop.idx].iter())
            .map(|(_, criteria)| criteria.arrival_time)
            .min()
    }

    /// Best arrival time at `stop` with at most `round` rounds,
    /// the last leg being a vehicle.
    pub fn best_transit_arrival_time(
        &self,
        stop: StopIdx,
        round: usize,
    ) -> Option<SecondsSinceSearchDayStart> {
        self.rounds
            .iter()
            .take(round + 1)
            .flat_map(|state| state.transit[stop.idx].iter())
            .map(|(_, criteria)| criteria.arrival_time)
            .min()
    }

    pub(crate) fn clear_touched(&mut self) {
        for round in self.rounds.iter_mut() {
            round.clear_touched();
        }
    }

    /// True when a label of a round up to `round` at `stop`
    /// is at least as good as `criteria`.
    pub(crate) fn is_dominated<D: DominanceFunction>(
        &self,
        stop: StopIdx,
        round: usize,
        criteria: &Criteria,
        dominance: &D,
    ) -> bool {
        self.rounds[..=round]
            .iter()
            .any(|state| state.all[stop.idx].dominates(criteria, dominance))
    }

    /// Same as `is_dominated`, against arrivals by vehicle only.
    pub(crate) fn is_dominated_by_transit<D: DominanceFunction>(
        &self,
        stop: StopIdx,
        round: usize,
        criteria: &Criteria,
        dominance: &D,
    ) -> bool {
        self.rounds[..=round]
            .iter()
            .any(|state| state.transit[stop.idx].dominates(criteria, dominance))
    }

    /// The caller must have checked that `criteria` is not dominated in `round`.
    pub(crate) fn insert<D: DominanceFunction>(
        &mut self,
        stop: StopIdx,
        round: usize,
        node: NodeId,
        criteria: Criteria,
        dominance: &D,
    ) {
        let round_state = &mut self.rounds[round];
        round_state.all[stop.idx].add_and_remove_elements_dominated(node, criteria, dominance);
        round_state.touch(stop);
    }

    pub(crate) fn insert_transit<D: DominanceFunction>(
        &mut self,
        stop: StopIdx,
        round: usize,
        node: NodeId,
        criteria: Criteria,
        dominance: &D,
    ) {
        let round_state = &mut self.rounds[round];
        round_state.transit[stop.idx].add_and_remove_elements_dominated(node, criteria, dominance);
        round_state.touch_by_transit(stop);
    }
}

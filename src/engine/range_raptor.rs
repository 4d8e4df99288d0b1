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
    criteria::{ArrivalCriteria, CostParams, Criteria, DominanceFunction},
    journeys_tree::{NodeId, Step},
    pareto_front::{AtDestination, ParetoFront},
    search_state::{Arrived, SearchState},
};
use crate::{
    access_egress::AccessEgressLegs,
    request_data::{
        MultiDayPattern, RequestPatternIdx, RequestTransfer, RequestTransitData, TouchedPatterns,
        TripOnDay,
    },
    time::{PositiveDuration, SecondsSinceSearchDayStart},
    transit_layer::StopIdx,
};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, trace};

/// Inputs of one range search.
#[derive(Debug, Clone)]
pub struct SearchQuery<'a> {
    pub access: &'a AccessEgressLegs,
    pub egress: &'a AccessEgressLegs,
    pub earliest_departure: SecondsSinceSearchDayStart,
    pub search_window: PositiveDuration,
    pub iteration_step: PositiveDuration,
    /// number of boardings allowed
    pub max_rounds: u8,
    pub max_journey_duration: PositiveDuration,
    pub min_transfer_time: PositiveDuration,
    pub costs: &'a CostParams,
    pub deadline: Option<Instant>,
}

impl<'a> SearchQuery<'a> {
    /// Departure times of the range, latest first.
    pub fn departure_times(&self) -> Vec<SecondsSinceSearchDayStart> {
        // without boarding, departing later does not change the journeys
        if self.max_rounds == 0 || self.iteration_step.is_zero() {
            return vec![self.earliest_departure];
        }
        let window = self.search_window.total_seconds();
        let step = self.iteration_step.total_seconds();
        let nb_of_iterations = ((window + step - 1) / step).max(1);
        (0..nb_of_iterations)
            .rev()
            .map(|idx| {
                let offset = PositiveDuration::from_seconds((idx * step) as u32);
                self.earliest_departure + offset
            })
            .collect()
    }

    fn is_past_deadline(&self) -> bool {
        self.deadline
            .map(|deadline| Instant::now() >= deadline)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub nb_of_iterations: u32,
    /// highest round reached
    pub nb_of_rounds: usize,
    pub nb_of_pattern_scans: usize,
    pub tree_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// true when the deadline was reached before the end of the search
    pub truncated: bool,
    pub stats: SearchStats,
}

// A journey riding a vehicle.
#[derive(Debug, Clone, Copy)]
struct Onboard {
    parent: NodeId,
    trip: TripOnDay,
    board_position: usize,
    board_time: SecondsSinceSearchDayStart,
    departure_time: SecondsSinceSearchDayStart,
    nb_of_trips: u8,
    // cost when the vehicle leaves the board position
    board_cost: u32,
}

impl Onboard {
    fn criteria_at(&self, pattern: &MultiDayPattern<'_>, position: usize, costs: &CostParams) -> Criteria {
        let arrival_time = pattern.debark_time(&self.trip, position);
        let in_vehicle = arrival_time
            .duration_since(&self.board_time)
            .unwrap_or_else(PositiveDuration::zero);
        Criteria {
            arrival_time,
            nb_of_trips: self.nb_of_trips,
            cost: self.board_cost.saturating_add(costs.transit(in_vehicle)),
        }
    }
}

/// Range raptor over a `RequestTransitData`, comparing labels with `D`.
pub struct RangeRaptor<'data, 'layer, D> {
    data: &'data RequestTransitData<'layer>,
    dominance: D,
    state: SearchState,

    touched_patterns: TouchedPatterns,
    patterns_to_scan: Vec<(RequestPatternIdx, usize)>,

    onboard_front: ParetoFront<Onboard, Criteria>,
    new_onboard_front: ParetoFront<Onboard, Criteria>,

    labels: Vec<(NodeId, Criteria)>,
    stats: SearchStats,
}

impl<'data, 'layer, D: DominanceFunction> RangeRaptor<'data, 'layer, D> {
    pub fn new(data: &'data RequestTransitData<'layer>, dominance: D) -> Self {
        Self {
            data,
            dominance,
            state: SearchState::new(data.nb_of_stops(), 0),
            touched_patterns: TouchedPatterns::new(data.nb_of_patterns()),
            patterns_to_scan: Vec::new(),
            onboard_front: ParetoFront::new(),
            new_onboard_front: ParetoFront::new(),
            labels: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn data(&self) -> &'data RequestTransitData<'layer> {
        self.data
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn compute(&mut self, query: &SearchQuery) -> SearchOutcome {
        self.state = SearchState::new(self.data.nb_of_stops(), query.max_rounds);
        self.stats = SearchStats::default();
        self.touched_patterns.clear();

        if query.access.is_empty() || query.egress.is_empty() {
            debug!(
                "No search : {} access legs and {} egress legs",
                query.access.len(),
                query.egress.len()
            );
            return SearchOutcome {
                truncated: false,
                stats: self.stats.clone(),
            };
        }

        let mut truncated = false;
        for departure_time in query.departure_times() {
            if query.is_past_deadline() {
                truncated = true;
                break;
            }
            self.state.iteration += 1;
            self.stats.nb_of_iterations += 1;
            trace!(
                "Iteration {} departing at {}",
                self.state.iteration,
                departure_time
            );
            if self.run_iteration(query, departure_time) {
                truncated = true;
                break;
            }
        }
        self.stats.tree_size = self.state.tree.size();

        debug!(
            "Range raptor : {} iterations, {} rounds, {} pattern scans, {} nodes, {} arrivals{}",
            self.stats.nb_of_iterations,
            self.stats.nb_of_rounds,
            self.stats.nb_of_pattern_scans,
            self.stats.tree_size,
            self.state.nb_of_arrived(),
            if truncated { " (truncated)" } else { "" }
        );
        SearchOutcome {
            truncated,
            stats: self.stats.clone(),
        }
    }

    // Returns true when the deadline was reached.
    fn run_iteration(&mut self, query: &SearchQuery, departure_time: SecondsSinceSearchDayStart) -> bool {
        self.state.clear_touched();
        let max_arrival = departure_time + query.max_journey_duration;

        self.init_with_access(query, departure_time, max_arrival);
        self.transfers_from_access(query, max_arrival);

        if query.max_rounds == 0 {
            self.arrivals_without_transit(query, max_arrival);
            return false;
        }

        for round in 1..=usize::from(query.max_rounds) {
            if query.is_past_deadline() {
                return true;
            }
            let data = self.data;
            {
                let previous_round = &self.state.rounds[round - 1];
                data.patterns_for_stops(
                    previous_round.stops_touched.iter().copied(),
                    &mut self.touched_patterns,
                );
            }
            // fixed point : nothing new to board
            if self.touched_patterns.is_empty() {
                break;
            }
            self.stats.nb_of_rounds = self.stats.nb_of_rounds.max(round);

            let mut patterns_to_scan = std::mem::take(&mut self.patterns_to_scan);
            patterns_to_scan.clear();
            patterns_to_scan.extend(self.touched_patterns.drain());
            for (pattern, first_position) in patterns_to_scan.iter().copied() {
                self.ride(query, round, pattern, first_position, max_arrival);
            }
            self.patterns_to_scan = patterns_to_scan;

            self.transfers_from_transit(query, round, max_arrival);
        }
        false
    }

    fn init_with_access(
        &mut self,
        query: &SearchQuery,
        departure_time: SecondsSinceSearchDayStart,
        max_arrival: SecondsSinceSearchDayStart,
    ) {
        let iteration = self.state.iteration;
        for (access_idx, access) in query.access.iter() {
            let arrival_time = departure_time + access.duration();
            if arrival_time > max_arrival {
                continue;
            }
            let cost = access
                .cost()
                .unwrap_or_else(|| query.costs.walk(access.duration()));
            let criteria = Criteria {
                arrival_time,
                nb_of_trips: 0,
                cost,
            };
            let stop = access.stop();
            if self.state.is_dominated(stop, 0, &criteria, &self.dominance) {
                continue;
            }
            let node = self
                .state
                .tree
                .depart(access_idx, stop, criteria, departure_time, iteration);
            self.state.insert(stop, 0, node, criteria, &self.dominance);
        }
    }

    // one walking transfer from each new access label
    fn transfers_from_access(&mut self, query: &SearchQuery, max_arrival: SecondsSinceSearchDayStart) {
        let iteration = self.state.iteration;
        let nb_of_accessed_stops = self.state.rounds[0].stops_touched.len();
        for idx in 0..nb_of_accessed_stops {
            let stop = self.state.rounds[0].stops_touched[idx];
            self.labels.clear();
            let tree = &self.state.tree;
            self.labels.extend(
                self.state.rounds[0].all[stop.idx]
                    .iter()
                    .filter(|(node, _)| {
                        let node = tree.node(*node);
                        node.iteration == iteration
                            && matches!(node.step, Step::Access { .. })
                    })
                    .map(|(node, criteria)| (*node, *criteria)),
            );
            self.relax_transfers(query, 0, stop, max_arrival);
        }
    }

    fn transfers_from_transit(
        &mut self,
        query: &SearchQuery,
        round: usize,
        max_arrival: SecondsSinceSearchDayStart,
    ) {
        let iteration = self.state.iteration;
        let nb_of_debarked_stops = self.state.rounds[round].stops_touched_by_transit.len();
        for idx in 0..nb_of_debarked_stops {
            let stop = self.state.rounds[round].stops_touched_by_transit[idx];
            self.labels.clear();
            let tree = &self.state.tree;
            self.labels.extend(
                self.state.rounds[round].transit[stop.idx]
                    .iter()
                    .filter(|(node, _)| tree.iteration(*node) == iteration)
                    .map(|(node, criteria)| (*node, *criteria)),
            );
            self.relax_transfers(query, round, stop, max_arrival);
        }
    }

    // relax the transfers leaving `stop` from every label in `self.labels`
    fn relax_transfers(
        &mut self,
        query: &SearchQuery,
        round: usize,
        stop: StopIdx,
        max_arrival: SecondsSinceSearchDayStart,
    ) {
        let data = self.data;
        let transfers = data.transfers_for_stop(stop);
        if transfers.is_empty() {
            return;
        }
        for idx in 0..self.labels.len() {
            let (node, criteria) = self.labels[idx];
            for transfer in transfers {
                self.relax_transfer(query, round, node, &criteria, transfer, max_arrival);
            }
        }
    }

    fn relax_transfer(
        &mut self,
        query: &SearchQuery,
        round: usize,
        node: NodeId,
        criteria: &Criteria,
        transfer: &RequestTransfer,
        max_arrival: SecondsSinceSearchDayStart,
    ) {
        let arrival_time = criteria.arrival_time + transfer.duration();
        if arrival_time > max_arrival {
            return;
        }
        let transfer_cost = transfer
            .cost()
            .unwrap_or_else(|| query.costs.walk(transfer.duration()));
        let new_criteria = Criteria {
            arrival_time,
            nb_of_trips: criteria.nb_of_trips,
            cost: criteria.cost.saturating_add(transfer_cost),
        };
        let to = transfer.to_stop();
        if self
            .state
            .is_dominated(to, round, &new_criteria, &self.dominance)
        {
            return;
        }
        let iteration = self.state.iteration;
        let new_node = self.state.tree.transfer(
            node,
            transfer.transfer_idx(),
            transfer.duration(),
            to,
            new_criteria,
            iteration,
        );
        self.state
            .insert(to, round, new_node, new_criteria, &self.dominance);
    }

    // journeys made only of access and transfer legs
    fn arrivals_without_transit(&mut self, query: &SearchQuery, max_arrival: SecondsSinceSearchDayStart) {
        let iteration = self.state.iteration;
        let at_destination = AtDestination(&self.dominance);
        let round_zero = &self.state.rounds[0];
        for stop in round_zero.stops_touched.iter() {
            let (egress_idx, egress) = match query.egress.at_stop(*stop) {
                Some(egress) => egress,
                None => continue,
            };
            for (node, criteria) in round_zero.all[stop.idx].iter() {
                let node_data = self.state.tree.node(*node);
                if node_data.iteration != iteration {
                    continue;
                }
                let arrival_time = criteria.arrival_time + egress.duration();
                if arrival_time > max_arrival {
                    continue;
                }
                let egress_cost = egress
                    .cost()
                    .unwrap_or_else(|| query.costs.walk(egress.duration()));
                let arrival_criteria = ArrivalCriteria {
                    departure_time: node_data.departure_time,
                    arrival_time,
                    nb_of_transfers: 0,
                    cost: criteria.cost.saturating_add(egress_cost),
                };
                self.state.arrived_front.add(
                    Arrived {
                        node: *node,
                        egress: egress_idx,
                    },
                    arrival_criteria,
                    &at_destination,
                );
            }
        }
    }

    // Scan a pattern from `first_position`, debarking the journeys onboard
    // and boarding the labels of the previous round, position after position.
    fn ride(
        &mut self,
        query: &SearchQuery,
        round: usize,
        pattern_idx: RequestPatternIdx,
        first_position: usize,
        max_arrival: SecondsSinceSearchDayStart,
    ) {
        self.stats.nb_of_pattern_scans += 1;
        let data = self.data;
        let pattern = data.pattern(pattern_idx);
        let nb_of_positions = pattern.nb_of_positions();
        let fifo = pattern.pattern().is_fifo();
        let iteration = self.state.iteration;
        let costs = query.costs;

        self.onboard_front.clear();
        for position in first_position..nb_of_positions {
            let stop = pattern.stop_at(position);

            for (onboard, criteria) in self.onboard_front.iter() {
                if criteria.arrival_time > max_arrival {
                    continue;
                }
                debark(
                    &mut self.state,
                    &self.dominance,
                    query,
                    round,
                    pattern_idx,
                    onboard,
                    position,
                    stop,
                    criteria,
                    max_arrival,
                );
            }

            if position + 1 == nb_of_positions {
                break;
            }

            self.new_onboard_front.clear();
            let tree = &self.state.tree;
            for (node, criteria) in self.state.rounds[round - 1].all[stop.idx].iter() {
                if tree.iteration(*node) != iteration {
                    continue;
                }
                let has_previous_trip = criteria.nb_of_trips > 0;
                let ready_time = if has_previous_trip {
                    criteria.arrival_time + query.min_transfer_time
                } else {
                    criteria.arrival_time
                };
                let (trip, board_time) = match pattern.earliest_trip_to_board_at(&ready_time, position) {
                    Some(boarding) => boarding,
                    None => continue,
                };
                let parent = tree.node(*node);
                let departure_time = if has_previous_trip {
                    parent.departure_time
                } else {
                    // leave as late as possible to catch this first vehicle
                    let walking = criteria
                        .arrival_time
                        .duration_since(&parent.departure_time)
                        .unwrap_or_else(PositiveDuration::zero);
                    board_time.saturating_sub(walking)
                };
                let mut board_cost = criteria
                    .cost
                    .saturating_add(costs.boarding(criteria.nb_of_trips));
                if has_previous_trip {
                    let waiting = board_time
                        .duration_since(&criteria.arrival_time)
                        .unwrap_or_else(PositiveDuration::zero);
                    board_cost = board_cost.saturating_add(costs.wait(waiting));
                }
                let onboard = Onboard {
                    parent: *node,
                    trip,
                    board_position: position,
                    board_time,
                    departure_time,
                    nb_of_trips: criteria.nb_of_trips.saturating_add(1),
                    board_cost,
                };
                let next_criteria = onboard.criteria_at(pattern, position + 1, costs);
                if fifo {
                    self.new_onboard_front
                        .add(onboard, next_criteria, &self.dominance);
                } else {
                    self.new_onboard_front.add_unchecked(onboard, next_criteria);
                }
            }

            for (onboard, _) in self.onboard_front.iter() {
                let next_criteria = onboard.criteria_at(pattern, position + 1, costs);
                if fifo {
                    self.new_onboard_front
                        .add(*onboard, next_criteria, &self.dominance);
                } else {
                    self.new_onboard_front.add_unchecked(*onboard, next_criteria);
                }
            }
            self.onboard_front.replace_with(&mut self.new_onboard_front);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn debark<D: DominanceFunction>(
    state: &mut SearchState,
    dominance: &D,
    query: &SearchQuery,
    round: usize,
    pattern: RequestPatternIdx,
    onboard: &Onboard,
    position: usize,
    stop: StopIdx,
    criteria: &Criteria,
    max_arrival: SecondsSinceSearchDayStart,
) {
    if state.is_dominated_by_transit(stop, round, criteria, dominance) {
        return;
    }
    let iteration = state.iteration;
    let node = state.tree.debark(
        onboard.parent,
        pattern,
        onboard.trip,
        onboard.board_position,
        onboard.board_time,
        position,
        stop,
        *criteria,
        onboard.departure_time,
        iteration,
    );
    state.insert_transit(stop, round, node, *criteria, dominance);
    if !state.is_dominated(stop, round, criteria, dominance) {
        state.insert(stop, round, node, *criteria, dominance);
    }

    if let Some((egress_idx, egress)) = query.egress.at_stop(stop) {
        let arrival_time = criteria.arrival_time + egress.duration();
        if arrival_time > max_arrival {
            return;
        }
        let egress_cost = egress
            .cost()
            .unwrap_or_else(|| query.costs.walk(egress.duration()));
        let arrival_criteria = ArrivalCriteria {
            departure_time: onboard.departure_time,
            arrival_time,
            nb_of_transfers: criteria.nb_of_trips.saturating_sub(1),
            cost: criteria.cost.saturating_add(egress_cost),
        };
        state.arrived_front.add(
            Arrived {
                node,
                egress: egress_idx,
            },
            arrival_criteria,
            &AtDestination(dominance),
        );
    }
}

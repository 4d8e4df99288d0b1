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

use super::criteria::Criteria;
use crate::{
    request_data::{RequestPatternIdx, TripOnDay},
    time::{PositiveDuration, SecondsSinceSearchDayStart},
    transit_layer::{StopIdx, TransferIdx},
};

/// Handle on a node of a [`JourneysTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    idx: usize,
}

/// How a node was reached from its parent.
///
/// A journey always starts with an `Access`, optionally followed by a `Transfer`,
/// and then by any number of `Transit`, each optionally followed by a `Transfer`.
/// The stop where a `Transit` is boarded is the stop of its parent.
#[derive(Debug, Clone)]
pub enum Step {
    Access {
        // index in the access legs of the search
        access: usize,
    },
    Transit {
        parent: NodeId,
        pattern: RequestPatternIdx,
        trip: TripOnDay,
        board_position: usize,
        debark_position: usize,
        board_time: SecondsSinceSearchDayStart,
    },
    Transfer {
        parent: NodeId,
        transfer: TransferIdx,
        duration: PositiveDuration,
    },
}

#[derive(Debug, Clone)]
pub struct Node {
    pub stop: StopIdx,
    pub criteria: Criteria,
    /// departure time of the journey, shifted to the latest departure
    /// that still allows to make the first boarding
    pub departure_time: SecondsSinceSearchDayStart,
    /// the range iteration that created this node
    pub iteration: u32,
    pub step: Step,
}

/// Arena storing every partial journey created during a search.
/// Nodes are never removed, so a `NodeId` stays valid until `clear()`.
#[derive(Debug, Default)]
pub struct JourneysTree {
    nodes: Vec<Node>,
}

impl JourneysTree {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId {
            idx: self.nodes.len(),
        };
        self.nodes.push(node);
        id
    }

    pub fn depart(
        &mut self,
        access: usize,
        stop: StopIdx,
        criteria: Criteria,
        departure_time: SecondsSinceSearchDayStart,
        iteration: u32,
    ) -> NodeId {
        self.push(Node {
            stop,
            criteria,
            departure_time,
            iteration,
            step: Step::Access { access },
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn debark(
        &mut self,
        parent: NodeId,
        pattern: RequestPatternIdx,
        trip: TripOnDay,
        board_position: usize,
        board_time: SecondsSinceSearchDayStart,
        debark_position: usize,
        stop: StopIdx,
        criteria: Criteria,
        departure_time: SecondsSinceSearchDayStart,
        iteration: u32,
    ) -> NodeId {
        debug_assert!(board_position < debark_position);
        self.push(Node {
            stop,
            criteria,
            departure_time,
            iteration,
            step: Step::Transit {
                parent,
                pattern,
                trip,
                board_position,
                debark_position,
                board_time,
            },
        })
    }

    pub fn transfer(
        &mut self,
        parent: NodeId,
        transfer: TransferIdx,
        duration: PositiveDuration,
        stop: StopIdx,
        criteria: Criteria,
        iteration: u32,
    ) -> NodeId {
        let departure_time = self.node(parent).departure_time;
        self.push(Node {
            stop,
            criteria,
            departure_time,
            iteration,
            step: Step::Transfer {
                parent,
                transfer,
                duration,
            },
        })
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.idx]
    }

    pub fn iteration(&self, id: NodeId) -> u32 {
        self.nodes[id.idx].iteration
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        match self.nodes[id.idx].step {
            Step::Access { .. } => None,
            Step::Transit { parent, .. } | Step::Transfer { parent, .. } => Some(parent),
        }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

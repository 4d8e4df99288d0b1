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

use super::criteria::{ArrivalCriteria, Criteria, DominanceFunction};
use std::slice::Iter as SliceIter;

/// How two criteria of a front are compared.
pub trait Dominates<C> {
    fn is_lower(&self, lower: &C, upper: &C) -> bool;
}

impl<D: DominanceFunction> Dominates<Criteria> for D {
    fn is_lower(&self, lower: &Criteria, upper: &Criteria) -> bool {
        DominanceFunction::is_lower(self, lower, upper)
    }
}

/// Wraps a `DominanceFunction` to compare arrivals at the destination.
pub struct AtDestination<'a, D>(pub &'a D);

impl<'a, D: DominanceFunction> Dominates<ArrivalCriteria> for AtDestination<'a, D> {
    fn is_lower(&self, lower: &ArrivalCriteria, upper: &ArrivalCriteria) -> bool {
        self.0.is_lower_at_destination(lower, upper)
    }
}

/// A set of items none of which is lower than another one.
#[derive(Debug, Clone)]
pub struct ParetoFront<ItemData, C> {
    elements: Vec<(ItemData, C)>,
}

impl<ItemData, C> Default for ParetoFront<ItemData, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<ItemData, C> ParetoFront<ItemData, C> {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn replace_with(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.elements, &mut other.elements);
    }

    /// Returns true when an element of the front is lower than `criteria`.
    pub fn dominates<D>(&self, criteria: &C, dominance: &D) -> bool
    where
        D: Dominates<C>,
    {
        self.elements
            .iter()
            .any(|(_, old_criteria)| dominance.is_lower(old_criteria, criteria))
    }

    pub fn add_unchecked(&mut self, item_data: ItemData, criteria: C) {
        self.elements.push((item_data, criteria));
    }

    pub fn remove_elements_dominated_by<D>(&mut self, criteria: &C, dominance: &D)
    where
        D: Dominates<C>,
    {
        self.elements
            .retain(|(_, old_criteria)| !dominance.is_lower(criteria, old_criteria));
    }

    /// The caller must have checked that `criteria` is not dominated.
    pub fn add_and_remove_elements_dominated<D>(
        &mut self,
        item_data: ItemData,
        criteria: C,
        dominance: &D,
    ) where
        D: Dominates<C>,
    {
        debug_assert!(!self.dominates(&criteria, dominance));
        self.remove_elements_dominated_by(&criteria, dominance);
        self.add_unchecked(item_data, criteria);
    }

    /// Inserts the item unless it is dominated. Returns true when inserted.
    pub fn add<D>(&mut self, item_data: ItemData, criteria: C, dominance: &D) -> bool
    where
        D: Dominates<C>,
    {
        if self.dominates(&criteria, dominance) {
            return false;
        }
        self.remove_elements_dominated_by(&criteria, dominance);
        self.add_unchecked(item_data, criteria);
        true
    }

    pub fn iter(&self) -> SliceIter<'_, (ItemData, C)> {
        self.elements.iter()
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, (ItemData, C)> {
        self.elements.drain(..)
    }
}

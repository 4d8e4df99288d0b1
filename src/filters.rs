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
    model::TransitMode,
    request_data::InvalidParameter,
    transit_layer::TripPattern,
};
use std::collections::{BTreeMap, BTreeSet};

/// Allowed transit modes, each with its allowed submodes.
/// An empty submode set allows every submode of the mode,
/// including patterns without submode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeFilter {
    allowed: BTreeMap<TransitMode, BTreeSet<String>>,
}

impl Default for ModeFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl ModeFilter {
    /// Allows every mode and submode.
    pub fn all() -> Self {
        let allowed = TransitMode::ALL
            .iter()
            .map(|mode| (*mode, BTreeSet::new()))
            .collect();
        Self { allowed }
    }

    /// Allows nothing. Use `allow` and `allow_submode` to fill it.
    pub fn none() -> Self {
        Self {
            allowed: BTreeMap::new(),
        }
    }

    pub fn allow(mut self, mode: TransitMode) -> Self {
        self.allowed.entry(mode).or_default();
        self
    }

    pub fn allow_submode(mut self, mode: TransitMode, submode: &str) -> Self {
        self.allowed
            .entry(mode)
            .or_default()
            .insert(submode.to_string());
        self
    }

    /// Parses entries of the form `mode` or `mode:submode`,
    /// for example `bus`, `rail:regional`.
    pub fn parse<T>(filters: &[T]) -> Result<Self, InvalidParameter>
    where
        T: AsRef<str>,
    {
        let mut mode_filter = Self::none();
        for filter in filters {
            let filter = filter.as_ref();
            let (mode_str, has_submode) = match filter.split_once(':') {
                Some((mode_str, submode)) => (mode_str, Some(submode)),
                None => (filter, None),
            };
            let mode = mode_str
                .parse::<TransitMode>()
                .map_err(|_| InvalidParameter::ModeFilter(filter.to_string()))?;
            mode_filter = match has_submode {
                Some(submode) if submode.trim().is_empty() => {
                    return Err(InvalidParameter::ModeFilter(filter.to_string()));
                }
                Some(submode) => mode_filter.allow_submode(mode, submode),
                None => mode_filter.allow(mode),
            };
        }
        Ok(mode_filter)
    }

    pub fn validate(&self) -> Result<(), InvalidParameter> {
        if self.allowed.is_empty() {
            return Err(InvalidParameter::ModeFilter(
                "no transit mode is allowed".to_string(),
            ));
        }
        for (mode, submodes) in &self.allowed {
            if submodes.iter().any(|submode| submode.trim().is_empty()) {
                return Err(InvalidParameter::ModeFilter(format!(
                    "empty submode for mode {}",
                    mode
                )));
            }
        }
        Ok(())
    }

    pub fn accepts(&self, mode: TransitMode, submode: Option<&str>) -> bool {
        match self.allowed.get(&mode) {
            None => false,
            Some(submodes) if submodes.is_empty() => true,
            Some(submodes) => submode
                .map(|submode| submodes.contains(submode))
                .unwrap_or(false),
        }
    }
}

/// Restrictions on the patterns a search may use.
#[derive(Debug, Clone, Default)]
pub struct PatternFilters {
    pub modes: ModeFilter,
    pub banned_routes: BTreeSet<String>,
}

impl PatternFilters {
    pub fn is_pattern_valid(&self, pattern: &TripPattern) -> bool {
        // a banned route always wins
        if self.banned_routes.contains(pattern.route_id()) {
            return false;
        }
        self.modes.accepts(pattern.mode(), pattern.submode())
    }
}

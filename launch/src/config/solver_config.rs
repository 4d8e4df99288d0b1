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

use super::{parse_env_var, RequestParams};
use anyhow::{Context, Error};
use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path, str::FromStr};

/// overrides `nb_workers` when set
pub const NB_WORKERS_ENV_VAR: &str = "RAPTOR_NB_WORKERS";

pub const DEFAULT_NB_WORKERS: usize = 1;

pub fn default_nb_workers() -> usize {
    DEFAULT_NB_WORKERS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverConfig {
    /// parameters of the requests that do not provide their own
    #[serde(default)]
    pub request_params: RequestParams,

    /// number of threads used to solve a batch of requests
    #[serde(default = "default_nb_workers")]
    pub nb_workers: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            request_params: RequestParams::default(),
            nb_workers: default_nb_workers(),
        }
    }
}

impl SolverConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)
            .with_context(|| format!("Error opening config file {}", path.display()))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Error reading config file {}", path.display()))?;
        Ok(config.with_env_overrides())
    }

    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json).context("Error parsing solver config")?;
        Ok(config.with_env_overrides())
    }

    pub fn with_env_overrides(mut self) -> Self {
        self.nb_workers = parse_env_var(NB_WORKERS_ENV_VAR, self.nb_workers, usize::from_str);
        self
    }
}

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

use std::{
    sync::atomic::{AtomicUsize, Ordering},
    sync::Arc,
    time::SystemTime,
};

use anyhow::{format_err, Context, Error};
use serde::{Deserialize, Serialize};
use transit_raptor::{
    route,
    tracing::{debug, error, info},
    NaiveDateTime, RoutingResponse, StopReach, TransitLayer, TransitLayerStore, TransitNetwork,
};

use crate::config::{RequestParams, SolverConfig};

/// A journey request, as read from a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JourneyQuery {
    pub access: Vec<StopReach>,
    pub egress: Vec<StopReach>,
    pub departure_datetime: NaiveDateTime,
    /// when None, the parameters of the solver config are used
    #[serde(default)]
    pub params: Option<RequestParams>,
}

/// Solves requests on the current snapshot of a transit network.
pub struct Solver {
    store: TransitLayerStore,
    config: SolverConfig,
}

impl Solver {
    pub fn new(network: &TransitNetwork, config: SolverConfig) -> Result<Self, Error> {
        let build_timer = SystemTime::now();
        let store =
            TransitLayerStore::from_network(network).context("Could not build the transit layer")?;
        info!(
            "Transit layer built in {} ms",
            build_timer
                .elapsed()
                .map(|elapsed| elapsed.as_millis())
                .unwrap_or(0)
        );
        Ok(Self { store, config })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn store(&self) -> &TransitLayerStore {
        &self.store
    }

    /// Installs a snapshot of `network`. Searches already running
    /// finish on the previous one.
    pub fn update(&self, network: &TransitNetwork) -> Result<(), Error> {
        self.store
            .rebuild(network)
            .context("Transit layer update failed, keeping the previous one")?;
        Ok(())
    }

    pub fn solve(&self, query: &JourneyQuery) -> Result<RoutingResponse, Error> {
        let layer = self.store.snapshot()?;
        self.solve_on(&layer, query)
    }

    /// Solves the queries on `nb_workers` threads, all on the same snapshot.
    /// The results are in the order of the queries.
    pub fn solve_batch(&self, queries: &[JourneyQuery]) -> Result<Vec<Result<RoutingResponse, Error>>, Error> {
        let layer = self.store.snapshot()?;
        let nb_workers = self.config.nb_workers.clamp(1, queries.len().max(1));
        debug!("Solving {} requests with {} workers", queries.len(), nb_workers);
        let batch_timer = SystemTime::now();

        let next_query = &AtomicUsize::new(0);
        let layer = &layer;
        let mut results: Vec<Option<Result<RoutingResponse, Error>>> =
            queries.iter().map(|_| None).collect();
        std::thread::scope(|scope| {
            let workers: Vec<_> = (0..nb_workers)
                .map(|_| {
                    scope.spawn(move || {
                        let mut solved = Vec::new();
                        loop {
                            let idx = next_query.fetch_add(1, Ordering::Relaxed);
                            match queries.get(idx) {
                                Some(query) => solved.push((idx, self.solve_on(layer, query))),
                                None => break,
                            }
                        }
                        solved
                    })
                })
                .collect();
            for worker in workers {
                match worker.join() {
                    Ok(solved) => {
                        for (idx, result) in solved {
                            results[idx] = Some(result);
                        }
                    }
                    Err(_) => error!("A solver worker panicked"),
                }
            }
        });

        info!(
            "{} requests solved in {} ms",
            queries.len(),
            batch_timer
                .elapsed()
                .map(|elapsed| elapsed.as_millis())
                .unwrap_or(0)
        );
        Ok(results
            .into_iter()
            .map(|has_result| {
                has_result.unwrap_or_else(|| Err(format_err!("The worker solving this request panicked")))
            })
            .collect())
    }

    fn solve_on(&self, layer: &Arc<TransitLayer>, query: &JourneyQuery) -> Result<RoutingResponse, Error> {
        let params = query
            .params
            .as_ref()
            .unwrap_or(&self.config.request_params);
        let request = params.to_request(
            query.access.clone(),
            query.egress.clone(),
            query.departure_datetime,
        )?;
        let request_timer = SystemTime::now();
        let response = route(layer, &request)?;
        info!(
            "Journeys computed in {} ms with {} rounds",
            request_timer
                .elapsed()
                .map(|elapsed| elapsed.as_millis())
                .unwrap_or(0),
            response.stats.nb_of_rounds
        );
        info!("Nb of journeys found : {}", response.itineraries.len());
        info!("Tree size : {}", response.stats.tree_size);
        Ok(response)
    }
}

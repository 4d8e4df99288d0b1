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

use super::{BuildError, TransitLayer};
use crate::model::TransitNetwork;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to build a new transit layer")]
    Build(#[from] BuildError),
    #[error("the transit layer lock is poisoned : {0}")]
    LockPoisoned(String),
}

/// Holds the current [`TransitLayer`] snapshot.
///
/// Readers get an `Arc` on the snapshot that is current when they ask, and keep
/// using it even if a new snapshot is installed in the meantime.
/// A new snapshot is always built before the write lock is taken, so the
/// lock is only held for the pointer swap.
#[derive(Debug)]
pub struct TransitLayerStore {
    current: RwLock<Arc<TransitLayer>>,
}

impl TransitLayerStore {
    pub fn new(layer: TransitLayer) -> Self {
        Self {
            current: RwLock::new(Arc::new(layer)),
        }
    }

    pub fn from_network(network: &TransitNetwork) -> Result<Self, BuildError> {
        TransitLayer::new(network).map(Self::new)
    }

    pub fn snapshot(&self) -> Result<Arc<TransitLayer>, StoreError> {
        let lock_guard = self
            .current
            .read()
            .map_err(|err| StoreError::LockPoisoned(err.to_string()))?;
        Ok(Arc::clone(&lock_guard))
    }

    /// Builds a snapshot of `network` and installs it.
    /// On failure the previous snapshot stays in place.
    pub fn rebuild(&self, network: &TransitNetwork) -> Result<Arc<TransitLayer>, StoreError> {
        debug!("Rebuilding transit layer");
        let new_layer = Arc::new(TransitLayer::new(network)?);
        self.replace(Arc::clone(&new_layer))?;
        info!("New transit layer installed");
        Ok(new_layer)
    }

    pub fn replace(&self, layer: Arc<TransitLayer>) -> Result<(), StoreError> {
        let mut lock_guard = self
            .current
            .write()
            .map_err(|err| StoreError::LockPoisoned(err.to_string()))?;
        *lock_guard = layer;
        Ok(())
    }
}

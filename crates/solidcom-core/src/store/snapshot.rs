use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::model::{BaseStation, PackInfo};
use crate::variables::{VariableSet, derive_variables};

/// One fetch of the pack tree and everything derived from it.
///
/// Immutable: a refresh or a committed mutation builds a new snapshot and
/// swaps it in whole.
#[derive(Debug, Clone)]
pub struct PackSnapshot {
    pub pack: PackInfo,
    pub variables: Arc<VariableSet>,
    pub fetched_at: DateTime<Utc>,
}

impl PackSnapshot {
    pub fn new(pack: PackInfo) -> Self {
        let variables = Arc::new(derive_variables(&pack));
        Self {
            pack,
            variables,
            fetched_at: Utc::now(),
        }
    }

    pub fn base_station(&self) -> Option<&BaseStation> {
        self.pack.primary()
    }
}

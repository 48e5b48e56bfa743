// ── Central reactive data store ──
//
// Lock-free storage for the cached pack tree and role catalog. Reads
// never perform I/O; before the first fetch every accessor returns an
// empty or absent value.

use std::sync::Arc;

use arc_swap::{ArcSwap, ArcSwapOption};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::trace;

use super::snapshot::PackSnapshot;
use crate::choices::{Choice, headset_choices, role_choices};
use crate::model::{BaseStation, Headset, HeadsetSelector, PackInfo, Role};
use crate::variables::{VariableDefinition, VariableSet};

/// The single source of truth for device state.
///
/// Snapshots are swapped in whole through `arc-swap`, so readers always
/// see one consistent fetch. Variable and version changes are broadcast
/// through `watch` channels.
pub struct DataStore {
    pack: ArcSwapOption<PackSnapshot>,
    roles: ArcSwap<Vec<Role>>,
    variables: watch::Sender<Arc<VariableSet>>,
    version: watch::Sender<u64>,
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl DataStore {
    pub fn new() -> Self {
        let (variables, _) = watch::channel(Arc::new(VariableSet::default()));
        let (version, _) = watch::channel(0u64);
        let (last_refresh, _) = watch::channel(None);

        Self {
            pack: ArcSwapOption::empty(),
            roles: ArcSwap::from_pointee(Vec::new()),
            variables,
            version,
            last_refresh,
        }
    }

    // ── Writers ──────────────────────────────────────────────────────

    /// Replace the cached pack tree and publish its variables.
    pub(crate) fn apply_pack(&self, pack: PackInfo) -> Arc<PackSnapshot> {
        let snapshot = Arc::new(PackSnapshot::new(pack));
        self.pack.store(Some(Arc::clone(&snapshot)));
        self.variables
            .send_replace(Arc::clone(&snapshot.variables));
        self.last_refresh.send_replace(Some(snapshot.fetched_at));
        self.bump_version();
        trace!(
            variables = snapshot.variables.len(),
            "pack snapshot replaced"
        );
        snapshot
    }

    /// Replace the cached role catalog.
    pub(crate) fn apply_roles(&self, roles: Vec<Role>) {
        self.roles.store(Arc::new(roles));
        self.bump_version();
    }

    /// Drop everything cached (used when the target device changes).
    pub(crate) fn clear(&self) {
        self.pack.store(None);
        self.roles.store(Arc::new(Vec::new()));
        self.variables
            .send_replace(Arc::new(VariableSet::default()));
        self.last_refresh.send_replace(None);
        self.bump_version();
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v = v.wrapping_add(1));
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn snapshot(&self) -> Option<Arc<PackSnapshot>> {
        self.pack.load_full()
    }

    pub fn current_base_station(&self) -> Option<BaseStation> {
        self.pack
            .load()
            .as_ref()
            .and_then(|s| s.base_station().cloned())
    }

    pub fn current_roles(&self) -> Arc<Vec<Role>> {
        self.roles.load_full()
    }

    pub fn variables(&self) -> Arc<VariableSet> {
        self.variables.borrow().clone()
    }

    pub fn variable_definitions(&self) -> Vec<VariableDefinition> {
        self.variables.borrow().definitions().to_vec()
    }

    // ── Single-entity lookups ────────────────────────────────────────

    pub fn find_headset_by_id(&self, id: u32) -> Option<Headset> {
        self.find_headset(&HeadsetSelector::Id(id))
    }

    pub fn find_headset_by_name(&self, name: &str) -> Option<Headset> {
        self.find_headset(&HeadsetSelector::Name(name.to_owned()))
    }

    pub fn find_headset(&self, selector: &HeadsetSelector) -> Option<Headset> {
        let guard = self.pack.load();
        let station = guard.as_ref()?.base_station()?;
        station
            .headsets
            .iter()
            .find(|h| selector.matches(h))
            .cloned()
    }

    pub fn find_role_by_name(&self, name: &str) -> Option<Role> {
        self.roles.load().iter().find(|r| r.name == name).cloned()
    }

    // ── Choices ──────────────────────────────────────────────────────

    pub fn headset_choices(&self) -> Vec<Choice> {
        let guard = self.pack.load();
        headset_choices(guard.as_ref().and_then(|s| s.base_station()))
    }

    pub fn role_choices(&self) -> Vec<Choice> {
        role_choices(&self.roles.load())
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_variables(&self) -> watch::Receiver<Arc<VariableSet>> {
        self.variables.subscribe()
    }

    /// Bumped on every cache write, pack or roles.
    pub fn subscribe_version(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    /// How long ago the pack tree was last replaced, or `None` if never.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_refresh().map(|t| Utc::now() - t)
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

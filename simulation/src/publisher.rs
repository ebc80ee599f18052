//! Snapshot publication with structural sharing.

use std::{collections::BTreeMap, fmt, sync::Arc};

use lane_defence_core::{LaneId, LaneSnapshot, WorldSnapshot};
use lane_defence_world::{
    query::{self, LaneRevision},
    World,
};

/// Handle returned by [`crate::Simulation::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

type Subscriber = Box<dyn FnMut(&Arc<WorldSnapshot>)>;

#[derive(Clone, Debug)]
struct CachedLane {
    revision: LaneRevision,
    snapshot: Arc<LaneSnapshot>,
}

/// Builds snapshots that reuse every lane and grid whose revision did not
/// change since the previous publication, and fans them out to subscribers.
pub(crate) struct Publisher {
    epoch: u64,
    lanes: BTreeMap<LaneId, CachedLane>,
    current: Arc<WorldSnapshot>,
    subscribers: BTreeMap<SubscriptionId, Subscriber>,
    next_subscription: u64,
}

impl Publisher {
    pub(crate) fn new(world: &World) -> Self {
        let mut lanes = BTreeMap::new();
        let current = build(world, &mut lanes);
        Self {
            epoch: query::epoch(world),
            lanes,
            current,
            subscribers: BTreeMap::new(),
            next_subscription: 0,
        }
    }

    pub(crate) fn current(&self) -> Arc<WorldSnapshot> {
        Arc::clone(&self.current)
    }

    pub(crate) fn subscribe(&mut self, subscriber: Subscriber) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription = self.next_subscription.wrapping_add(1);
        let _ = self.subscribers.insert(id, subscriber);
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(&id).is_some()
    }

    /// Publishes the world's current state and notifies every subscriber.
    pub(crate) fn publish(&mut self, world: &World) {
        self.current = self.rebuild(world);
        for subscriber in self.subscribers.values_mut() {
            subscriber(&self.current);
        }
    }

    fn rebuild(&mut self, world: &World) -> Arc<WorldSnapshot> {
        let epoch = query::epoch(world);
        if epoch != self.epoch {
            self.epoch = epoch;
            self.lanes.clear();
        }
        build(world, &mut self.lanes)
    }
}

/// Assembles a snapshot, taking unchanged lanes and grids from `cache` and
/// storing the lanes that had to be rebuilt.
fn build(world: &World, cache: &mut BTreeMap<LaneId, CachedLane>) -> Arc<WorldSnapshot> {
    let mut lanes = Vec::new();
    for id in query::lane_ids(world) {
        let Some(revision) = query::lane_revision(world, id) else {
            continue;
        };
        let cached = cache.get(&id);
        if let Some(cached) = cached.filter(|cached| cached.revision == revision) {
            lanes.push(Arc::clone(&cached.snapshot));
            continue;
        }

        let grid = match cached.filter(|cached| cached.revision.grid == revision.grid) {
            Some(cached) => Arc::clone(&cached.snapshot.grid),
            None => match query::grid_snapshot(world, id) {
                Some(grid) => Arc::new(grid),
                None => continue,
            },
        };
        let Some(snapshot) = query::lane_snapshot(world, id, grid) else {
            continue;
        };
        let snapshot = Arc::new(snapshot);
        let _ = cache.insert(
            id,
            CachedLane {
                revision,
                snapshot: Arc::clone(&snapshot),
            },
        );
        lanes.push(snapshot);
    }

    let selection = query::selection(world);
    Arc::new(WorldSnapshot {
        life: query::life(world),
        gold: query::gold(world),
        lanes,
        selected_lane: selection.lane,
        selected_worker: selection.worker,
        placement_mode: selection.placement_mode,
        wave: query::wave_snapshot(world),
        hero: query::hero_snapshot(world),
        skill: query::skill_snapshot(world),
        elapsed: query::clock(world),
    })
}

impl fmt::Debug for Publisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Publisher")
            .field("epoch", &self.epoch)
            .field("cached_lanes", &self.lanes.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use lane_defence_world::Tuning;

    use super::*;

    #[test]
    fn first_publication_reuses_the_initial_lanes() {
        let world = World::new(Tuning::default()).expect("default tuning is valid");
        let mut publisher = Publisher::new(&world);
        let initial = publisher.current();

        publisher.publish(&world);
        let next = publisher.current();

        assert!(!Arc::ptr_eq(&initial, &next));
        assert_eq!(next.lanes.len(), initial.lanes.len());
        for (old, new) in initial.lanes.iter().zip(&next.lanes) {
            assert!(Arc::ptr_eq(old, new));
        }
    }
}

//! Movement commits, damage resolution, leaks and the burst skill.

use std::collections::BTreeMap;

use lane_defence_core::{
    CellPoint, DefenderId, Event, HostileId, LaneId, Mover, Rejection, Strike, TowerId,
};

use crate::{lane::Lane, navigation::PathStrategy, World};

impl World {
    /// Commits the position a mover reached during the tick.
    pub(crate) fn advance_mover(
        &mut self,
        mover: Mover,
        position: CellPoint,
        next_waypoint: usize,
        out_events: &mut Vec<Event>,
    ) {
        match mover {
            Mover::Hostile(id) => {
                let Some(lane) = self
                    .lanes
                    .iter_mut()
                    .find(|lane| lane.hostiles.contains_key(&id))
                else {
                    tracing::warn!(hostile = id.get(), "advance ignored: unknown hostile");
                    return;
                };
                let Some(route_len) = lane.route.as_ref().map(|route| route.len()) else {
                    tracing::warn!(hostile = id.get(), "advance ignored: lane has no route");
                    return;
                };
                let Some(hostile) = lane.hostiles.get_mut(&id) else {
                    return;
                };
                hostile.position = position;
                hostile.next_waypoint = next_waypoint.min(route_len);
                lane.touch();
                if next_waypoint >= route_len {
                    let lane_id = lane.id;
                    let _ = lane.hostiles.remove(&id);
                    self.leak(lane_id, id, out_events);
                }
            }
            Mover::Worker(id) => {
                let Some(lane) = self.lane_of_worker(id) else {
                    tracing::warn!(worker = id.get(), "advance ignored: unknown worker");
                    return;
                };
                let Some(worker) = lane.workers.get_mut(&id) else {
                    return;
                };
                let Some(route_len) = worker.route.as_ref().map(|route| route.len()) else {
                    tracing::warn!(worker = id.get(), "advance ignored: worker has no route");
                    return;
                };
                worker.position = position;
                worker.next_waypoint = next_waypoint.min(route_len);
                lane.touch();
                if next_waypoint >= route_len {
                    self.worker_arrived(id, out_events);
                }
            }
        }
    }

    /// Charges one life for a hostile that reached the goal.
    fn leak(&mut self, lane: LaneId, hostile: HostileId, out_events: &mut Vec<Event>) {
        self.life = self.life.saturating_sub(1);
        tracing::debug!(
            lane = lane.get(),
            hostile = hostile.get(),
            life = self.life,
            "hostile leaked"
        );
        out_events.push(Event::HostileLeaked {
            lane,
            hostile,
            life: self.life,
        });

        if self.life == 0 {
            self.reset(out_events);
        } else {
            self.settle_wave(out_events);
        }
    }

    /// Applies a tick's strikes as one batch. Damage against a hostile is
    /// summed before it is applied, so each kill is rewarded exactly once.
    pub(crate) fn resolve_combat(&mut self, strikes: Vec<Strike>, out_events: &mut Vec<Event>) {
        let mut hostile_damage: BTreeMap<HostileId, f32> = BTreeMap::new();
        let mut tower_damage: BTreeMap<TowerId, f32> = BTreeMap::new();

        for strike in strikes {
            match strike {
                Strike::Defender {
                    attacker,
                    target,
                    damage,
                } => {
                    if !self.restart_cooldown(attacker) {
                        tracing::warn!(?attacker, "strike ignored: defender not ready");
                        continue;
                    }
                    *hostile_damage.entry(target).or_insert(0.0) += damage;
                }
                Strike::Siege {
                    target, damage, ..
                } => {
                    *tower_damage.entry(target).or_insert(0.0) += damage;
                }
            }
        }

        let strategy = self.tuning.path_strategy;
        for lane in &mut self.lanes {
            let killed = damage_hostiles(lane, &hostile_damage);
            for (hostile, reward) in killed {
                self.ledger.credit(reward);
                out_events.push(Event::HostileKilled {
                    lane: lane.id,
                    hostile,
                    reward,
                });
            }
            batter_towers(lane, &tower_damage, strategy, out_events);
        }
        self.settle_wave(out_events);
    }

    /// Restarts the cooldown of a ready defender. Returns `false` when the
    /// defender is unknown, unfinished or still cooling down.
    fn restart_cooldown(&mut self, defender: DefenderId) -> bool {
        for lane in &mut self.lanes {
            match defender {
                DefenderId::Tower(id) => {
                    if let Some(tower) = lane.towers.get_mut(&id) {
                        if !tower.completed || !tower.cooldown.is_zero() {
                            return false;
                        }
                        tower.cooldown = tower.attack_interval;
                        return true;
                    }
                }
                DefenderId::Unit(id) => {
                    if let Some(unit) = lane.units.get_mut(&id) {
                        if !unit.cooldown.is_zero() {
                            return false;
                        }
                        unit.cooldown = unit.attack_interval;
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Deals the burst skill's damage to every live hostile.
    pub(crate) fn trigger_skill(&mut self, out_events: &mut Vec<Event>) -> Result<(), Rejection> {
        if self.skill.is_cooling_down() {
            return Err(Rejection::SkillCoolingDown);
        }

        let damage = self.skill.damage(self.hero.level());
        let mut kills = 0_u32;
        for lane in &mut self.lanes {
            let burst: BTreeMap<HostileId, f32> =
                lane.hostiles.keys().map(|id| (*id, damage)).collect();
            for (hostile, reward) in damage_hostiles(lane, &burst) {
                kills = kills.saturating_add(1);
                self.ledger.credit(reward);
                out_events.push(Event::HostileKilled {
                    lane: lane.id,
                    hostile,
                    reward,
                });
            }
        }
        self.skill.start_cooldown();
        tracing::debug!(damage, kills, "skill activated");
        out_events.push(Event::SkillActivated { damage, kills });
        self.settle_wave(out_events);
        Ok(())
    }
}

/// Applies accumulated damage to the lane's hostiles and removes the dead.
/// Returns the killed hostiles with their rewards.
fn damage_hostiles(lane: &mut Lane, damage: &BTreeMap<HostileId, f32>) -> Vec<(HostileId, u32)> {
    let mut killed = Vec::new();
    for hostile in lane.hostiles.values_mut() {
        if let Some(amount) = damage.get(&hostile.id) {
            hostile.hp -= amount;
            if hostile.hp <= 0.0 {
                killed.push((hostile.id, hostile.reward));
            }
        }
    }

    if lane.hostiles.keys().any(|id| damage.contains_key(id)) {
        lane.touch();
    }
    for (id, _) in &killed {
        let _ = lane.hostiles.remove(id);
    }
    killed
}

/// Applies siege damage to the lane's completed towers, destroying those
/// that collapse.
fn batter_towers(
    lane: &mut Lane,
    damage: &BTreeMap<TowerId, f32>,
    strategy: PathStrategy,
    out_events: &mut Vec<Event>,
) {
    let mut collapsed = Vec::new();
    for tower in lane.towers.values_mut().filter(|tower| tower.completed) {
        if let Some(amount) = damage.get(&tower.id) {
            if tower.absorb(*amount) {
                collapsed.push(tower.id);
            }
        }
    }
    if lane.towers.keys().any(|id| damage.contains_key(id)) {
        lane.touch();
    }

    for tower in collapsed {
        destroy_tower(lane, tower, strategy, out_events);
    }
}

/// Removes a tower, frees its tile, unbinds its worker and repaths the lane.
fn destroy_tower(
    lane: &mut Lane,
    tower_id: TowerId,
    strategy: PathStrategy,
    out_events: &mut Vec<Event>,
) {
    let Some(tower) = lane.towers.remove(&tower_id) else {
        return;
    };
    lane.vacate(tower.cell);
    if let Some(owner) = lane.workers.get_mut(&tower.owner) {
        if owner.bound_tower == Some(tower_id) {
            owner.bound_tower = None;
        }
    }
    tracing::info!(lane = lane.id.get(), tower = tower_id.get(), "tower destroyed");
    out_events.push(Event::TowerDestroyed {
        lane: lane.id,
        tower: tower_id,
        cell: tower.cell,
    });
    let waypoints = lane.repath(strategy);
    out_events.push(Event::LaneRepathed {
        lane: lane.id,
        waypoints,
    });
}

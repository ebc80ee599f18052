use std::{cell::RefCell, rc::Rc, sync::Arc, time::Duration};

use lane_defence_core::{CellCoord, LaneId, UnitKind, WorkerState, WorldSnapshot};
use lane_defence_simulation::{Simulation, MAX_TICK};
use lane_defence_world::{Tuning, WaveTuning};

fn simulation() -> Simulation {
    Simulation::new(Tuning::default()).expect("default tuning is valid")
}

fn small(lanes: u32, grid_size: u32) -> Simulation {
    Simulation::new(Tuning {
        lanes,
        grid_size,
        ..Tuning::default()
    })
    .expect("valid tuning")
}

#[test]
fn worker_purchase_and_build_order_debit_gold() {
    let mut sim = simulation();
    assert_eq!(sim.snapshot().gold, 900);

    assert!(sim.buy_worker());
    assert_eq!(sim.snapshot().gold, 820);
    assert!(sim.snapshot().selected_worker.is_some());

    assert!(sim.start_build_placement_mode());
    assert!(sim.request_build_at(3, 10));
    let snapshot = sim.snapshot();
    assert_eq!(snapshot.gold, 720);
    assert!(!snapshot.placement_mode);

    let worker = &snapshot.lanes[0].workers[0];
    assert_eq!(worker.state, WorkerState::Moving);
    assert_eq!(worker.target, Some(CellCoord::new(3, 10)));
}

#[test]
fn ordered_tower_is_built_after_travel_and_build_time() {
    let mut sim = simulation();
    assert!(sim.buy_worker());
    assert!(sim.start_build_placement_mode());
    assert!(sim.request_build_at(3, 10));

    for _ in 0..200 {
        sim.tick(100);
    }

    let snapshot = sim.snapshot();
    let lane = &snapshot.lanes[0];
    assert_eq!(lane.towers.len(), 1);
    let tower = lane.towers[0];
    assert!(tower.completed);
    assert_eq!(tower.cell, CellCoord::new(3, 10));
    assert!(!lane.grid.tile(tower.cell).expect("tile exists").walkable);
    assert_eq!(lane.workers[0].bound_tower, Some(tower.id));
    assert_eq!(lane.workers[0].state, WorkerState::Idle);
}

#[test]
fn rejected_actions_report_false_and_leave_state_alone() {
    let mut sim = simulation();
    let before = sim.snapshot();

    assert!(!sim.start_build_placement_mode());
    assert!(!sim.request_build_at(3, 10));
    assert!(!sim.upgrade_worker_tower());
    assert!(!sim.stop_worker());
    assert!(!sim.select_lane(LaneId::new(40)));

    assert_eq!(*sim.snapshot(), *before);
}

#[test]
fn build_requests_need_placement_mode() {
    let mut sim = simulation();
    assert!(sim.buy_worker());

    assert!(!sim.request_build_at(3, 10));
    assert!(sim.start_build_placement_mode());
    sim.cancel_build_placement_mode();
    assert!(!sim.request_build_at(3, 10));
    assert_eq!(sim.snapshot().gold, 820);
}

#[test]
fn tick_delta_is_clamped() {
    let mut sim = simulation();
    sim.tick(5_000);
    assert_eq!(sim.snapshot().elapsed, MAX_TICK);

    sim.tick(16);
    assert_eq!(
        sim.snapshot().elapsed,
        MAX_TICK + Duration::from_millis(16)
    );
}

#[test]
fn untouched_lanes_are_shared_between_snapshots() {
    let mut sim = simulation();
    let before = sim.snapshot();

    assert!(sim.buy_worker());
    let after = sim.snapshot();

    assert!(!Arc::ptr_eq(&before.lanes[0], &after.lanes[0]));
    assert!(Arc::ptr_eq(&before.lanes[0].grid, &after.lanes[0].grid));
    for (old, new) in before.lanes.iter().zip(&after.lanes).skip(1) {
        assert!(Arc::ptr_eq(old, new));
    }

    sim.tick(50);
    let idle = sim.snapshot();
    for (old, new) in after.lanes.iter().zip(&idle.lanes) {
        assert!(Arc::ptr_eq(old, new));
    }
}

#[test]
fn subscribers_receive_every_publication_until_unsubscribed() {
    let mut sim = simulation();
    let seen: Rc<RefCell<Vec<u32>>> = Rc::default();
    let sink = Rc::clone(&seen);
    let id = sim.subscribe(move |snapshot: &Arc<WorldSnapshot>| {
        sink.borrow_mut().push(snapshot.gold);
    });

    assert!(sim.buy_worker());
    sim.tick(16);
    assert_eq!(*seen.borrow(), vec![820, 820]);

    assert!(sim.unsubscribe(id));
    assert!(!sim.unsubscribe(id));
    assert!(sim.buy_worker());
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn losing_the_last_life_resets_the_session() {
    let tuning = Tuning {
        lanes: 1,
        grid_size: 5,
        starting_life: 1,
        ..Tuning::default()
    };
    let mut sim = Simulation::new(tuning.clone()).expect("valid tuning");
    let pristine = Simulation::new(tuning).expect("valid tuning").snapshot();
    assert!(sim.buy_worker());
    assert!(sim.start_next_wave());

    let mut reset = false;
    for _ in 0..200 {
        sim.tick(100);
        if !sim.snapshot().wave.active {
            reset = true;
            break;
        }
    }

    assert!(reset, "a leaked hostile should end the session");
    assert_eq!(*sim.snapshot(), *pristine);
}

#[test]
fn wave_is_completed_by_defenders() {
    let mut sim = Simulation::new(Tuning {
        lanes: 1,
        grid_size: 9,
        wave: WaveTuning {
            base_enemies: 1,
            enemies_per_wave: 0,
            ..WaveTuning::default()
        },
        ..Tuning::default()
    })
    .expect("valid tuning");
    assert!(sim.summon_unit(UnitKind::Firebat));
    assert!(sim.summon_unit(UnitKind::Marine));
    assert!(sim.summon_hero());
    let gold = sim.snapshot().gold;
    assert!(sim.start_next_wave());

    for _ in 0..200 {
        sim.tick(100);
        if !sim.snapshot().wave.active {
            break;
        }
    }

    let snapshot = sim.snapshot();
    assert!(!snapshot.wave.active);
    assert_eq!(snapshot.wave.number, 1);
    assert_eq!(snapshot.life, 20);
    assert_eq!(snapshot.gold, gold + 5);
}

#[test]
fn hero_is_unique_and_follows_the_selected_lane() {
    let mut sim = small(2, 7);
    assert!(sim.summon_hero());
    assert!(!sim.summon_hero());
    assert_eq!(sim.snapshot().hero.deployed, Some(LaneId::new(0)));

    assert!(sim.select_lane(LaneId::new(1)));
    let snapshot = sim.snapshot();
    assert_eq!(snapshot.hero.deployed, Some(LaneId::new(1)));
    assert!(snapshot.lanes[0].units.is_empty());
    assert_eq!(snapshot.lanes[1].units.len(), 1);
}

#[test]
fn skill_respects_its_cooldown() {
    let mut sim = simulation();
    assert!(sim.trigger_skill());
    assert!(!sim.trigger_skill());
    assert!(sim.snapshot().skill.cooling_down);

    for _ in 0..70 {
        sim.tick(100);
    }
    assert!(sim.trigger_skill());
}

#[test]
fn identical_sessions_replay_identically() {
    fn session() -> Arc<WorldSnapshot> {
        let mut sim = small(2, 9);
        assert!(sim.buy_worker());
        assert!(sim.start_build_placement_mode());
        assert!(sim.request_build_at(2, 4));
        assert!(sim.summon_unit(UnitKind::Marine));
        assert!(sim.start_next_wave());
        for _ in 0..150 {
            sim.tick(100);
        }
        sim.snapshot()
    }

    assert_eq!(session(), session());
}

#[test]
fn selected_worker_can_be_moved_and_stopped() {
    let mut sim = small(1, 7);
    assert!(!sim.move_worker(0, 6), "no worker selected yet");

    assert!(sim.buy_worker());
    assert!(sim.move_worker(0, 6));
    assert_eq!(
        sim.snapshot().lanes[0].workers[0].state,
        WorkerState::Executing
    );
    assert!(!sim.move_worker(40, 40));

    assert!(sim.stop_worker());
    let snapshot = sim.snapshot();
    assert_eq!(snapshot.lanes[0].workers[0].state, WorkerState::Idle);
    assert_eq!(snapshot.gold, 820);
}

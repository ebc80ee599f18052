use std::time::Duration;

use lane_defence_core::{CellCoord, Command, Event, LaneId, WorkerState, WorldSnapshot};
use lane_defence_system_movement::Movement;
use lane_defence_world::{self as world, query, Tuning, World};

fn lane_world() -> World {
    World::new(Tuning {
        lanes: 1,
        grid_size: 5,
        ..Tuning::default()
    })
    .expect("valid tuning")
}

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

/// Ticks the world once and commits every movement command it triggers.
fn step(world: &mut World, movement: &Movement, dt: Duration) -> Vec<Event> {
    let mut log = run(world, Command::Tick { dt });
    let motion = query::motion_view(world);
    let mut commands = Vec::new();
    movement.handle(&log, &motion, &mut commands);
    for command in commands {
        log.extend(run(world, command));
    }
    log
}

fn spawn_hostile(world: &mut World) {
    let _ = run(world, Command::StartWave);
    let _ = run(
        world,
        Command::SpawnHostile {
            lane: LaneId::new(0),
        },
    );
}

#[test]
fn hostile_travels_speed_times_dt() {
    let mut world = lane_world();
    let movement = Movement::new();
    spawn_hostile(&mut world);

    let _ = step(&mut world, &movement, Duration::from_secs(1));

    let hostile = query::hostile_view(&world)
        .iter()
        .next()
        .copied()
        .expect("hostile alive");
    assert!((hostile.position.column() - 2.0).abs() < 1e-5);
    assert!((hostile.position.row() - hostile.speed).abs() < 1e-4);
    assert_eq!(hostile.next_waypoint, 2);
}

#[test]
fn hostile_reaching_goal_costs_a_life() {
    let mut world = lane_world();
    let movement = Movement::new();
    let life = query::life(&world);
    spawn_hostile(&mut world);

    let events = step(&mut world, &movement, Duration::from_secs(10));

    assert!(events
        .iter()
        .any(|event| matches!(event, Event::HostileLeaked { .. })));
    assert_eq!(query::life(&world), life - 1);
    assert_eq!(query::hostile_view(&world).iter().count(), 0);
}

#[test]
fn worker_move_order_ends_idle_at_destination() {
    let mut world = lane_world();
    let movement = Movement::new();
    let _ = run(&mut world, Command::HireWorker);
    let worker = query::selection(&world).worker.expect("hired worker selected");
    let cell = CellCoord::new(0, 4);
    let _ = run(&mut world, Command::OrderMove { worker, cell });

    let events = step(&mut world, &movement, Duration::from_secs(1));

    assert!(events.contains(&Event::WorkerArrived {
        lane: LaneId::new(0),
        worker,
        cell,
    }));
    let snapshot = query::snapshot(&world);
    let lane = snapshot.lane(LaneId::new(0)).expect("lane exists");
    let state = lane
        .workers
        .iter()
        .find(|snapshot| snapshot.id == worker)
        .expect("worker exists");
    assert_eq!(state.state, WorkerState::Idle);
    assert_eq!(state.position, cell.to_point());
}

#[test]
fn idle_world_emits_no_movement() {
    let world = lane_world();
    let movement = Movement::new();
    let mut commands = Vec::new();

    movement.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_millis(16),
        }],
        &query::motion_view(&world),
        &mut commands,
    );

    assert!(commands.is_empty());
}

#[test]
fn replaying_the_same_script_is_deterministic() {
    fn replay() -> (Vec<Event>, WorldSnapshot) {
        let mut world = lane_world();
        let movement = Movement::new();
        spawn_hostile(&mut world);
        let mut log = Vec::new();
        for _ in 0..40 {
            log.extend(step(&mut world, &movement, Duration::from_millis(50)));
        }
        (log, query::snapshot(&world))
    }

    let first = replay();
    let second = replay();
    assert_eq!(first, second);
    assert_eq!(first.1.hostile_count(), 1, "hostile is still en route");
}

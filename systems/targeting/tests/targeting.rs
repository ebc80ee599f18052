use lane_defence_core::{Command, DefenderId, Engagement, Event, LaneId, UnitKind};
use lane_defence_system_targeting::Targeting;
use lane_defence_world::{self as world, query, Tuning, World};

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn two_lanes() -> World {
    World::new(Tuning {
        lanes: 2,
        grid_size: 5,
        ..Tuning::default()
    })
    .expect("valid tuning")
}

fn engagements(world: &World) -> Vec<Engagement> {
    let mut targeting = Targeting::new();
    let mut out = vec![];
    targeting.handle(
        &query::defender_view(world),
        &query::hostile_view(world),
        &mut out,
    );
    out
}

fn spawn(world: &mut World, lane: u32) {
    let _ = run(
        world,
        Command::SpawnHostile {
            lane: LaneId::new(lane),
        },
    );
}

#[test]
fn marine_engages_hostile_in_range() {
    let mut world = two_lanes();
    let _ = run(&mut world, Command::StartWave);
    let _ = run(
        &mut world,
        Command::SummonUnit {
            kind: UnitKind::Marine,
        },
    );
    spawn(&mut world, 0);

    let found = engagements(&world);
    assert_eq!(found.len(), 1);
    let engagement = found[0];
    assert!(matches!(engagement.defender, DefenderId::Unit(_)));
    assert!((engagement.distance - 2.0).abs() < 1e-5);
}

#[test]
fn defenders_ignore_hostiles_of_other_lanes() {
    let mut world = two_lanes();
    let _ = run(&mut world, Command::StartWave);
    let _ = run(
        &mut world,
        Command::SelectLane {
            lane: LaneId::new(1),
        },
    );
    let _ = run(
        &mut world,
        Command::SummonUnit {
            kind: UnitKind::Marine,
        },
    );
    spawn(&mut world, 0);

    assert!(engagements(&world).is_empty());
}

#[test]
fn output_is_cleared_between_calls() {
    let world = two_lanes();
    let mut targeting = Targeting::new();
    let mut out = vec![Engagement {
        defender: DefenderId::Unit(lane_defence_core::UnitId::new(9)),
        hostile: lane_defence_core::HostileId::new(9),
        distance: 1.0,
    }];

    targeting.handle(
        &query::defender_view(&world),
        &query::hostile_view(&world),
        &mut out,
    );

    assert!(out.is_empty());
}

use std::time::Duration;

use lane_defence_core::{Command, Event, LaneId, UnitKind};
use lane_defence_system_combat::Combat;
use lane_defence_system_targeting::Targeting;
use lane_defence_world::{self as world, query, Tuning, World};

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

/// Ticks the world and resolves whatever combat the tick produced.
fn fight(world: &mut World, targeting: &mut Targeting, combat: &mut Combat) -> Vec<Event> {
    let mut log = run(
        world,
        Command::Tick {
            dt: Duration::from_millis(100),
        },
    );
    let defenders = query::defender_view(world);
    let mut engagements = Vec::new();
    targeting.handle(&defenders, &query::hostile_view(world), &mut engagements);
    let mut commands = Vec::new();
    combat.handle(
        &log,
        &defenders,
        &engagements,
        &query::siege_view(world),
        &mut commands,
    );
    for command in commands {
        log.extend(run(world, command));
    }
    log
}

fn guarded_lane() -> World {
    let mut world = World::new(Tuning {
        lanes: 1,
        grid_size: 5,
        ..Tuning::default()
    })
    .expect("valid tuning");
    let _ = run(&mut world, Command::StartWave);
    let _ = run(
        &mut world,
        Command::SummonUnit {
            kind: UnitKind::Marine,
        },
    );
    let _ = run(
        &mut world,
        Command::SpawnHostile {
            lane: LaneId::new(0),
        },
    );
    world
}

#[test]
fn marine_wears_down_a_hostile_and_collects_the_bounty() {
    let mut world = guarded_lane();
    let mut targeting = Targeting::new();
    let mut combat = Combat::new();
    let gold = query::gold(&world);

    let mut kills = Vec::new();
    let mut ticks = 0;
    while kills.is_empty() && ticks < 40 {
        kills = fight(&mut world, &mut targeting, &mut combat)
            .into_iter()
            .filter(|event| matches!(event, Event::HostileKilled { .. }))
            .collect();
        ticks += 1;
    }

    // 40 hp against 8 damage every 500 ms: strikes land on ticks 1, 6, 11, 16, 21.
    assert_eq!(ticks, 21);
    assert_eq!(kills.len(), 1);
    let Event::HostileKilled { reward, .. } = kills[0] else {
        unreachable!("filtered to kills");
    };
    assert_eq!(query::gold(&world), gold + reward);
    assert_eq!(query::hostile_view(&world).iter().count(), 0);
}

#[test]
fn strikes_restart_the_defender_cooldown() {
    let mut world = guarded_lane();
    let mut targeting = Targeting::new();
    let mut combat = Combat::new();

    let _ = fight(&mut world, &mut targeting, &mut combat);

    let defender = query::defender_view(&world)
        .iter()
        .next()
        .copied()
        .expect("marine deployed");
    assert_eq!(defender.ready_in, Duration::from_millis(500));
    let hostile = query::hostile_view(&world)
        .iter()
        .next()
        .copied()
        .expect("hostile alive");
    assert!((hostile.hp - 32.0).abs() < 1e-4);
}

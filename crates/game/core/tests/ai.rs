mod common;

use common::{Harness, caster, dummy, hero, monster};
use crawl_core::ai::{nearest_hostile, tactics};
use crawl_core::{
    AbilityKind, AiController, AiParameters, Behavior, BehaviorSelector, Controller, Order,
    Position, ResourceMeter,
};

const ROOM: &str = "\
#########
#.......#
#.......#
#.......#
#.......#
#########";

fn at(x: i32, y: i32) -> Position {
    Position::new(x, y)
}

fn params(aggressiveness: f32, flee_threshold: f32) -> AiParameters {
    AiParameters {
        aggressiveness,
        flee_threshold,
        ..AiParameters::default()
    }
}

#[test]
fn wounded_units_flee_regardless_of_aggressiveness() {
    let mut h = Harness::new(ROOM);
    let hero = h.add_player(hero(3, 2));
    let mut goblin = monster("goblin", 4, 2, 10, params(1.0, 0.5));
    goblin.life = ResourceMeter::new(2, 10);
    let goblin = h.add(goblin);

    let behavior = AiController::new().decide(&mut h.ctx(), goblin);
    assert_eq!(behavior, Behavior::Avoid { threat: hero });

    let order = tactics::order_for(&mut h.ctx(), goblin, behavior);
    let Order::AttackMove { to, .. } = order else {
        panic!("expected a step away, got {order:?}");
    };
    // The two diagonal retreats are the farthest from the hero.
    assert_eq!(to.x, 5);
    assert!(to.manhattan(at(3, 2)) > at(4, 2).manhattan(at(3, 2)));
}

#[test]
fn healthy_units_do_not_flee() {
    let mut h = Harness::new(ROOM);
    let hero = h.add_player(hero(3, 2));
    let goblin = h.add(monster("goblin", 4, 2, 10, params(1.0, 0.5)));

    let behavior = AiController::new().decide(&mut h.ctx(), goblin);

    assert_eq!(behavior, Behavior::Attack { target: hero });
}

#[test]
fn fleeing_casters_teleport_away() {
    let mut h = Harness::new(ROOM);
    h.add_player(hero(3, 2));
    let mut shaman = caster(
        monster("shaman", 4, 2, 10, params(1.0, 0.5)),
        10,
        &[AbilityKind::Teleport],
    );
    shaman.life = ResourceMeter::new(1, 10);
    let shaman = h.add(shaman);

    let order = AiController::new().next_order(&mut h.ctx(), shaman);

    let Order::Ability {
        kind: AbilityKind::Teleport,
        target: Some(target),
    } = order
    else {
        panic!("expected a teleport, got {order:?}");
    };
    assert!(target.manhattan(at(3, 2)) >= 3);
    assert!(target.manhattan(at(4, 2)) <= 5);
    assert!(h.world.map.is_open(target));
}

#[test]
fn speed_gate_keeps_slow_units_in_place() {
    let mut h = Harness::new(ROOM);
    h.add_player(hero(3, 2));
    let slug = h.add(monster(
        "slug",
        4,
        2,
        10,
        AiParameters {
            speed: 0.5,
            ..params(1.0, 0.0)
        },
    ));

    // speed 0.5 acts on even turns only
    h.world.turn = 1;
    assert_eq!(AiController::new().decide(&mut h.ctx(), slug), Behavior::Stay);
    h.world.turn = 2;
    assert_ne!(AiController::new().decide(&mut h.ctx(), slug), Behavior::Stay);
}

#[test]
fn units_in_combat_always_engage() {
    let mut h = Harness::new(ROOM);
    let hero = h.add_player(hero(1, 1));
    let mut coward = monster("kobold", 5, 3, 10, params(0.0, 0.0));
    coward.turns_since_combat = 0;
    let coward = h.add(coward);

    for _ in 0..10 {
        let behavior = AiController::new().decide(&mut h.ctx(), coward);
        assert_eq!(behavior, Behavior::Attack { target: hero });
    }
}

#[test]
fn passive_units_wander_when_not_engaging() {
    let mut h = Harness::new(ROOM);
    h.add_player(hero(1, 1));
    let sheep = h.add(monster("sheep", 5, 3, 10, params(0.0, 0.0)));

    let behavior = AiController::new().decide(&mut h.ctx(), sheep);

    assert_eq!(behavior, Behavior::Wander);
}

#[test]
fn out_of_sight_units_idle() {
    let mut h = Harness::new(ROOM);
    h.add_player(hero(1, 1));
    let bat = h.add(monster(
        "bat",
        7,
        4,
        10,
        AiParameters {
            vision_range: 2.0,
            ..params(1.0, 0.0)
        },
    ));

    for _ in 0..20 {
        let behavior = AiController::new().decide(&mut h.ctx(), bat);
        assert!(matches!(behavior, Behavior::Stay | Behavior::Wander));
    }
}

#[test]
fn ranged_units_prefer_shooting() {
    let mut h = Harness::new(ROOM);
    let hero = h.add_player(hero(1, 2));
    let archmage = h.add(caster(
        monster(
            "archmage",
            6,
            2,
            10,
            AiParameters {
                ranged: true,
                ..params(1.0, 0.0)
            },
        ),
        5,
        &[AbilityKind::Bolt, AbilityKind::Fireball],
    ));

    // Not enough mana for the fireball; the bolt is next best.
    let behavior = AiController::new().decide(&mut h.ctx(), archmage);
    assert_eq!(
        behavior,
        Behavior::Shoot {
            target: hero,
            ability: AbilityKind::Bolt,
        }
    );

    let order = tactics::order_for(&mut h.ctx(), archmage, behavior);
    assert_eq!(
        order,
        Order::Ability {
            kind: AbilityKind::Bolt,
            target: Some(at(1, 2)),
        }
    );
}

#[test]
fn ranged_units_close_in_without_a_clear_shot() {
    let mut h = Harness::new(ROOM);
    let hero = h.add_player(hero(1, 2));
    h.add(dummy("wall of meat", 3, 2, 50));
    let archmage = h.add(caster(
        monster(
            "archmage",
            6,
            2,
            10,
            AiParameters {
                ranged: true,
                ..params(1.0, 0.0)
            },
        ),
        10,
        &[AbilityKind::Bolt],
    ));

    let behavior = AiController::new().decide(&mut h.ctx(), archmage);

    assert_eq!(behavior, Behavior::Attack { target: hero });
}

#[test]
fn attackers_next_to_their_target_strike() {
    let mut h = Harness::new(ROOM);
    let hero = h.add_player(hero(3, 2));
    let brute = h.add(monster("brute", 4, 3, 10, params(1.0, 0.0)));

    let order = tactics::order_for(&mut h.ctx(), brute, Behavior::Attack { target: hero });

    assert_eq!(
        order,
        Order::Ability {
            kind: AbilityKind::Attack,
            target: Some(at(3, 2)),
        }
    );
}

#[test]
fn attackers_only_pick_affordable_specials() {
    let mut h = Harness::new(ROOM);
    let hero = h.add_player(hero(3, 2));
    let brute = h.add(caster(
        monster("brute", 4, 2, 10, params(1.0, 0.0)),
        4,
        &[AbilityKind::HeavyAttack, AbilityKind::Cleave],
    ));

    for _ in 0..10 {
        let order = tactics::order_for(&mut h.ctx(), brute, Behavior::Attack { target: hero });
        let Order::Ability { kind, .. } = order else {
            panic!("expected a melee ability, got {order:?}");
        };
        assert_eq!(kind, AbilityKind::HeavyAttack);
    }
}

#[test]
fn nearest_hostile_prefers_lower_ids_on_ties() {
    let mut h = Harness::new(ROOM);
    let first = h.add(dummy("orc", 1, 2, 10));
    h.add(dummy("orc", 5, 2, 10));
    let hero = h.add_player(hero(3, 2));

    let me = h.unit(hero);
    let nearest = nearest_hostile(&h.world, me).map(|unit| unit.id);

    assert_eq!(nearest, Some(first));
}

#[test]
fn units_without_parameters_stay() {
    let mut h = Harness::new(ROOM);
    h.add_player(hero(3, 2));
    let statue = h.add(dummy("statue", 5, 2, 10));

    let behavior = BehaviorSelector::select(&mut h.ctx(), statue, &AiParameters::default());
    assert_ne!(behavior, Behavior::Stay, "explicit parameters still apply");
    assert_eq!(AiController::new().next_order(&mut h.ctx(), statue), Order::Stay);
}

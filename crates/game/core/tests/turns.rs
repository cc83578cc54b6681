mod common;

use common::{Harness, caster, dummy, hero, monster};
use crawl_core::{
    AbilityKind, AiParameters, BurnTiming, Direction, Faction, MapObject, PlayerCommand,
    PlayerInput, Position, SoundCue, Spawner, StatusEffectKind, TurnScheduler, UnitCatalog,
    UnitModel,
};

const CORRIDOR: &str = "\
#########
#.......#
#########";

const ROOM: &str = "\
#######
#.....#
#.....#
#.....#
#######";

fn at(x: i32, y: i32) -> Position {
    Position::new(x, y)
}

fn aggressive() -> AiParameters {
    AiParameters {
        aggressiveness: 1.0,
        ..AiParameters::default()
    }
}

#[test]
fn player_acts_first_and_turn_advances() {
    let mut h = Harness::new(CORRIDOR);
    let rat = h.add(dummy("rat", 6, 1, 5));
    let hero = h.add_player(hero(1, 1));
    let mut scheduler = TurnScheduler::new();
    let mut input = PlayerInput::new();

    let report = scheduler.play_turn(&mut h.ctx(), &mut input);

    assert_eq!(report.turn, 1);
    assert_eq!(report.acted, vec![hero, rat]);
    assert!(report.deaths.is_empty());
    assert!(!report.game_over);
    assert_eq!(h.world.turn, 2);
    assert!(!h.world.in_progress);
}

#[test]
fn burning_ticks_after_the_units_turn() {
    let mut h = Harness::new(CORRIDOR);
    h.add_player(hero(1, 1));
    let rat = h.add(dummy("rat", 6, 1, 10));
    h.unit_mut(rat).apply_effect(StatusEffectKind::Burning, 3);

    TurnScheduler::new().play_turn(&mut h.ctx(), &mut PlayerInput::new());

    assert_eq!(h.unit(rat).life.current, 9);
    assert_eq!(h.unit(rat).effects.remaining(StatusEffectKind::Burning), Some(2));
    assert!(h.sink.logged("rat takes 1 damage"));
}

#[test]
fn end_of_turn_burn_lets_the_unit_act_first() {
    let mut h = Harness::new(CORRIDOR);
    h.add_player(hero(1, 1));
    let rat = h.add(dummy("rat", 6, 1, 1));
    h.unit_mut(rat).apply_effect(StatusEffectKind::Burning, 3);

    let report = TurnScheduler::new().play_turn(&mut h.ctx(), &mut PlayerInput::new());

    assert!(report.acted.contains(&rat));
    assert_eq!(report.deaths, vec![rat]);
}

#[test]
fn upkeep_burn_kills_before_acting() {
    let mut h = Harness::new(CORRIDOR);
    h.config.burn_timing = BurnTiming::Upkeep;
    h.add_player(hero(1, 1));
    let rat = h.add(dummy("rat", 6, 1, 1));
    h.unit_mut(rat).apply_effect(StatusEffectKind::Burning, 3);

    let report = TurnScheduler::new().play_turn(&mut h.ctx(), &mut PlayerInput::new());

    assert!(!report.acted.contains(&rat));
    assert_eq!(report.deaths, vec![rat]);
}

#[test]
fn stunned_player_loses_the_queued_command() {
    let mut h = Harness::new(CORRIDOR);
    let hero = h.add_player(hero(1, 1));
    h.unit_mut(hero).apply_effect(StatusEffectKind::Stunned, 1);
    let mut input: PlayerInput = [
        PlayerCommand::Step(Direction::East),
        PlayerCommand::Step(Direction::East),
    ]
    .into_iter()
    .collect();
    let mut scheduler = TurnScheduler::new();

    let report = scheduler.play_turn(&mut h.ctx(), &mut input);
    assert!(!report.acted.contains(&hero));
    assert_eq!(h.unit(hero).position, at(1, 1));
    assert_eq!(input.pending(), 1);

    // The stun has worn off.
    scheduler.play_turn(&mut h.ctx(), &mut input);
    assert_eq!(h.unit(hero).position, at(2, 1));
}

#[test]
fn free_moves_are_bounded_per_turn() {
    let mut h = Harness::new(CORRIDOR);
    let hero = h.add_player(caster(hero(1, 1), 10, &[]));
    let mut input: PlayerInput = (2..=6)
        .map(|x| PlayerCommand::UseAbility {
            ability: AbilityKind::FreeMove,
            target: Some(at(x, 1)),
        })
        .collect();
    let mut scheduler = TurnScheduler::new();

    scheduler.play_turn(&mut h.ctx(), &mut input);
    assert_eq!(h.unit(hero).position, at(4, 1));
    assert_eq!(h.unit(hero).mana.current, 4);
    assert_eq!(input.pending(), 2);

    scheduler.play_turn(&mut h.ctx(), &mut input);
    assert_eq!(h.unit(hero).position, at(6, 1));
    assert_eq!(h.unit(hero).mana.current, 0);
    assert_eq!(input.pending(), 0);
}

#[test]
fn illegal_input_does_not_consume_the_turn() {
    let mut h = Harness::new(CORRIDOR);
    let hero = h.add_player(caster(hero(1, 1), 4, &[AbilityKind::Fireball]));
    let orc = h.add(dummy("orc", 5, 1, 10));
    let mut input: PlayerInput = [
        PlayerCommand::UseAbility {
            ability: AbilityKind::Fireball,
            target: Some(at(5, 1)),
        },
        PlayerCommand::Step(Direction::East),
    ]
    .into_iter()
    .collect();

    TurnScheduler::new().play_turn(&mut h.ctx(), &mut input);

    assert_eq!(h.sink.count_sound(SoundCue::Blocked), 1);
    assert_eq!(input.rejected(), 1);
    assert_eq!(h.unit(hero).mana.current, 4);
    assert_eq!(h.unit(orc).life.current, 10);
    assert_eq!(h.unit(hero).position, at(2, 1));
}

#[test]
fn rejected_input_alone_leaves_the_turn_unresolved() {
    let mut h = Harness::new(CORRIDOR);
    let hero = h.add_player(caster(hero(1, 1), 4, &[AbilityKind::Fireball]));
    let orc = h.add(monster("orc", 2, 1, 10, aggressive()));
    let mut input: PlayerInput = [PlayerCommand::UseAbility {
        ability: AbilityKind::Fireball,
        target: Some(at(2, 1)),
    }]
    .into_iter()
    .collect();
    let mut scheduler = TurnScheduler::new();

    let report = scheduler.play_turn(&mut h.ctx(), &mut input);

    assert!(report.awaiting_input);
    assert!(report.acted.is_empty());
    assert_eq!(report.turn, 1);
    assert_eq!(h.world.turn, 1);
    assert!(!h.world.in_progress);
    assert_eq!(h.unit(hero).life.current, 20);
    assert_eq!(h.unit(hero).mana.current, 4);
    assert_eq!(h.unit(orc).life.current, 10);
    assert_eq!(h.sink.count_sound(SoundCue::Blocked), 1);
    assert_eq!(input.rejected(), 1);
    assert_eq!(input.pending(), 0);

    // A legal command lets the turn go ahead.
    input.push(PlayerCommand::Stay);
    let report = scheduler.play_turn(&mut h.ctx(), &mut input);

    assert!(!report.awaiting_input);
    assert_eq!(report.acted, vec![hero, orc]);
    assert_eq!(h.world.turn, 2);
    assert_eq!(h.unit(hero).life.current, 19);
}

#[test]
fn monsters_close_in_and_attack() {
    let mut h = Harness::new(CORRIDOR);
    let hero = h.add_player(hero(1, 1));
    let orc = h.add(monster("orc", 4, 1, 10, aggressive()));
    let mut scheduler = TurnScheduler::new();
    let mut input = PlayerInput::new();

    scheduler.play_turn(&mut h.ctx(), &mut input);
    assert_eq!(h.unit(orc).position, at(3, 1));
    scheduler.play_turn(&mut h.ctx(), &mut input);
    assert_eq!(h.unit(orc).position, at(2, 1));
    assert_eq!(h.unit(hero).life.current, 20);

    scheduler.play_turn(&mut h.ctx(), &mut input);
    assert_eq!(h.unit(hero).life.current, 19);
    assert!(h.sink.logged("orc hits hero for 1"));
}

#[test]
fn player_death_stops_the_game() {
    let mut h = Harness::new(CORRIDOR);
    let hero = h.add_player(hero(1, 1));
    h.unit_mut(hero).life.current = 1;
    h.unit_mut(hero).apply_effect(StatusEffectKind::Burning, 2);
    h.add(dummy("rat", 6, 1, 5));
    let mut scheduler = TurnScheduler::new();
    let mut input = PlayerInput::new();

    let report = scheduler.play_turn(&mut h.ctx(), &mut input);
    assert!(report.game_over);
    assert_eq!(report.deaths, vec![hero]);
    assert_eq!(report.acted, vec![hero]);
    let turn = h.world.turn;

    let report = scheduler.play_turn(&mut h.ctx(), &mut input);
    assert!(report.game_over);
    assert!(report.acted.is_empty());
    assert_eq!(h.world.turn, turn);
}

#[test]
fn spawners_respect_their_cap() {
    let catalog: UnitCatalog = [UnitModel::new("rat", Faction::Enemy, 2)].into_iter().collect();
    let mut h = Harness::with_catalog(ROOM, catalog);
    h.add_player(hero(1, 1));
    h.world
        .map
        .add_object(at(4, 2), MapObject::Spawner(Spawner::new("rat", 5, 2, 1)));
    let mut scheduler = TurnScheduler::new();
    let mut input = PlayerInput::new();

    scheduler.play_turn(&mut h.ctx(), &mut input);
    assert_eq!(h.world.map.units().count(), 1);

    scheduler.play_turn(&mut h.ctx(), &mut input);
    assert_eq!(h.world.map.units().count(), 2);
    let rat = h
        .world
        .map
        .units()
        .find(|unit| unit.name == "rat")
        .map(|unit| unit.id)
        .expect("a rat was spawned");
    assert!(h.unit(rat).position.is_adjacent(at(4, 2)));

    for _ in 0..4 {
        scheduler.play_turn(&mut h.ctx(), &mut input);
    }
    assert_eq!(h.world.map.units().count(), 2);

    // Once the rat is gone the spawner refills on its next cycle.
    h.world.map.remove_unit(rat);
    for _ in 0..2 {
        scheduler.play_turn(&mut h.ctx(), &mut input);
    }
    assert_eq!(h.world.map.units().count(), 2);
}

#[test]
fn vision_stops_at_walls() {
    let layout = "\
#######
#..#..#
#..#..#
#######";
    let mut h = Harness::new(layout);
    h.add_player(hero(1, 1));

    TurnScheduler::new().play_turn(&mut h.ctx(), &mut PlayerInput::new());

    let map = &h.world.map;
    assert!(map.is_revealed(at(1, 1)));
    assert!(map.is_revealed(at(2, 2)));
    assert!(map.is_revealed(at(3, 1)));
    assert!(!map.is_revealed(at(4, 1)));
    assert!(!map.is_revealed(at(5, 2)));
}

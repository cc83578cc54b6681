//! Ability catalog: every combat and movement capability a unit can use.
//!
//! Abilities are a closed enum. Each ability has a fixed mana cost and a
//! legality rule; [`use_ability`] runs the rule, spends mana only once the
//! action is certain to happen, and then applies the effect. Damage always
//! goes through the combat resolver.
mod error;
mod melee;
mod movement;
mod radial;
mod ranged;
mod summon;

pub use error::AbilityError;
pub use ranged::trace;

use strum::{EnumIter, IntoStaticStr};

use crate::config::GameConfig;
use crate::context::WorldContext;
use crate::geometry::Position;
use crate::state::{Unit, UnitId, World};

/// All abilities known to the game.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, IntoStaticStr, strum::Display,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AbilityKind {
    // ========================================================================
    // Melee
    // ========================================================================
    /// Plain melee attack; refunds one mana on hit.
    Attack,
    HeavyAttack,
    /// Hits the target and both tiles flanking it.
    Cleave,
    BurningAttack,
    StunAttack,
    /// Pushes the defender away, then stuns it.
    KnockbackAttack,

    // ========================================================================
    // Movement
    // ========================================================================
    Dash,
    /// One step that does not end the turn.
    FreeMove,
    /// One step without turning.
    Strafe,
    Blink,
    Teleport,

    // ========================================================================
    // Ranged
    // ========================================================================
    /// Needs an equipped ranged weapon.
    ShootArrow,
    Bolt,
    Firebolt,
    Frostbolt,
    Fireball,

    // ========================================================================
    // Radial
    // ========================================================================
    FloorFire,
    ChainLightning,

    // ========================================================================
    // Conjuration
    // ========================================================================
    Summon,
}

/// Broad grouping used for dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbilityCategory {
    Melee,
    Movement,
    Ranged,
    Radial,
    Summon,
}

impl AbilityKind {
    pub const fn mana_cost(self) -> u32 {
        use AbilityKind::*;
        match self {
            Attack | ShootArrow => 0,
            Strafe => 1,
            FreeMove => 2,
            Dash | Bolt => 3,
            HeavyAttack | Blink => 4,
            Cleave | BurningAttack | StunAttack | Teleport | Firebolt | Frostbolt => 5,
            KnockbackAttack | FloorFire | Summon => 6,
            ChainLightning => 7,
            Fireball => 8,
        }
    }

    pub const fn category(self) -> AbilityCategory {
        use AbilityKind::*;
        match self {
            Attack | HeavyAttack | Cleave | BurningAttack | StunAttack | KnockbackAttack => {
                AbilityCategory::Melee
            }
            Dash | FreeMove | Strafe | Blink | Teleport => AbilityCategory::Movement,
            ShootArrow | Bolt | Firebolt | Frostbolt | Fireball => AbilityCategory::Ranged,
            FloorFire | ChainLightning => AbilityCategory::Radial,
            Summon => AbilityCategory::Summon,
        }
    }

    /// Innate abilities are known by every unit and hidden from action bars.
    pub const fn is_innate(self) -> bool {
        matches!(self, AbilityKind::Attack | AbilityKind::FreeMove)
    }

    /// Using a turn-exempt ability leaves the unit's turn slot open.
    pub const fn is_turn_exempt(self) -> bool {
        matches!(self, AbilityKind::FreeMove)
    }

    /// Melee abilities other than the plain attack.
    pub const fn is_special_attack(self) -> bool {
        matches!(self.category(), AbilityCategory::Melee) && !matches!(self, AbilityKind::Attack)
    }

    pub const fn is_spell(self) -> bool {
        matches!(
            self.category(),
            AbilityCategory::Ranged | AbilityCategory::Radial | AbilityCategory::Summon
        ) && !matches!(self, AbilityKind::ShootArrow)
    }

    /// Self-centred abilities ignore the target argument.
    pub const fn requires_target(self) -> bool {
        !matches!(
            self,
            AbilityKind::FloorFire | AbilityKind::ChainLightning | AbilityKind::Summon
        )
    }

    /// Melee damage multiplier.
    pub const fn multiplier(self) -> f32 {
        match self {
            AbilityKind::HeavyAttack => 2.0,
            AbilityKind::Cleave => 1.5,
            _ => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// What a legal ability will do once mana is spent.
enum Plan {
    Melee(melee::Strike),
    Move(Position),
    Ranged(ranged::Shot),
    Radial(Vec<UnitId>),
    Summon(String),
}

/// Legality check: whether `actor` may use `kind` toward `target` right now.
///
/// Pure; nothing is mutated and no events are emitted.
pub fn check(
    world: &World,
    config: &GameConfig,
    actor: UnitId,
    kind: AbilityKind,
    target: Option<Position>,
) -> Result<(), AbilityError> {
    prepare(world, config, actor, kind, target).map(|_| ())
}

/// Validates, spends mana and applies `kind`.
///
/// Fails without touching the world when the ability is not legal.
pub fn use_ability(
    ctx: &mut WorldContext<'_>,
    actor: UnitId,
    kind: AbilityKind,
    target: Option<Position>,
) -> Result<(), AbilityError> {
    let plan = prepare(ctx.world, ctx.config, actor, kind, target)?;

    let unit = ctx
        .world
        .unit_mut(actor)
        .ok_or(AbilityError::ActorNotFound(actor))?;
    if kind != AbilityKind::Strafe {
        if let Some(facing) = target.and_then(|t| unit.position.direction_to(t)) {
            unit.facing = facing;
        }
    }
    unit.spend_mana(kind.mana_cost())?;
    tracing::debug!(actor = %actor, ability = kind.as_str(), ?target, "ability used");

    match plan {
        Plan::Melee(strike) => melee::resolve(ctx, actor, kind, strike),
        Plan::Move(destination) => movement::resolve(ctx, actor, kind, destination),
        Plan::Ranged(shot) => ranged::resolve(ctx, actor, kind, shot),
        Plan::Radial(victims) => radial::resolve(ctx, actor, kind, &victims),
        Plan::Summon(model) => summon::resolve(ctx, actor, &model)?,
    }
    Ok(())
}

fn prepare(
    world: &World,
    config: &GameConfig,
    actor_id: UnitId,
    kind: AbilityKind,
    target: Option<Position>,
) -> Result<Plan, AbilityError> {
    let actor = world
        .unit(actor_id)
        .ok_or(AbilityError::ActorNotFound(actor_id))?;
    let target = match (kind.requires_target(), target) {
        (true, None) => return Err(AbilityError::missing_target(kind, actor_id, world.turn)),
        (_, target) => target.unwrap_or(actor.position),
    };

    ensure_usable(actor, kind)?;

    match kind.category() {
        AbilityCategory::Melee => melee::plan(world, actor, kind, target).map(Plan::Melee),
        AbilityCategory::Movement => {
            movement::plan(world, config, actor, kind, target).map(Plan::Move)
        }
        AbilityCategory::Ranged => ranged::plan(world, actor, kind, target).map(Plan::Ranged),
        AbilityCategory::Radial => radial::plan(world, actor, kind).map(Plan::Radial),
        AbilityCategory::Summon => summon::plan(world, config, actor).map(Plan::Summon),
    }
}

fn ensure_usable(actor: &Unit, kind: AbilityKind) -> Result<(), AbilityError> {
    if !actor.knows(kind) {
        return Err(AbilityError::NotKnown(kind));
    }
    if !actor.can_act() {
        return Err(AbilityError::CannotAct);
    }
    if !actor.can_afford(kind.mana_cost()) {
        return Err(AbilityError::InsufficientMana {
            ability: kind,
            cost: kind.mana_cost(),
            available: actor.mana.current,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn innate_abilities_are_free_or_cheap() {
        let innate: Vec<_> = AbilityKind::iter().filter(|k| k.is_innate()).collect();
        assert_eq!(innate, vec![AbilityKind::Attack, AbilityKind::FreeMove]);
        assert!(AbilityKind::FreeMove.is_turn_exempt());
        assert!(!AbilityKind::Dash.is_turn_exempt());
    }

    #[test]
    fn special_attacks_exclude_plain_attack() {
        let specials: Vec<_> = AbilityKind::iter()
            .filter(|k| k.is_special_attack())
            .collect();
        assert_eq!(specials.len(), 5);
        assert!(!specials.contains(&AbilityKind::Attack));
    }

    #[test]
    fn names_are_snake_case() {
        assert_eq!(AbilityKind::ChainLightning.as_str(), "chain_lightning");
        assert_eq!(AbilityKind::HeavyAttack.to_string(), "heavy_attack");
    }

    #[test]
    fn self_centred_abilities_need_no_target() {
        assert!(!AbilityKind::FloorFire.requires_target());
        assert!(AbilityKind::Teleport.requires_target());
        assert!(AbilityKind::Fireball.is_spell());
        assert!(!AbilityKind::ShootArrow.is_spell());
    }
}

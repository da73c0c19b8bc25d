//! Damage routing and directional hit reactions.
//!
//! `Damage` is the damage-application dispatch: the only place `Health` is
//! mutated. `Hit` is the hit-reaction entry point: victims that can react
//! get a direction-classified reaction component for the presentation layer.

use bevy::prelude::*;

use super::direction::{hit_direction, HitDirection};
use crate::gameplay::{Facing, Health};

// === Constants ===

/// How long a directional hit reaction plays (seconds).
const HIT_REACT_SECS: f32 = 0.4;

// === Messages ===

/// Apply `amount` of damage to `target`. `instigator` is the attacking pawn,
/// used for the enemy damage interrupt.
#[derive(Message, Debug, Clone, Copy)]
pub struct Damage {
    pub target: Entity,
    pub amount: f32,
    pub instigator: Entity,
}

/// A weapon connected with `target` at `impact_point`.
#[derive(Message, Debug, Clone, Copy)]
pub struct Hit {
    pub target: Entity,
    pub impact_point: Vec2,
    pub hitter: Entity,
}

// === Components ===

/// A directional hit reaction in progress. Presentation reads the direction's
/// [`HitDirection::reaction_section`] to pick the animation; gameplay ignores
/// it entirely.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct HitReact {
    pub direction: HitDirection,
    pub timer: Timer,
}

impl HitReact {
    #[must_use]
    pub fn new(direction: HitDirection) -> Self {
        Self {
            direction,
            timer: Timer::from_seconds(HIT_REACT_SECS, TimerMode::Once),
        }
    }
}

// === Systems ===

/// Applies `Damage` messages to targets' health, clamped at zero. Targets
/// without `Health` (or despawned since the strike) are silently skipped.
/// Runs in the `GameSet::Combat` chain after the weapon resolver.
pub(super) fn apply_damage(mut damage: MessageReader<Damage>, mut healths: Query<&mut Health>) {
    for &Damage { target, amount, .. } in damage.read() {
        let Ok(mut health) = healths.get_mut(target) else {
            continue;
        };
        health.receive_damage(amount);
        debug!("{target} took {amount} damage, {} left", health.current);
    }
}

/// Starts a directional reaction on victims that are still alive after the
/// damage of the same strike landed. Degenerate geometry (impact exactly at
/// the victim's position) classifies to nothing and the reaction is skipped.
/// Runs after `apply_damage`.
pub(super) fn start_hit_reactions(
    mut commands: Commands,
    mut hits: MessageReader<Hit>,
    victims: Query<(&Facing, &GlobalTransform, &Health)>,
) {
    for &Hit {
        target,
        impact_point,
        ..
    } in hits.read()
    {
        let Ok((facing, transform, health)) = victims.get(target) else {
            continue;
        };
        if !health.is_alive() {
            continue; // death handling owns this transition
        }
        let origin = transform.translation().truncate();
        if let Some(direction) = hit_direction(facing.0, origin, impact_point) {
            commands.entity(target).insert(HitReact::new(direction));
        }
    }
}

/// Removes finished hit reactions.
pub(super) fn tick_hit_reactions(
    time: Res<Time>,
    mut commands: Commands,
    mut reactions: Query<(Entity, &mut HitReact)>,
) {
    for (entity, mut react) in &mut reactions {
        react.timer.tick(time.delta());
        if react.timer.just_finished() {
            commands.entity(entity).remove::<HitReact>();
        }
    }
}

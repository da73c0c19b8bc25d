//! Swing phases: the windup → active → recovery lifecycle of a melee attack.
//!
//! The Active phase is the armed window: the blade hitbox only exists for
//! the resolver between the two phase edges, and the weapon's ignore set is
//! cleared on both edges. Recovery ending fires [`SwingFinished`], the
//! attack-end signal the player and enemy state machines listen for.

use bevy::prelude::*;
use rand::Rng;

use super::weapon::{Handedness, HitboxArmed, Weapon};
use crate::gameplay::EquippedWeapon;

// === Constants ===

/// Base phase durations (seconds) for a one-handed swing.
const WINDUP_SECS: f32 = 0.20;
const ACTIVE_SECS: f32 = 0.25;
const RECOVERY_SECS: f32 = 0.25;

/// Two-handed swings run their phases this much slower.
const TWO_HANDED_PACE: f32 = 1.6;

/// Number of one-handed attack animation sections to roll between.
const ONE_HANDED_SECTIONS: u8 = 3;

// === Components ===

/// Phase of an in-flight swing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum SwingPhase {
    Windup,
    Active,
    Recovery,
}

/// An in-flight melee swing on the attacking character.
///
/// `section` indexes the attack animation section rolled for this swing:
/// one of three one-handed slashes, or the single heavy two-handed arc.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Swing {
    pub phase: SwingPhase,
    pub timer: Timer,
    pub handedness: Handedness,
    pub section: u8,
}

impl Swing {
    /// Start a swing in Windup, rolling a random attack section.
    #[must_use]
    pub fn begin(handedness: Handedness) -> Self {
        let section = match handedness {
            Handedness::OneHanded => rand::rng().random_range(0..ONE_HANDED_SECTIONS),
            Handedness::TwoHanded => 0,
        };
        Self {
            phase: SwingPhase::Windup,
            timer: Timer::from_seconds(phase_secs(SwingPhase::Windup, handedness), TimerMode::Once),
            handedness,
            section,
        }
    }

    /// Animation section name for the presentation layer.
    #[must_use]
    pub const fn section_name(&self) -> &'static str {
        match (self.handedness, self.section) {
            (Handedness::TwoHanded, _) => "heavy_attack",
            (Handedness::OneHanded, 0) => "attack_1",
            (Handedness::OneHanded, 1) => "attack_2",
            (Handedness::OneHanded, _) => "attack_3",
        }
    }
}

fn phase_secs(phase: SwingPhase, handedness: Handedness) -> f32 {
    let base = match phase {
        SwingPhase::Windup => WINDUP_SECS,
        SwingPhase::Active => ACTIVE_SECS,
        SwingPhase::Recovery => RECOVERY_SECS,
    };
    match handedness {
        Handedness::OneHanded => base,
        Handedness::TwoHanded => base * TWO_HANDED_PACE,
    }
}

// === Messages ===

/// The attack-end signal: a character's swing finished its recovery.
#[derive(Message, Debug, Clone, Copy)]
pub struct SwingFinished {
    pub attacker: Entity,
}

// === Systems ===

/// Advances swing phases and arms/disarms the wielder's weapon hitbox on the
/// Active phase edges. Runs first in the `GameSet::Combat` chain.
pub(super) fn tick_swings(
    time: Res<Time>,
    mut commands: Commands,
    mut swingers: Query<(Entity, &mut Swing, Option<&EquippedWeapon>)>,
    mut weapons: Query<&mut Weapon>,
    mut finished: MessageWriter<SwingFinished>,
) {
    for (attacker, mut swing, equipped) in &mut swingers {
        swing.timer.tick(time.delta());
        if !swing.timer.just_finished() {
            continue;
        }

        let weapon = equipped.and_then(|held| held.0);
        match swing.phase {
            SwingPhase::Windup => {
                let secs = phase_secs(SwingPhase::Active, swing.handedness);
                swing.phase = SwingPhase::Active;
                swing.timer = Timer::from_seconds(secs, TimerMode::Once);
                if let Some(weapon) = weapon {
                    if let Ok(mut weapon_data) = weapons.get_mut(weapon) {
                        weapon_data.struck.clear();
                    }
                    commands.entity(weapon).insert(HitboxArmed);
                }
            }
            SwingPhase::Active => {
                let secs = phase_secs(SwingPhase::Recovery, swing.handedness);
                swing.phase = SwingPhase::Recovery;
                swing.timer = Timer::from_seconds(secs, TimerMode::Once);
                if let Some(weapon) = weapon {
                    if let Ok(mut weapon_data) = weapons.get_mut(weapon) {
                        weapon_data.struck.clear();
                    }
                    commands.entity(weapon).remove::<HitboxArmed>();
                }
            }
            SwingPhase::Recovery => {
                commands.entity(attacker).remove::<Swing>();
                finished.write(SwingFinished { attacker });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn swing_begins_in_windup() {
        let swing = Swing::begin(Handedness::OneHanded);
        assert_eq!(swing.phase, SwingPhase::Windup);
        assert!(swing.section < ONE_HANDED_SECTIONS);
    }

    #[test]
    fn two_handed_swing_has_single_heavy_section() {
        let swing = Swing::begin(Handedness::TwoHanded);
        assert_eq!(swing.section, 0);
        assert_eq!(swing.section_name(), "heavy_attack");
    }

    #[test]
    fn two_handed_phases_are_slower() {
        assert!(
            phase_secs(SwingPhase::Active, Handedness::TwoHanded)
                > phase_secs(SwingPhase::Active, Handedness::OneHanded)
        );
    }
}

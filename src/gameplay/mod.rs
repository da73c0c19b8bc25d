//! Gameplay domain: shared components plus the combat, player, enemy, and
//! prop plugins.

pub mod combat;
pub mod enemy;
pub mod player;
pub mod props;
pub mod spawn;

use bevy::prelude::*;

// === Shared Components ===

/// Which side an actor fights for. Weapons never damage their wielder's side.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub enum Faction {
    Player,
    Enemy,
}

/// Health pool. `current` is only mutated through [`Health::receive_damage`],
/// which clamps at zero; it never goes negative.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    /// Full health pool of the given size.
    #[must_use]
    pub const fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Subtract damage, clamping at zero.
    pub fn receive_damage(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }

    /// Remaining health as a fraction in `[0, 1]`.
    #[must_use]
    pub fn percent(&self) -> f32 {
        (self.current / self.max).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }
}

/// Base movement speed (pixels per second). Enemies override their effective
/// speed per behavior tier; see [`enemy::EnemyConfig`].
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Movement {
    pub speed: f32,
}

/// Unit forward vector on the ground plane. Characters orient to their
/// movement direction; hit-reaction direction is classified against this.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Facing(pub Vec2);

impl Default for Facing {
    fn default() -> Self {
        Self(Vec2::X)
    }
}

/// Non-owning handle to the pawn this actor is currently fighting.
/// A despawned target resolves to "absent" through query misses.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct CombatTarget(pub Option<Entity>);

/// Handle to the weapon entity this character carries (equipped or sheathed).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct EquippedWeapon(pub Option<Entity>);

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Faction>()
        .register_type::<Health>()
        .register_type::<Movement>()
        .register_type::<Facing>()
        .register_type::<CombatTarget>()
        .register_type::<EquippedWeapon>();

    app.add_plugins((
        combat::plugin,
        player::plugin,
        enemy::plugin,
        props::plugin,
        spawn::plugin,
    ));
}

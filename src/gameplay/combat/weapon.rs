//! Melee weapons: pickup items, the blade hitbox, and overlap-driven hit
//! resolution during the armed window of a swing.

use avian2d::prelude::*;
use bevy::prelude::*;

use super::damage::{Damage, Hit};
use crate::gameplay::{Faction, Facing};
use crate::third_party::CollisionLayer;
use crate::Z_ITEM;

// === Constants ===

/// Weapon sprite size (pixels).
const WEAPON_SPRITE_SIZE: Vec2 = Vec2::new(6.0, 22.0);

/// Weapon blade color (steel grey).
const WEAPON_COLOR: Color = Color::srgb(0.75, 0.78, 0.82);

/// Local offset of a drawn weapon from its wielder, along the facing vector.
const HELD_OFFSET: f32 = 14.0;

/// Local offset of a sheathed weapon, opposite the facing vector.
const SHEATHED_OFFSET: f32 = 8.0;

// === Components ===

/// One- or two-handed grip. Two-handed weapons hit twice as hard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum Handedness {
    OneHanded,
    TwoHanded,
}

impl Handedness {
    #[must_use]
    pub const fn damage_multiplier(self) -> f32 {
        match self {
            Self::OneHanded => 1.0,
            Self::TwoHanded => 2.0,
        }
    }
}

/// A melee weapon. Lives on its own entity: on the ground as a pickup, or
/// attached to a wielder once equipped.
///
/// `struck` is the per-swing ignore set: every entity damaged during the
/// current armed window. Cleared on both edges of the window, it guarantees
/// at most one damage application per target per swing no matter how many
/// overlap reports the physics layer produces.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Weapon {
    pub damage: f32,
    pub handedness: Handedness,
    pub struck: Vec<Entity>,
}

impl Weapon {
    #[must_use]
    pub const fn new(damage: f32, handedness: Handedness) -> Self {
        Self {
            damage,
            handedness,
            struck: Vec::new(),
        }
    }

    /// Damage applied per hit, after the handedness multiplier.
    #[must_use]
    pub fn strike_damage(&self) -> f32 {
        self.damage * self.handedness.damage_multiplier()
    }
}

/// Marker: the blade hitbox is live. Present only during the Active phase of
/// a swing; without it the resolver ignores the weapon entirely.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct HitboxArmed;

/// Marker: the weapon is carried but stowed on the wielder's back.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Sheathed;

// === Spawning / Equipping ===

/// Spawn a weapon lying in the world as a pickup.
/// Single source of truth for the weapon-item archetype.
pub fn spawn_weapon_pickup(
    commands: &mut Commands,
    damage: f32,
    handedness: Handedness,
    position: Vec2,
) -> Entity {
    commands
        .spawn((
            Name::new("Weapon"),
            Weapon::new(damage, handedness),
            Sprite::from_color(WEAPON_COLOR, WEAPON_SPRITE_SIZE),
            Transform::from_xyz(position.x, position.y, Z_ITEM),
            // Physics: item sensor so the player can stand over it
            RigidBody::Static,
            Collider::rectangle(WEAPON_SPRITE_SIZE.x * 3.0, WEAPON_SPRITE_SIZE.y),
            Sensor,
            CollisionLayers::new(CollisionLayer::Item, CollisionLayer::Pushbox),
            CollisionEventsEnabled,
            CollidingEntities::default(),
        ))
        .id()
}

/// Attach a weapon to a wielder and reconfigure its sensor from a pickup
/// into a blade hitbox. The hitbox stays cold until a swing arms it.
pub fn equip_weapon(commands: &mut Commands, weapon: Entity, wielder: Entity) {
    commands.entity(weapon).insert((
        ChildOf(wielder),
        Transform::from_xyz(HELD_OFFSET, 0.0, 0.5),
        CollisionLayers::new(CollisionLayer::Hitbox, CollisionLayer::Hurtbox),
        CollidingEntities::default(),
    ));
}

// === Systems ===

/// Keeps a carried weapon on the wielder's facing side: drawn weapons sit in
/// front, sheathed weapons behind. Runs in `GameSet::Movement` after facing
/// updates so the blade hitbox leads into the swing direction.
pub(super) fn position_carried_weapons(
    mut weapons: Query<(&ChildOf, &mut Transform, Has<Sheathed>), With<Weapon>>,
    facings: Query<&Facing>,
) {
    for (child_of, mut transform, sheathed) in &mut weapons {
        let Ok(facing) = facings.get(child_of.parent()) else {
            continue;
        };
        let offset = if sheathed {
            -facing.0 * SHEATHED_OFFSET
        } else {
            facing.0 * HELD_OFFSET
        };
        transform.translation.x = offset.x;
        transform.translation.y = offset.y;
    }
}

/// Resolves overlaps for armed weapon blades via `CollidingEntities`.
///
/// Per new target (not the wielder, not already struck this swing, not on
/// the wielder's side): writes one `Damage` and one `Hit` message and records
/// the target in the ignore set. Idempotent against repeated overlap reports
/// within one armed window. Runs in the `GameSet::Combat` chain after swings
/// tick.
pub(super) fn resolve_weapon_hits(
    mut weapons: Query<
        (&mut Weapon, &CollidingEntities, &GlobalTransform, &ChildOf),
        With<HitboxArmed>,
    >,
    factions: Query<&Faction>,
    mut damage: MessageWriter<Damage>,
    mut hits: MessageWriter<Hit>,
) {
    for (mut weapon, colliding, blade_transform, child_of) in &mut weapons {
        let wielder = child_of.parent();
        for &target in &colliding.0 {
            if target == wielder || weapon.struck.contains(&target) {
                continue;
            }
            // No friendly fire
            if let Ok(target_faction) = factions.get(target) {
                if factions.get(wielder) == Ok(target_faction) {
                    continue;
                }
            }

            damage.write(Damage {
                target,
                amount: weapon.strike_damage(),
                instigator: wielder,
            });
            hits.write(Hit {
                target,
                impact_point: blade_transform.translation().truncate(),
                hitter: wielder,
            });
            weapon.struck.push(target);
        }
    }
}


#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::gameplay::Health;
    use bevy::ecs::entity::hash_set::EntityHashSet;
    use pretty_assertions::assert_eq;

    fn create_resolver_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<Damage>();
        app.add_message::<Hit>();
        app.add_systems(Update, resolve_weapon_hits);
        app
    }

    /// Spawn a wielder with an armed weapon whose hitbox already reports the
    /// given overlaps (tests drive `CollidingEntities` directly instead of
    /// stepping physics).
    fn spawn_armed_weapon(
        world: &mut World,
        faction: Faction,
        colliding_with: &[Entity],
    ) -> (Entity, Entity) {
        let wielder = world.spawn((faction, Facing::default())).id();
        let colliding = CollidingEntities(EntityHashSet::from_iter(colliding_with.iter().copied()));
        let weapon = world
            .spawn((
                Weapon::new(20.0, Handedness::OneHanded),
                HitboxArmed,
                colliding,
                GlobalTransform::from(Transform::from_xyz(10.0, 0.0, 0.0)),
                ChildOf(wielder),
            ))
            .id();
        (wielder, weapon)
    }

    fn drain_damage(app: &mut App) -> Vec<Damage> {
        app.world_mut()
            .resource_mut::<Messages<Damage>>()
            .drain()
            .collect()
    }

    #[test]
    fn armed_weapon_damages_overlapping_target() {
        let mut app = create_resolver_test_app();

        let target = app.world_mut().spawn((Faction::Enemy, Health::new(100.0))).id();
        let (wielder, _) = spawn_armed_weapon(app.world_mut(), Faction::Player, &[target]);

        app.update();

        let damage = drain_damage(&mut app);
        assert_eq!(damage.len(), 1);
        assert_eq!(damage[0].target, target);
        assert_eq!(damage[0].amount, 20.0);
        assert_eq!(damage[0].instigator, wielder);
    }

    #[test]
    fn same_target_struck_once_per_armed_window() {
        let mut app = create_resolver_test_app();

        let target = app.world_mut().spawn((Faction::Enemy, Health::new(100.0))).id();
        let (_, weapon) = spawn_armed_weapon(app.world_mut(), Faction::Player, &[target]);

        // Overlap persists across several physics reports
        app.update();
        app.update();
        app.update();

        let total: usize = drain_damage(&mut app).len();
        assert_eq!(total, 1, "continuous overlap must damage exactly once");
        let struck = &app.world().get::<Weapon>(weapon).unwrap().struck;
        assert_eq!(struck.as_slice(), &[target]);
    }

    #[test]
    fn clearing_the_ignore_set_allows_damage_again() {
        let mut app = create_resolver_test_app();

        let target = app.world_mut().spawn((Faction::Enemy, Health::new(100.0))).id();
        let (_, weapon) = spawn_armed_weapon(app.world_mut(), Faction::Player, &[target]);

        app.update();
        assert_eq!(drain_damage(&mut app).len(), 1);

        // New swing: the arm edge clears the ignore set
        app.world_mut()
            .get_mut::<Weapon>(weapon)
            .unwrap()
            .struck
            .clear();
        app.update();

        assert_eq!(drain_damage(&mut app).len(), 1);
    }

    #[test]
    fn disarmed_weapon_ignores_overlaps() {
        let mut app = create_resolver_test_app();

        let target = app.world_mut().spawn((Faction::Enemy, Health::new(100.0))).id();
        let (_, weapon) = spawn_armed_weapon(app.world_mut(), Faction::Player, &[target]);
        app.world_mut().entity_mut(weapon).remove::<HitboxArmed>();

        app.update();

        assert_eq!(drain_damage(&mut app).len(), 0);
    }

    #[test]
    fn wielder_is_never_struck_by_own_weapon() {
        let mut app = create_resolver_test_app();

        // Pre-build the wielder so the colliding set can include them
        let wielder = app.world_mut().spawn((Faction::Player, Facing::default())).id();
        let colliding = CollidingEntities(EntityHashSet::from_iter([wielder]));
        app.world_mut().spawn((
            Weapon::new(20.0, Handedness::OneHanded),
            HitboxArmed,
            colliding,
            GlobalTransform::default(),
            ChildOf(wielder),
        ));

        app.update();

        assert_eq!(drain_damage(&mut app).len(), 0);
    }

    #[test]
    fn no_friendly_fire() {
        let mut app = create_resolver_test_app();

        let ally = app.world_mut().spawn((Faction::Player, Health::new(100.0))).id();
        spawn_armed_weapon(app.world_mut(), Faction::Player, &[ally]);

        app.update();

        assert_eq!(drain_damage(&mut app).len(), 0);
    }

    #[test]
    fn factionless_props_are_valid_targets() {
        let mut app = create_resolver_test_app();

        // Breakable props carry no Faction
        let pot = app.world_mut().spawn(Transform::default()).id();
        spawn_armed_weapon(app.world_mut(), Faction::Player, &[pot]);

        app.update();

        let damage = drain_damage(&mut app);
        assert_eq!(damage.len(), 1);
        assert_eq!(damage[0].target, pot);
    }

    #[test]
    fn empty_overlap_set_is_a_no_op() {
        let mut app = create_resolver_test_app();

        spawn_armed_weapon(app.world_mut(), Faction::Player, &[]);
        app.update();

        assert_eq!(drain_damage(&mut app).len(), 0);
    }

    #[test]
    fn hit_message_carries_blade_impact_point() {
        let mut app = create_resolver_test_app();

        let target = app.world_mut().spawn((Faction::Enemy, Health::new(100.0))).id();
        spawn_armed_weapon(app.world_mut(), Faction::Player, &[target]);

        app.update();

        let hits: Vec<Hit> = app
            .world_mut()
            .resource_mut::<Messages<Hit>>()
            .drain()
            .collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].impact_point, Vec2::new(10.0, 0.0));
    }
}

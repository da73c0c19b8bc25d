//! Arena setup: the player, enemies with patrol routes, weapon pickups, and
//! breakable props.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::gameplay::combat::{
    equip_weapon, spawn_weapon_pickup, Handedness, HealthBarConfig, HealthBarVisible, Weapon,
};
use crate::gameplay::enemy::{Enemy, EnemyConfig, EnemyState, PatrolRoute};
use crate::gameplay::player::{
    ActionState, EquipState, OverlappingItem, Player, PLAYER_SPEED,
};
use crate::gameplay::props::spawn_breakable_pot;
use crate::gameplay::{CombatTarget, EquippedWeapon, Facing, Faction, Health, Movement};
use crate::third_party::CollisionLayer;
use crate::{Z_ACTOR, Z_GROUND};

// === Constants ===

const PLAYER_SPRITE_SIZE: Vec2 = Vec2::splat(16.0);
const PLAYER_COLOR: Color = Color::srgb(0.2, 0.5, 0.9);
const PLAYER_MAX_HEALTH: f32 = 100.0;

const ENEMY_SPRITE_SIZE: Vec2 = Vec2::splat(16.0);
const ENEMY_COLOR: Color = Color::srgb(0.85, 0.25, 0.2);
const ENEMY_MAX_HEALTH: f32 = 50.0;

const CHARACTER_COLLIDER_RADIUS: f32 = 8.0;

/// Playable arena half-extents (pixels).
const ARENA_HALF_EXTENTS: Vec2 = Vec2::new(640.0, 360.0);
const WALL_THICKNESS: f32 = 16.0;

// === Archetypes ===

fn character_physics() -> impl Bundle {
    (
        RigidBody::Dynamic,
        Collider::circle(CHARACTER_COLLIDER_RADIUS),
        LockedAxes::ROTATION_LOCKED,
        CollisionLayers::new(
            [CollisionLayer::Pushbox, CollisionLayer::Hurtbox],
            [
                CollisionLayer::Pushbox,
                CollisionLayer::Hitbox,
                CollisionLayer::Item,
            ],
        ),
        LinearVelocity::default(),
    )
}

fn spawn_player(commands: &mut Commands, position: Vec2) -> Entity {
    commands
        .spawn((
            Name::new("Player"),
            Player,
            Faction::Player,
            (
                ActionState::default(),
                EquipState::default(),
                EquippedWeapon::default(),
                OverlappingItem::default(),
            ),
            Health::new(PLAYER_MAX_HEALTH),
            HealthBarConfig::default(),
            HealthBarVisible,
            Movement {
                speed: PLAYER_SPEED,
            },
            Facing::default(),
            Sprite::from_color(PLAYER_COLOR, PLAYER_SPRITE_SIZE),
            Transform::from_xyz(position.x, position.y, Z_ACTOR),
            character_physics(),
        ))
        .id()
}

/// Spawn an enemy with an already drawn weapon and a patrol route through
/// the given points.
fn spawn_enemy(commands: &mut Commands, position: Vec2, route: &[Vec2]) -> Entity {
    let waypoints: Vec<Entity> = route
        .iter()
        .map(|point| {
            commands
                .spawn((
                    Name::new("Waypoint"),
                    Transform::from_xyz(point.x, point.y, Z_GROUND),
                ))
                .id()
        })
        .collect();

    let enemy = commands
        .spawn((
            Name::new("Enemy"),
            Enemy,
            Faction::Enemy,
            (
                EnemyState::default(),
                EnemyConfig::default(),
                CombatTarget::default(),
                EquippedWeapon::default(),
                PatrolRoute::new(waypoints),
            ),
            Health::new(ENEMY_MAX_HEALTH),
            HealthBarConfig::default(),
            Facing::default(),
            Sprite::from_color(ENEMY_COLOR, ENEMY_SPRITE_SIZE),
            Transform::from_xyz(position.x, position.y, Z_ACTOR),
            character_physics(),
        ))
        .id();

    // Enemies fight with their own blade from the start
    let weapon = commands
        .spawn((Name::new("Enemy Weapon"), Weapon::new(10.0, Handedness::OneHanded)))
        .id();
    equip_weapon(commands, weapon, enemy);
    commands
        .entity(enemy)
        .insert(EquippedWeapon(Some(weapon)));

    enemy
}

/// Four static walls closing off the playable area.
fn spawn_arena_bounds(commands: &mut Commands) {
    let walls = [
        // (center, size): top, bottom, left, right
        (
            Vec2::new(0.0, ARENA_HALF_EXTENTS.y),
            Vec2::new(ARENA_HALF_EXTENTS.x * 2.0, WALL_THICKNESS),
        ),
        (
            Vec2::new(0.0, -ARENA_HALF_EXTENTS.y),
            Vec2::new(ARENA_HALF_EXTENTS.x * 2.0, WALL_THICKNESS),
        ),
        (
            Vec2::new(-ARENA_HALF_EXTENTS.x, 0.0),
            Vec2::new(WALL_THICKNESS, ARENA_HALF_EXTENTS.y * 2.0),
        ),
        (
            Vec2::new(ARENA_HALF_EXTENTS.x, 0.0),
            Vec2::new(WALL_THICKNESS, ARENA_HALF_EXTENTS.y * 2.0),
        ),
    ];
    for (center, size) in walls {
        commands.spawn((
            Name::new("Arena Wall"),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            CollisionLayers::new(CollisionLayer::Pushbox, CollisionLayer::Pushbox),
            Transform::from_xyz(center.x, center.y, Z_ACTOR),
        ));
    }
}

// === Systems ===

fn spawn_arena(mut commands: Commands) {
    spawn_arena_bounds(&mut commands);
    spawn_player(&mut commands, Vec2::ZERO);

    spawn_weapon_pickup(&mut commands, 20.0, Handedness::OneHanded, Vec2::new(60.0, -40.0));
    spawn_weapon_pickup(&mut commands, 25.0, Handedness::TwoHanded, Vec2::new(-80.0, 120.0));

    spawn_enemy(
        &mut commands,
        Vec2::new(300.0, 100.0),
        &[
            Vec2::new(300.0, 100.0),
            Vec2::new(420.0, 40.0),
            Vec2::new(340.0, -80.0),
        ],
    );
    spawn_enemy(
        &mut commands,
        Vec2::new(-260.0, -140.0),
        &[Vec2::new(-260.0, -140.0), Vec2::new(-140.0, -220.0)],
    );

    for position in [
        Vec2::new(120.0, 60.0),
        Vec2::new(150.0, 60.0),
        Vec2::new(-60.0, -90.0),
    ] {
        spawn_breakable_pot(&mut commands, position);
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_arena);
}

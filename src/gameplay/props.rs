//! Breakable props and the treasure they drop.
//!
//! Pots shatter on the first weapon hit, spawn a random treasure just above
//! themselves, and linger briefly as debris. Treasure is an overlap pickup
//! that feeds the [`Gold`] tally.

use avian2d::prelude::*;
use bevy::prelude::*;
use rand::Rng;

use crate::gameplay::combat::Hit;
use crate::gameplay::enemy::Lifespan;
use crate::gameplay::player::Player;
use crate::third_party::CollisionLayer;
use crate::{GameSet, Z_ITEM, gameplay_running};

// === Constants ===

const POT_SPRITE_SIZE: Vec2 = Vec2::splat(16.0);
const POT_COLOR: Color = Color::srgb(0.7, 0.45, 0.2);
const DEBRIS_COLOR: Color = Color::srgb(0.4, 0.28, 0.15);

/// Seconds shattered debris lingers before despawning.
const DEBRIS_SECS: f32 = 3.0;

/// How far above the prop its treasure appears (pixels).
const TREASURE_DROP_OFFSET: f32 = 12.0;

const TREASURE_SPRITE_SIZE: Vec2 = Vec2::splat(8.0);
const TREASURE_COLOR: Color = Color::srgb(0.95, 0.8, 0.2);

/// Treasure table: (kind, gold value). One entry is rolled per shattered
/// prop.
const TREASURE_KINDS: [(&str, u32); 3] = [("coin_pouch", 10), ("goblet", 25), ("gem", 50)];

// === Components & Resources ===

/// A prop that shatters on the first weapon hit.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Breakable;

/// Marker: this breakable already shattered. Further hits are ignored.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Shattered;

/// A collectible treasure drop.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Treasure {
    pub kind: String,
    pub gold: u32,
}

impl Treasure {
    /// Roll a random entry from the treasure table.
    #[must_use]
    pub fn roll() -> Self {
        let (kind, gold) = TREASURE_KINDS[rand::rng().random_range(0..TREASURE_KINDS.len())];
        Self {
            kind: kind.to_owned(),
            gold,
        }
    }
}

/// Running total of gold the player has collected.
#[derive(Resource, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Resource)]
pub struct Gold(pub u32);

// === Spawning ===

/// Spawn a breakable pot. Its hurtbox makes it a valid weapon target; it has
/// no faction, so anyone's swing can shatter it.
pub fn spawn_breakable_pot(commands: &mut Commands, position: Vec2) -> Entity {
    commands
        .spawn((
            Name::new("Pot"),
            Breakable,
            Sprite::from_color(POT_COLOR, POT_SPRITE_SIZE),
            Transform::from_xyz(position.x, position.y, Z_ITEM),
            RigidBody::Static,
            Collider::rectangle(POT_SPRITE_SIZE.x, POT_SPRITE_SIZE.y),
            CollisionLayers::new(
                [CollisionLayer::Pushbox, CollisionLayer::Hurtbox],
                [CollisionLayer::Pushbox, CollisionLayer::Hitbox],
            ),
        ))
        .id()
}

fn spawn_treasure(commands: &mut Commands, position: Vec2) {
    let treasure = Treasure::roll();
    commands.spawn((
        Name::new("Treasure"),
        treasure,
        Sprite::from_color(TREASURE_COLOR, TREASURE_SPRITE_SIZE),
        Transform::from_xyz(position.x, position.y + TREASURE_DROP_OFFSET, Z_ITEM),
        RigidBody::Static,
        Collider::circle(TREASURE_SPRITE_SIZE.x),
        Sensor,
        CollisionLayers::new(CollisionLayer::Item, CollisionLayer::Pushbox),
        CollisionEventsEnabled,
        CollidingEntities::default(),
    ));
}

// === Systems ===

/// Shatters breakables on their first hit: collision goes away, debris
/// lingers on a lifespan, and a treasure drops above the prop. Re-hits of
/// already shattered props are no-ops. Runs after the strike pipeline.
fn shatter_breakables(
    mut hits: MessageReader<Hit>,
    mut commands: Commands,
    mut breakables: Query<(&GlobalTransform, &mut Sprite), (With<Breakable>, Without<Shattered>)>,
) {
    for hit in hits.read() {
        let Ok((transform, mut sprite)) = breakables.get_mut(hit.target) else {
            continue;
        };
        sprite.color = DEBRIS_COLOR;
        commands
            .entity(hit.target)
            .remove::<Collider>()
            .insert((Shattered, Lifespan::new(DEBRIS_SECS)));
        spawn_treasure(&mut commands, transform.translation().truncate());
        debug!("{} shattered", hit.target);
    }
}

/// Collects treasure the player walks over.
fn collect_treasure(
    mut commands: Commands,
    mut gold: ResMut<Gold>,
    treasures: Query<(Entity, &Treasure, &CollidingEntities)>,
    players: Query<(), With<Player>>,
) {
    for (entity, treasure, colliding) in &treasures {
        let collected = colliding.iter().any(|&other| players.get(other).is_ok());
        if collected {
            gold.0 += treasure.gold;
            commands.entity(entity).despawn();
            info!("collected {} (+{} gold)", treasure.kind, treasure.gold);
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Breakable>()
        .register_type::<Shattered>()
        .register_type::<Treasure>()
        .register_type::<Gold>();

    app.init_resource::<Gold>();

    app.add_systems(
        Update,
        (shatter_breakables, collect_treasure)
            .in_set(GameSet::Death)
            .run_if(gameplay_running),
    );
}

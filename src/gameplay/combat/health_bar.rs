//! Health bar rendering: spawns and updates visual health indicators.
//!
//! Bars are child sprites of the owning character. Enemies keep theirs hidden
//! until they engage the player; the [`HealthBarVisible`] marker on the owner
//! drives that, so the enemy behavior systems only ever touch the marker.

use bevy::prelude::*;

use crate::gameplay::Health;
use crate::{GameSet, gameplay_running};

// === Constants ===

/// Health bar colors.
const HEALTH_BAR_BG_COLOR: Color = Color::srgb(0.8, 0.1, 0.1);
const HEALTH_BAR_FILL_COLOR: Color = Color::srgb(0.1, 0.9, 0.1);

/// Default health bar width for characters (pixels).
pub const CHARACTER_HEALTH_BAR_WIDTH: f32 = 24.0;

/// Default health bar height for characters (pixels).
pub const CHARACTER_HEALTH_BAR_HEIGHT: f32 = 3.0;

/// Default health bar Y offset for characters (pixels above center).
pub const CHARACTER_HEALTH_BAR_Y_OFFSET: f32 = 20.0;

// === Components ===

/// Marker: red background bar (full width, shows "missing" HP).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct HealthBarBackground;

/// Marker: green foreground bar (scales with current/max HP).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct HealthBarFill;

/// Marker on the bar's OWNER: its health bar should currently be shown.
/// Present from spawn on the player; toggled by the enemy behavior systems.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct HealthBarVisible;

/// Configuration for health bar sizing. Required on all entities with `Health`
/// that should render a bar.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct HealthBarConfig {
    pub width: f32,
    pub height: f32,
    pub y_offset: f32,
}

impl Default for HealthBarConfig {
    fn default() -> Self {
        Self {
            width: CHARACTER_HEALTH_BAR_WIDTH,
            height: CHARACTER_HEALTH_BAR_HEIGHT,
            y_offset: CHARACTER_HEALTH_BAR_Y_OFFSET,
        }
    }
}

// === Systems ===

/// Spawns health bar child entities when `Health` is added to an entity with
/// `HealthBarConfig`. Bars start hidden; `sync_health_bar_visibility` shows
/// them once the owner carries [`HealthBarVisible`].
fn spawn_health_bars(
    add: On<Add, Health>,
    configs: Query<&HealthBarConfig>,
    mut commands: Commands,
) {
    let Ok(config) = configs.get(add.entity) else {
        return; // Health without a bar (breakable props)
    };
    commands.entity(add.entity).with_children(|parent| {
        // Red background (full width, shows missing HP)
        parent.spawn((
            Name::new("Health Bar BG"),
            Sprite::from_color(HEALTH_BAR_BG_COLOR, Vec2::new(config.width, config.height)),
            Transform::from_xyz(0.0, config.y_offset, 1.0),
            Visibility::Hidden,
            HealthBarBackground,
        ));
        // Green fill (scales with HP ratio, rendered in front of background)
        parent.spawn((
            Name::new("Health Bar Fill"),
            Sprite::from_color(
                HEALTH_BAR_FILL_COLOR,
                Vec2::new(config.width, config.height),
            ),
            Transform::from_xyz(0.0, config.y_offset, 1.1),
            Visibility::Hidden,
            HealthBarFill,
        ));
    });
}

/// Updates health bar fill width based on current/max HP.
/// Runs in `GameSet::Ui`.
fn update_health_bars(
    health_query: Query<(&Health, &Children, &HealthBarConfig)>,
    mut bar_query: Query<&mut Transform, With<HealthBarFill>>,
) {
    for (health, children, config) in &health_query {
        let ratio = health.percent();
        for child in children.iter() {
            if let Ok(mut transform) = bar_query.get_mut(child) {
                transform.scale.x = ratio;
                // Shift left to keep bar left-aligned as it shrinks
                transform.translation.x = config.width.mul_add(-(1.0 - ratio), 0.0) / 2.0;
            }
        }
    }
}

/// Mirrors the owner's [`HealthBarVisible`] marker onto both bar sprites.
/// Runs in `GameSet::Ui`.
fn sync_health_bar_visibility(
    owners: Query<(&Children, Has<HealthBarVisible>), With<HealthBarConfig>>,
    mut bars: Query<
        &mut Visibility,
        Or<(With<HealthBarBackground>, With<HealthBarFill>)>,
    >,
) {
    for (children, shown) in &owners {
        let target = if shown {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        for child in children.iter() {
            if let Ok(mut visibility) = bars.get_mut(child) {
                visibility.set_if_neq(target);
            }
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<HealthBarBackground>()
        .register_type::<HealthBarFill>()
        .register_type::<HealthBarVisible>()
        .register_type::<HealthBarConfig>();

    // Observer: spawn health bars immediately when Health is added
    app.add_observer(spawn_health_bars);

    app.add_systems(
        Update,
        (update_health_bars, sync_health_bar_visibility)
            .in_set(GameSet::Ui)
            .run_if(gameplay_running),
    );
}

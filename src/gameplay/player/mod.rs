//! Player character: input-driven movement, weapon pickup, sheathe/draw, and
//! attacks, gated by a small action state machine.
//!
//! `ActionState` is the busy flag: while a swing or an equip transition is
//! playing, movement and further actions are locked out. `EquipState` mirrors
//! what is in the player's hands and is only ever derived from an actual
//! weapon, so the two can't disagree.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::gameplay::combat::{
    equip_weapon, Handedness, HitReact, Sheathed, Swing, SwingFinished, Weapon,
};
use crate::gameplay::{EquippedWeapon, Facing, Movement};
use crate::{GameSet, gameplay_running};

// === Constants ===

/// Player walk speed (pixels per second).
pub const PLAYER_SPEED: f32 = 120.0;

/// How long the sheathe/draw transition takes (seconds).
const EQUIP_SECS: f32 = 0.5;

// === Components ===

/// Marker for the player character.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Player;

/// What the player is busy with. Anything but `Unoccupied` locks out
/// movement and new actions.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub enum ActionState {
    #[default]
    Unoccupied,
    Attacking,
    Equipping,
}

/// What the player currently wields.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub enum EquipState {
    #[default]
    Unequipped,
    OneHanded,
    TwoHanded,
}

impl EquipState {
    /// The equip state that wielding this weapon puts the player in.
    ///
    /// Taking the weapon by reference means an equipped state can only ever
    /// be produced from a weapon that exists; "equipped with nothing" cannot
    /// be constructed here.
    #[must_use]
    pub const fn for_weapon(weapon: &Weapon) -> Self {
        match weapon.handedness {
            Handedness::OneHanded => Self::OneHanded,
            Handedness::TwoHanded => Self::TwoHanded,
        }
    }
}

/// The weapon pickup the player is currently standing over, if any.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct OverlappingItem(pub Option<Entity>);

/// Which way an in-flight equip transition goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum EquipKind {
    Sheathe,
    Draw,
}

/// A sheathe/draw transition in progress. The weapon actually moves when the
/// timer fires, matching the grab point of the transition animation.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct EquipAction {
    pub kind: EquipKind,
    pub timer: Timer,
}

impl EquipAction {
    fn new(kind: EquipKind) -> Self {
        Self {
            kind,
            timer: Timer::from_seconds(EQUIP_SECS, TimerMode::Once),
        }
    }
}

// === Guards ===

/// The player may start a swing: idle, with a weapon in hand.
#[must_use]
pub fn can_attack(action: ActionState, equip: EquipState) -> bool {
    action == ActionState::Unoccupied && equip != EquipState::Unequipped
}

/// The player may sheathe: idle, with a weapon in hand.
#[must_use]
pub fn can_sheathe(action: ActionState, equip: EquipState) -> bool {
    action == ActionState::Unoccupied && equip != EquipState::Unequipped
}

/// The player may draw: idle, empty-handed, with a weapon on their back.
#[must_use]
pub fn can_draw(action: ActionState, equip: EquipState, carried: Option<Entity>) -> bool {
    action == ActionState::Unoccupied && equip == EquipState::Unequipped && carried.is_some()
}

// === Systems ===

/// Tracks which weapon pickup the player is standing over, via the pickups'
/// own overlap sensors. Runs in `GameSet::Input` so the same-frame E press
/// sees it.
fn detect_item_overlap(
    pickups: Query<(Entity, &CollidingEntities), (With<Weapon>, Without<ChildOf>)>,
    mut players: Query<(Entity, &mut OverlappingItem), With<Player>>,
) {
    for (player, mut overlapping) in &mut players {
        let over = pickups
            .iter()
            .find(|(_, colliding)| colliding.contains(&player))
            .map(|(pickup, _)| pickup);
        overlapping.0 = over;
    }
}

/// WASD / arrow movement. Locked while the player is mid-action or staggered
/// by a hit; facing only updates while actually moving. Runs in
/// `GameSet::Input`.
fn handle_movement_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut players: Query<
        (
            &ActionState,
            &Movement,
            &mut LinearVelocity,
            &mut Facing,
            Has<HitReact>,
        ),
        With<Player>,
    >,
) {
    for (action, movement, mut velocity, mut facing, staggered) in &mut players {
        if *action != ActionState::Unoccupied || staggered {
            velocity.0 = Vec2::ZERO;
            continue;
        }

        let mut direction = Vec2::ZERO;
        if keyboard.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) {
            direction.y += 1.0;
        }
        if keyboard.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) {
            direction.y -= 1.0;
        }
        if keyboard.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
            direction.x -= 1.0;
        }
        if keyboard.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
            direction.x += 1.0;
        }

        let direction = direction.normalize_or_zero();
        velocity.0 = direction * movement.speed;
        if direction != Vec2::ZERO {
            facing.0 = direction;
        }
    }
}

/// E: pick up an overlapped weapon, or sheathe/draw the carried one.
/// Runs in `GameSet::Input`.
fn handle_equip_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut commands: Commands,
    mut players: Query<
        (
            Entity,
            &mut ActionState,
            &mut EquipState,
            &mut EquippedWeapon,
            &OverlappingItem,
            Has<HitReact>,
        ),
        With<Player>,
    >,
    weapons: Query<&Weapon>,
) {
    if !keyboard.just_pressed(KeyCode::KeyE) {
        return;
    }
    for (player, mut action, mut equip, mut carried, overlapping, staggered) in &mut players {
        if *action != ActionState::Unoccupied || staggered {
            continue;
        }

        // Standing over a pickup while empty-handed: take it, straight into
        // the hands.
        if carried.0.is_none() {
            if let Some(pickup) = overlapping.0 {
                let Ok(weapon) = weapons.get(pickup) else {
                    continue;
                };
                equip_weapon(&mut commands, pickup, player);
                *equip = EquipState::for_weapon(weapon);
                carried.0 = Some(pickup);
                info!("{player} picked up weapon {pickup}");
                continue;
            }
        }

        // Equip state flips at transition start; the timer only moves the
        // weapon at the animation's grab point.
        if can_sheathe(*action, *equip) {
            *action = ActionState::Equipping;
            *equip = EquipState::Unequipped;
            commands.entity(player).insert(EquipAction::new(EquipKind::Sheathe));
        } else if can_draw(*action, *equip, carried.0) {
            let Some(weapon) = carried.0 else {
                continue;
            };
            let Ok(weapon_data) = weapons.get(weapon) else {
                continue;
            };
            *action = ActionState::Equipping;
            *equip = EquipState::for_weapon(weapon_data);
            commands.entity(player).insert(EquipAction::new(EquipKind::Draw));
        }
    }
}

/// Space / left click: start a swing with the drawn weapon.
/// Runs in `GameSet::Input`.
fn handle_attack_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut commands: Commands,
    mut players: Query<
        (
            Entity,
            &mut ActionState,
            &EquipState,
            &EquippedWeapon,
            Has<HitReact>,
        ),
        With<Player>,
    >,
    weapons: Query<&Weapon>,
) {
    if !keyboard.just_pressed(KeyCode::Space) && !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    for (player, mut action, equip, carried, staggered) in &mut players {
        if !can_attack(*action, *equip) || staggered {
            continue;
        }
        let Some(weapon) = carried.0 else {
            continue;
        };
        let Ok(weapon_data) = weapons.get(weapon) else {
            continue;
        };
        *action = ActionState::Attacking;
        commands
            .entity(player)
            .insert(Swing::begin(weapon_data.handedness));
    }
}

/// Completes sheathe/draw transitions when their timer fires: the weapon
/// moves to the back or the hands and the player is free again.
fn tick_equip_actions(
    time: Res<Time>,
    mut commands: Commands,
    mut players: Query<
        (Entity, &mut EquipAction, &mut ActionState, &EquippedWeapon),
        With<Player>,
    >,
) {
    for (player, mut equip_action, mut action, carried) in &mut players {
        equip_action.timer.tick(time.delta());
        if !equip_action.timer.just_finished() {
            continue;
        }

        if let Some(weapon) = carried.0 {
            match equip_action.kind {
                EquipKind::Sheathe => {
                    commands.entity(weapon).insert(Sheathed);
                }
                EquipKind::Draw => {
                    commands.entity(weapon).remove::<Sheathed>();
                }
            }
        }
        *action = ActionState::Unoccupied;
        commands.entity(player).remove::<EquipAction>();
    }
}

/// Returns the player to `Unoccupied` when their swing finishes.
fn finish_player_swings(
    mut finished: MessageReader<SwingFinished>,
    mut players: Query<&mut ActionState, With<Player>>,
) {
    for message in finished.read() {
        if let Ok(mut action) = players.get_mut(message.attacker) {
            if *action == ActionState::Attacking {
                *action = ActionState::Unoccupied;
            }
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Player>()
        .register_type::<ActionState>()
        .register_type::<EquipState>()
        .register_type::<OverlappingItem>()
        .register_type::<EquipAction>();

    app.add_systems(
        Update,
        (
            detect_item_overlap,
            handle_movement_input,
            handle_equip_input,
            handle_attack_input,
            tick_equip_actions,
        )
            .chain()
            .in_set(GameSet::Input)
            .run_if(gameplay_running),
    );

    // After the combat chain so the end-of-swing signal is seen same-frame.
    app.add_systems(
        Update,
        finish_player_swings
            .in_set(GameSet::Death)
            .run_if(gameplay_running),
    );
}

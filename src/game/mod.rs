//! Core game shell: camera and pause handling.

use bevy::prelude::*;

use crate::GameState;

/// Spawns the global 2D camera. Persists across all states (do NOT add `DespawnOnExit`).
fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Toggles pause on Escape.
fn handle_pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        next_state.set(match state.get() {
            GameState::Running => GameState::Paused,
            GameState::Paused => GameState::Running,
        });
    }
}

fn spawn_pause_overlay(mut commands: Commands) {
    commands.spawn((
        Text::new("PAUSED - Press ESC to Resume"),
        TextFont {
            font_size: 32.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Percent(35.0),
            top: Val::Percent(45.0),
            ..default()
        },
        DespawnOnExit(GameState::Paused),
    ));
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, setup_camera);
    app.add_systems(Update, handle_pause_input);
    app.add_systems(OnEnter(GameState::Paused), spawn_pause_overlay);
}

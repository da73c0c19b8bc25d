//! Oathblade game library: top-down melee action gameplay.

pub mod game;
pub mod gameplay;
#[cfg(test)]
pub mod testing;
pub mod third_party;

use bevy::prelude::*;

// === Z Layers ===

/// Z layer for ground decoration (patrol markers, arena floor).
pub const Z_GROUND: f32 = 0.0;

/// Z layer for items lying in the world (weapons, treasure).
pub const Z_ITEM: f32 = 5.0;

/// Z layer for characters and props.
pub const Z_ACTOR: f32 = 10.0;

// === States ===

/// Primary game states.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Active gameplay.
    #[default]
    Running,
    /// Gameplay frozen; pause overlay shown.
    Paused,
}

/// Run condition: gameplay systems only advance while not paused.
pub fn gameplay_running(state: Res<State<GameState>>) -> bool {
    *state.get() == GameState::Running
}

// === System Sets ===

/// Frame-order system sets for gameplay. Configured as a chain:
/// input is read first, AI decides, movement steers, combat resolves,
/// death is checked, UI reflects the result.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSet {
    Input,
    Ai,
    Movement,
    Combat,
    Death,
    Ui,
}

// === Plugin ===

/// Top-level library plugin: states, set ordering, and all game plugins.
pub fn plugin(app: &mut App) {
    app.init_state::<GameState>();

    app.configure_sets(
        Update,
        (
            GameSet::Input,
            GameSet::Ai,
            GameSet::Movement,
            GameSet::Combat,
            GameSet::Death,
            GameSet::Ui,
        )
            .chain(),
    );

    app.add_plugins((game::plugin, third_party::plugin, gameplay::plugin));
}

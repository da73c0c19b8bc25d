//! Tests for game state transitions.

use bevy::input::InputPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use oathblade::GameState;
use pretty_assertions::assert_eq;

fn create_game_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins((TransformPlugin, StatesPlugin, InputPlugin));
    app.add_plugins(oathblade::plugin);
    app
}

#[test]
fn game_initializes_running() {
    let mut app = create_game_app();
    app.update();
    let state = app.world().resource::<State<GameState>>();
    assert_eq!(*state.get(), GameState::Running);
}

#[test]
fn escape_toggles_pause() {
    let mut app = create_game_app();
    app.update();

    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(KeyCode::Escape);
    app.update();
    app.update(); // state transition applies

    let state = app.world().resource::<State<GameState>>();
    assert_eq!(*state.get(), GameState::Paused);
}

#[test]
fn gameplay_halts_while_paused() {
    let mut app = create_game_app();
    app.update();

    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Paused);
    app.update();
    app.update();

    // Teleport the player on top of an enemy; paused perception must not react
    use oathblade::gameplay::enemy::{Enemy, EnemyState};
    use oathblade::gameplay::player::Player;

    let enemy_pos = {
        let mut enemies = app
            .world_mut()
            .query_filtered::<&Transform, With<Enemy>>();
        enemies.iter(app.world()).next().unwrap().translation
    };
    let mut players = app
        .world_mut()
        .query_filtered::<(&mut Transform, &mut GlobalTransform), (With<Player>, Without<Enemy>)>();
    let (mut transform, mut global) = players.single_mut(app.world_mut()).unwrap();
    transform.translation = enemy_pos;
    *global = GlobalTransform::from(*transform);

    app.update();
    app.update();

    let mut enemies = app
        .world_mut()
        .query_filtered::<&EnemyState, With<Enemy>>();
    for state in enemies.iter(app.world()) {
        assert_eq!(*state, EnemyState::Patrolling);
    }
}

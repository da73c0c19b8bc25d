//! Testing utilities for Bevy systems.

#![cfg(test)]

use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use crate::GameState;

/// Creates a minimal app for testing with essential plugins.
pub fn create_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app
}

/// Creates a minimal app with `GameState` support.
pub fn create_state_test_app() -> App {
    let mut app = create_test_app();
    app.add_plugins(StatesPlugin);
    app.init_state::<GameState>();
    app
}

/// Registers the input resources systems under test read.
pub fn init_input_resources(app: &mut App) {
    app.init_resource::<ButtonInput<KeyCode>>();
    app.init_resource::<ButtonInput<MouseButton>>();
}

/// Set a timer one nanosecond short of finishing, so any positive wall-clock
/// delta on the next update fires it (`MinimalPlugins` uses real deltas).
pub fn nearly_expire_timer(timer: &mut Timer) {
    let duration = timer.duration();
    timer.set_elapsed(duration - Duration::from_nanos(1));
}

/// Asserts that exactly `expected` entities match the query filter `F`.
pub fn assert_entity_count<F: bevy::ecs::query::QueryFilter>(app: &mut App, expected: usize) {
    let count = app.world_mut().query_filtered::<(), F>().iter(app.world()).count();
    assert_eq!(count, expected, "expected {expected} entities, found {count}");
}

//! Whole-app combat flow: damage, aggro, death, and breakables through the
//! full plugin wiring.

use bevy::input::InputPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use oathblade::gameplay::combat::{Damage, HealthBarVisible, Hit};
use oathblade::gameplay::enemy::{Enemy, EnemyState};
use oathblade::gameplay::player::Player;
use oathblade::gameplay::props::{Breakable, Treasure};
use oathblade::gameplay::Health;
use pretty_assertions::assert_eq;

fn create_game_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins((TransformPlugin, StatesPlugin, InputPlugin));
    app.add_plugins(oathblade::plugin);
    app.update(); // Startup: arena spawns
    app
}

fn first_enemy(app: &mut App) -> Entity {
    let mut enemies = app.world_mut().query_filtered::<Entity, With<Enemy>>();
    enemies.iter(app.world()).next().unwrap()
}

fn player_entity(app: &mut App) -> Entity {
    let mut players = app.world_mut().query_filtered::<Entity, With<Player>>();
    players.single(app.world()).unwrap()
}

#[test]
fn damage_hurts_and_aggros_the_enemy() {
    let mut app = create_game_app();
    let enemy = first_enemy(&mut app);
    let player = player_entity(&mut app);
    let before = app.world().get::<Health>(enemy).unwrap().current;

    app.world_mut().write_message(Damage {
        target: enemy,
        amount: 10.0,
        instigator: player,
    });
    app.update();

    let health = app.world().get::<Health>(enemy).unwrap();
    assert_eq!(health.current, before - 10.0);
    // The arena player spawns out of sight; damage alone must aggro
    assert_eq!(
        *app.world().get::<EnemyState>(enemy).unwrap(),
        EnemyState::Chasing
    );
    assert!(app.world().get::<HealthBarVisible>(enemy).is_some());
}

#[test]
fn lethal_damage_leaves_a_corpse() {
    let mut app = create_game_app();
    let enemy = first_enemy(&mut app);
    let player = player_entity(&mut app);

    app.world_mut().write_message(Damage {
        target: enemy,
        amount: 9999.0,
        instigator: player,
    });
    app.update();

    assert_eq!(
        *app.world().get::<EnemyState>(enemy).unwrap(),
        EnemyState::Dead
    );
    assert!(app.world().get::<HealthBarVisible>(enemy).is_none());
    // The corpse is still there until its lifespan runs out
    assert!(app.world().get_entity(enemy).is_ok());
}

#[test]
fn hitting_a_pot_drops_treasure() {
    let mut app = create_game_app();
    let player = player_entity(&mut app);
    let pot = {
        let mut pots = app.world_mut().query_filtered::<Entity, With<Breakable>>();
        pots.iter(app.world()).next().unwrap()
    };

    app.world_mut().write_message(Hit {
        target: pot,
        impact_point: Vec2::ZERO,
        hitter: player,
    });
    app.update();
    app.update(); // deferred treasure spawn applies

    let mut treasures = app.world_mut().query_filtered::<(), With<Treasure>>();
    assert_eq!(treasures.iter(app.world()).count(), 1);
}

//! Enemy behavior: patrol, chase, attack, and death.
//!
//! Each enemy runs a four-state machine ordered by priority: `Dead` beats
//! everything, combat (`Attacking` > `Chasing`) beats `Patrolling`.
//! Perception promotes and demotes between the tiers every AI tick; taking
//! damage promotes straight to `Chasing` no matter what the enemy was doing.

use avian2d::prelude::*;
use bevy::prelude::*;
use rand::Rng;

use crate::gameplay::combat::{Damage, HealthBarVisible, Swing, SwingFinished, Weapon};
use crate::gameplay::player::Player;
use crate::gameplay::{CombatTarget, EquippedWeapon, Facing, Health};
use crate::{GameSet, gameplay_running};

// === Constants ===

/// Seconds a corpse lingers before despawning.
const CORPSE_SECS: f32 = 5.0;

/// Random pause between consecutive enemy swings (seconds).
const ATTACK_WAIT_MIN_SECS: f32 = 0.5;
const ATTACK_WAIT_MAX_SECS: f32 = 1.0;

/// Number of death animation sections to roll between.
const DEATH_SECTIONS: u8 = 3;

// === Components ===

/// Marker for enemy characters.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Enemy;

/// Behavior tier, ordered by priority: combat states always outrank
/// patrolling, and death outranks everything.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Reflect)]
#[reflect(Component)]
pub enum EnemyState {
    Dead,
    #[default]
    Patrolling,
    Chasing,
    Attacking,
}

impl EnemyState {
    /// Combat tiers: the enemy has a target and its health bar is shown.
    #[must_use]
    pub fn is_engaged(self) -> bool {
        self >= Self::Chasing
    }
}

/// Per-enemy behavior tuning (radii in pixels, speeds in pixels per second).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct EnemyConfig {
    /// Distance at which a patrolling enemy notices the player.
    pub sight_radius: f32,
    /// Distance at which a chasing enemy starts swinging.
    pub attack_radius: f32,
    /// Distance beyond which an engaged enemy gives up and goes back to
    /// patrolling. Larger than `sight_radius` so engagement has hysteresis.
    pub lose_interest_radius: f32,
    /// Distance at which a waypoint counts as reached.
    pub acceptance_radius: f32,
    pub patrol_speed: f32,
    pub chase_speed: f32,
    /// Random wait at each waypoint (seconds).
    pub patrol_wait_min_secs: f32,
    pub patrol_wait_max_secs: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            sight_radius: 180.0,
            attack_radius: 40.0,
            lose_interest_radius: 240.0,
            acceptance_radius: 12.0,
            patrol_speed: 40.0,
            chase_speed: 90.0,
            patrol_wait_min_secs: 2.0,
            patrol_wait_max_secs: 5.0,
        }
    }
}

/// Waypoint entities this enemy walks between. A route with fewer than two
/// waypoints makes the enemy hold position at the one it has.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct PatrolRoute {
    pub waypoints: Vec<Entity>,
    pub current: usize,
}

impl PatrolRoute {
    #[must_use]
    pub const fn new(waypoints: Vec<Entity>) -> Self {
        Self {
            waypoints,
            current: 0,
        }
    }

    #[must_use]
    pub fn current_waypoint(&self) -> Option<Entity> {
        self.waypoints.get(self.current).copied()
    }

    /// Pick a random next waypoint, never the current one when the route has
    /// alternatives.
    pub fn advance(&mut self) {
        if self.waypoints.len() < 2 {
            return;
        }
        let mut next = rand::rng().random_range(0..self.waypoints.len() - 1);
        if next >= self.current {
            next += 1;
        }
        self.current = next;
    }
}

/// The pause at a reached waypoint. Removed when it fires or when combat
/// interrupts the patrol.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct PatrolWait(pub Timer);

/// Pause between an enemy's consecutive swings.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct AttackCooldown(pub Timer);

/// Countdown to corpse removal.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Lifespan(pub Timer);

impl Lifespan {
    #[must_use]
    pub fn new(secs: f32) -> Self {
        Self(Timer::from_seconds(secs, TimerMode::Once))
    }
}

/// Which death animation section this corpse froze on. Rolled once at death
/// so the pose persists for the corpse's whole lifespan.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct DeathPose(pub u8);

impl DeathPose {
    #[must_use]
    pub fn roll() -> Self {
        Self(rand::rng().random_range(0..DEATH_SECTIONS))
    }

    #[must_use]
    pub const fn section_name(self) -> &'static str {
        match self.0 {
            0 => "death_1",
            1 => "death_2",
            _ => "death_3",
        }
    }
}

// === Systems ===

/// Promotes and demotes enemies between behavior tiers based on distance to
/// the player. Runs first in `GameSet::Ai`.
fn enemy_perception(
    mut commands: Commands,
    mut enemies: Query<
        (
            Entity,
            &GlobalTransform,
            &EnemyConfig,
            &mut EnemyState,
            &mut CombatTarget,
        ),
        With<Enemy>,
    >,
    players: Query<(Entity, &GlobalTransform, &Health), With<Player>>,
) {
    let player = players
        .iter()
        .find(|(_, _, health)| health.is_alive())
        .map(|(entity, transform, _)| (entity, transform.translation().truncate()));

    for (entity, transform, config, mut state, mut target) in &mut enemies {
        if *state == EnemyState::Dead {
            continue;
        }

        let Some((player_entity, player_pos)) = player else {
            // Nobody left to fight
            if state.is_engaged() {
                *state = EnemyState::Patrolling;
                target.0 = None;
                commands.entity(entity).remove::<HealthBarVisible>();
            }
            continue;
        };
        let distance = transform.translation().truncate().distance(player_pos);

        match *state {
            EnemyState::Patrolling => {
                if distance <= config.sight_radius {
                    *state = EnemyState::Chasing;
                    target.0 = Some(player_entity);
                    commands
                        .entity(entity)
                        .remove::<PatrolWait>()
                        .insert(HealthBarVisible);
                    debug!("{entity} spotted the player");
                }
            }
            EnemyState::Chasing | EnemyState::Attacking => {
                if distance > config.lose_interest_radius {
                    *state = EnemyState::Patrolling;
                    target.0 = None;
                    commands.entity(entity).remove::<HealthBarVisible>();
                    debug!("{entity} lost interest");
                } else if distance <= config.attack_radius {
                    *state = EnemyState::Attacking;
                } else {
                    *state = EnemyState::Chasing;
                }
            }
            EnemyState::Dead => unreachable!(),
        }
    }
}

/// Walks patrolling enemies between their waypoints, pausing a random while
/// at each. Runs in `GameSet::Ai` after perception.
fn enemy_patrol(
    time: Res<Time>,
    mut commands: Commands,
    mut enemies: Query<
        (
            Entity,
            &GlobalTransform,
            &EnemyConfig,
            &EnemyState,
            &mut PatrolRoute,
            &mut LinearVelocity,
            &mut Facing,
            Option<&mut PatrolWait>,
        ),
        With<Enemy>,
    >,
    waypoints: Query<&GlobalTransform, Without<Enemy>>,
) {
    for (entity, transform, config, state, mut route, mut velocity, mut facing, wait) in
        &mut enemies
    {
        if *state != EnemyState::Patrolling {
            continue;
        }

        if let Some(mut wait) = wait {
            velocity.0 = Vec2::ZERO;
            wait.0.tick(time.delta());
            if wait.0.just_finished() {
                commands.entity(entity).remove::<PatrolWait>();
                route.advance();
            }
            continue;
        }

        let waypoint_pos = route
            .current_waypoint()
            .and_then(|waypoint| waypoints.get(waypoint).ok())
            .map(|waypoint| waypoint.translation().truncate());
        let Some(waypoint_pos) = waypoint_pos else {
            velocity.0 = Vec2::ZERO;
            continue;
        };

        let to_waypoint = waypoint_pos - transform.translation().truncate();
        if to_waypoint.length() <= config.acceptance_radius {
            velocity.0 = Vec2::ZERO;
            let wait_secs = rand::rng()
                .random_range(config.patrol_wait_min_secs..=config.patrol_wait_max_secs);
            commands
                .entity(entity)
                .insert(PatrolWait(Timer::from_seconds(wait_secs, TimerMode::Once)));
        } else {
            let direction = to_waypoint.normalize_or_zero();
            velocity.0 = direction * config.patrol_speed;
            facing.0 = direction;
        }
    }
}

/// Moves chasing enemies toward their target and holds attacking enemies in
/// place, facing it. Runs in `GameSet::Ai` after perception.
fn enemy_chase(
    mut enemies: Query<
        (
            &GlobalTransform,
            &EnemyConfig,
            &EnemyState,
            &CombatTarget,
            &mut LinearVelocity,
            &mut Facing,
        ),
        With<Enemy>,
    >,
    targets: Query<&GlobalTransform, Without<Enemy>>,
) {
    for (transform, config, state, target, mut velocity, mut facing) in &mut enemies {
        if !state.is_engaged() {
            continue;
        }
        let target_pos = target
            .0
            .and_then(|target| targets.get(target).ok())
            .map(|target| target.translation().truncate());
        let Some(target_pos) = target_pos else {
            velocity.0 = Vec2::ZERO;
            continue;
        };

        let to_target = target_pos - transform.translation().truncate();
        let direction = to_target.normalize_or_zero();
        if direction != Vec2::ZERO {
            facing.0 = direction;
        }
        velocity.0 = match *state {
            EnemyState::Chasing => direction * config.chase_speed,
            _ => Vec2::ZERO,
        };
    }
}

/// Starts a swing for attacking enemies that aren't mid-swing or cooling
/// down. Runs in `GameSet::Ai` after perception.
fn enemy_start_attacks(
    mut commands: Commands,
    enemies: Query<
        (Entity, &EnemyState, &EquippedWeapon),
        (With<Enemy>, Without<Swing>, Without<AttackCooldown>),
    >,
    weapons: Query<&Weapon>,
) {
    for (entity, state, carried) in &enemies {
        if *state != EnemyState::Attacking {
            continue;
        }
        let Some(weapon) = carried.0 else {
            continue;
        };
        let Ok(weapon_data) = weapons.get(weapon) else {
            continue;
        };
        commands.entity(entity).insert(Swing::begin(weapon_data.handedness));
    }
}

/// Puts a random pause after each finished enemy swing.
fn start_attack_cooldowns(
    mut finished: MessageReader<SwingFinished>,
    enemies: Query<(), With<Enemy>>,
    mut commands: Commands,
) {
    for message in finished.read() {
        if enemies.get(message.attacker).is_ok() {
            let secs = rand::rng().random_range(ATTACK_WAIT_MIN_SECS..=ATTACK_WAIT_MAX_SECS);
            commands
                .entity(message.attacker)
                .insert(AttackCooldown(Timer::from_seconds(secs, TimerMode::Once)));
        }
    }
}

fn tick_attack_cooldowns(
    time: Res<Time>,
    mut commands: Commands,
    mut cooldowns: Query<(Entity, &mut AttackCooldown)>,
) {
    for (entity, mut cooldown) in &mut cooldowns {
        cooldown.0.tick(time.delta());
        if cooldown.0.just_finished() {
            commands.entity(entity).remove::<AttackCooldown>();
        }
    }
}

/// Taking damage drags the enemy into combat with whoever hit it, no matter
/// what it was doing. Runs in `GameSet::Death`, after damage has landed.
fn enemy_damage_interrupt(
    mut damage: MessageReader<Damage>,
    mut commands: Commands,
    mut enemies: Query<(&Health, &mut EnemyState, &mut CombatTarget), With<Enemy>>,
) {
    for message in damage.read() {
        let Ok((health, mut state, mut target)) = enemies.get_mut(message.target) else {
            continue;
        };
        if *state == EnemyState::Dead || !health.is_alive() {
            continue;
        }
        target.0 = Some(message.instigator);
        *state = EnemyState::Chasing;
        commands
            .entity(message.target)
            .remove::<PatrolWait>()
            .insert(HealthBarVisible);
    }
}

/// Turns dead enemies into corpses: behavior stops, collision goes away, the
/// health bar hides, and a random death pose persists until the lifespan
/// removes the body. Runs in `GameSet::Death`.
fn enemy_death(
    mut commands: Commands,
    mut enemies: Query<
        (Entity, &Health, &mut EnemyState, &mut LinearVelocity),
        With<Enemy>,
    >,
) {
    for (entity, health, mut state, mut velocity) in &mut enemies {
        if health.is_alive() || *state == EnemyState::Dead {
            continue;
        }
        *state = EnemyState::Dead;
        velocity.0 = Vec2::ZERO;
        commands
            .entity(entity)
            .remove::<(Swing, PatrolWait, AttackCooldown, HealthBarVisible)>()
            .insert((
                ColliderDisabled,
                RigidBodyDisabled,
                Lifespan::new(CORPSE_SECS),
                DeathPose::roll(),
            ));
        info!("{entity} died");
    }
}

/// Despawns entities whose lifespan ran out. Runs in `GameSet::Death`.
fn tick_lifespans(
    time: Res<Time>,
    mut commands: Commands,
    mut lifespans: Query<(Entity, &mut Lifespan)>,
) {
    for (entity, mut lifespan) in &mut lifespans {
        lifespan.0.tick(time.delta());
        if lifespan.0.just_finished() {
            commands.entity(entity).despawn();
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Enemy>()
        .register_type::<EnemyState>()
        .register_type::<EnemyConfig>()
        .register_type::<PatrolRoute>()
        .register_type::<PatrolWait>()
        .register_type::<AttackCooldown>()
        .register_type::<Lifespan>()
        .register_type::<DeathPose>();

    app.add_systems(
        Update,
        (
            enemy_perception,
            enemy_patrol,
            enemy_chase,
            enemy_start_attacks,
            tick_attack_cooldowns,
        )
            .chain()
            .in_set(GameSet::Ai)
            .run_if(gameplay_running),
    );

    app.add_systems(
        Update,
        (
            enemy_damage_interrupt,
            start_attack_cooldowns,
            enemy_death,
            tick_lifespans,
        )
            .chain()
            .in_set(GameSet::Death)
            .run_if(gameplay_running),
    );
}

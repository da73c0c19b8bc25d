//! Combat: swings, weapon hit resolution, damage, hit reactions, and health
//! bars.
//!
//! The strike pipeline is a strict chain inside `GameSet::Combat`: swings
//! tick and arm blades, armed blades resolve overlaps into `Damage` and
//! `Hit` messages, damage lands, reactions start. Everything a single strike
//! causes happens in the same frame, in that order.

mod damage;
mod direction;
mod health_bar;
mod swing;
mod weapon;

pub use damage::{Damage, Hit, HitReact};
pub use direction::{hit_direction, HitDirection};
pub use health_bar::{HealthBarConfig, HealthBarVisible};
pub use swing::{Swing, SwingFinished, SwingPhase};
pub use weapon::{
    equip_weapon, spawn_weapon_pickup, Handedness, HitboxArmed, Sheathed, Weapon,
};

use bevy::prelude::*;

use crate::{GameSet, gameplay_running};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Weapon>()
        .register_type::<HitboxArmed>()
        .register_type::<Sheathed>()
        .register_type::<Swing>()
        .register_type::<HitReact>();

    app.add_message::<Damage>();
    app.add_message::<Hit>();
    app.add_message::<SwingFinished>();

    app.add_plugins(health_bar::plugin);

    app.add_systems(
        Update,
        weapon::position_carried_weapons
            .in_set(GameSet::Movement)
            .run_if(gameplay_running),
    );

    // Strike pipeline: one strike's swing edge, overlap resolution, damage,
    // and reaction all land within one frame.
    app.add_systems(
        Update,
        (
            swing::tick_swings,
            weapon::resolve_weapon_hits,
            damage::apply_damage,
            damage::start_hit_reactions,
            damage::tick_hit_reactions,
        )
            .chain()
            .in_set(GameSet::Combat)
            .run_if(gameplay_running),
    );
}

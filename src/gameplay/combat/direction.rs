//! Hit-direction classification: which way an impact came from, relative to
//! the victim's facing. Selects a reaction animation section only, no
//! gameplay state changes.

use bevy::prelude::*;

/// Directional bucket for an incoming hit, relative to the victim's forward
/// vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum HitDirection {
    Front,
    Back,
    Left,
    Right,
}

impl HitDirection {
    /// Reaction animation section for this direction.
    #[must_use]
    pub const fn reaction_section(self) -> &'static str {
        match self {
            Self::Front => "from_front",
            Self::Back => "from_back",
            Self::Left => "from_left",
            Self::Right => "from_right",
        }
    }
}

/// Classify the direction an impact came from.
///
/// `forward` is the victim's facing on the ground plane, `origin` the victim's
/// position, `impact` the world-space impact point. Impact points come from 2D
/// physics and are already planar, so no vertical flattening is needed.
///
/// The signed angle between `forward` and the impact direction is bucketed
/// into quadrants with half-open bounds: `[-45°, 45°)` is Front, `[-135°,
/// -45°)` Left, `[45°, 135°)` Right, everything else Back. An impact at
/// exactly 45° is therefore Right, not Front.
///
/// Returns `None` when the impact coincides with the victim's position (or
/// the forward vector is degenerate): normalizing a zero-length vector would
/// poison the angle with NaN, so the caller skips the reaction instead.
#[must_use]
pub fn hit_direction(forward: Vec2, origin: Vec2, impact: Vec2) -> Option<HitDirection> {
    let to_hit = (impact - origin).try_normalize()?;
    let forward = forward.try_normalize()?;

    // forward · to_hit = cos(theta) for unit vectors
    let cos_theta = forward.dot(to_hit).clamp(-1.0, 1.0);
    let mut theta = cos_theta.acos().to_degrees();

    // perp_dot is the z component of the 3D cross product on a z-up plane;
    // negative means the impact is on the left side
    if forward.perp_dot(to_hit) < 0.0 {
        theta = -theta;
    }

    Some(if (-45.0..45.0).contains(&theta) {
        HitDirection::Front
    } else if (-135.0..-45.0).contains(&theta) {
        HitDirection::Left
    } else if (45.0..135.0).contains(&theta) {
        HitDirection::Right
    } else {
        HitDirection::Back
    })
}

//! Ball motion and boundary collision
//!
//! One call to [`advance`] moves a ball by a single frame: explicit Euler
//! integration, gravity, then a check against the ring wall. Inside the
//! opening a ball that gets far enough past the wall escapes; everywhere else
//! it is reflected and pulled back inside.

use glam::Vec2;

use super::state::{Ball, Boundary};
use crate::consts::{ESCAPE_MARGIN, WALL_INSET};
use crate::{cartesian_to_polar, polar_to_cartesian};

/// What happened to a ball during one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallEvent {
    /// Free flight, no wall contact
    None,
    /// Reflected off the solid wall (or off the opening before clearing the margin)
    Bounce,
    /// Left the ring through the opening; the ball should be discarded
    Escape,
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Advance a ball by one step inside the boundary
///
/// Order matters: the trail records the pre-move position, the position is
/// integrated with the old velocity, and gravity is applied afterwards.
pub fn advance(ball: &mut Ball, boundary: &Boundary, gravity: f32) -> BallEvent {
    ball.record_trail();

    ball.pos += ball.vel;
    ball.vel.y += gravity;

    let offset = ball.pos - boundary.center;
    let (dist, theta) = cartesian_to_polar(offset);
    let limit = boundary.inner_limit(ball.radius);

    if dist <= limit {
        return BallEvent::None;
    }

    if boundary.opening.contains_angle(theta) && dist > limit + ESCAPE_MARGIN {
        return BallEvent::Escape;
    }

    // Degenerate only if the wall itself has collapsed onto the center
    let Some(normal) = offset.try_normalize() else {
        return BallEvent::None;
    };

    ball.vel = reflect_velocity(ball.vel, normal);
    ball.pos = boundary.center + polar_to_cartesian(limit - WALL_INSET, theta);
    BallEvent::Bounce
}

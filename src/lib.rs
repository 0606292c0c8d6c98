//! Escape Ring - balls bouncing inside a ring with a gap
//!
//! Core modules:
//! - `sim`: Simulation (motion, boundary collision, population control)
//! - `renderer`: WebGPU rendering of the simulation state
//! - `settings`: Persisted user preferences
//! - `audio`: Web Audio bounce cue (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;

/// Simulation configuration constants
///
/// Units are canvas pixels and frames: velocities are pixels/frame,
/// gravity is pixels/frame².
pub mod consts {
    use std::f32::consts::{PI, TAU};

    /// Downward acceleration added to vy every step
    pub const GRAVITY: f32 = 0.07;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 18.0;
    /// Positions remembered per ball for the glow trail
    pub const TRAIL_LENGTH: usize = 8;

    /// How far past the wall a ball must travel inside the opening to escape
    pub const ESCAPE_MARGIN: f32 = 2.0;
    /// Distance inside the wall a bounced ball is placed at
    pub const WALL_INSET: f32 = 2.0;

    /// Population cap, enforced at spawn time
    pub const MAX_BALLS: usize = 96;
    /// Replacement balls requested per escape
    pub const SPAWNS_PER_ESCAPE: usize = 2;
    /// Spawn speed range (pixels/frame), upper bound exclusive
    pub const SPAWN_SPEED_MIN: f32 = 2.0;
    pub const SPAWN_SPEED_MAX: f32 = 6.0;
    /// Speed of the seed ball placed on restart
    pub const RESTART_SPEED: f32 = 6.0;

    /// Boundary radius as a fraction of the smaller canvas side
    pub const BOUNDARY_RADIUS_FRACTION: f32 = 0.38;
    /// Opening start angle (radians, screen coordinates)
    pub const OPENING_START: f32 = -PI / 6.0;
    /// Opening angular width: 1/20 of the circle
    pub const OPENING_WIDTH: f32 = TAU / 20.0;

    /// Canvas side as a fraction of the smaller window side
    pub const CANVAS_WINDOW_FRACTION: f32 = 0.96;
    /// Largest canvas side in pixels
    pub const MAX_CANVAS_SIDE: f32 = 800.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

/// Square canvas side for a window of the given size
pub fn canvas_side_for_window(window_width: f32, window_height: f32) -> f32 {
    let side = window_width.min(window_height) * consts::CANVAS_WINDOW_FRACTION;
    side.min(consts::MAX_CANVAS_SIDE)
}

/// Canvas side in whole pixels; the boundary must be built from this, not the fractional side
pub fn canvas_px_for_window(window_width: f32, window_height: f32) -> u32 {
    canvas_side_for_window(window_width, window_height) as u32
}

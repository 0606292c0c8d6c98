//! Angular interval geometry for the boundary opening
//!
//! The opening is the gap in the ring wall. In polar coordinates around the
//! boundary center it is defined by:
//! - theta_start: first angle of the gap
//! - width: angular extent, in the direction of increasing atan2 angle
//!
//! Both edges are excluded: a ball exactly on an edge angle hits the wall.

use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

use crate::normalize_angle;

/// The gap in the boundary wall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Opening {
    /// Start angle (radians, normalized to [-π, π))
    pub theta_start: f32,
    /// Angular width (radians, in (0, 2π))
    pub width: f32,
}

impl Opening {
    pub fn new(theta_start: f32, width: f32) -> Self {
        Self {
            theta_start: normalize_angle(theta_start),
            width: width.clamp(0.0, TAU),
        }
    }

    /// End angle, not normalized (may exceed π when the gap straddles ±π)
    #[inline]
    pub fn theta_end(&self) -> f32 {
        self.theta_start + self.width
    }

    /// Check if an atan2 angle lies strictly inside the opening
    pub fn contains_angle(&self, theta: f32) -> bool {
        let start = self.theta_start;
        let end = self.theta_end();

        if end <= PI {
            // No wraparound
            theta > start && theta < end
        } else {
            // Wraparound case (e.g., start=170°, end=190° → -170°)
            theta > start || theta < end - TAU
        }
    }

    /// Angular extent of the solid wall (everything but the opening)
    #[inline]
    pub fn wall_span(&self) -> f32 {
        TAU - self.width
    }

    /// Angle the solid wall starts at (the opening's end, walking toward increasing angles)
    #[inline]
    pub fn wall_start(&self) -> f32 {
        self.theta_end()
    }
}

//! Simulation state and core types
//!
//! Everything one frame step reads or writes lives here: the boundary, the
//! live balls and the RNG that drives spawns.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::arc::Opening;
use crate::consts::*;
use crate::polar_to_cartesian;

/// Fixed neon palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BallColor {
    #[default]
    Cyan,
    Lime,
    Magenta,
    Mint,
    Rose,
    Azure,
    Gold,
}

impl BallColor {
    pub const PALETTE: [BallColor; 7] = [
        BallColor::Cyan,
        BallColor::Lime,
        BallColor::Magenta,
        BallColor::Mint,
        BallColor::Rose,
        BallColor::Azure,
        BallColor::Gold,
    ];

    /// Linear RGBA for the renderer
    pub fn rgba(&self, alpha: f32) -> [f32; 4] {
        let [r, g, b] = match self {
            BallColor::Cyan => [0x00, 0xff, 0xf5],
            BallColor::Lime => [0xe5, 0xff, 0x00],
            BallColor::Magenta => [0xff, 0x00, 0xd4],
            BallColor::Mint => [0x00, 0xff, 0x9d],
            BallColor::Rose => [0xff, 0x33, 0x66],
            BallColor::Azure => [0x00, 0xaa, 0xff],
            BallColor::Gold => [0xff, 0xe1, 0x00],
        };
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, alpha]
    }

    /// Uniform pick from the palette
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::PALETTE[rng.random_range(0..Self::PALETTE.len())]
    }
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: BallColor,
    /// Recent positions for rendering (oldest first)
    #[serde(skip)]
    pub trail: VecDeque<Vec2>,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, color: BallColor) -> Self {
        Self {
            pos,
            vel,
            radius: BALL_RADIUS,
            color,
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    /// Record current position to trail (call once per step, before moving)
    pub fn record_trail(&mut self) {
        self.trail.push_back(self.pos);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
    }
}

/// The circular wall with its opening
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub center: Vec2,
    pub radius: f32,
    pub opening: Opening,
}

impl Boundary {
    pub fn new(center: Vec2, radius: f32, opening: Opening) -> Self {
        Self {
            center,
            radius,
            opening,
        }
    }

    /// Boundary for a rendering surface of the given size
    pub fn from_viewport(width: f32, height: f32) -> Self {
        Self {
            center: Vec2::new(width / 2.0, height / 2.0),
            radius: width.min(height) * BOUNDARY_RADIUS_FRACTION,
            opening: Opening::new(OPENING_START, OPENING_WIDTH),
        }
    }

    /// Largest center distance a ball of `ball_radius` may sit at without touching the wall
    #[inline]
    pub fn inner_limit(&self, ball_radius: f32) -> f32 {
        self.radius - ball_radius
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimState {
    pub boundary: Boundary,
    /// Live balls in insertion order
    pub balls: Vec<Ball>,
    /// Seed the RNG was created from
    pub seed: u64,
    rng: Pcg32,
}

impl SimState {
    /// Create a session seeded with one ball at the center
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        let mut state = Self::empty(seed, Boundary::from_viewport(width, height));
        state.reseed();
        state
    }

    /// Create a state with no balls (for hosts that place their own)
    pub fn empty(seed: u64, boundary: Boundary) -> Self {
        Self {
            boundary,
            balls: Vec::new(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Clear all balls and place the single seed ball at the center
    pub fn reseed(&mut self) {
        self.balls.clear();
        let angle = self.rng.random::<f32>() * TAU;
        let vel = polar_to_cartesian(RESTART_SPEED, angle);
        self.balls
            .push(Ball::new(self.boundary.center, vel, BallColor::Cyan));
    }

    /// Random point inside the ring, at least two ball radii from the center
    pub fn random_spawn_point(&mut self) -> Vec2 {
        let angle = self.rng.random::<f32>() * TAU;
        let min_r = BALL_RADIUS * 2.0;
        let rr = self.rng.random::<f32>() * (self.boundary.radius - min_r).max(0.0);
        self.boundary.center + polar_to_cartesian(rr + min_r, angle)
    }

    /// Append one ball with random position, speed, heading and color
    pub fn spawn_ball(&mut self) {
        let pos = self.random_spawn_point();
        let speed = self.rng.random_range(SPAWN_SPEED_MIN..SPAWN_SPEED_MAX);
        let heading = self.rng.random::<f32>() * TAU;
        let color = BallColor::random(&mut self.rng);
        self.balls
            .push(Ball::new(pos, polar_to_cartesian(speed, heading), color));
    }

    /// Recompute boundary geometry for a new surface size
    ///
    /// Ball positions are left as they are; balls outside the new wall get
    /// pulled back in by their next collision check.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.boundary = Boundary::from_viewport(width, height);
    }
}

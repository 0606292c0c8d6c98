//! Per-frame scene tessellation
//!
//! Reads the simulation (never writes it) and produces the frame's triangle
//! list in canvas pixels: starfield, neon ring with its gap, ball trails,
//! ball halos, balls and outlines.

use glam::Vec2;
use rand::Rng;

use super::shapes::{arc_band, circle, glow_disc, ring};
use super::vertex::{Vertex, colors};
use crate::settings::Settings;
use crate::sim::SimState;

/// Ring wall stroke width
const WALL_WIDTH: f32 = 11.0;
/// Extra width of the ring's glow band on each side
const WALL_GLOW: f32 = 21.0;
/// Halo radius added around each ball
const BALL_GLOW: f32 = 15.0;
const BALL_SEGMENTS: u32 = 24;
const WALL_SEGMENTS: u32 = 180;

/// Convert canvas pixels (y down) to normalized device coordinates
#[inline]
pub fn canvas_to_ndc(pos: Vec2, size: (u32, u32)) -> Vec2 {
    let (w, h) = size;
    Vec2::new(
        pos.x / w.max(1) as f32 * 2.0 - 1.0,
        1.0 - pos.y / h.max(1) as f32 * 2.0,
    )
}

/// Random faint stars, different every frame
fn starfield(size: (u32, u32), count: u32, rng: &mut impl Rng) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for _ in 0..count {
        let alpha = 0.05 + rng.random::<f32>() * 0.08;
        let pos = Vec2::new(
            rng.random::<f32>() * size.0 as f32,
            rng.random::<f32>() * size.1 as f32,
        );
        let radius = 1.5 + rng.random::<f32>() * 1.7;
        let [r, g, b, _] = colors::STAR;
        vertices.extend(circle(pos, radius, [r, g, b, alpha], 8));
    }
    vertices
}

/// The ring wall, skipping the opening
fn boundary_wall(sim: &SimState, glow: bool) -> Vec<Vertex> {
    let boundary = &sim.boundary;
    let opening = boundary.opening;
    let start = opening.wall_start();
    let span = opening.wall_span();
    let half = WALL_WIDTH / 2.0;
    let mut vertices = Vec::new();

    if glow {
        let [r, g, b, _] = colors::WALL;
        vertices.extend(arc_band(
            boundary.center,
            boundary.radius - half - WALL_GLOW,
            boundary.radius + half + WALL_GLOW,
            start,
            span,
            [r, g, b, 0.12],
            WALL_SEGMENTS,
        ));
    }
    vertices.extend(arc_band(
        boundary.center,
        boundary.radius - half,
        boundary.radius + half,
        start,
        span,
        colors::WALL,
        WALL_SEGMENTS,
    ));
    vertices
}

/// Build all vertices for the current frame (canvas pixel coordinates)
pub fn build_frame(
    sim: &SimState,
    settings: &Settings,
    size: (u32, u32),
    rng: &mut impl Rng,
) -> Vec<Vertex> {
    let mut vertices = starfield(size, settings.effective_star_count(), rng);
    vertices.extend(boundary_wall(sim, settings.glow));

    for ball in &sim.balls {
        if settings.trails {
            for (i, p) in ball.trail.iter().enumerate() {
                let alpha = 0.1 + 0.07 * i as f32;
                let radius = ball.radius + 4.0 + 2.0 * i as f32;
                vertices.extend(glow_disc(*p, radius, ball.color.rgba(alpha), BALL_SEGMENTS));
            }
        }
        if settings.glow {
            vertices.extend(glow_disc(
                ball.pos,
                ball.radius + BALL_GLOW,
                ball.color.rgba(0.6),
                BALL_SEGMENTS,
            ));
        }
        vertices.extend(circle(ball.pos, ball.radius, ball.color.rgba(1.0), BALL_SEGMENTS));
        vertices.extend(ring(
            ball.pos,
            ball.radius,
            ball.radius + 3.0,
            colors::OUTLINE,
            BALL_SEGMENTS,
        ));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BallColor, run_frame_step};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn bare_settings() -> Settings {
        Settings {
            trails: false,
            glow: false,
            starfield: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_canvas_to_ndc_corners() {
        let size = (800, 600);
        assert_eq!(canvas_to_ndc(Vec2::ZERO, size), Vec2::new(-1.0, 1.0));
        assert_eq!(canvas_to_ndc(Vec2::new(800.0, 600.0), size), Vec2::new(1.0, -1.0));
        assert_eq!(canvas_to_ndc(Vec2::new(400.0, 300.0), size), Vec2::ZERO);
    }

    #[test]
    fn test_bare_frame_has_wall_and_ball() {
        let sim = SimState::new(1, 800.0, 800.0);
        let mut rng = Pcg32::seed_from_u64(0);
        let verts = build_frame(&sim, &bare_settings(), (800, 800), &mut rng);

        let wall = (WALL_SEGMENTS * 6) as usize;
        let ball = (BALL_SEGMENTS * 3 + BALL_SEGMENTS * 6) as usize;
        assert_eq!(verts.len(), wall + ball);
    }

    #[test]
    fn test_wall_leaves_opening_empty() {
        let sim = SimState::new(2, 800.0, 800.0);
        let opening = sim.boundary.opening;
        let verts = boundary_wall(&sim, false);

        // Only the two edge angles of the gap may be touched
        let strictly_inside = verts.iter().any(|v| {
            let d = Vec2::from(v.position) - sim.boundary.center;
            let theta = d.y.atan2(d.x);
            let margin = 1e-3;
            theta > opening.theta_start + margin && theta < opening.theta_end() - margin
        });
        assert!(!strictly_inside);
    }

    #[test]
    fn test_trails_and_stars_add_vertices() {
        let mut sim = SimState::new(3, 800.0, 800.0);
        for _ in 0..10 {
            run_frame_step(&mut sim, &mut ());
        }
        let mut rng = Pcg32::seed_from_u64(0);
        let bare = build_frame(&sim, &bare_settings(), (800, 800), &mut rng);
        let full = build_frame(&sim, &Settings::default(), (800, 800), &mut rng);
        assert!(full.len() > bare.len());
    }

    #[test]
    fn test_ball_uses_its_palette_color() {
        let mut sim = SimState::new(4, 800.0, 800.0);
        sim.balls[0].color = BallColor::Magenta;
        let mut rng = Pcg32::seed_from_u64(0);
        let verts = build_frame(&sim, &bare_settings(), (800, 800), &mut rng);
        let expected = BallColor::Magenta.rgba(1.0);
        assert!(verts.iter().any(|v| v.color == expected));
    }
}

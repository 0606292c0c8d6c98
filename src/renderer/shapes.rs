//! Shape generation for 2D primitives
//!
//! All shapes are emitted as plain triangle lists in canvas pixels.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Filled circle whose alpha falls to zero at the rim (cheap glow)
pub fn glow_disc(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let rim = [color[0], color[1], color[2], 0.0];
    circle(center, radius, color, segments)
        .into_iter()
        .enumerate()
        .map(|(i, v)| if i % 3 == 0 { v } else { Vertex::new(v.position[0], v.position[1], rim) })
        .collect()
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    arc_band(center, inner_radius, outer_radius, 0.0, 2.0 * PI, color, segments)
}

/// Generate vertices for a thick arc band
///
/// Covers angles `theta_start .. theta_start + span` between the two radii.
pub fn arc_band(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    theta_start: f32,
    span: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(1);
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = theta_start + (i as f32 / segments as f32) * span;
        let theta2 = theta_start + ((i + 1) as f32 / segments as f32) * span;

        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());
        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_vertex_count() {
        let verts = circle(Vec2::ZERO, 10.0, [1.0; 4], 16);
        assert_eq!(verts.len(), 48);
        for v in &verts {
            let p = Vec2::from(v.position);
            assert!(p.length() <= 10.0 + 1e-4);
        }
    }

    #[test]
    fn test_glow_disc_fades_to_rim() {
        let verts = glow_disc(Vec2::new(5.0, 5.0), 4.0, [1.0, 0.0, 0.0, 0.5], 8);
        assert_eq!(verts[0].color[3], 0.5);
        assert_eq!(verts[1].color[3], 0.0);
        assert_eq!(verts[2].color[3], 0.0);
    }

    #[test]
    fn test_arc_band_stays_between_radii() {
        let center = Vec2::new(100.0, 100.0);
        let verts = arc_band(center, 50.0, 60.0, 0.0, PI, [1.0; 4], 12);
        assert_eq!(verts.len(), 72);
        for v in &verts {
            let d = (Vec2::from(v.position) - center).length();
            assert!(d >= 50.0 - 1e-3 && d <= 60.0 + 1e-3);
            // sin >= 0 over 0..π
            assert!(v.position[1] >= center.y - 1e-3);
        }
    }

    #[test]
    fn test_ring_is_full_band() {
        assert_eq!(ring(Vec2::ZERO, 1.0, 2.0, [1.0; 4], 20).len(), 120);
    }
}

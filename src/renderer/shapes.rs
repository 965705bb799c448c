//! Triangle-list tessellation for the primitives the show draws

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Filled circle as a fan of `segments` triangles
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    let segments = segments.max(3);
    out.reserve((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        out.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }
}

/// Straight stroke of uniform `width` as one quad
///
/// Zero-length segments produce nothing.
pub fn segment(out: &mut Vec<Vertex>, from: Vec2, to: Vec2, width: f32, color: [f32; 4]) {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);

    let a1 = from + perp;
    let b1 = from - perp;
    let a2 = to + perp;
    let b2 = to - perp;

    out.push(Vertex::new(a1.x, a1.y, color));
    out.push(Vertex::new(b1.x, b1.y, color));
    out.push(Vertex::new(a2.x, a2.y, color));

    out.push(Vertex::new(a2.x, a2.y, color));
    out.push(Vertex::new(b1.x, b1.y, color));
    out.push(Vertex::new(b2.x, b2.y, color));
}

/// Axis-aligned rectangle from `min` to `max`
pub fn rect(out: &mut Vec<Vertex>, min: Vec2, max: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(min.x, min.y, color));
    out.push(Vertex::new(max.x, min.y, color));
    out.push(Vertex::new(min.x, max.y, color));

    out.push(Vertex::new(min.x, max.y, color));
    out.push(Vertex::new(max.x, min.y, color));
    out.push(Vertex::new(max.x, max.y, color));
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn test_circle_stays_within_radius() {
        let mut out = Vec::new();
        let center = Vec2::new(50.0, 50.0);
        circle(&mut out, center, 3.0, WHITE, 10);
        assert_eq!(out.len(), 30);
        for v in &out {
            let p = Vec2::from(v.position);
            assert!(p.distance(center) <= 3.0 + 1e-4);
        }
    }

    #[test]
    fn test_circle_minimum_segments() {
        let mut out = Vec::new();
        circle(&mut out, Vec2::ZERO, 1.0, WHITE, 0);
        assert_eq!(out.len(), 9);
    }

    #[test]
    fn test_segment_width() {
        let mut out = Vec::new();
        segment(&mut out, Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), 2.0, WHITE);
        assert_eq!(out.len(), 6);
        for v in &out {
            assert!((v.position[1].abs() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_degenerate_segment_is_skipped() {
        let mut out = Vec::new();
        segment(&mut out, Vec2::ONE, Vec2::ONE, 2.0, WHITE);
        assert!(out.is_empty());
    }

    #[test]
    fn test_rect_covers_corners() {
        let mut out = Vec::new();
        rect(&mut out, Vec2::ZERO, Vec2::new(4.0, 2.0), WHITE);
        assert_eq!(out.len(), 6);
        assert!(out.iter().any(|v| v.position == [4.0, 2.0]));
        assert!(out.iter().any(|v| v.position == [0.0, 0.0]));
    }
}

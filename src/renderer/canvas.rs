//! Drawing surface abstraction
//!
//! The scene is described with a handful of immediate-mode calls in pixel
//! coordinates. [`VertexCanvas`] turns them into triangles for the GPU
//! pipeline; tests use a recording canvas instead.

use glam::Vec2;

use super::shapes;
use super::vertex::Vertex;
use crate::palette::Rgb;
use crate::sim::Viewport;

pub trait Canvas {
    fn viewport(&self) -> Viewport;

    /// Paint `color` over the whole surface at `alpha`, dimming what was
    /// drawn on earlier frames
    fn fade(&mut self, color: Rgb, alpha: f32);

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: [f32; 4]);

    fn disc(&mut self, center: Vec2, radius: f32, color: [f32; 4]);
}

/// Canvas that accumulates a triangle list for one frame
#[derive(Debug, Clone)]
pub struct VertexCanvas {
    viewport: Viewport,
    circle_segments: u32,
    vertices: Vec<Vertex>,
}

impl VertexCanvas {
    pub fn new(viewport: Viewport, circle_segments: u32) -> Self {
        Self {
            viewport,
            circle_segments,
            vertices: Vec::new(),
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn set_circle_segments(&mut self, segments: u32) {
        self.circle_segments = segments;
    }

    /// Start a new frame, keeping the allocation
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }
}

impl Canvas for VertexCanvas {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn fade(&mut self, color: Rgb, alpha: f32) {
        let max = Vec2::new(self.viewport.width, self.viewport.height);
        shapes::rect(&mut self.vertices, Vec2::ZERO, max, color.with_alpha(alpha));
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: [f32; 4]) {
        shapes::segment(&mut self.vertices, from, to, width, color);
    }

    fn disc(&mut self, center: Vec2, radius: f32, color: [f32; 4]) {
        shapes::circle(
            &mut self.vertices,
            center,
            radius,
            color,
            self.circle_segments,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_accumulates_and_clears() {
        let mut canvas = VertexCanvas::new(Viewport::new(100.0, 50.0), 8);
        canvas.fade(Rgb(13, 13, 26), 0.15);
        canvas.line(Vec2::ZERO, Vec2::new(10.0, 10.0), 2.0, [1.0; 4]);
        canvas.disc(Vec2::new(5.0, 5.0), 3.0, [1.0; 4]);
        assert_eq!(canvas.vertices().len(), 6 + 6 + 24);

        let fade = canvas.vertices()[0].color;
        assert!((fade[3] - 0.15).abs() < 1e-6);
        assert!((fade[2] - 26.0 / 255.0).abs() < 1e-6);

        canvas.clear();
        assert!(canvas.vertices().is_empty());
    }

    #[test]
    fn test_circle_segments_follow_quality() {
        let mut canvas = VertexCanvas::new(Viewport::new(100.0, 50.0), 16);
        canvas.disc(Vec2::new(5.0, 5.0), 3.0, [1.0; 4]);
        assert_eq!(canvas.vertices().len(), 16 * 3);

        canvas.clear();
        canvas.set_circle_segments(6);
        canvas.disc(Vec2::new(5.0, 5.0), 3.0, [1.0; 4]);
        assert_eq!(canvas.vertices().len(), 6 * 3);
    }

    #[test]
    fn test_fade_spans_viewport() {
        let mut canvas = VertexCanvas::new(Viewport::new(100.0, 50.0), 8);
        canvas.set_viewport(Viewport::new(200.0, 80.0));
        canvas.fade(Rgb(0, 0, 0), 1.0);
        assert!(canvas.vertices().iter().any(|v| v.position == [200.0, 80.0]));
    }
}

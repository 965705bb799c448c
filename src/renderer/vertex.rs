//! Vertex type for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::sim::Viewport;

/// 2D vertex with position and straight (non-premultiplied) color
///
/// Shapes are built in surface pixels (origin top-left, y down) and moved
/// to clip space with [`Vertex::to_ndc`] just before upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Pixel position to normalized device coordinates
    pub fn to_ndc(self, viewport: Viewport) -> Self {
        let [x, y] = self.position;
        Self::new(
            x / viewport.width * 2.0 - 1.0,
            1.0 - y / viewport.height * 2.0,
            self.color,
        )
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ndc_corners() {
        let view = Viewport::new(800.0, 600.0);
        let c = [1.0; 4];
        assert_eq!(Vertex::new(0.0, 0.0, c).to_ndc(view).position, [-1.0, 1.0]);
        assert_eq!(Vertex::new(800.0, 600.0, c).to_ndc(view).position, [1.0, -1.0]);
        assert_eq!(Vertex::new(400.0, 300.0, c).to_ndc(view).position, [0.0, 0.0]);
    }

    #[test]
    fn test_layout_matches_struct() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        assert_eq!(Vertex::desc().array_stride, 24);
    }
}

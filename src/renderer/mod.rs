//! Rendering
//!
//! The scene is drawn through the [`Canvas`] trait in pixel coordinates.
//! [`VertexCanvas`] tessellates it into triangles, and [`RenderState`]
//! accumulates those triangles frame over frame on the GPU.

pub mod canvas;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use canvas::{Canvas, VertexCanvas};
pub use pipeline::RenderState;
pub use scene::draw_show;
pub use vertex::Vertex;

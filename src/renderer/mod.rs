//! WebGPU rendering module
//!
//! The scene is tessellated on the CPU in canvas pixels every frame and
//! drawn as one alpha-blended triangle list.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{build_frame, canvas_to_ndc};
pub use vertex::Vertex;

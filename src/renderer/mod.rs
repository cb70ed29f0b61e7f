//! WebGPU rendering module
//!
//! The scene is built on the CPU as a field-space triangle list and drawn
//! with a single flat-colour pipeline per canvas.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{SceneOptions, build_frame};
pub use vertex::Vertex;

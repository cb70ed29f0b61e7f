//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
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

/// Colors for road furniture and car details
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.02, 1.0];
    pub const ROAD: [f32; 4] = [0.102, 0.102, 0.102, 1.0];
    pub const LANE_MARK: [f32; 4] = [0.2, 0.2, 0.2, 1.0];
    pub const SPEED_LINE: [f32; 4] = [1.0, 1.0, 1.0, 0.1];
    pub const TIRE: [f32; 4] = [0.067, 0.067, 0.067, 1.0];
    pub const HEADLIGHT: [f32; 4] = [1.0, 1.0, 0.8, 1.0];
    pub const TAIL_LIGHT: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const STRIPE: [f32; 4] = [0.0, 0.0, 0.0, 0.2];
    pub const TRAFFIC_CABIN: [f32; 4] = [0.133, 0.0, 0.0, 1.0];
    pub const TRAFFIC_WINDOW: [f32; 4] = [0.267, 0.0, 0.0, 1.0];
    pub const CRASH_SHADE: [f32; 4] = [0.0, 0.0, 0.0, 0.7];
    pub const CRASH_BANNER: [f32; 4] = [1.0, 0.0, 0.0, 0.85];

    /// Darken a colour, keeping alpha
    pub fn shade(color: [f32; 4], factor: f32) -> [f32; 4] {
        [color[0] * factor, color[1] * factor, color[2] * factor, color[3]]
    }

    pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
        [color[0], color[1], color[2], color[3] * alpha]
    }
}

//! Vertex types shared by the pipelines

use bytemuck::{Pod, Zeroable};

/// 2D vertex with position and color (shapes and the triangle lesson)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

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
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Vertex with texture coordinates and a tint (quads and glyphs)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl TexturedVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];

    pub const fn new(position: [f32; 2], uv: [f32; 2], color: [f32; 4]) -> Self {
        Self {
            position,
            uv,
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TexturedVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// 3D vertex with texture coordinates (camera lesson cube)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub const fn new(position: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, uv }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Convert one sRGB channel to linear
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Linear RGBA from 8-bit sRGB components. Alpha stays linear.
pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> [f32; 4] {
    [
        srgb_to_linear(r as f32 / 255.0),
        srgb_to_linear(g as f32 / 255.0),
        srgb_to_linear(b as f32 / 255.0),
        a as f32 / 255.0,
    ]
}

/// Same as `rgba8` for a color already in 0..1 sRGB floats
pub fn srgb(color: [f32; 3]) -> [f32; 4] {
    [
        srgb_to_linear(color[0]),
        srgb_to_linear(color[1]),
        srgb_to_linear(color[2]),
        1.0,
    ]
}

/// Clear color from 0..1 sRGB floats
pub fn srgb_clear(color: [f32; 3]) -> wgpu::Color {
    let [r, g, b, a] = srgb(color);
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: a as f64,
    }
}

/// The classic raylib palette, as sRGB bytes
pub mod colors {
    pub type Rgba8 = [u8; 4];

    pub const RAYWHITE: Rgba8 = [245, 245, 245, 255];
    pub const LIGHTGRAY: Rgba8 = [200, 200, 200, 255];
    pub const GRAY: Rgba8 = [130, 130, 130, 255];
    pub const DARKGRAY: Rgba8 = [80, 80, 80, 255];
    pub const BLACK: Rgba8 = [0, 0, 0, 255];
    pub const MAROON: Rgba8 = [190, 33, 55, 255];
    pub const DARKGREEN: Rgba8 = [0, 117, 44, 255];
    pub const DARKBLUE: Rgba8 = [0, 82, 172, 255];

    /// Linear color for the GPU
    pub fn linear(c: Rgba8) -> [f32; 4] {
        super::rgba8(c[0], c[1], c[2], c[3])
    }

    /// wgpu clear color
    pub fn clear(c: Rgba8) -> wgpu::Color {
        let [r, g, b, a] = linear(c);
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        }
    }
}

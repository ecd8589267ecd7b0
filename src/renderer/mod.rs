//! wgpu rendering
//!
//! A small set of building blocks the lessons assemble:
//! - `gpu`: device, queue and window surface
//! - `shader`, `uniform`, `texture`: resource helpers
//! - `pipeline`, `text`: batched 2D shapes and glyph quads in pixel space
//! - `camera`: projection/view matrices for 2D and 3D

pub mod camera;
pub mod gpu;
pub mod pipeline;
pub mod shader;
pub mod shapes;
pub mod text;
pub mod texture;
pub mod uniform;
pub mod vertex;

pub use camera::OrbitCamera;
pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
pub use pipeline::ShapeRenderer;
pub use shader::{Shader, ShaderError};
pub use shapes::ShapeBatch;
pub use text::TextRenderer;
pub use texture::{Texture, TextureError};
pub use uniform::UniformBuffer;
pub use vertex::{MeshVertex, TexturedVertex, Vertex, colors};

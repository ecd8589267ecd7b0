//! Text drawing from a glyph cache atlas

use glam::{Mat4, Vec2};

use super::pipeline::{VertexStream, blended_target, triangle_list};
use super::shader::{Shader, ShaderError};
use super::texture::Texture;
use super::uniform::UniformBuffer;
use super::vertex::TexturedVertex;
use crate::text::{GlyphCache, GlyphQuad, YAxis};

/// Two triangles covering one glyph
pub fn glyph_vertices(quad: &GlyphQuad, color: [f32; 4]) -> [TexturedVertex; 6] {
    let (tl, br) = (quad.top_left, quad.bottom_right);
    let (uv0, uv1) = (quad.uv_min, quad.uv_max);

    let top_left = TexturedVertex::new([tl.x, tl.y], [uv0.x, uv0.y], color);
    let top_right = TexturedVertex::new([br.x, tl.y], [uv1.x, uv0.y], color);
    let bottom_left = TexturedVertex::new([tl.x, br.y], [uv0.x, uv1.y], color);
    let bottom_right = TexturedVertex::new([br.x, br.y], [uv1.x, uv1.y], color);

    [
        top_left,
        bottom_left,
        bottom_right,
        top_left,
        bottom_right,
        top_right,
    ]
}

/// Batches text for one frame and draws it with the atlas texture
pub struct TextRenderer {
    pipeline: wgpu::RenderPipeline,
    projection: UniformBuffer<Mat4>,
    atlas_bind_group: wgpu::BindGroup,
    vertices: VertexStream,
    pending: Vec<TexturedVertex>,
    axis: YAxis,
}

impl TextRenderer {
    /// Upload the cache's atlas and build the pipeline
    ///
    /// `axis` must match how `projection` maps y.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        cache: &GlyphCache,
        projection: Mat4,
        axis: YAxis,
    ) -> Result<Self, ShaderError> {
        let shader = Shader::from_wgsl(device, "text", include_str!("shaders/text.wgsl"))?;
        let projection = UniformBuffer::new(device, "text_projection", &projection);

        let atlas = cache.atlas();
        let texture = Texture::atlas_r8(device, queue, atlas.width, atlas.height, &atlas.pixels);
        let atlas_layout = Texture::bind_group_layout(device, "glyph_atlas_layout");
        let atlas_bind_group = texture.bind_group(device, &atlas_layout);

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("text_pipeline_layout"),
            bind_group_layouts: &[projection.layout(), &atlas_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("text_pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader.module,
                entry_point: Some("vs_main"),
                buffers: &[TexturedVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader.module,
                entry_point: Some("fs_main"),
                targets: &[blended_target(format)],
                compilation_options: Default::default(),
            }),
            primitive: triangle_list(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            pipeline,
            projection,
            atlas_bind_group,
            vertices: VertexStream::new(device, "text_vertices", 32 * 1024),
            pending: Vec::new(),
            axis,
        })
    }

    /// Queue `text` at `origin` scaled by `scale` (1.0 = the cache's pixel size)
    pub fn queue_text(
        &mut self,
        cache: &GlyphCache,
        text: &str,
        origin: Vec2,
        scale: f32,
        color: [f32; 4],
    ) {
        for quad in cache.layout(text, origin, scale, self.axis) {
            self.pending.extend_from_slice(&glyph_vertices(&quad, color));
        }
    }

    /// Upload queued text; the queue starts empty for the next frame
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        self.vertices.upload(device, queue, &self.pending);
        self.pending.clear();
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.vertices.count() == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, self.projection.bind_group(), &[]);
        pass.set_bind_group(1, &self.atlas_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertices.buffer().slice(..));
        pass.draw(0..self.vertices.count(), 0..1);
    }
}

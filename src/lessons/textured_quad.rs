//! Textured quad lesson: indexed vertices, an image uploaded to a texture,
//! and a sampler. Space toggles the per-vertex color tint.

use anyhow::{Context, Result};
use wgpu::util::DeviceExt;
use winit::keyboard::KeyCode;

use crate::input::KeyboardState;
use crate::platform::{App, AppControl, FrameTime, RuntimeConfig};
use crate::renderer::gpu::{Gpu, GpuFrame};
use crate::renderer::pipeline::{blended_target, clear_pass, triangle_list};
use crate::renderer::vertex::srgb_clear;
use crate::renderer::{Shader, Texture, TexturedVertex};
use crate::settings::Settings;

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Corner colors: top right, bottom right, bottom left, top left
const TINTS: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0, 1.0],
    [0.0, 0.0, 1.0, 1.0],
    [1.0, 1.0, 0.0, 1.0],
];

/// Positions in clip space; v grows downward like the image rows
const CORNERS: [([f32; 2], [f32; 2]); 4] = [
    ([0.5, 0.5], [1.0, 0.0]),
    ([0.5, -0.5], [1.0, 1.0]),
    ([-0.5, -0.5], [0.0, 1.0]),
    ([-0.5, 0.5], [0.0, 0.0]),
];

pub const QUAD_INDICES: [u16; 6] = [0, 1, 3, 1, 2, 3];

pub fn quad_vertices(tinted: bool) -> [TexturedVertex; 4] {
    std::array::from_fn(|i| {
        let (position, uv) = CORNERS[i];
        TexturedVertex::new(position, uv, if tinted { TINTS[i] } else { WHITE })
    })
}

pub struct TexturedQuadLesson {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    texture_bind_group: wgpu::BindGroup,
    tinted: bool,
    dirty: bool,
}

impl TexturedQuadLesson {
    pub fn new(gpu: &Gpu, settings: &Settings) -> Result<Self> {
        let device = gpu.device();
        let shader = Shader::from_wgsl(
            device,
            "textured",
            include_str!("../renderer/shaders/textured.wgsl"),
        )?;

        let texture = Texture::from_path_or_checkerboard(
            device,
            gpu.queue(),
            settings.texture_path.as_deref(),
        )?;
        let texture_layout = Texture::bind_group_layout(device, "quad_texture_layout");
        let texture_bind_group = texture.bind_group(device, &texture_layout);

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quad_pipeline_layout"),
            bind_group_layouts: &[&texture_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quad_pipeline"),
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
                targets: &[blended_target(gpu.surface_format())],
                compilation_options: Default::default(),
            }),
            primitive: triangle_list(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vertices"),
            contents: bytemuck::cast_slice(&quad_vertices(false)),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_indices"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Ok(Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            texture_bind_group,
            tinted: false,
            dirty: false,
        })
    }
}

impl App for TexturedQuadLesson {
    fn update(&mut self, input: &KeyboardState, _time: FrameTime) -> AppControl {
        if input.key_pressed(KeyCode::Space) {
            self.tinted = !self.tinted;
            self.dirty = true;
            log::info!("Tint {}", if self.tinted { "on" } else { "off" });
        }
        AppControl::Continue
    }

    fn render(&mut self, gpu: &Gpu, frame: &mut GpuFrame) {
        if self.dirty {
            gpu.queue().write_buffer(
                &self.vertex_buffer,
                0,
                bytemuck::cast_slice(&quad_vertices(self.tinted)),
            );
            self.dirty = false;
        }

        let mut pass = clear_pass(
            &mut frame.encoder,
            &frame.view,
            "quad_pass",
            srgb_clear([0.2, 0.3, 0.3]),
            None,
        );
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.texture_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }
}

pub fn run(settings: &Settings) -> Result<()> {
    let config = RuntimeConfig::new(
        "LearnOpenGL: textured quad",
        settings.window_width,
        settings.window_height,
    )
    .with_vsync(settings.vsync);
    crate::platform::run(config, |gpu| TexturedQuadLesson::new(gpu, settings))
        .context("textured quad lesson failed")
}

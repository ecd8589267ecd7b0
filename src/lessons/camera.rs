//! Camera lesson: model/view/projection matrices, an orbiting look-at
//! camera, perspective projection and depth testing. Up/Down move the
//! camera closer or further.

use anyhow::{Context, Result};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;
use winit::keyboard::KeyCode;

use crate::input::KeyboardState;
use crate::platform::{App, AppControl, FrameTime, RuntimeConfig};
use crate::renderer::camera::{model_matrix, perspective};
use crate::renderer::gpu::{Gpu, GpuFrame};
use crate::renderer::pipeline::{blended_target, clear_pass, triangle_list};
use crate::renderer::texture::DEPTH_FORMAT;
use crate::renderer::vertex::srgb_clear;
use crate::renderer::{MeshVertex, OrbitCamera, Shader, Texture, UniformBuffer};
use crate::settings::Settings;

pub const CUBE_POSITIONS: [Vec3; 10] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

const FOV_Y_DEG: f32 = 45.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;
/// Orbit radius change per second while Up/Down is held
const ZOOM_SPEED: f32 = 5.0;

/// Unit cube centered on the origin, two triangles per face
pub fn cube_vertices() -> Vec<MeshVertex> {
    // (normal, u axis, v axis)
    let faces = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];
    let corners = [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (0.5, 0.5), (-0.5, 0.5), (-0.5, -0.5)];

    let mut vertices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        for (s, t) in corners {
            let p = normal * 0.5 + u * s + v * t;
            vertices.push(MeshVertex::new(p.to_array(), [s + 0.5, 0.5 - t]));
        }
    }
    vertices
}

/// Per-cube model matrix: each one tilted a little further
pub fn cube_models() -> Vec<Mat4> {
    CUBE_POSITIONS
        .iter()
        .enumerate()
        .map(|(i, &pos)| model_matrix(pos, 20.0 * i as f32, Vec3::new(1.0, 0.3, 0.5)))
        .collect()
}

fn instance_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        2 => Float32x4, 3 => Float32x4, 4 => Float32x4, 5 => Float32x4
    ];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Mat4>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &ATTRIBUTES,
    }
}

pub struct CameraLesson {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_count: u32,
    camera_uniform: UniformBuffer<Mat4>,
    texture_bind_group: wgpu::BindGroup,
    depth: Texture,
    camera: OrbitCamera,
    view: Mat4,
}

impl CameraLesson {
    pub fn new(gpu: &Gpu, settings: &Settings) -> Result<Self> {
        let device = gpu.device();
        let shader = Shader::from_wgsl(
            device,
            "mesh",
            include_str!("../renderer/shaders/mesh.wgsl"),
        )?;

        let camera_uniform = UniformBuffer::new(device, "camera_view_proj", &Mat4::IDENTITY);
        let texture = Texture::from_path_or_checkerboard(
            device,
            gpu.queue(),
            settings.texture_path.as_deref(),
        )?;
        let texture_layout = Texture::bind_group_layout(device, "cube_texture_layout");
        let texture_bind_group = texture.bind_group(device, &texture_layout);

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("cube_pipeline_layout"),
            bind_group_layouts: &[camera_uniform.layout(), &texture_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("cube_pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader.module,
                entry_point: Some("vs_main"),
                buffers: &[MeshVertex::desc(), instance_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader.module,
                entry_point: Some("fs_main"),
                targets: &[blended_target(gpu.surface_format())],
                compilation_options: Default::default(),
            }),
            primitive: triangle_list(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let vertices = cube_vertices();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let models = cube_models();
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_models"),
            contents: bytemuck::cast_slice(&models),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let size = gpu.size();
        Ok(Self {
            pipeline,
            vertex_buffer,
            vertex_count: vertices.len() as u32,
            instance_buffer,
            instance_count: models.len() as u32,
            camera_uniform,
            texture_bind_group,
            depth: Texture::depth(device, size.width, size.height),
            camera: OrbitCamera::default(),
            view: Mat4::IDENTITY,
        })
    }
}

impl App for CameraLesson {
    fn update(&mut self, input: &KeyboardState, time: FrameTime) -> AppControl {
        if input.key_down(KeyCode::ArrowUp) {
            self.camera.zoom(-ZOOM_SPEED * time.dt);
        }
        if input.key_down(KeyCode::ArrowDown) {
            self.camera.zoom(ZOOM_SPEED * time.dt);
        }
        if input.key_pressed(KeyCode::ArrowUp) || input.key_pressed(KeyCode::ArrowDown) {
            log::debug!("Orbit radius {:.1}", self.camera.radius);
        }

        // Projection is applied in render, where the surface size is known
        self.view = self.camera.view(time.elapsed);
        AppControl::Continue
    }

    fn resize(&mut self, gpu: &Gpu) {
        let size = gpu.size();
        self.depth = Texture::depth(gpu.device(), size.width, size.height);
    }

    fn render(&mut self, gpu: &Gpu, frame: &mut GpuFrame) {
        let projection = perspective(FOV_Y_DEG, gpu.aspect(), NEAR, FAR);
        self.camera_uniform.write(gpu.queue(), &(projection * self.view));

        let mut pass = clear_pass(
            &mut frame.encoder,
            &frame.view,
            "cube_pass",
            srgb_clear([0.2, 0.3, 0.3]),
            Some(&self.depth.view),
        );
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, self.camera_uniform.bind_group(), &[]);
        pass.set_bind_group(1, &self.texture_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..self.instance_count);
    }
}

pub fn run(settings: &Settings) -> Result<()> {
    let config = RuntimeConfig::new(
        "LearnOpenGL: camera",
        settings.window_width,
        settings.window_height,
    )
    .with_vsync(settings.vsync);
    crate::platform::run(config, |gpu| CameraLesson::new(gpu, settings))
        .context("camera lesson failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_has_six_faces() {
        let vertices = cube_vertices();
        assert_eq!(vertices.len(), 36);
        for v in &vertices {
            assert!(v.position.iter().all(|c| c.abs() == 0.5));
            assert!(v.uv.iter().all(|c| (0.0..=1.0).contains(c)));
        }
    }

    #[test]
    fn test_first_cube_sits_at_origin_unrotated() {
        let models = cube_models();
        assert_eq!(models.len(), CUBE_POSITIONS.len());
        assert_eq!(models[0], Mat4::IDENTITY);
        assert_eq!(models[3].w_axis.truncate(), CUBE_POSITIONS[3]);
    }

    #[test]
    fn test_instance_stride_is_one_matrix() {
        assert_eq!(instance_layout().array_stride, 64);
    }
}

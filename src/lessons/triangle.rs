//! Triangle lesson: one vertex buffer with interleaved position + color,
//! a compiled shader, and a time-driven uniform (Space toggles the pulse).

use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;
use winit::keyboard::KeyCode;

use crate::input::KeyboardState;
use crate::platform::{App, AppControl, FrameTime, RuntimeConfig};
use crate::renderer::gpu::{Gpu, GpuFrame};
use crate::renderer::pipeline::{blended_target, clear_pass, triangle_list};
use crate::renderer::vertex::srgb_clear;
use crate::renderer::{Shader, UniformBuffer, Vertex};
use crate::settings::Settings;

/// Bottom right red, bottom left green, top blue
pub const TRIANGLE: [Vertex; 3] = [
    Vertex::new(0.5, -0.5, [1.0, 0.0, 0.0, 1.0]),
    Vertex::new(-0.5, -0.5, [0.0, 1.0, 0.0, 1.0]),
    Vertex::new(0.0, 0.5, [0.0, 0.0, 1.0, 1.0]),
];

pub const CLEAR_COLOR: [f32; 3] = [0.2, 0.3, 0.3];

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PulseUniform {
    /// x: brightness, y: 1.0 while pulsing
    pub pulse: [f32; 4],
}

/// Brightness oscillating between 0 and 1 over time
pub fn pulse_value(seconds: f32) -> f32 {
    seconds.sin() / 2.0 + 0.5
}

pub struct TriangleLesson {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    params: UniformBuffer<PulseUniform>,
    pulsing: bool,
    uniform: PulseUniform,
}

impl TriangleLesson {
    pub fn new(gpu: &Gpu, settings: &Settings) -> Result<Self> {
        let device = gpu.device();
        let shader = match &settings.triangle_shader {
            Some(path) => Shader::from_path(device, path)?,
            None => Shader::from_wgsl(
                device,
                "triangle",
                include_str!("../renderer/shaders/triangle.wgsl"),
            )?,
        };

        let params = UniformBuffer::new(device, "triangle_params", &PulseUniform::default());

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("triangle_pipeline_layout"),
            bind_group_layouts: &[params.layout()],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("triangle_pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader.module,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
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
            label: Some("triangle_vertices"),
            contents: bytemuck::cast_slice(&TRIANGLE),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Ok(Self {
            pipeline,
            vertex_buffer,
            params,
            pulsing: true,
            uniform: PulseUniform::default(),
        })
    }
}

impl App for TriangleLesson {
    fn update(&mut self, input: &KeyboardState, time: FrameTime) -> AppControl {
        if input.key_pressed(KeyCode::Space) {
            self.pulsing = !self.pulsing;
            log::info!("Pulse {}", if self.pulsing { "on" } else { "off" });
        }

        self.uniform = PulseUniform {
            pulse: [
                pulse_value(time.elapsed),
                if self.pulsing { 1.0 } else { 0.0 },
                0.0,
                0.0,
            ],
        };
        AppControl::Continue
    }

    fn render(&mut self, gpu: &Gpu, frame: &mut GpuFrame) {
        self.params.write(gpu.queue(), &self.uniform);

        let mut pass = clear_pass(
            &mut frame.encoder,
            &frame.view,
            "triangle_pass",
            srgb_clear(CLEAR_COLOR),
            None,
        );
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, self.params.bind_group(), &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..TRIANGLE.len() as u32, 0..1);
    }
}

pub fn run(settings: &Settings) -> Result<()> {
    let config = RuntimeConfig::new(
        "LearnOpenGL: triangle",
        settings.window_width,
        settings.window_height,
    )
    .with_vsync(settings.vsync);
    crate::platform::run(config, |gpu| TriangleLesson::new(gpu, settings))
        .context("triangle lesson failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_stays_in_unit_range() {
        for i in 0..200 {
            let v = pulse_value(i as f32 * 0.1);
            assert!((0.0..=1.0).contains(&v));
        }
        assert!((pulse_value(0.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_uniform_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<PulseUniform>() % 16, 0);
    }
}

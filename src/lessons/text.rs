//! Text lesson: a glyph cache built once from a font file, drawn as one
//! textured quad per character under a y-up orthographic projection.

use anyhow::{Context, Result, anyhow};
use glam::Vec2;

use crate::input::KeyboardState;
use crate::platform::{App, AppControl, FrameTime, RuntimeConfig};
use crate::renderer::camera::ortho_y_up;
use crate::renderer::gpu::{Gpu, GpuFrame};
use crate::renderer::pipeline::clear_pass;
use crate::renderer::vertex::{srgb, srgb_clear};
use crate::renderer::TextRenderer;
use crate::settings::Settings;
use crate::text::{GlyphCache, YAxis};

/// A line of the demo: text, baseline origin, scale, sRGB color
pub struct Line {
    pub text: &'static str,
    pub origin: Vec2,
    pub scale: f32,
    pub color: [f32; 3],
}

pub const LINES: [Line; 2] = [
    Line {
        text: "This is sample text",
        origin: Vec2::new(25.0, 25.0),
        scale: 1.0,
        color: [0.5, 0.8, 0.2],
    },
    Line {
        text: "(C) LearnOpenGL.com",
        origin: Vec2::new(540.0, 570.0),
        scale: 0.5,
        color: [0.3, 0.7, 0.9],
    },
];

pub struct TextLesson {
    cache: GlyphCache,
    renderer: TextRenderer,
}

impl TextLesson {
    pub fn new(gpu: &Gpu, settings: &Settings) -> Result<Self> {
        let path = settings
            .resolve_font()
            .ok_or_else(|| anyhow!("no font found; set font_path in settings"))?;
        let cache = GlyphCache::load(&path, settings.font_pixel_size)?;

        let projection = ortho_y_up(settings.window_width as f32, settings.window_height as f32);
        let renderer = TextRenderer::new(
            gpu.device(),
            gpu.queue(),
            gpu.surface_format(),
            &cache,
            projection,
            YAxis::Up,
        )?;

        Ok(Self { cache, renderer })
    }
}

impl App for TextLesson {
    fn update(&mut self, _input: &KeyboardState, _time: FrameTime) -> AppControl {
        AppControl::Continue
    }

    fn render(&mut self, gpu: &Gpu, frame: &mut GpuFrame) {
        // Scales are relative to the 48px the lesson was written for
        let base = 48.0 / self.cache.pixel_size();
        for line in &LINES {
            self.renderer.queue_text(
                &self.cache,
                line.text,
                line.origin,
                line.scale * base,
                srgb(line.color),
            );
        }
        self.renderer.prepare(gpu.device(), gpu.queue());

        let mut pass = clear_pass(
            &mut frame.encoder,
            &frame.view,
            "text_pass",
            srgb_clear([0.2, 0.3, 0.3]),
            None,
        );
        self.renderer.draw(&mut pass);
    }
}

pub fn run(settings: &Settings) -> Result<()> {
    let config = RuntimeConfig::new(
        "LearnOpenGL: text",
        settings.window_width,
        settings.window_height,
    )
    .with_vsync(settings.vsync);
    crate::platform::run(config, |gpu| TextLesson::new(gpu, settings))
        .context("text lesson failed")
}

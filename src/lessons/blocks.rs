//! Blocks game: logo, title, gameplay and ending screens
//!
//! Input is sampled every rendered frame, the simulation advances in fixed
//! 60 Hz steps, and the scene is rebuilt from `GameState` before drawing.

use anyhow::Result;
use glam::Vec2;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::input::KeyboardState;
use crate::platform::{App, AppControl, FixedStep, FrameTime, RuntimeConfig};
use crate::renderer::camera::screen_ortho;
use crate::renderer::gpu::{Gpu, GpuFrame};
use crate::renderer::pipeline::clear_pass;
use crate::renderer::vertex::colors::{self, Rgba8};
use crate::renderer::{ShapeBatch, ShapeRenderer, TextRenderer};
use crate::settings::Settings;
use crate::sim::{FrameInput, GameEvent, GameResult, GameScreen, GameState, blink_visible, tick};
use crate::text::{GlyphCache, YAxis};

/// Title shown in the window bar
pub const WINDOW_TITLE: &str = "PROJECT: BLOCKS GAME";

/// A line of text to draw, positioned by its top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub position: Vec2,
    /// Line height in pixels
    pub font_size: f32,
    pub color: Rgba8,
}

/// Everything drawn for one frame
#[derive(Debug, Default)]
pub struct Scene {
    pub shapes: ShapeBatch,
    pub labels: Vec<Label>,
}

impl Scene {
    fn text(&mut self, text: &str, x: f32, y: f32, font_size: f32, color: Rgba8) {
        self.labels.push(Label {
            text: text.to_string(),
            position: Vec2::new(x, y),
            font_size,
            color,
        });
    }

    /// Text centered horizontally on the screen
    fn centered_text(
        &mut self,
        text: &str,
        screen_width: f32,
        y: f32,
        font_size: f32,
        color: Rgba8,
        measure: &impl Fn(&str, f32) -> f32,
    ) {
        let x = screen_width / 2.0 - measure(text, font_size) / 2.0;
        self.text(text, x, y, font_size, color);
    }
}

/// Describe the current screen as shapes and labels
///
/// `measure(text, font_size)` returns the width of a line of text.
pub fn build_scene(state: &GameState, measure: impl Fn(&str, f32) -> f32) -> Scene {
    let mut scene = Scene::default();
    let (w, h) = (state.screen_width, state.screen_height);

    match state.screen {
        GameScreen::Logo => {
            scene.text("LOGO SCREEN", 20.0, 20.0, 40.0, colors::LIGHTGRAY);
        }
        GameScreen::Title => {
            scene.text("TITLE SCREEN", 20.0, 20.0, 40.0, colors::DARKGREEN);
            if blink_visible(state.frames_counter) {
                scene.centered_text(
                    "PRESS [ENTER] to START",
                    w,
                    h / 2.0 + 60.0,
                    20.0,
                    colors::DARKGRAY,
                    &measure,
                );
            }
        }
        GameScreen::Gameplay => {
            let player = &state.player;
            scene.shapes.rect(
                player.position.x,
                player.position.y,
                player.size.x,
                player.size.y,
                colors::linear(colors::BLACK),
            );
            scene.shapes.circle(
                state.ball.position,
                state.ball.radius,
                colors::linear(colors::MAROON),
            );

            for (j, i, brick) in state.active_bricks() {
                let color = if (i + j) % 2 == 0 {
                    colors::GRAY
                } else {
                    colors::DARKGRAY
                };
                scene.shapes.rect(
                    brick.position.x,
                    brick.position.y,
                    brick.size.x,
                    brick.size.y,
                    colors::linear(color),
                );
            }

            // Lives
            for i in 0..player.lives.max(0) {
                scene.shapes.rect(
                    20.0 + 40.0 * i as f32,
                    h - 30.0,
                    35.0,
                    10.0,
                    colors::linear(colors::LIGHTGRAY),
                );
            }

            if state.paused {
                scene.centered_text("GAME PAUSED", w, h / 2.0 + 60.0, 40.0, colors::GRAY, &measure);
            }
        }
        GameScreen::Ending => {
            scene.text("ENDING SCREEN", 20.0, 20.0, 40.0, colors::DARKBLUE);
            match state.result {
                Some(GameResult::Win) => {
                    scene.text("YOU WIN!", 20.0, 70.0, 20.0, colors::DARKGREEN)
                }
                Some(GameResult::Lose) => {
                    scene.text("GAME OVER", 20.0, 70.0, 20.0, colors::MAROON)
                }
                None => {}
            }
            if blink_visible(state.frames_counter) {
                scene.centered_text(
                    "PRESS [ENTER] TO PLAY AGAIN",
                    w,
                    h / 2.0 + 80.0,
                    20.0,
                    colors::GRAY,
                    &measure,
                );
            }
        }
    }

    scene
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::ScreenChanged { from, to } => log::info!("Screen {from:?} -> {to:?}"),
        GameEvent::PauseToggled { paused } => log::info!("Paused: {paused}"),
        GameEvent::BallLaunched => log::debug!("Ball launched"),
        GameEvent::BrickHit {
            line,
            index,
            resistance,
        } => log::debug!("Brick [{line}][{index}] hit, {resistance} left"),
        GameEvent::BrickDestroyed { line, index } => {
            log::debug!("Brick [{line}][{index}] destroyed")
        }
        GameEvent::LifeLost { remaining } => log::info!("Life lost, {remaining} remaining"),
        GameEvent::GameOver => log::info!("Game over"),
        GameEvent::GameWon => log::info!("All bricks cleared"),
    }
}

/// Text resources; the game still runs without them
struct GameText {
    cache: GlyphCache,
    renderer: TextRenderer,
}

pub struct BlocksGame {
    state: GameState,
    fixed: FixedStep,
    /// Input accumulated until the next simulation step consumes it
    pending: FrameInput,
    shapes: ShapeRenderer,
    text: Option<GameText>,
}

impl BlocksGame {
    pub fn new(gpu: &Gpu, settings: &Settings) -> Result<Self> {
        let (w, h) = (settings.game_width, settings.game_height);
        let projection = screen_ortho(w, h);
        let shapes = ShapeRenderer::new(gpu.device(), gpu.surface_format(), projection)?;

        let text = match settings.resolve_font() {
            Some(path) => match GlyphCache::load(&path, settings.font_pixel_size) {
                Ok(cache) => {
                    let renderer = TextRenderer::new(
                        gpu.device(),
                        gpu.queue(),
                        gpu.surface_format(),
                        &cache,
                        projection,
                        YAxis::Down,
                    )?;
                    Some(GameText { cache, renderer })
                }
                Err(e) => {
                    log::warn!("Text disabled: {e}");
                    None
                }
            },
            None => {
                log::warn!("No font found; set font_path in settings to draw text");
                None
            }
        };

        Ok(Self {
            state: GameState::new(w, h),
            fixed: FixedStep::new(SIM_DT, MAX_SUBSTEPS),
            pending: FrameInput::default(),
            shapes,
            text,
        })
    }

    fn measure(&self, text: &str, font_size: f32) -> f32 {
        match &self.text {
            Some(t) => t.cache.measure(text, font_size / t.cache.pixel_size()),
            // Rough width of a proportional font
            None => text.len() as f32 * font_size * 0.5,
        }
    }
}

impl App for BlocksGame {
    fn update(&mut self, input: &KeyboardState, time: FrameTime) -> AppControl {
        let frame = input.blocks_input();
        self.pending.left = frame.left;
        self.pending.right = frame.right;
        // Presses stick until a step sees them
        self.pending.enter |= frame.enter;
        self.pending.pause |= frame.pause;
        self.pending.launch |= frame.launch;

        for _ in 0..self.fixed.advance(time.dt) {
            tick(&mut self.state, &self.pending);
            self.pending.clear_one_shots();
        }

        for event in self.state.drain_events() {
            log_event(&event);
        }

        AppControl::Continue
    }

    fn render(&mut self, gpu: &Gpu, frame: &mut GpuFrame) {
        let scene = build_scene(&self.state, |text, size| self.measure(text, size));

        self.shapes.prepare(gpu.device(), gpu.queue(), &scene.shapes);
        if let Some(text) = &mut self.text {
            for label in &scene.labels {
                let scale = label.font_size / text.cache.pixel_size();
                text.renderer.queue_text(
                    &text.cache,
                    &label.text,
                    label.position,
                    scale,
                    colors::linear(label.color),
                );
            }
            text.renderer.prepare(gpu.device(), gpu.queue());
        }

        let mut pass = clear_pass(
            &mut frame.encoder,
            &frame.view,
            "blocks_pass",
            colors::clear(colors::RAYWHITE),
            None,
        );
        self.shapes.draw(&mut pass);
        if let Some(text) = &self.text {
            text.renderer.draw(&mut pass);
        }
    }
}

/// Run the blocks game until the window closes
pub fn run(settings: &Settings) -> Result<()> {
    let config = RuntimeConfig::new(
        WINDOW_TITLE,
        settings.game_width.round() as u32,
        settings.game_height.round() as u32,
    )
    .with_vsync(settings.vsync);

    crate::platform::run(config, |gpu| BlocksGame::new(gpu, settings))
}

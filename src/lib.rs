//! Blocks Lessons - a breakout-style game and a handful of GPU lessons
//!
//! Core modules:
//! - `sim`: Deterministic game logic (paddle, ball, bricks, screens)
//! - `renderer`: wgpu pipelines for shapes, textures, text and 3D meshes
//! - `text`: Glyph cache built from a font file
//! - `platform`: winit runtime, frame clock, fixed timestep
//! - `lessons`: One module per runnable program

pub mod input;
pub mod lessons;
pub mod logging;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod text;

pub use settings::Settings;

/// Logger + settings setup shared by every binary
///
/// The log filter is peeked from the settings file first so the settings
/// load itself is already logged with the configured filter.
pub fn bootstrap(program: &str) -> Settings {
    let path = Settings::default_path();
    let filter = std::fs::read_to_string(&path)
        .ok()
        .and_then(|json| Settings::from_json(&json).ok())
        .and_then(|s| s.log_filter);
    logging::init_logging(logging::LoggingConfig::with_filter(filter));

    log::info!("{program} v{} starting", env!("CARGO_PKG_VERSION"));
    Settings::load_from(&path)
}

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep. Speeds are expressed in pixels per frame.
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Game screen dimensions (logical pixels)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 450.0;

    /// Graphics lesson window dimensions
    pub const LESSON_WIDTH: u32 = 800;
    pub const LESSON_HEIGHT: u32 = 600;

    pub const PLAYER_LIVES: i32 = 5;
    pub const BRICKS_LINES: usize = 5;
    pub const BRICKS_PER_LINE: usize = 20;
    pub const BRICKS_POSITION_Y: f32 = 50.0;
    pub const BRICK_HEIGHT: f32 = 20.0;

    /// Paddle defaults
    pub const PLAYER_SPEED: f32 = 8.0;
    pub const PLAYER_WIDTH: f32 = 100.0;
    pub const PLAYER_HEIGHT: f32 = 24.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_LAUNCH_SPEED: f32 = 5.0;
    /// Horizontal speed given by a hit on the very edge of the paddle
    pub const BALL_MAX_SPEED_X: f32 = 5.0;

    /// Frames the logo stays up (3 seconds at 60 FPS)
    pub const LOGO_FRAMES: u32 = 180;
    /// Half period of blinking prompts
    pub const BLINK_FRAMES: u32 = 30;
}

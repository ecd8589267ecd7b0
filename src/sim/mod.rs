//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call to `tick` = one 60 Hz frame)
//! - Stable iteration order (bricks by line, then index)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, Rect, circle_rect_collision, reflect_velocity};
pub use state::{Ball, Brick, GameEvent, GameResult, GameScreen, GameState, Player};
pub use tick::{FrameInput, blink_visible, tick};

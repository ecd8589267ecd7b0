//! Game state and core simulation types
//!
//! Plain data records for the blocks game. Lifetimes are single-run; the
//! serde derives are only there so a state can be dumped for debugging.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;

/// Which screen is active; drives the update/draw branch each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameScreen {
    Logo,
    Title,
    Gameplay,
    Ending,
}

/// Outcome of the last game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Lose,
    Win,
}

/// Notable things that happened during a tick (drained by the app for logging)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ScreenChanged { from: GameScreen, to: GameScreen },
    PauseToggled { paused: bool },
    BallLaunched,
    BrickHit { line: usize, index: usize, resistance: u32 },
    BrickDestroyed { line: usize, index: usize },
    LifeLost { remaining: i32 },
    GameOver,
    GameWon,
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub position: Vec2,
    /// Pixels per frame (only x is used)
    pub speed: Vec2,
    pub size: Vec2,
    /// Remaining lives; the game ends once this drops below zero
    pub lives: i32,
}

impl Player {
    pub fn new(screen_width: f32, screen_height: f32) -> Self {
        Self {
            position: Vec2::new(screen_width / 2.0, screen_height * 7.0 / 8.0),
            speed: Vec2::new(PLAYER_SPEED, 0.0),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            lives: PLAYER_LIVES,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }

    /// Horizontal center of the paddle
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.position.x + self.size.x / 2.0
    }

    /// Keep the paddle fully on screen
    pub fn clamp_to_screen(&mut self, screen_width: f32) {
        if self.position.x <= 0.0 {
            self.position.x = 0.0;
        }
        if self.position.x + self.size.x >= screen_width {
            self.position.x = screen_width - self.size.x;
        }
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Center
    pub position: Vec2,
    /// Pixels per frame
    pub speed: Vec2,
    pub radius: f32,
    /// False while the ball rests on the paddle waiting for launch
    pub active: bool,
}

impl Ball {
    /// A ball resting on top of the paddle
    pub fn attached_to(player: &Player) -> Self {
        let mut ball = Self {
            position: Vec2::ZERO,
            speed: Vec2::ZERO,
            radius: BALL_RADIUS,
            active: false,
        };
        ball.attach(player);
        ball
    }

    /// Put the ball back on the paddle and stop it
    pub fn attach(&mut self, player: &Player) {
        self.position = Vec2::new(player.center_x(), player.position.y - self.radius - 1.0);
        self.speed = Vec2::ZERO;
        self.active = false;
    }

    /// Launch straight up
    pub fn launch(&mut self) {
        self.active = true;
        self.speed = Vec2::new(0.0, -BALL_LAUNCH_SPEED);
    }
}

/// A brick in the grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    /// Top-left corner
    pub position: Vec2,
    pub size: Vec2,
    /// Hits left before the brick breaks
    pub resistance: u32,
    pub active: bool,
}

impl Brick {
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }
}

/// Build the full brick grid, `BRICKS_LINES` rows of `BRICKS_PER_LINE`
pub fn brick_grid(screen_width: f32) -> Vec<Vec<Brick>> {
    let size = Vec2::new(screen_width / BRICKS_PER_LINE as f32, BRICK_HEIGHT);
    (0..BRICKS_LINES)
        .map(|j| {
            (0..BRICKS_PER_LINE)
                .map(|i| Brick {
                    position: Vec2::new(
                        i as f32 * size.x,
                        j as f32 * size.y + BRICKS_POSITION_Y,
                    ),
                    size,
                    resistance: 1,
                    active: true,
                })
                .collect()
        })
        .collect()
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub screen_width: f32,
    pub screen_height: f32,
    /// Current screen
    pub screen: GameScreen,
    /// General purpose frame counter (reset on screen changes that use it)
    pub frames_counter: u32,
    /// None until a game has been won or lost
    pub result: Option<GameResult>,
    pub paused: bool,
    pub player: Player,
    pub ball: Ball,
    /// Indexed `[line][index]`
    pub bricks: Vec<Vec<Brick>>,
    /// Events produced since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game starting on the logo screen
    pub fn new(screen_width: f32, screen_height: f32) -> Self {
        let player = Player::new(screen_width, screen_height);
        let mut ball = Ball::attached_to(&player);
        // First serve sits a little higher than a respawn
        ball.position.y = player.position.y - ball.radius * 2.0;
        Self {
            screen_width,
            screen_height,
            screen: GameScreen::Logo,
            frames_counter: 0,
            result: None,
            paused: false,
            player,
            ball,
            bricks: brick_grid(screen_width),
            events: Vec::new(),
        }
    }

    /// Fresh paddle, ball and bricks for a new game
    pub fn reset_round(&mut self) {
        self.player = Player::new(self.screen_width, self.screen_height);
        self.ball = Ball::attached_to(&self.player);
        self.bricks = brick_grid(self.screen_width);
        self.result = None;
        self.paused = false;
    }

    /// Park the ball on the paddle, stopped
    pub fn attach_ball(&mut self) {
        self.ball.attach(&self.player);
    }

    /// Switch screens, recording the transition
    pub fn set_screen(&mut self, to: GameScreen) {
        if self.screen != to {
            self.events.push(GameEvent::ScreenChanged {
                from: self.screen,
                to,
            });
            self.screen = to;
        }
    }

    /// Iterate active bricks with their `(line, index)`
    pub fn active_bricks(&self) -> impl Iterator<Item = (usize, usize, &Brick)> {
        self.bricks.iter().enumerate().flat_map(|(j, line)| {
            line.iter()
                .enumerate()
                .filter(|(_, b)| b.active)
                .map(move |(i, b)| (j, i, b))
        })
    }

    pub fn bricks_remaining(&self) -> usize {
        self.active_bricks().count()
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_layout() {
        let state = GameState::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        assert_eq!(state.screen, GameScreen::Logo);
        assert_eq!(state.player.lives, PLAYER_LIVES);
        assert_eq!(state.player.position, Vec2::new(400.0, 393.75));
        assert!(!state.ball.active);
        assert_eq!(state.ball.position.x, state.player.center_x());
        assert_eq!(state.ball.position.y, state.player.position.y - 20.0);
        assert_eq!(state.bricks_remaining(), BRICKS_LINES * BRICKS_PER_LINE);
    }

    #[test]
    fn test_brick_grid_positions() {
        let bricks = brick_grid(SCREEN_WIDTH);
        assert_eq!(bricks.len(), BRICKS_LINES);
        assert_eq!(bricks[0].len(), BRICKS_PER_LINE);

        let b = &bricks[2][3];
        assert_eq!(b.size, Vec2::new(40.0, 20.0));
        assert_eq!(b.position, Vec2::new(120.0, 90.0));

        // Last brick of a line ends exactly at the right edge
        let last = &bricks[0][BRICKS_PER_LINE - 1];
        assert!((last.bounds().max().x - SCREEN_WIDTH).abs() < 0.001);
    }

    #[test]
    fn test_clamp_to_screen() {
        let mut player = Player::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        player.position.x = -30.0;
        player.clamp_to_screen(SCREEN_WIDTH);
        assert_eq!(player.position.x, 0.0);

        player.position.x = 780.0;
        player.clamp_to_screen(SCREEN_WIDTH);
        assert_eq!(player.position.x, SCREEN_WIDTH - PLAYER_WIDTH);
    }

    #[test]
    fn test_reset_round_restores_everything() {
        let mut state = GameState::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        state.bricks[0][0].active = false;
        state.player.lives = 1;
        state.player.position.x = 0.0;
        state.ball.launch();
        state.result = Some(GameResult::Lose);
        state.paused = true;

        state.reset_round();
        assert_eq!(state.bricks_remaining(), BRICKS_LINES * BRICKS_PER_LINE);
        assert_eq!(state.player.lives, PLAYER_LIVES);
        assert!(!state.ball.active);
        assert_eq!(state.ball.position.x, state.player.center_x());
        assert_eq!(state.result, None);
        assert!(!state.paused);
    }

    #[test]
    fn test_set_screen_records_event_once() {
        let mut state = GameState::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        state.set_screen(GameScreen::Title);
        state.set_screen(GameScreen::Title);
        let events = state.drain_events();
        assert_eq!(
            events,
            vec![GameEvent::ScreenChanged {
                from: GameScreen::Logo,
                to: GameScreen::Title
            }]
        );
        assert!(state.events.is_empty());
    }
}

//! Fixed timestep simulation tick
//!
//! One call advances the game by exactly one 60 Hz frame.

use super::collision::{axis_normal, circle_rect_collision, reflect_velocity};
use super::state::{GameEvent, GameResult, GameScreen, GameState};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Move paddle left (held)
    pub left: bool,
    /// Move paddle right (held)
    pub right: bool,
    /// Confirm / advance screen (pressed this frame)
    pub enter: bool,
    /// Pause toggle (pressed this frame)
    pub pause: bool,
    /// Launch the ball (pressed this frame)
    pub launch: bool,
}

impl FrameInput {
    /// Drop the one-shot fields once a tick has consumed them
    pub fn clear_one_shots(&mut self) {
        self.enter = false;
        self.pause = false;
        self.launch = false;
    }
}

/// Whether a blinking prompt is visible on this frame
#[inline]
pub fn blink_visible(frames_counter: u32) -> bool {
    (frames_counter / BLINK_FRAMES) % 2 == 0
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &FrameInput) {
    match state.screen {
        GameScreen::Logo => {
            state.frames_counter += 1;
            if state.frames_counter > LOGO_FRAMES {
                state.set_screen(GameScreen::Title);
                state.frames_counter = 0;
            }
        }
        GameScreen::Title => {
            state.frames_counter += 1;
            if input.enter {
                state.reset_round();
                state.set_screen(GameScreen::Gameplay);
            }
        }
        GameScreen::Gameplay => {
            if input.pause {
                state.paused = !state.paused;
                state.events.push(GameEvent::PauseToggled {
                    paused: state.paused,
                });
            }
            if !state.paused {
                update_gameplay(state, input);
            }
        }
        GameScreen::Ending => {
            state.frames_counter += 1;
            if input.enter {
                state.set_screen(GameScreen::Title);
            }
        }
    }
}

fn update_gameplay(state: &mut GameState, input: &FrameInput) {
    let (width, height) = (state.screen_width, state.screen_height);

    // Player movement
    if input.left {
        state.player.position.x -= state.player.speed.x;
    }
    if input.right {
        state.player.position.x += state.player.speed.x;
    }
    state.player.clamp_to_screen(width);

    if !state.ball.active {
        // Ball rides on the paddle until launched
        state.ball.position.x = state.player.center_x();
        if input.launch {
            state.ball.launch();
            state.events.push(GameEvent::BallLaunched);
        }
        return;
    }

    let ball = &mut state.ball;
    ball.position += ball.speed;

    // Screen limits: keep the ball inside, turn it only when heading out
    if ball.position.x - ball.radius <= 0.0 {
        ball.position.x = ball.radius;
        ball.speed.x = ball.speed.x.abs();
    } else if ball.position.x + ball.radius >= width {
        ball.position.x = width - ball.radius;
        ball.speed.x = -ball.speed.x.abs();
    }
    if ball.position.y - ball.radius <= 0.0 {
        ball.position.y = ball.radius;
        ball.speed.y = ball.speed.y.abs();
    }

    collide_paddle(state);
    collide_bricks(state);

    // Ball lost below the screen
    if state.ball.position.y + state.ball.radius >= height {
        state.attach_ball();
        state.player.lives -= 1;
        state.events.push(GameEvent::LifeLost {
            remaining: state.player.lives,
        });

        if state.player.lives < 0 {
            state.result = Some(GameResult::Lose);
            state.events.push(GameEvent::GameOver);
            state.set_screen(GameScreen::Ending);
            state.player.lives = PLAYER_LIVES;
            state.frames_counter = 0;
            return;
        }
    }

    if state.bricks_remaining() == 0 {
        state.result = Some(GameResult::Win);
        state.events.push(GameEvent::GameWon);
        state.set_screen(GameScreen::Ending);
        state.frames_counter = 0;
    }
}

/// Bounce off the paddle; the hit offset from the paddle center steers the ball
fn collide_paddle(state: &mut GameState) {
    let ball = &mut state.ball;
    // Only while falling, so a ball inside the paddle can't flip back and forth
    if ball.speed.y <= 0.0 {
        return;
    }
    let paddle = state.player.bounds();
    let hit = circle_rect_collision(ball.position, ball.radius, &paddle);
    if !hit.hit {
        return;
    }

    // Below the top face the paddle is just a wall: push the ball out sideways
    if hit.normal.y >= 0.0 {
        let normal = axis_normal(hit.normal);
        if ball.speed.dot(normal) < 0.0 {
            ball.speed = reflect_velocity(ball.speed, normal);
        }
        ball.position += normal * hit.penetration.max(0.0);
        return;
    }

    let half_width = state.player.size.x / 2.0;
    let offset = ((ball.position.x - state.player.center_x()) / half_width).clamp(-1.0, 1.0);
    ball.speed.y = -ball.speed.y;
    ball.speed.x = offset * BALL_MAX_SPEED_X;
    ball.position.y = paddle.y - ball.radius;
}

/// Resolve at most one brick per frame
fn collide_bricks(state: &mut GameState) {
    let ball = &mut state.ball;
    for (j, line) in state.bricks.iter_mut().enumerate() {
        for (i, brick) in line.iter_mut().enumerate() {
            if !brick.active {
                continue;
            }
            let hit = circle_rect_collision(ball.position, ball.radius, &brick.bounds());
            if !hit.hit {
                continue;
            }

            let normal = axis_normal(hit.normal);
            // Only reflect when moving into the face, otherwise just separate
            if ball.speed.dot(normal) < 0.0 {
                ball.speed = reflect_velocity(ball.speed, normal);
            }
            ball.position += normal * hit.penetration.max(0.0);

            brick.resistance = brick.resistance.saturating_sub(1);
            if brick.resistance == 0 {
                brick.active = false;
                state.events.push(GameEvent::BrickDestroyed { line: j, index: i });
            } else {
                state.events.push(GameEvent::BrickHit {
                    line: j,
                    index: i,
                    resistance: brick.resistance,
                });
            }
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn gameplay_state() -> GameState {
        let mut state = GameState::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        state.screen = GameScreen::Gameplay;
        state
    }

    fn place_ball(state: &mut GameState, position: Vec2, speed: Vec2) {
        state.ball.position = position;
        state.ball.speed = speed;
        state.ball.active = true;
    }

    fn enter() -> FrameInput {
        FrameInput {
            enter: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_logo_to_title_after_three_seconds() {
        let mut state = GameState::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        let input = FrameInput::default();
        for _ in 0..LOGO_FRAMES {
            tick(&mut state, &input);
        }
        assert_eq!(state.screen, GameScreen::Logo);
        tick(&mut state, &input);
        assert_eq!(state.screen, GameScreen::Title);
        assert_eq!(state.frames_counter, 0);
    }

    #[test]
    fn test_full_screen_cycle() {
        let mut state = GameState::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        state.screen = GameScreen::Title;

        tick(&mut state, &enter());
        assert_eq!(state.screen, GameScreen::Gameplay);

        state.screen = GameScreen::Ending;
        tick(&mut state, &FrameInput::default());
        assert_eq!(state.screen, GameScreen::Ending);
        tick(&mut state, &enter());
        assert_eq!(state.screen, GameScreen::Title);
    }

    #[test]
    fn test_pause_freezes_gameplay() {
        let mut state = gameplay_state();
        let pause = FrameInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert!(state.paused);

        let x = state.player.position.x;
        let right = FrameInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &right);
        assert_eq!(state.player.position.x, x);

        tick(&mut state, &pause);
        assert!(!state.paused);
        tick(&mut state, &right);
        assert_eq!(state.player.position.x, x + PLAYER_SPEED);
    }

    #[test]
    fn test_attached_ball_follows_paddle_and_launches() {
        let mut state = gameplay_state();
        let left = FrameInput {
            left: true,
            ..Default::default()
        };
        tick(&mut state, &left);
        assert_eq!(state.ball.position.x, state.player.center_x());
        assert!(!state.ball.active);

        let launch = FrameInput {
            launch: true,
            ..Default::default()
        };
        tick(&mut state, &launch);
        assert!(state.ball.active);
        assert_eq!(state.ball.speed, Vec2::new(0.0, -BALL_LAUNCH_SPEED));
        assert!(state.events.contains(&GameEvent::BallLaunched));
    }

    #[test]
    fn test_side_wall_bounce() {
        let mut state = gameplay_state();
        place_ball(&mut state, Vec2::new(795.0, 300.0), Vec2::new(4.0, 0.0));
        tick(&mut state, &FrameInput::default());
        assert_eq!(state.ball.speed.x, -4.0);
    }

    #[test]
    fn test_ball_leaves_left_wall_after_paddle_steers_it_back() {
        let mut state = gameplay_state();
        state.player.position.x = 0.0;
        let paddle = state.player.bounds();
        place_ball(&mut state, Vec2::new(8.0, paddle.y - 12.0), Vec2::new(-3.0, 5.0));

        for _ in 0..20 {
            tick(&mut state, &FrameInput::default());
            assert!(state.ball.position.x >= state.ball.radius);
        }
        assert!(state.ball.speed.x > 0.0);
        assert!(state.ball.position.x > 50.0);
    }

    #[test]
    fn test_ball_never_crosses_right_wall() {
        let mut state = gameplay_state();
        place_ball(&mut state, Vec2::new(SCREEN_WIDTH - 3.0, 300.0), Vec2::new(4.0, 0.0));
        tick(&mut state, &FrameInput::default());
        assert_eq!(state.ball.position.x, SCREEN_WIDTH - state.ball.radius);
        assert_eq!(state.ball.speed.x, -4.0);

        // Heading away now, so it keeps its direction
        tick(&mut state, &FrameInput::default());
        assert_eq!(state.ball.speed.x, -4.0);
    }

    #[test]
    fn test_top_wall_bounce() {
        let mut state = gameplay_state();
        // Clear the bricks out of the way
        for line in &mut state.bricks {
            for brick in line.iter_mut() {
                brick.active = false;
            }
        }
        state.bricks[4][0].active = true;
        place_ball(&mut state, Vec2::new(400.0, 12.0), Vec2::new(0.0, -5.0));
        tick(&mut state, &FrameInput::default());
        assert_eq!(state.ball.speed.y, 5.0);
    }

    #[test]
    fn test_paddle_bounce_steers_by_offset() {
        let mut state = gameplay_state();
        let paddle = state.player.bounds();
        // Falling onto the right quarter of the paddle
        let x = paddle.x + paddle.width * 0.75;
        place_ball(&mut state, Vec2::new(x, paddle.y - 12.0), Vec2::new(0.0, 5.0));
        tick(&mut state, &FrameInput::default());
        assert!(state.ball.speed.y < 0.0);
        assert!((state.ball.speed.x - BALL_MAX_SPEED_X * 0.5).abs() < 0.001);
        assert_eq!(state.ball.position.y, paddle.y - state.ball.radius);
    }

    #[test]
    fn test_ball_below_paddle_top_grazes_side_and_falls() {
        let mut state = gameplay_state();
        let paddle = state.player.bounds();
        let right = paddle.max().x;
        place_ball(&mut state, Vec2::new(right + 5.0, paddle.y + 11.0), Vec2::new(0.0, 5.0));
        tick(&mut state, &FrameInput::default());

        assert!(state.ball.position.y > paddle.y);
        assert_eq!(state.ball.speed, Vec2::new(0.0, 5.0));
        assert!(state.ball.position.x >= right + state.ball.radius);
    }

    #[test]
    fn test_ball_moving_into_paddle_side_reflects() {
        let mut state = gameplay_state();
        let paddle = state.player.bounds();
        place_ball(&mut state, Vec2::new(paddle.x - 14.0, paddle.y + 12.0), Vec2::new(5.0, 2.0));
        tick(&mut state, &FrameInput::default());

        assert_eq!(state.ball.speed, Vec2::new(-5.0, 2.0));
        assert!(state.ball.position.x <= paddle.x - state.ball.radius);
    }

    #[test]
    fn test_rising_ball_passes_through_paddle() {
        let mut state = gameplay_state();
        let paddle = state.player.bounds();
        place_ball(
            &mut state,
            Vec2::new(paddle.center().x, paddle.y + 2.0),
            Vec2::new(0.0, -5.0),
        );
        tick(&mut state, &FrameInput::default());
        assert_eq!(state.ball.speed.y, -5.0);
    }

    #[test]
    fn test_brick_hit_from_below_destroys_and_reflects() {
        let mut state = gameplay_state();
        let brick = state.bricks[4][5].bounds();
        // Just under the bottom row, moving up into it
        let pos = Vec2::new(brick.center().x, brick.max().y + state.ball.radius + 2.0);
        place_ball(&mut state, pos, Vec2::new(0.0, -5.0));
        tick(&mut state, &FrameInput::default());

        assert!(!state.bricks[4][5].active);
        assert_eq!(state.ball.speed, Vec2::new(0.0, 5.0));
        assert!(state.ball.position.y >= brick.max().y + state.ball.radius - 0.001);
        assert!(state
            .events
            .contains(&GameEvent::BrickDestroyed { line: 4, index: 5 }));
        assert_eq!(
            state.bricks_remaining(),
            BRICKS_LINES * BRICKS_PER_LINE - 1
        );
    }

    #[test]
    fn test_resistant_brick_takes_two_hits() {
        let mut state = gameplay_state();
        state.bricks[4][5].resistance = 2;
        let brick = state.bricks[4][5].bounds();
        let pos = Vec2::new(brick.center().x, brick.max().y + state.ball.radius + 2.0);

        place_ball(&mut state, pos, Vec2::new(0.0, -5.0));
        tick(&mut state, &FrameInput::default());
        assert!(state.bricks[4][5].active);
        assert_eq!(state.bricks[4][5].resistance, 1);

        place_ball(&mut state, pos, Vec2::new(0.0, -5.0));
        tick(&mut state, &FrameInput::default());
        assert!(!state.bricks[4][5].active);
    }

    #[test]
    fn test_one_brick_per_frame() {
        let mut state = gameplay_state();
        // Straddle two neighbours in the bottom line
        let left = state.bricks[4][5].bounds();
        let pos = Vec2::new(left.max().x, left.max().y + state.ball.radius - 3.0);
        place_ball(&mut state, pos - Vec2::new(0.0, -5.0), Vec2::new(0.0, -5.0));
        tick(&mut state, &FrameInput::default());
        let destroyed = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::BrickDestroyed { .. }))
            .count();
        assert_eq!(destroyed, 1);
    }

    #[test]
    fn test_losing_a_life_reattaches_ball() {
        let mut state = gameplay_state();
        place_ball(&mut state, Vec2::new(100.0, 438.0), Vec2::new(0.0, 5.0));
        tick(&mut state, &FrameInput::default());

        assert_eq!(state.player.lives, PLAYER_LIVES - 1);
        assert!(!state.ball.active);
        assert_eq!(state.ball.speed, Vec2::ZERO);
        assert_eq!(state.ball.position.x, state.player.center_x());
        assert_eq!(
            state.ball.position.y,
            state.player.position.y - state.ball.radius - 1.0
        );
        assert_eq!(state.screen, GameScreen::Gameplay);
    }

    #[test]
    fn test_game_over_when_lives_run_out() {
        let mut state = gameplay_state();
        state.player.lives = 0;
        state.frames_counter = 42;
        place_ball(&mut state, Vec2::new(100.0, 438.0), Vec2::new(0.0, 5.0));
        tick(&mut state, &FrameInput::default());

        assert_eq!(state.screen, GameScreen::Ending);
        assert_eq!(state.result, Some(GameResult::Lose));
        assert_eq!(state.player.lives, PLAYER_LIVES);
        assert_eq!(state.frames_counter, 0);
        assert!(state.events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn test_clearing_last_brick_wins() {
        let mut state = gameplay_state();
        for line in &mut state.bricks {
            for brick in line.iter_mut() {
                brick.active = false;
            }
        }
        state.bricks[4][5].active = true;
        let brick = state.bricks[4][5].bounds();
        let pos = Vec2::new(brick.center().x, brick.max().y + state.ball.radius + 2.0);
        place_ball(&mut state, pos, Vec2::new(0.0, -5.0));
        tick(&mut state, &FrameInput::default());

        assert_eq!(state.screen, GameScreen::Ending);
        assert_eq!(state.result, Some(GameResult::Win));
        assert!(state.events.contains(&GameEvent::GameWon));
    }

    #[test]
    fn test_new_game_from_title_resets_board() {
        let mut state = GameState::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        state.screen = GameScreen::Title;
        state.bricks[0][0].active = false;
        state.result = Some(GameResult::Lose);
        tick(&mut state, &enter());
        assert_eq!(state.bricks_remaining(), BRICKS_LINES * BRICKS_PER_LINE);
        assert_eq!(state.result, None);
    }

    #[test]
    fn test_blink_visible() {
        assert!(blink_visible(0));
        assert!(blink_visible(29));
        assert!(!blink_visible(30));
        assert!(!blink_visible(59));
        assert!(blink_visible(60));
    }

    proptest! {
        #[test]
        fn paddle_never_leaves_screen(moves in proptest::collection::vec(0u8..3, 0..400)) {
            let mut state = gameplay_state();
            for m in moves {
                let input = FrameInput {
                    left: m == 1,
                    right: m == 2,
                    ..Default::default()
                };
                tick(&mut state, &input);
                let p = &state.player;
                prop_assert!(p.position.x >= 0.0);
                prop_assert!(p.position.x + p.size.x <= SCREEN_WIDTH);
            }
        }
    }
}

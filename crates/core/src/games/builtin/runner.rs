//! One-button side scroller: jump over obstacles that speed up over time.

use crate::games::domain::game_plugin::GamePlugin;
use crate::input::domain::input_event::{Button, InputEvent, InputKind};
use crate::runtime::domain::screen::{centered_x, Color, Screen};
use crate::shared::constants::{SCREEN_HEIGHT, SCREEN_WIDTH};

const WIDTH: i32 = SCREEN_WIDTH as i32;
const HEIGHT: i32 = SCREEN_HEIGHT as i32;
const GROUND_Y: f64 = (HEIGHT - 10) as f64;

const START_SPEED: f64 = 1.0;
const MAX_SPEED: f64 = 2.2;
const ACCEL: f64 = 0.0006;
const GRAVITY: f64 = 0.22;
const JUMP_VELOCITY: f64 = -3.3;

const PLAYER_X: f64 = 14.0;
const PLAYER_W: i32 = 6;
const PLAYER_H: i32 = 8;

const FIRST_SPAWN_COOLDOWN: u32 = 60;
const MIN_SPAWN_COOLDOWN: u32 = 40;

#[derive(Clone, Debug, PartialEq)]
struct Obstacle {
    x: f64,
    w: i32,
    h: i32,
    passed: bool,
}

impl Obstacle {
    fn top(&self) -> f64 {
        GROUND_Y - f64::from(self.h) + 1.0
    }
}

pub struct RunnerGame {
    speed: f64,
    py: f64,
    vy: f64,
    on_ground: bool,
    obstacles: Vec<Obstacle>,
    spawn_timer: u32,
    spawn_cooldown: u32,
    frames: u64,
    score: u32,
    best: u32,
    game_over: bool,
}

pub fn create() -> Box<dyn GamePlugin> {
    Box::new(RunnerGame::new())
}

impl RunnerGame {
    pub fn new() -> Self {
        Self {
            speed: START_SPEED,
            py: GROUND_Y,
            vy: 0.0,
            on_ground: true,
            obstacles: Vec::new(),
            spawn_timer: 0,
            spawn_cooldown: FIRST_SPAWN_COOLDOWN,
            frames: 0,
            score: 0,
            best: 0,
            game_over: false,
        }
    }

    /// Start a new run, keeping the best score.
    fn restart(&mut self) {
        let best = self.best;
        *self = Self::new();
        self.best = best;
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    fn spawn(&mut self) {
        let h = 6 + if (self.frames / 180) % 2 == 0 { 2 } else { 0 };
        let w = 4 + ((self.frames / 240) % 3) as i32;
        self.obstacles.push(Obstacle {
            x: f64::from(WIDTH + 4),
            w,
            h,
            passed: false,
        });
        self.spawn_cooldown = (self.spawn_cooldown - 1).max(MIN_SPAWN_COOLDOWN);
        self.spawn_timer = self.spawn_cooldown + (self.frames % 23) as u32;
    }

    fn player_box(&self) -> (f64, f64, f64, f64) {
        let half = f64::from(PLAYER_W / 2);
        (
            PLAYER_X - half,
            self.py - f64::from(PLAYER_H),
            PLAYER_X + half,
            self.py,
        )
    }

    fn collides(&self) -> bool {
        let (px1, py1, px2, py2) = self.player_box();
        self.obstacles.iter().any(|o| {
            let (ox1, oy1) = (o.x, o.top());
            let (ox2, oy2) = (o.x + f64::from(o.w), oy1 + f64::from(o.h));
            !(px2 < ox1 || px1 > ox2 || py2 < oy1 || py1 > oy2)
        })
    }
}

impl Default for RunnerGame {
    fn default() -> Self {
        Self::new()
    }
}

impl GamePlugin for RunnerGame {
    fn on_event(&mut self, event: &InputEvent) {
        let jump = matches!(
            event.kind,
            InputKind::ActionPress(Button::Primary) | InputKind::MoveUp
        );
        if !jump {
            return;
        }
        if self.game_over {
            self.restart();
        } else if self.on_ground {
            self.vy = JUMP_VELOCITY;
            self.on_ground = false;
        }
    }

    fn update(&mut self) {
        if self.game_over {
            return;
        }
        self.frames += 1;
        self.speed = (self.speed + ACCEL).min(MAX_SPEED);

        self.vy += GRAVITY;
        self.py += self.vy;
        if self.py >= GROUND_Y {
            self.py = GROUND_Y;
            self.vy = 0.0;
            self.on_ground = true;
        }

        if self.spawn_timer == 0 {
            self.spawn();
        } else {
            self.spawn_timer -= 1;
        }

        for obstacle in &mut self.obstacles {
            obstacle.x -= self.speed;
            if !obstacle.passed && obstacle.x + f64::from(obstacle.w) < PLAYER_X {
                obstacle.passed = true;
                self.score += 1;
            }
        }
        self.obstacles.retain(|o| o.x + f64::from(o.w) > -4.0);

        if self.collides() {
            self.game_over = true;
            self.best = self.best.max(self.score);
        }
    }

    fn draw(&self, screen: &mut dyn Screen) {
        screen.cls(Color::BLACK);
        let ground = GROUND_Y as i32 + 1;
        screen.line(0, ground, WIDTH - 1, ground, Color::DARK_BLUE);

        let (left, top, _, _) = self.player_box();
        let (left, top) = (left as i32, top as i32);
        screen.rect(left, top, PLAYER_W, PLAYER_H, Color::LIME);
        screen.pset(left + 1, top + 2, Color::NAVY);
        screen.pset(left + 4, top + 2, Color::NAVY);

        for o in &self.obstacles {
            screen.rect(o.x as i32, o.top() as i32, o.w, o.h, Color::RED);
        }

        screen.text(2, 0, &format!("SCORE {}", self.score), Color::WHITE);
        if self.best > 0 {
            let best = format!("BEST {}", self.best);
            screen.text(WIDTH - 2 - best.len() as i32, 0, &best, Color::LIGHT_BLUE);
        }

        if self.game_over {
            let msg = "GAME OVER";
            let sub = "blink or SPACE to retry";
            let y = HEIGHT / 2 - 8;
            screen.text(centered_x(WIDTH, msg), y, msg, Color::WHITE);
            screen.text(centered_x(WIDTH, sub), y + 4, sub, Color::DARK_BLUE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::domain::input_event::ProviderKind;
    use crate::runtime::domain::pixel_canvas::PixelCanvas;

    fn press(button: Button) -> InputEvent {
        InputEvent::new(InputKind::ActionPress(button), ProviderKind::Keyboard)
    }

    fn run_until_over(game: &mut RunnerGame) -> u64 {
        let mut frames = 0;
        while !game.is_game_over() && frames < 10_000 {
            game.update();
            frames += 1;
        }
        frames
    }

    #[test]
    fn test_jump_leaves_ground_and_lands() {
        let mut game = RunnerGame::new();
        game.on_event(&press(Button::Primary));
        game.update();
        assert!(game.py < GROUND_Y);

        for _ in 0..60 {
            game.update();
        }
        assert!(game.on_ground);
        assert_eq!(game.py, GROUND_Y);
    }

    #[test]
    fn test_other_buttons_do_not_jump() {
        let mut game = RunnerGame::new();
        game.on_event(&press(Button::Secondary));
        game.update();
        assert!(game.on_ground);
    }

    #[test]
    fn test_idle_player_eventually_collides() {
        let mut game = RunnerGame::new();
        let frames = run_until_over(&mut game);
        assert!(game.is_game_over());
        assert!(frames < 10_000);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_restart_after_game_over_keeps_best() {
        let mut game = RunnerGame::new();
        run_until_over(&mut game);
        game.best = 7;

        game.on_event(&press(Button::Primary));

        assert!(!game.is_game_over());
        assert_eq!(game.score(), 0);
        assert_eq!(game.best, 7);
        assert!(game.obstacles.is_empty());
    }

    #[test]
    fn test_draw_shows_score_and_game_over() {
        let mut game = RunnerGame::new();
        run_until_over(&mut game);
        let mut canvas = PixelCanvas::new(SCREEN_WIDTH, SCREEN_HEIGHT);

        game.draw(&mut canvas);

        let text = canvas.text_content();
        assert!(text.contains("SCORE 0"));
        assert!(text.contains("GAME OVER"));
    }
}

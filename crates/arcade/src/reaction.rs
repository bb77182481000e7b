//! Speed React: read a two-line scene, then answer with the right face
//! before the gauge runs out. Surprise is an open mouth, smile is a smile.

use faceplay_core::games::domain::game_plugin::GamePlugin;
use faceplay_core::input::domain::input_event::{Button, InputEvent, InputKind};
use faceplay_core::runtime::domain::screen::{centered_x, Color, Screen};
use faceplay_core::shared::constants::{SCREEN_HEIGHT, SCREEN_WIDTH};

const WIDTH: i32 = SCREEN_WIDTH as i32;
const HEIGHT: i32 = SCREEN_HEIGHT as i32;

const COUNTDOWN: [u32; 3] = [3, 2, 1];
const COUNTDOWN_INTERVAL: u32 = 15;
const TOTAL_ROUNDS: usize = 5;
const LINE2_DELAY: u32 = 90;
const PROMPT_DELAY: u32 = 30;
const REACTION_WINDOW: u32 = 120;
const RESULT_HOLD: u32 = 60;
const PROMPT_BLINK: u32 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reaction {
    Surprise,
    Smile,
}

impl Reaction {
    fn from_button(button: Button) -> Option<Self> {
        match button {
            Button::Secondary => Some(Reaction::Surprise),
            Button::Tertiary => Some(Reaction::Smile),
            Button::Primary => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Reaction::Surprise => "SURPRISE!",
            Reaction::Smile => "SMILE!",
        }
    }
}

struct Scene {
    line1: &'static str,
    line2: &'static str,
    answer: Reaction,
}

static SCENES: [Scene; 7] = [
    Scene { line1: "A gift box!", line2: "It's a puppy", answer: Reaction::Smile },
    Scene { line1: "Lights off...", line2: "BOO!", answer: Reaction::Surprise },
    Scene { line1: "Your friend", line2: "tells a joke", answer: Reaction::Smile },
    Scene { line1: "The floor", line2: "is gone!", answer: Reaction::Surprise },
    Scene { line1: "Cake time", line2: "with candles", answer: Reaction::Smile },
    Scene { line1: "A knock...", line2: "a bear!", answer: Reaction::Surprise },
    Scene { line1: "You won", line2: "first prize", answer: Reaction::Smile },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Verdict {
    Good,
    Bad,
    TimeUp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Title,
    Countdown,
    Scene,
    Verdict(Verdict),
    Results,
}

pub struct ReactionGame {
    phase: Phase,
    timer: u32,
    round: usize,
    order: Vec<usize>,
    score: u32,
    games_played: usize,
    leave: bool,
}

pub fn create() -> Box<dyn GamePlugin> {
    Box::new(ReactionGame::new())
}

impl ReactionGame {
    pub fn new() -> Self {
        Self {
            phase: Phase::Title,
            timer: 0,
            round: 0,
            order: Vec::new(),
            score: 0,
            games_played: 0,
            leave: false,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Results
    }

    /// Each new game starts further along the scene list.
    fn start(&mut self) {
        let offset = self.games_played * TOTAL_ROUNDS;
        self.order = (0..TOTAL_ROUNDS)
            .map(|i| (offset + i) % SCENES.len())
            .collect();
        self.games_played += 1;
        self.round = 0;
        self.score = 0;
        self.enter(Phase::Countdown);
    }

    fn enter(&mut self, phase: Phase) {
        self.phase = phase;
        self.timer = 0;
    }

    fn scene(&self) -> &'static Scene {
        &SCENES[self.order.get(self.round).copied().unwrap_or(0)]
    }

    fn answer_open(&self) -> bool {
        self.phase == Phase::Scene && self.timer >= LINE2_DELAY + PROMPT_DELAY
    }

    fn answer(&mut self, reaction: Reaction) {
        let verdict = if reaction == self.scene().answer {
            self.score += 1;
            Verdict::Good
        } else {
            Verdict::Bad
        };
        self.enter(Phase::Verdict(verdict));
    }

    fn next_round(&mut self) {
        self.round += 1;
        if self.round >= TOTAL_ROUNDS {
            log::debug!("Reaction game finished with {}/{TOTAL_ROUNDS}", self.score);
            self.enter(Phase::Results);
        } else {
            self.enter(Phase::Scene);
        }
    }
}

fn center(screen: &mut dyn Screen, y: i32, text: &str, color: Color) {
    screen.text(centered_x(WIDTH, text), y, text, color);
}

impl Default for ReactionGame {
    fn default() -> Self {
        Self::new()
    }
}

impl GamePlugin for ReactionGame {
    fn on_event(&mut self, event: &InputEvent) {
        let InputKind::ActionPress(button) = event.kind else {
            return;
        };
        match self.phase {
            Phase::Title if button == Button::Tertiary || button == Button::Primary => self.start(),
            Phase::Scene if self.answer_open() => {
                if let Some(reaction) = Reaction::from_button(button) {
                    self.answer(reaction);
                }
            }
            Phase::Results => match button {
                Button::Tertiary => self.enter(Phase::Title),
                Button::Primary => self.leave = true,
                Button::Secondary => {}
            },
            _ => {}
        }
    }

    fn update(&mut self) {
        self.timer += 1;
        match self.phase {
            Phase::Countdown if self.timer >= COUNTDOWN_INTERVAL * COUNTDOWN.len() as u32 => {
                self.enter(Phase::Scene)
            }
            Phase::Scene if self.timer >= LINE2_DELAY + PROMPT_DELAY + REACTION_WINDOW => {
                self.enter(Phase::Verdict(Verdict::TimeUp))
            }
            Phase::Verdict(_) if self.timer >= RESULT_HOLD => self.next_round(),
            _ => {}
        }
    }

    fn draw(&self, screen: &mut dyn Screen) {
        screen.cls(Color::NAVY);
        let blink_on = (self.timer / PROMPT_BLINK) % 2 == 0;

        match self.phase {
            Phase::Title => {
                center(screen, 18, "SPEED REACT", Color::YELLOW);
                if blink_on {
                    center(screen, 34, "Smile to start!", Color::WHITE);
                }
                center(screen, 48, "mouth: surprise", Color::LIGHT_BLUE);
                center(screen, 52, "smile: smile", Color::LIGHT_BLUE);
            }
            Phase::Countdown => {
                let step = (self.timer / COUNTDOWN_INTERVAL) as usize;
                let value = COUNTDOWN.get(step).copied().unwrap_or(1);
                center(screen, HEIGHT / 2 - 2, &value.to_string(), Color::YELLOW);
            }
            Phase::Scene => {
                let scene = self.scene();
                screen.text(2, 0, &format!("Q{}/{TOTAL_ROUNDS}", self.round + 1), Color::GRAY);
                screen.rect(4, 10, WIDTH - 8, 24, Color::BLACK);
                screen.rectb(4, 10, WIDTH - 8, 24, Color::WHITE);
                center(screen, 14, scene.line1, Color::WHITE);
                if self.timer >= LINE2_DELAY {
                    center(screen, 22, scene.line2, Color::WHITE);
                }
                if self.answer_open() {
                    let left = LINE2_DELAY + PROMPT_DELAY + REACTION_WINDOW - self.timer;
                    let gauge = (WIDTH - 12) * left as i32 / REACTION_WINDOW as i32;
                    screen.rect(6, 40, gauge, 3, Color::LIME);
                    center(screen, 48, "REACT!", Color::YELLOW);
                }
            }
            Phase::Verdict(verdict) => {
                let (msg, color) = match verdict {
                    Verdict::Good => ("GOOD!", Color::LIME),
                    Verdict::Bad => ("BAD...", Color::RED),
                    Verdict::TimeUp => ("TIME UP!", Color::ORANGE),
                };
                center(screen, 20, msg, color);
                let answer = format!("answer: {}", self.scene().answer.label());
                center(screen, 32, &answer, Color::WHITE);
            }
            Phase::Results => {
                center(screen, 14, "RESULTS", Color::YELLOW);
                let score = format!("SCORE {}/{TOTAL_ROUNDS}", self.score);
                center(screen, 26, &score, Color::WHITE);
                center(screen, 44, "Smile to return", Color::LIGHT_BLUE);
                center(screen, 50, "Blink for menu", Color::LIGHT_BLUE);
            }
        }
    }

    fn wants_menu(&self) -> bool {
        self.leave
    }
}

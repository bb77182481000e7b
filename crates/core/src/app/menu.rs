use crate::games::domain::game_registry::GameRegistry;
use crate::input::domain::input_event::ProviderKind;
use crate::input::domain::key_state::{Key, KeyState};
use crate::runtime::domain::screen::{centered_x, Color, Screen};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Start(String),
    Exit,
}

/// Game picker. Always driven by the keyboard, whatever provider the games
/// use.
pub struct Menu {
    items: Vec<(String, String)>,
    index: usize,
    previous: KeyState,
    blink: u32,
    input_label: String,
}

impl Menu {
    pub fn new(registry: &GameRegistry, provider: ProviderKind) -> Self {
        Self {
            items: registry
                .descriptors()
                .map(|d| (d.name.clone(), d.origin.to_string()))
                .collect(),
            index: 0,
            previous: KeyState::new(),
            blink: 0,
            input_label: format!("input: {provider}"),
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.items.get(self.index).map(|(name, _)| name.as_str())
    }

    /// Treat `keys` as already seen, so keys held while entering the menu
    /// do not act on it.
    pub fn settle(&mut self, keys: &KeyState) {
        self.previous = keys.clone();
    }

    pub fn handle_keys(&mut self, keys: &KeyState) -> Option<MenuAction> {
        let previous = &self.previous;
        let pressed = |key: Key| keys.is_held(key) && !previous.is_held(key);
        let exit = pressed(Key::Escape) || pressed(Key::Char('q'));
        let confirm = pressed(Key::Enter);
        let up = pressed(Key::Up) || pressed(Key::Char('w'));
        let down = pressed(Key::Down) || pressed(Key::Char('s')) || pressed(Key::Space);

        let action = if exit {
            Some(MenuAction::Exit)
        } else if confirm {
            self.selected().map(|name| MenuAction::Start(name.to_string()))
        } else {
            if up {
                self.step(-1);
            }
            if down {
                self.step(1);
            }
            None
        };
        self.previous = keys.clone();
        self.blink = (self.blink + 1) % 60;
        action
    }

    fn step(&mut self, delta: isize) {
        if self.items.is_empty() {
            return;
        }
        let len = self.items.len() as isize;
        self.index = (self.index as isize + delta).rem_euclid(len) as usize;
    }

    pub fn draw(&self, screen: &mut dyn Screen) {
        let width = screen.width();
        screen.cls(Color::BLACK);

        let title = "FACEPLAY";
        let help = "UP/DOWN move  ENTER start  ESC quit";
        screen.text(centered_x(width, title), 2, title, Color::WHITE);
        screen.text(centered_x(width, help), 6, help, Color::LIGHT_BLUE);
        screen.line(4, 10, width - 5, 10, Color::NAVY);

        if self.items.is_empty() {
            let msg = "No games found.";
            screen.text(centered_x(width, msg), 24, msg, Color::RED);
        }

        for (i, (name, origin)) in self.items.iter().enumerate() {
            let y = 14 + i as i32 * 4;
            let current = i == self.index;
            let marker = if current && self.blink < 45 { ">" } else { " " };
            let color = if current { Color::LIME } else { Color::WHITE };
            screen.text(6, y, &format!("{marker} {name}"), color);
            screen.text(56, y, &format!("({origin})"), Color::DARK_BLUE);
        }

        screen.text(2, screen.height() - 2, &self.input_label, Color::DARK_BLUE);
    }
}

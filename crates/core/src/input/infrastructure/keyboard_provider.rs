use crate::input::domain::input_event::{Button, InputEvent, InputKind, ProviderKind};
use crate::input::domain::input_provider::InputProvider;
use crate::input::domain::key_state::{Key, KeyState};
use crate::input::domain::provider_config::ProviderConfig;
use crate::input::domain::provider_error::ProviderError;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Binding {
    Move(InputKind),
    Action(Button),
    Quit,
}

/// Scanned in order each poll, so simultaneous presses come out in this order.
const KEY_TABLE: [(Key, Binding); 13] = [
    (Key::Escape, Binding::Quit),
    (Key::Space, Binding::Action(Button::Primary)),
    (Key::Enter, Binding::Action(Button::Secondary)),
    (Key::Tab, Binding::Action(Button::Tertiary)),
    (Key::Up, Binding::Move(InputKind::MoveUp)),
    (Key::Char('w'), Binding::Move(InputKind::MoveUp)),
    (Key::Down, Binding::Move(InputKind::MoveDown)),
    (Key::Char('s'), Binding::Move(InputKind::MoveDown)),
    (Key::Left, Binding::Move(InputKind::MoveLeft)),
    (Key::Char('a'), Binding::Move(InputKind::MoveLeft)),
    (Key::Right, Binding::Move(InputKind::MoveRight)),
    (Key::Char('d'), Binding::Move(InputKind::MoveRight)),
    (Key::Char('q'), Binding::Quit),
];

/// Fallback provider driven by the runtime's key snapshot.
///
/// Events come from differences between consecutive snapshots, so the
/// output depends only on the sequence of key states. Keys held at `settle`
/// stay silent until released, release included.
pub struct KeyboardProvider {
    previous: KeyState,
    settled: KeyState,
    active: bool,
}

impl KeyboardProvider {
    pub fn new() -> Self {
        Self {
            previous: KeyState::new(),
            settled: KeyState::new(),
            active: false,
        }
    }
}

impl Default for KeyboardProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InputProvider for KeyboardProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Keyboard
    }

    fn initialize(&mut self, _config: &ProviderConfig) -> Result<(), ProviderError> {
        self.previous = KeyState::new();
        self.settled = KeyState::new();
        self.active = true;
        Ok(())
    }

    fn settle(&mut self, keys: &KeyState) {
        self.previous = keys.clone();
        self.settled = keys.clone();
    }

    fn poll(&mut self, keys: &KeyState) -> Vec<InputEvent> {
        if !self.active {
            return Vec::new();
        }

        let settled: Vec<Key> = self.settled.iter().collect();
        for key in settled {
            if !keys.is_held(key) {
                self.settled.release(key);
            }
        }

        let mut events = Vec::new();
        for (key, binding) in KEY_TABLE {
            if self.settled.is_held(key) {
                continue;
            }
            let was = self.previous.is_held(key);
            let is = keys.is_held(key);
            let kind = match (binding, was, is) {
                (Binding::Move(kind), false, true) => kind,
                (Binding::Action(button), false, true) => InputKind::ActionPress(button),
                (Binding::Action(button), true, false) => InputKind::ActionRelease(button),
                (Binding::Quit, false, true) => InputKind::Quit,
                _ => continue,
            };
            events.push(InputEvent::new(kind, ProviderKind::Keyboard));
        }

        self.previous = keys.clone();
        events
    }

    fn shutdown(&mut self) {
        self.active = false;
        self.previous = KeyState::new();
        self.settled = KeyState::new();
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

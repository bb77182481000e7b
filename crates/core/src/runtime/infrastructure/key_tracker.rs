use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::input::domain::key_state::{Key, KeyState};
use crate::runtime::domain::runtime::FrameInput;

/// Folds crossterm events into a per-frame [`KeyState`].
///
/// Terminals that report key releases give true held state. Elsewhere a
/// press is visible for exactly one frame.
pub struct KeyTracker {
    held: KeyState,
    taps: Vec<Key>,
    release_events: bool,
    terminate: bool,
}

impl KeyTracker {
    pub fn new(release_events: bool) -> Self {
        Self {
            held: KeyState::new(),
            taps: Vec::new(),
            release_events,
            terminate: false,
        }
    }

    pub fn handle(&mut self, event: &Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::FocusLost => self.held = KeyState::new(),
            _ => {}
        }
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if event.kind != KeyEventKind::Release
            && event.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(event.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            self.terminate = true;
            return;
        }

        let Some(key) = map_key(event.code) else {
            return;
        };
        match (event.kind, self.release_events) {
            (KeyEventKind::Release, _) => self.held.release(key),
            (_, true) => self.held.press(key),
            (_, false) => self.taps.push(key),
        }
    }

    /// Key state for the frame about to run. One-frame taps are consumed.
    pub fn frame(&mut self) -> FrameInput {
        let mut keys = self.held.clone();
        for key in self.taps.drain(..) {
            keys.press(key);
        }
        FrameInput {
            keys,
            terminate: self.terminate,
        }
    }

    /// The terminal stopped delivering input.
    pub fn hang_up(&mut self) {
        self.terminate = true;
    }

    pub fn is_terminating(&self) -> bool {
        self.terminate
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Esc => Key::Escape,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(c) => Key::Char(c.to_ascii_lowercase()),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_release_aware_terminal_tracks_held_keys() {
        let mut tracker = KeyTracker::new(true);
        tracker.handle(&key(KeyCode::Char(' '), KeyEventKind::Press));

        assert!(tracker.frame().keys.is_held(Key::Space));
        assert!(tracker.frame().keys.is_held(Key::Space));

        tracker.handle(&key(KeyCode::Char(' '), KeyEventKind::Release));
        assert!(tracker.frame().keys.is_empty());
    }

    #[test]
    fn test_press_only_terminal_taps_for_one_frame() {
        let mut tracker = KeyTracker::new(false);
        tracker.handle(&key(KeyCode::Enter, KeyEventKind::Press));

        assert!(tracker.frame().keys.is_held(Key::Enter));
        assert!(tracker.frame().keys.is_empty());
    }

    #[test]
    fn test_characters_are_lowercased() {
        let mut tracker = KeyTracker::new(true);
        tracker.handle(&key(KeyCode::Char('W'), KeyEventKind::Press));
        assert!(tracker.frame().keys.is_held(Key::Char('w')));
    }

    #[test]
    fn test_ctrl_c_terminates() {
        let mut tracker = KeyTracker::new(false);
        tracker.handle(&Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert!(tracker.is_terminating());
        let frame = tracker.frame();
        assert!(frame.terminate);
        assert!(frame.keys.is_empty());
    }

    #[test]
    fn test_hang_up_terminates() {
        let mut tracker = KeyTracker::new(true);
        tracker.hang_up();
        assert!(tracker.is_terminating());
        assert!(tracker.frame().terminate);
    }

    #[test]
    fn test_focus_lost_clears_held() {
        let mut tracker = KeyTracker::new(true);
        tracker.handle(&key(KeyCode::Left, KeyEventKind::Press));
        tracker.handle(&Event::FocusLost);
        assert!(tracker.frame().keys.is_empty());
    }
}

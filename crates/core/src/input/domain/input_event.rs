//! Semantic input signals, independent of the device that produced them.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use super::provider_error::ProviderError;

/// Logical action buttons. Games decide what each one does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Primary,
    Secondary,
    Tertiary,
}

impl Button {
    pub const ALL: [Button; 3] = [Button::Primary, Button::Secondary, Button::Tertiary];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputKind {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    ActionPress(Button),
    ActionRelease(Button),
    /// Leave the current game.
    Quit,
}

/// Which provider produced an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Keyboard,
    MediapipeFace,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::MediapipeFace, ProviderKind::Keyboard];

    /// Name accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            ProviderKind::Keyboard => "keyboard",
            ProviderKind::MediapipeFace => "mediapipe_face",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ProviderError::UnknownProvider(s.to_string()))
    }
}

/// One discrete input signal.
///
/// `value` carries the measurement that triggered the event (for example
/// the mouth-openness score); keyboard events use 1.0.
#[derive(Clone, Debug, PartialEq)]
pub struct InputEvent {
    pub kind: InputKind,
    pub origin: ProviderKind,
    pub value: f64,
    pub at: Instant,
}

impl InputEvent {
    pub fn new(kind: InputKind, origin: ProviderKind) -> Self {
        Self {
            kind,
            origin,
            value: 1.0,
            at: Instant::now(),
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn is_quit(&self) -> bool {
        self.kind == InputKind::Quit
    }
}

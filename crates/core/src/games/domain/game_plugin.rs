use crate::input::domain::input_event::InputEvent;
use crate::runtime::domain::screen::Screen;

/// A game the app can run.
///
/// Per frame the app delivers every pending event through `on_event`, then
/// calls `update` once and `draw` once. A game never sees `Quit`; the app
/// handles it.
pub trait GamePlugin {
    fn on_event(&mut self, event: &InputEvent);

    fn update(&mut self);

    fn draw(&self, screen: &mut dyn Screen);

    /// Checked after `update`; true hands control back to the menu.
    fn wants_menu(&self) -> bool {
        false
    }
}

/// Fixed-signature constructor every game exposes.
pub type GameFactory = fn() -> Box<dyn GamePlugin>;

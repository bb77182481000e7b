use crate::games::domain::game_plugin::GamePlugin;
use crate::games::domain::game_registry::GameRegistry;
use crate::input::domain::input_provider::ProviderGuard;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Menu,
    Playing,
    Exiting,
}

/// Everything the frame loop owns. A game and a provider exist together
/// while `Playing` and not at all otherwise.
pub struct AppState {
    pub registry: GameRegistry,
    pub provider: Option<ProviderGuard>,
    pub active_game: Option<Box<dyn GamePlugin>>,
    pub mode: Mode,
}

impl AppState {
    pub fn new(registry: GameRegistry) -> Self {
        Self {
            registry,
            provider: None,
            active_game: None,
            mode: Mode::Menu,
        }
    }

    pub fn begin(&mut self, game: Box<dyn GamePlugin>, provider: ProviderGuard) {
        self.end();
        self.active_game = Some(game);
        self.provider = Some(provider);
        self.mode = Mode::Playing;
    }

    /// Drop the game and release the provider. Leaves `mode` to the caller.
    pub fn end(&mut self) {
        self.active_game = None;
        self.provider = None;
    }

    pub fn is_playing(&self) -> bool {
        self.mode == Mode::Playing
    }
}

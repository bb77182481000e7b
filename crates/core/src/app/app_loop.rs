use std::time::Instant;

use thiserror::Error;

use crate::games::domain::game_registry::{GameRegistry, RegistryError};
use crate::input::domain::input_event::ProviderKind;
use crate::input::domain::input_provider::{ProviderFactory, ProviderGuard};
use crate::input::domain::key_state::KeyState;
use crate::input::domain::provider_config::ProviderConfig;
use crate::input::domain::provider_error::ProviderError;
use crate::runtime::domain::pixel_canvas::PixelCanvas;
use crate::runtime::domain::runtime::{FrameInput, Runtime, RuntimeError};
use crate::shared::constants::{SCREEN_HEIGHT, SCREEN_WIDTH};

use super::app_state::{AppState, Mode};
use super::loop_logger::{LoopLogger, NullLoopLogger};
use super::menu::{Menu, MenuAction};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// The frame loop: menu, game switching and provider lifetime.
///
/// Each tick polls the provider, forwards its events to the game in order,
/// updates and draws. A `Quit` event, or a game asking for the menu, drops
/// the game and releases the provider before the menu is drawn.
pub struct App {
    state: AppState,
    menu: Menu,
    factory: Box<dyn ProviderFactory>,
    config: ProviderConfig,
    canvas: PixelCanvas,
    logger: Box<dyn LoopLogger>,
    /// Set when launched straight into a game; leaving it ends the app.
    exit_on_leave: bool,
}

impl App {
    pub fn new(
        registry: GameRegistry,
        provider: ProviderKind,
        factory: Box<dyn ProviderFactory>,
        config: ProviderConfig,
    ) -> Self {
        let menu = Menu::new(&registry, provider);
        Self {
            state: AppState::new(registry),
            menu,
            factory,
            config,
            canvas: PixelCanvas::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            logger: Box::new(NullLoopLogger),
            exit_on_leave: false,
        }
    }

    pub fn with_logger(mut self, logger: Box<dyn LoopLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn canvas(&self) -> &PixelCanvas {
        &self.canvas
    }

    pub fn logger(&self) -> &dyn LoopLogger {
        self.logger.as_ref()
    }

    /// Skip the menu and start `name` directly. Leaving that game exits.
    pub fn launch(&mut self, name: &str) -> Result<(), AppError> {
        self.exit_on_leave = true;
        self.start_game(name, &KeyState::new())?;
        self.draw();
        Ok(())
    }

    /// Instantiate the game, then acquire a fresh provider for it. Nothing
    /// changes if either step fails.
    pub fn start_game(&mut self, name: &str, keys: &KeyState) -> Result<(), AppError> {
        let game = self.state.registry.instantiate(name)?;
        let mut provider = ProviderGuard::acquire(self.factory.create(), &self.config)?;
        provider.settle(keys);
        self.state.begin(game, provider);
        log::info!("Started game '{name}'");
        Ok(())
    }

    /// Drop the game and its provider and go back to the menu.
    pub fn return_to_menu(&mut self, keys: &KeyState) {
        self.state.end();
        if self.exit_on_leave {
            self.state.mode = Mode::Exiting;
        } else {
            self.menu.settle(keys);
            self.state.mode = Mode::Menu;
        }
    }

    pub fn exit(&mut self) {
        self.state.end();
        self.state.mode = Mode::Exiting;
    }

    /// Advance one frame and redraw the canvas.
    pub fn tick(&mut self, input: &FrameInput) -> Result<(), AppError> {
        if input.terminate {
            self.exit();
            return Ok(());
        }
        match self.state.mode {
            Mode::Menu => match self.menu.handle_keys(&input.keys) {
                Some(MenuAction::Start(name)) => self.start_game(&name, &input.keys)?,
                Some(MenuAction::Exit) => self.exit(),
                None => {}
            },
            Mode::Playing => self.play_frame(&input.keys),
            Mode::Exiting => {}
        }
        self.draw();
        Ok(())
    }

    fn play_frame(&mut self, keys: &KeyState) {
        let (Some(provider), Some(game)) =
            (self.state.provider.as_mut(), self.state.active_game.as_mut())
        else {
            self.return_to_menu(keys);
            return;
        };

        let start = Instant::now();
        let events = provider.poll(keys);
        self.logger.timing("poll", elapsed_ms(start));
        self.logger.metric("events", events.len() as f64);

        let start = Instant::now();
        let mut leave = false;
        for event in &events {
            if event.is_quit() {
                log::debug!("Quit from {}", event.origin);
                leave = true;
                break;
            }
            game.on_event(event);
        }
        if !leave {
            game.update();
            leave = game.wants_menu();
        }
        self.logger.timing("update", elapsed_ms(start));

        if leave {
            self.return_to_menu(keys);
        }
    }

    fn draw(&mut self) {
        let start = Instant::now();
        match (self.state.mode, self.state.active_game.as_ref()) {
            (Mode::Playing, Some(game)) => game.draw(&mut self.canvas),
            (Mode::Menu, _) => self.menu.draw(&mut self.canvas),
            _ => return,
        }
        self.logger.timing("draw", elapsed_ms(start));
    }

    /// Run until the user exits or the runtime terminates. The provider is
    /// released on every exit path.
    pub fn run(&mut self, runtime: &mut dyn Runtime) -> Result<(), AppError> {
        if self.state.mode == Mode::Menu {
            self.draw();
        }
        let result = self.run_frames(runtime);
        self.exit();
        result
    }

    fn run_frames(&mut self, runtime: &mut dyn Runtime) -> Result<(), AppError> {
        while self.state.mode != Mode::Exiting {
            runtime.present(&self.canvas)?;
            let input = runtime.next_frame()?;
            self.tick(&input)?;
            self.logger.frame();
        }
        Ok(())
    }
}

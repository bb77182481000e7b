use thiserror::Error;

use crate::input::domain::key_state::KeyState;

use super::pixel_canvas::PixelCanvas;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// What the runtime observed since the previous frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub keys: KeyState,
    /// Ctrl+C, or the terminal stopped delivering input.
    pub terminate: bool,
}

/// Window, clock and keyboard owned by the host.
pub trait Runtime {
    /// Block until the next frame is due and report the key state.
    fn next_frame(&mut self) -> Result<FrameInput, RuntimeError>;

    fn present(&mut self, canvas: &PixelCanvas) -> Result<(), RuntimeError>;
}

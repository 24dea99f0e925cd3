use winit::event::WindowEvent;

use super::ctx::FrameCtx;

/// Quit-state reported by app callbacks and stored by the runtime.
///
/// `Continue` keeps the loop alive; the two terminal values end it and select
/// the process exit status.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum AppResult {
    #[default]
    Continue,
    Success,
    Failure,
}

impl AppResult {
    #[inline]
    pub fn is_terminal(self) -> bool {
        self != AppResult::Continue
    }
}

/// Application contract implemented by higher layers.
pub trait App {
    /// Called once after the GL context is current and before the window is shown.
    ///
    /// An error here is fatal: the runtime logs it and exits without drawing.
    fn init(&mut self, gl: &glow::Context) -> anyhow::Result<()>;

    /// Called for window events.
    ///
    /// Closing the window is handled by the runtime; apps only need this for
    /// extra behavior.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppResult {
        let _ = event;
        AppResult::Continue
    }

    /// Called once per loop tick.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppResult;

    /// Called once, while the GL context is still current, before it is destroyed.
    fn on_teardown(&mut self, gl: &glow::Context) {
        let _ = gl;
    }
}

use winit::window::Window;

use crate::device::{GlDevice, SwapErrorAction};
use crate::paint::Color;
use crate::render::frame;

use super::app::AppResult;

/// Per-frame context passed to `core::App::on_frame`.
pub struct FrameCtx<'a> {
    pub window: &'a Window,
    pub device: &'a GlDevice,
    /// Zero-based index of the frame being drawn.
    pub frame_index: u64,
}

impl<'a> FrameCtx<'a> {
    /// Returns the GL function table.
    #[inline]
    pub fn gl(&self) -> &'a glow::Context {
        self.device.gl()
    }

    /// Clears the back buffer with `clear`, calls `draw`, then presents the frame.
    ///
    /// Returns `Failure` only when presenting reports a lost context or surface.
    pub fn render<F>(&mut self, clear: Color, draw: F) -> AppResult
    where
        F: FnOnce(&glow::Context),
    {
        let gl = self.gl();

        frame::clear(gl, clear);
        draw(gl);

        if cfg!(debug_assertions) && self.frame_index == 0 {
            frame::drain_errors(gl, "first frame");
        }

        self.window.pre_present_notify();

        match self.device.swap_buffers() {
            Ok(()) | Err(SwapErrorAction::SkipFrame) => AppResult::Continue,
            Err(SwapErrorAction::Fatal) => AppResult::Failure,
        }
    }
}

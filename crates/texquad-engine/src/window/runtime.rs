use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppResult, FrameCtx, Lifecycle, Phase};
use crate::device::{GlDevice, GlInit};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "texquad".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            resizable: true,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs `app` in a single window until it quits.
    ///
    /// Returns the final quit-state; `Err` is reserved for the event loop itself
    /// failing. Initialization failures are logged and reported as
    /// [`AppResult::Failure`].
    pub fn run<A>(config: RuntimeConfig, gl_init: GlInit, app: A) -> Result<AppResult>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gl_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(state.outcome())
    }
}

/// Window, GL device and frame counter for the running app.
///
/// Field order is drop order: GL context and surface first, then the window.
struct AppContext {
    device: GlDevice,
    window: Window,
    frame_index: u64,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gl_init: GlInit,
    app: A,

    context: Option<AppContext>,
    lifecycle: Lifecycle,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gl_init: GlInit, app: A) -> Self {
        Self {
            config,
            gl_init,
            app,
            context: None,
            lifecycle: Lifecycle::new(),
        }
    }

    /// Creates the window and GL context, runs app init, then shows the window.
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_resizable(self.config.resizable)
            .with_visible(false);

        let (window, device) = GlDevice::create(event_loop, attrs, &self.gl_init)?;

        let app_init = self.app.init(device.gl());
        if app_init.is_ok() {
            window.set_visible(true);
            window.request_redraw();
        }

        // Stored even on failure so teardown still hands the context to the app.
        self.context = Some(AppContext {
            device,
            window,
            frame_index: 0,
        });

        app_init.context("application init failed")?;
        self.lifecycle.start();
        Ok(())
    }

    /// Drives one frame and returns the quit-state observed after it.
    fn iterate(&mut self) -> AppResult {
        let Some(ctx) = self.context.as_mut() else {
            return self.lifecycle.quit_state();
        };

        let mut frame = FrameCtx {
            window: &ctx.window,
            device: &ctx.device,
            frame_index: ctx.frame_index,
        };

        let result = self.app.on_frame(&mut frame);
        ctx.frame_index = ctx.frame_index.wrapping_add(1);

        self.lifecycle.request(result);
        self.lifecycle.quit_state()
    }

    /// Releases the GL context and window. Does nothing if they are already gone.
    fn teardown(&mut self) {
        let Some(ctx) = self.context.take() else {
            return;
        };

        self.app.on_teardown(ctx.device.gl());

        let AppContext {
            device,
            window,
            frame_index,
        } = ctx;
        drop(device);
        drop(window);

        log::debug!("GL context and window destroyed after {frame_index} frames");
    }

    /// Whether the loop should stop at the end of this tick.
    ///
    /// A quit request is honored here even when no redraw arrives, since
    /// minimized or occluded windows may never get `RedrawRequested`.
    fn should_shut_down(&self) -> bool {
        self.lifecycle.should_exit()
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.teardown();
        event_loop.exit();
    }

    /// Tears down (if still needed) and returns the final result.
    fn outcome(&mut self) -> AppResult {
        self.teardown();
        match self.lifecycle.finish() {
            Some(result) => result,
            None => match self.lifecycle.phase() {
                Phase::Finished(result) => result,
                _ => AppResult::Failure,
            },
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.context.is_some() || self.lifecycle.phase() != Phase::Uninitialized {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            log::error!("Error {e:#}");
            self.lifecycle.fail();
            self.shutdown(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_shut_down() {
            self.shutdown(event_loop);
            return;
        }

        if self.context.is_none() {
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw.
        if let Some(ctx) = &self.context {
            ctx.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(ctx) = &self.context else {
            return;
        };
        if ctx.window.id() != window_id {
            return;
        }

        let app_result = self.app.on_window_event(&event);
        self.lifecycle.request(app_result);
        self.lifecycle.handle_event(&event);

        if let WindowEvent::RedrawRequested = event {
            if self.iterate().is_terminal() {
                self.shutdown(event_loop);
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingApp {
        teardowns: usize,
    }

    impl CoreApp for RecordingApp {
        fn init(&mut self, _gl: &glow::Context) -> Result<()> {
            Ok(())
        }

        fn on_frame(&mut self, _ctx: &mut FrameCtx<'_>) -> AppResult {
            AppResult::Continue
        }

        fn on_teardown(&mut self, _gl: &glow::Context) {
            self.teardowns += 1;
        }
    }

    fn state() -> AppState<RecordingApp> {
        AppState::new(RuntimeConfig::default(), GlInit::default(), RecordingApp::default())
    }

    #[test]
    fn teardown_without_context_is_a_no_op() {
        let mut s = state();
        s.teardown();
        s.teardown();
        assert_eq!(s.app.teardowns, 0);
        assert!(s.context.is_none());
    }

    #[test]
    fn iterate_without_context_reports_stored_state() {
        let mut s = state();
        assert_eq!(s.iterate(), AppResult::Continue);
        s.lifecycle.fail();
        assert_eq!(s.iterate(), AppResult::Failure);
    }

    #[test]
    fn loop_that_never_initialized_is_a_failure() {
        let mut s = state();
        assert_eq!(s.outcome(), AppResult::Failure);
        // Repeated calls keep reporting the same result.
        assert_eq!(s.outcome(), AppResult::Failure);
    }

    #[test]
    fn quit_after_start_is_a_success() {
        let mut s = state();
        s.lifecycle.start();
        s.lifecycle.handle_event(&WindowEvent::CloseRequested);
        assert_eq!(s.iterate(), AppResult::Success);
        assert_eq!(s.outcome(), AppResult::Success);
    }

    #[test]
    fn running_loop_keeps_ticking() {
        let mut s = state();
        s.lifecycle.start();
        s.lifecycle.handle_event(&WindowEvent::Focused(false));
        assert!(!s.should_shut_down());
    }

    #[test]
    fn close_request_shuts_down_without_a_redraw() {
        let mut s = state();
        s.lifecycle.start();
        s.lifecycle.handle_event(&WindowEvent::CloseRequested);

        // No `iterate()` call: the tick itself must notice the request.
        assert!(s.should_shut_down());
        assert_eq!(s.outcome(), AppResult::Success);
    }

    #[test]
    fn failed_init_shuts_down() {
        let mut s = state();
        s.lifecycle.fail();
        assert!(s.should_shut_down());
    }
}

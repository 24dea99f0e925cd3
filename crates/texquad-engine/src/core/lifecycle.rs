use winit::event::WindowEvent;

use super::app::AppResult;

/// Coarse runtime phase.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Phase {
    Uninitialized,
    Running,
    Finished(AppResult),
}

/// Quit-state bookkeeping for one application run.
///
/// The event handler only ever records a quit request; the loop observes it
/// through [`Lifecycle::quit_state`] after the next frame.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    phase: Phase,
    quit: AppResult,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            phase: Phase::Uninitialized,
            quit: AppResult::Continue,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Marks initialization as complete. Ignored unless uninitialized.
    pub fn start(&mut self) {
        if self.phase == Phase::Uninitialized {
            self.phase = Phase::Running;
            self.quit = AppResult::Continue;
        }
    }

    /// Records a fatal condition.
    pub fn fail(&mut self) {
        self.request(AppResult::Failure);
    }

    /// Records a quit-state reported by a callback.
    ///
    /// The first terminal value wins; `Continue` never clears an earlier request.
    pub fn request(&mut self, result: AppResult) {
        if result.is_terminal() && !self.quit.is_terminal() {
            self.quit = result;
        }
    }

    /// Applies a window event to the quit-state.
    ///
    /// Always returns `Continue`: the decision to stop is surfaced through the
    /// stored state, not the callback result.
    pub fn handle_event(&mut self, event: &WindowEvent) -> AppResult {
        if let WindowEvent::CloseRequested = event {
            self.request(AppResult::Success);
        }
        AppResult::Continue
    }

    pub fn quit_state(&self) -> AppResult {
        self.quit
    }

    pub fn should_exit(&self) -> bool {
        self.quit.is_terminal()
    }

    /// Moves to the terminal phase and returns the final result.
    ///
    /// Returns `None` if already finished, so teardown paths run once.
    pub fn finish(&mut self) -> Option<AppResult> {
        if let Phase::Finished(_) = self.phase {
            return None;
        }

        // A loop that ends while still `Continue` was stopped externally.
        let result = match self.quit {
            AppResult::Continue if self.phase == Phase::Running => AppResult::Success,
            AppResult::Continue => AppResult::Failure,
            other => other,
        };

        self.phase = Phase::Finished(result);
        Some(result)
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uninitialized_and_continuing() {
        let lc = Lifecycle::new();
        assert_eq!(lc.phase(), Phase::Uninitialized);
        assert_eq!(lc.quit_state(), AppResult::Continue);
        assert!(!lc.should_exit());
    }

    #[test]
    fn close_request_sets_success_but_callback_continues() {
        let mut lc = Lifecycle::new();
        lc.start();

        let ret = lc.handle_event(&WindowEvent::CloseRequested);

        assert_eq!(ret, AppResult::Continue);
        assert_eq!(lc.quit_state(), AppResult::Success);
        assert!(lc.should_exit());
    }

    #[test]
    fn other_events_are_ignored() {
        let mut lc = Lifecycle::new();
        lc.start();

        assert_eq!(lc.handle_event(&WindowEvent::Focused(true)), AppResult::Continue);
        assert_eq!(lc.handle_event(&WindowEvent::RedrawRequested), AppResult::Continue);
        assert_eq!(lc.handle_event(&WindowEvent::Destroyed), AppResult::Continue);
        assert_eq!(lc.quit_state(), AppResult::Continue);
    }

    #[test]
    fn first_terminal_request_wins() {
        let mut lc = Lifecycle::new();
        lc.start();
        lc.handle_event(&WindowEvent::CloseRequested);
        lc.fail();
        lc.request(AppResult::Continue);
        assert_eq!(lc.quit_state(), AppResult::Success);
    }

    #[test]
    fn failure_before_start_finishes_as_failure() {
        let mut lc = Lifecycle::new();
        lc.fail();
        assert_eq!(lc.finish(), Some(AppResult::Failure));
        assert_eq!(lc.phase(), Phase::Finished(AppResult::Failure));
    }

    #[test]
    fn finish_runs_once() {
        let mut lc = Lifecycle::new();
        lc.start();
        lc.handle_event(&WindowEvent::CloseRequested);
        assert_eq!(lc.finish(), Some(AppResult::Success));
        assert_eq!(lc.finish(), None);
    }

    #[test]
    fn externally_stopped_running_loop_is_success() {
        let mut lc = Lifecycle::new();
        lc.start();
        assert_eq!(lc.finish(), Some(AppResult::Success));
    }

    #[test]
    fn start_is_ignored_after_finish() {
        let mut lc = Lifecycle::new();
        lc.fail();
        lc.finish();
        lc.start();
        assert_eq!(lc.phase(), Phase::Finished(AppResult::Failure));
    }
}

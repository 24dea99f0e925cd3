//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop) and
//! the application: the `App` callbacks, the quit-state they report, the
//! lifecycle bookkeeping the runtime keeps, and the per-frame context.

mod app;
mod ctx;
mod lifecycle;

pub use app::{App, AppResult};
pub use ctx::FrameCtx;
pub use lifecycle::{Lifecycle, Phase};

//! GL device + window surface management.
//!
//! This module is responsible for:
//! - picking a GL config and creating the window alongside it
//! - creating the GL context and window surface, and making them current
//! - loading GL entry points into a `glow::Context`
//! - presenting frames and classifying swap failures

mod config;
mod error;
mod gl;
mod init;

pub use error::SwapErrorAction;
pub use gl::GlDevice;
pub use init::GlInit;

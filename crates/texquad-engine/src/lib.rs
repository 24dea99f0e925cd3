//! texquad engine crate.
//!
//! This crate owns the platform + GL runtime pieces used by the demo binary:
//! window and context creation, the frame loop, and owned GL resource handles.

pub mod device;
pub mod window;
pub mod core;

pub mod logging;
pub mod paint;
pub mod render;

//! Color values shared between apps and the frame helpers.

pub mod color;

pub use color::Color;

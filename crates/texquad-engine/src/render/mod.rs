//! GL rendering subsystem.
//!
//! Every GL object is wrapped in an owned handle type (`ShaderProgram`,
//! `Texture`, `QuadMesh`); draws take those handles explicitly instead of
//! relying on whatever happens to be bound.
//!
//! Convention:
//! - positions are in normalized device coordinates
//! - texture rows are stored top to bottom, so `v` is flipped in the mesh

pub mod frame;
pub mod mesh;
pub mod shader;
pub mod texture;

pub use mesh::{AttributeNames, QuadMesh};
pub use shader::{ShaderDiagnostic, ShaderProgram, ShaderSources, ShaderStage};
pub use texture::{DecodedImage, PixelLayout, Texture, TextureError};

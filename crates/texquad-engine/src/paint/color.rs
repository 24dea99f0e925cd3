/// Straight-alpha RGBA color with `f32` channels in `[0, 1]`.
///
/// Used for framebuffer clears; no blending happens in this crate, so the
/// premultiplied form is never needed.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Dark slate blue-gray background.
    pub const SLATE: Color = Color::rgb(0.188, 0.22, 0.255);

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }
}

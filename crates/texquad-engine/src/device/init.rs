/// Initialization parameters for the GL layer.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or driver requirement exists.
#[derive(Debug, Clone)]
pub struct GlInit {
    /// Requested MSAA sample count. `0` disables multisampling.
    ///
    /// Treated as a preference; the closest available config is used.
    pub multisample: u8,

    /// Desktop GL version requested as `(major, minor)`.
    ///
    /// If the driver refuses it, a GLES 2.0 context is tried instead.
    pub gl_version: (u8, u8),

    /// Wait for vblank on swap. Best-effort.
    pub vsync: bool,
}

impl Default for GlInit {
    fn default() -> Self {
        Self {
            multisample: 0,
            gl_version: (2, 1),
            vsync: true,
        }
    }
}

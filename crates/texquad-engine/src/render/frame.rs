use glow::HasContext;

use crate::paint::Color;

/// Clears the color buffer.
pub fn clear(gl: &glow::Context, color: Color) {
    // SAFETY: state-only calls on the current context.
    unsafe {
        gl.clear_color(color.r, color.g, color.b, color.a);
        gl.clear(glow::COLOR_BUFFER_BIT);
    }
}

/// Drains the GL error queue, logging each entry. Returns how many were pending.
///
/// Only meant for debug builds; `glGetError` can stall the pipeline.
pub fn drain_errors(gl: &glow::Context, label: &str) -> usize {
    let mut count = 0;
    // SAFETY: query-only call on the current context.
    unsafe {
        loop {
            let err = gl.get_error();
            if err == glow::NO_ERROR {
                break;
            }
            log::warn!("GL error 0x{err:04X} after {label}");
            count += 1;
            // Without a context glGetError may keep returning an error forever.
            if count >= 16 {
                break;
            }
        }
    }
    count
}

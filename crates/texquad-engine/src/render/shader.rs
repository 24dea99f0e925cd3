use std::fmt;

use anyhow::{anyhow, Result};
use glow::HasContext;
use scopeguard::ScopeGuard;

/// Pipeline stage a diagnostic belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    /// Program link step.
    Link,
}

impl ShaderStage {
    /// GL shader type enum, `None` for the link step.
    pub fn gl_type(self) -> Option<u32> {
        match self {
            ShaderStage::Vertex => Some(glow::VERTEX_SHADER),
            ShaderStage::Fragment => Some(glow::FRAGMENT_SHADER),
            ShaderStage::Link => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Link => "link",
        }
    }
}

/// A compile or link failure recorded while building a program.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderDiagnostic {
    pub stage: ShaderStage,
    /// Driver info log, trimmed.
    pub message: String,
}

impl ShaderDiagnostic {
    pub(crate) fn new(stage: ShaderStage, log: &str) -> Self {
        let message = log.trim();
        Self {
            stage,
            message: if message.is_empty() {
                "(driver returned an empty info log)".to_string()
            } else {
                message.to_string()
            },
        }
    }
}

impl fmt::Display for ShaderDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} shader error: {}", self.stage.name(), self.message)
    }
}

/// GLSL source pair for one program.
#[derive(Debug, Copy, Clone)]
pub struct ShaderSources<'a> {
    pub vertex: &'a str,
    pub fragment: &'a str,
}

/// Linked GL program.
///
/// Building never aborts on bad GLSL: failures are logged, recorded in
/// [`diagnostics`](Self::diagnostics), and the handle is returned anyway. Drawing
/// with a program that is not [`usable`](Self::is_usable) renders nothing useful
/// but is otherwise harmless.
#[derive(Debug)]
pub struct ShaderProgram {
    raw: glow::Program,
    diagnostics: Vec<ShaderDiagnostic>,
}

impl ShaderProgram {
    /// Compiles both stages, links them, and makes the program current.
    ///
    /// Returns `Err` only if the driver cannot allocate GL objects at all.
    pub fn build(gl: &glow::Context, sources: &ShaderSources<'_>) -> Result<Self> {
        let mut diagnostics = Vec::new();

        // SAFETY: all calls below operate on objects created here, on the current context.
        unsafe {
            // Both guards delete their object if a later allocation fails.
            let program = scopeguard::guard(
                gl.create_program()
                    .map_err(|e| anyhow!("failed to create GL program: {e}"))?,
                |program| gl.delete_program(program),
            );

            let vertex = scopeguard::guard(
                compile_stage(gl, ShaderStage::Vertex, sources.vertex, &mut diagnostics)?,
                |shader| {
                    if let Some(shader) = shader {
                        gl.delete_shader(shader);
                    }
                },
            );
            let fragment =
                compile_stage(gl, ShaderStage::Fragment, sources.fragment, &mut diagnostics)?;

            let vertex = ScopeGuard::into_inner(vertex);
            let program = ScopeGuard::into_inner(program);

            let stages: Vec<glow::Shader> = [vertex, fragment].into_iter().flatten().collect();
            for &shader in &stages {
                gl.attach_shader(program, shader);
            }

            gl.link_program(program);

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                log::error!("shader program failed to link:\n{log}");
                diagnostics.push(ShaderDiagnostic::new(ShaderStage::Link, &log));
            }

            for shader in stages {
                gl.detach_shader(program, shader);
                gl.delete_shader(shader);
            }

            gl.use_program(Some(program));

            Ok(Self { raw: program, diagnostics })
        }
    }

    /// Returns `true` if every stage compiled and the program linked.
    pub fn is_usable(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[ShaderDiagnostic] {
        &self.diagnostics
    }

    /// Makes this program current.
    pub fn bind(&self, gl: &glow::Context) {
        // SAFETY: `raw` was created on this context.
        unsafe { gl.use_program(Some(self.raw)) }
    }

    /// Looks up a vertex attribute index by name.
    pub fn attrib_location(&self, gl: &glow::Context, name: &str) -> Option<u32> {
        // SAFETY: `raw` was created on this context.
        unsafe { gl.get_attrib_location(self.raw, name) }
    }

    pub fn uniform_location(&self, gl: &glow::Context, name: &str) -> Option<glow::UniformLocation> {
        // SAFETY: `raw` was created on this context.
        unsafe { gl.get_uniform_location(self.raw, name) }
    }

    /// Points a `sampler2D` uniform at a texture unit.
    ///
    /// The program is made current first, since uniforms apply to the current program.
    pub fn set_sampler(&self, gl: &glow::Context, name: &str, unit: u32) {
        let Some(location) = self.uniform_location(gl, name) else {
            log::warn!("sampler uniform `{name}` not found in program");
            return;
        };

        self.bind(gl);
        // SAFETY: `location` belongs to `raw`, which is current.
        unsafe { gl.uniform_1_i32(Some(&location), unit as i32) }
    }

    pub fn destroy(self, gl: &glow::Context) {
        // SAFETY: `raw` was created on this context and is not used after this call.
        unsafe { gl.delete_program(self.raw) }
    }
}

/// Compiles one stage. A failed compile is logged together with its source and
/// the shader object is deleted; `Ok(None)` is returned so the build continues.
unsafe fn compile_stage(
    gl: &glow::Context,
    stage: ShaderStage,
    source: &str,
    diagnostics: &mut Vec<ShaderDiagnostic>,
) -> Result<Option<glow::Shader>> {
    let Some(kind) = stage.gl_type() else {
        return Ok(None);
    };

    // SAFETY: caller guarantees a current context.
    unsafe {
        let shader = gl
            .create_shader(kind)
            .map_err(|e| anyhow!("failed to create {} shader: {e}", stage.name()))?;

        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if gl.get_shader_compile_status(shader) {
            log::debug!("{} shader compiled", stage.name());
            return Ok(Some(shader));
        }

        let log = gl.get_shader_info_log(shader);
        gl.delete_shader(shader);

        log::error!("{} shader failed to compile:\n{log}\n{source}", stage.name());
        diagnostics.push(ShaderDiagnostic::new(stage, &log));

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_maps_to_gl_enum() {
        assert_eq!(ShaderStage::Vertex.gl_type(), Some(glow::VERTEX_SHADER));
        assert_eq!(ShaderStage::Fragment.gl_type(), Some(glow::FRAGMENT_SHADER));
        assert_eq!(ShaderStage::Link.gl_type(), None);
    }

    #[test]
    fn diagnostic_trims_log() {
        let d = ShaderDiagnostic::new(ShaderStage::Vertex, "  0:1(1): error: syntax error\n\n");
        assert_eq!(d.message, "0:1(1): error: syntax error");
        assert_eq!(d.to_string(), "vertex shader error: 0:1(1): error: syntax error");
    }

    #[test]
    fn diagnostic_with_empty_log_still_says_something() {
        let d = ShaderDiagnostic::new(ShaderStage::Link, " \n");
        assert!(!d.message.is_empty());
        assert!(d.to_string().starts_with("link shader error"));
    }
}

use anyhow::{anyhow, Result};
use bytemuck::{Pod, Zeroable};
use glow::HasContext;
use scopeguard::ScopeGuard;

use super::shader::ShaderProgram;

// ── vertex data ───────────────────────────────────────────────────────────

/// 2-component float attribute value (position or texture coordinate).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vec2Attr {
    pub xy: [f32; 2],
}

const fn v(x: f32, y: f32) -> Vec2Attr {
    Vec2Attr { xy: [x, y] }
}

/// Unit quad centered at the origin, half-extent 0.5, in triangle-strip order:
/// bottom-left, bottom-right, top-left, top-right.
pub const QUAD_POSITIONS: [Vec2Attr; 4] = [
    v(-0.5, -0.5),
    v(0.5, -0.5),
    v(-0.5, 0.5),
    v(0.5, 0.5),
];

/// Texture coordinates matching [`QUAD_POSITIONS`].
///
/// `v` is flipped: image row 0 (top) maps to `v = 1` at the top of the quad.
pub const QUAD_TEX_COORDS: [Vec2Attr; 4] = [
    v(0.0, 1.0),
    v(1.0, 1.0),
    v(0.0, 0.0),
    v(1.0, 0.0),
];

pub const QUAD_VERTEX_COUNT: i32 = QUAD_POSITIONS.len() as i32;

/// Primitive mode the quad is laid out for.
pub const QUAD_PRIMITIVE: u32 = glow::TRIANGLE_STRIP;

// ── attribute binding ─────────────────────────────────────────────────────

/// Shader attribute names the mesh binds to.
#[derive(Debug, Copy, Clone)]
pub struct AttributeNames<'a> {
    pub position: &'a str,
    pub tex_coord: &'a str,
}

impl Default for AttributeNames<'static> {
    fn default() -> Self {
        Self {
            position: "aPosition",
            tex_coord: "aTexCoord",
        }
    }
}

#[derive(Debug)]
struct AttribBuffer {
    buffer: glow::Buffer,
    location: Option<u32>,
}

impl AttribBuffer {
    /// Uploads `data` into a new static array buffer.
    unsafe fn upload(gl: &glow::Context, data: &[Vec2Attr], location: Option<u32>) -> Result<Self> {
        // SAFETY: caller guarantees a current context.
        unsafe {
            let buffer = gl
                .create_buffer()
                .map_err(|e| anyhow!("failed to create vertex buffer: {e}"))?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(data),
                glow::STATIC_DRAW,
            );
            Ok(Self { buffer, location })
        }
    }

    /// Points the attribute at this buffer as tightly packed `vec2` floats and enables it.
    unsafe fn attach(&self, gl: &glow::Context) {
        let Some(location) = self.location else {
            return;
        };

        // SAFETY: caller guarantees a current context; `buffer` was created on it.
        unsafe {
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.buffer));
            gl.vertex_attrib_pointer_f32(location, 2, glow::FLOAT, false, 0, 0);
            gl.enable_vertex_attrib_array(location);
        }
    }
}

/// Static quad: one buffer of positions, one of texture coordinates.
///
/// Immutable after upload. Attribute state is global in GL 2.1, so
/// [`bind`](Self::bind) re-attaches both buffers before a draw.
#[derive(Debug)]
pub struct QuadMesh {
    positions: AttribBuffer,
    tex_coords: AttribBuffer,
}

impl QuadMesh {
    /// Uploads the quad and binds it to `program`'s attributes.
    ///
    /// `program` must already be linked so the attribute names resolve. An
    /// attribute the program does not expose is logged and left disabled.
    pub fn upload(
        gl: &glow::Context,
        program: &ShaderProgram,
        names: &AttributeNames<'_>,
    ) -> Result<Self> {
        let position_loc = resolve(gl, program, names.position);
        let tex_coord_loc = resolve(gl, program, names.tex_coord);

        // SAFETY: buffers are created, bound and (on failure) deleted on the current context.
        let (positions, tex_coords) = unsafe {
            upload_pair(
                || AttribBuffer::upload(gl, &QUAD_POSITIONS, position_loc),
                || AttribBuffer::upload(gl, &QUAD_TEX_COORDS, tex_coord_loc),
                |first| gl.delete_buffer(first.buffer),
            )?
        };
        let mesh = Self { positions, tex_coords };

        mesh.bind(gl);

        log::debug!(
            "quad mesh uploaded: {} vertices, position at {position_loc:?}, tex coord at {tex_coord_loc:?}",
            QUAD_VERTEX_COUNT
        );

        Ok(mesh)
    }

    /// Attaches both buffers to their attribute locations.
    pub fn bind(&self, gl: &glow::Context) {
        // SAFETY: buffers were created on this context.
        unsafe {
            self.positions.attach(gl);
            self.tex_coords.attach(gl);
        }
    }

    /// Issues the triangle-strip draw for all four vertices.
    pub fn draw(&self, gl: &glow::Context) {
        // SAFETY: plain draw call on the current context.
        unsafe { gl.draw_arrays(QUAD_PRIMITIVE, 0, QUAD_VERTEX_COUNT) }
    }

    pub fn destroy(self, gl: &glow::Context) {
        // SAFETY: buffers were created on this context and are not used after this call.
        unsafe {
            gl.delete_buffer(self.positions.buffer);
            gl.delete_buffer(self.tex_coords.buffer);
        }
    }
}

/// Runs both uploads in order. If `second` fails, `release` gets the first
/// result back so nothing is left allocated.
fn upload_pair<T, U>(
    first: impl FnOnce() -> Result<T>,
    second: impl FnOnce() -> Result<U>,
    release: impl FnOnce(T),
) -> Result<(T, U)> {
    let first = scopeguard::guard(first()?, release);
    let second = second()?;
    Ok((ScopeGuard::into_inner(first), second))
}

fn resolve(gl: &glow::Context, program: &ShaderProgram, name: &str) -> Option<u32> {
    let location = program.attrib_location(gl, name);
    if location.is_none() {
        log::warn!("vertex attribute `{name}` not found in program");
    }
    location
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn pairs(data: &[Vec2Attr]) -> Vec<(f32, f32)> {
        data.iter().map(|a| (a.xy[0], a.xy[1])).collect()
    }

    #[test]
    fn positions_form_centered_unit_square_strip() {
        assert_eq!(
            pairs(&QUAD_POSITIONS),
            vec![(-0.5, -0.5), (0.5, -0.5), (-0.5, 0.5), (0.5, 0.5)]
        );
    }

    #[test]
    fn tex_coords_are_vertically_flipped() {
        assert_eq!(
            pairs(&QUAD_TEX_COORDS),
            vec![(0.0, 1.0), (1.0, 1.0), (0.0, 0.0), (1.0, 0.0)]
        );
    }

    #[test]
    fn top_vertices_sample_first_image_row() {
        // Strip vertices 2 and 3 are the top edge.
        for i in [2, 3] {
            assert_eq!(QUAD_POSITIONS[i].xy[1], 0.5);
            assert_eq!(QUAD_TEX_COORDS[i].xy[1], 0.0);
        }
    }

    #[test]
    fn strip_triangles_share_consistent_winding() {
        // Triangle-strip triangle k uses (k, k+1, k+2), with odd triangles flipped.
        let p = &QUAD_POSITIONS;
        let area = |a: usize, b: usize, c: usize| {
            let (a, b, c) = (p[a].xy, p[b].xy, p[c].xy);
            (b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])
        };
        assert!(area(0, 1, 2) > 0.0);
        assert!(area(2, 1, 3) > 0.0);
    }

    #[test]
    fn draws_four_vertices_as_strip() {
        assert_eq!(QUAD_VERTEX_COUNT, 4);
        assert_eq!(QUAD_PRIMITIVE, glow::TRIANGLE_STRIP);
    }

    #[test]
    fn buffers_are_tightly_packed_floats() {
        let bytes: &[u8] = bytemuck::cast_slice(&QUAD_POSITIONS);
        assert_eq!(bytes.len(), 4 * 2 * std::mem::size_of::<f32>());
        assert_eq!(&bytes[0..4], &(-0.5f32).to_ne_bytes());
    }

    #[test]
    fn failed_second_upload_releases_the_first() {
        let released = Cell::new(0);

        let result: Result<(u32, u32)> = upload_pair(
            || Ok(7),
            || Err(anyhow!("failed to create vertex buffer")),
            |first| {
                assert_eq!(first, 7);
                released.set(released.get() + 1);
            },
        );

        assert!(result.is_err());
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn failed_first_upload_skips_the_second() {
        let second_ran = Cell::new(false);
        let released = Cell::new(0);

        let result: Result<(u32, u32)> = upload_pair(
            || Err(anyhow!("failed to create vertex buffer")),
            || {
                second_ran.set(true);
                Ok(1)
            },
            |_| released.set(released.get() + 1),
        );

        assert!(result.is_err());
        assert!(!second_ran.get());
        assert_eq!(released.get(), 0);
    }

    #[test]
    fn successful_uploads_keep_both() {
        let released = Cell::new(0);

        let (a, b) = upload_pair(|| Ok(1u32), || Ok(2u32), |_| released.set(released.get() + 1))
            .unwrap();

        assert_eq!((a, b), (1, 2));
        assert_eq!(released.get(), 0);
    }

    #[test]
    fn default_attribute_names() {
        let names = AttributeNames::default();
        assert_eq!(names.position, "aPosition");
        assert_eq!(names.tex_coord, "aTexCoord");
    }
}

use anyhow::Result;

use texquad_engine::core::{App, AppResult, FrameCtx};
use texquad_engine::paint::Color;
use texquad_engine::render::{
    AttributeNames, PixelLayout, QuadMesh, ShaderProgram, ShaderSources, Texture,
};

pub const VERTEX_SHADER: &str = include_str!("../shaders/quad.vert");
pub const FRAGMENT_SHADER: &str = include_str!("../shaders/quad.frag");

/// 128x128 RGBA crate texture.
pub const CRATE_PNG: &[u8] = include_bytes!("../assets/crate.png");

pub const SAMPLER_UNIFORM: &str = "uSampler";
const TEXTURE_UNIT: u32 = 0;

struct Resources {
    program: ShaderProgram,
    mesh: QuadMesh,
    texture: Option<Texture>,
}

impl Resources {
    fn draw(&self, gl: &glow::Context) {
        self.program.bind(gl);
        if let Some(texture) = &self.texture {
            texture.bind(gl, TEXTURE_UNIT);
        }
        self.mesh.bind(gl);
        self.mesh.draw(gl);
    }

    fn destroy(self, gl: &glow::Context) {
        self.mesh.destroy(gl);
        if let Some(texture) = self.texture {
            texture.destroy(gl);
        }
        self.program.destroy(gl);
    }
}

/// One textured quad on a slate background.
pub struct CrateScene {
    image: &'static [u8],
    resources: Option<Resources>,
}

impl CrateScene {
    pub fn new(image: &'static [u8]) -> Self {
        Self {
            image,
            resources: None,
        }
    }
}

impl Default for CrateScene {
    fn default() -> Self {
        Self::new(CRATE_PNG)
    }
}

impl App for CrateScene {
    fn init(&mut self, gl: &glow::Context) -> Result<()> {
        let program = ShaderProgram::build(
            gl,
            &ShaderSources {
                vertex: VERTEX_SHADER,
                fragment: FRAGMENT_SHADER,
            },
        )?;
        if !program.is_usable() {
            log::warn!(
                "continuing with a broken shader program ({} error(s))",
                program.diagnostics().len()
            );
        }

        let mesh = QuadMesh::upload(gl, &program, &AttributeNames::default())?;
        program.set_sampler(gl, SAMPLER_UNIFORM, TEXTURE_UNIT);

        // A texture that fails to load is already logged; the quad is still drawn.
        let texture = Texture::from_encoded(gl, self.image, PixelLayout::with_alpha(true)).ok();
        if let Some(texture) = &texture {
            let (width, height) = texture.size();
            log::info!("crate texture ready: {width}x{height}");
        }

        self.resources = Some(Resources {
            program,
            mesh,
            texture,
        });
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppResult {
        let resources = self.resources.as_ref();
        ctx.render(Color::SLATE, |gl| {
            if let Some(resources) = resources {
                resources.draw(gl);
            }
        })
    }

    fn on_teardown(&mut self, gl: &glow::Context) {
        if let Some(resources) = self.resources.take() {
            resources.destroy(gl);
        }
    }
}

#[cfg(test)]
mod tests {
    use texquad_engine::render::DecodedImage;

    use super::*;

    #[test]
    fn vertex_shader_declares_mesh_attributes() {
        let names = AttributeNames::default();
        assert!(VERTEX_SHADER.contains(&format!("attribute vec2 {};", names.position)));
        assert!(VERTEX_SHADER.contains(&format!("attribute vec2 {};", names.tex_coord)));
        assert!(VERTEX_SHADER.contains("varying vec2 vTexCoord;"));
    }

    #[test]
    fn fragment_shader_samples_the_sampler_uniform() {
        assert!(FRAGMENT_SHADER.contains(&format!("uniform sampler2D {SAMPLER_UNIFORM};")));
        assert!(FRAGMENT_SHADER.contains("texture2D(uSampler, vTexCoord)"));
        assert!(FRAGMENT_SHADER.contains("varying vec2 vTexCoord;"));
    }

    #[test]
    fn shaders_target_glsl_110() {
        // No #version line: GLSL 1.10 for a GL 2.1 context.
        assert!(!VERTEX_SHADER.contains("#version"));
        assert!(!FRAGMENT_SHADER.contains("#version"));
    }

    #[test]
    fn embedded_crate_decodes_as_rgba() {
        let image = DecodedImage::decode(CRATE_PNG, PixelLayout::Rgba).unwrap();
        assert_eq!((image.width, image.height), (128, 128));
        assert_eq!(image.pixels.len(), 128 * 128 * 4);
        assert!(image.pixels.chunks(4).all(|p| p[3] == 255));
    }

    #[test]
    fn default_scene_uses_embedded_asset() {
        let scene = CrateScene::default();
        assert_eq!(scene.image.len(), CRATE_PNG.len());
        assert!(scene.resources.is_none());
    }
}

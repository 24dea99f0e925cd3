use std::fmt;

use glow::HasContext;

/// Channel layout used for the GL upload.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PixelLayout {
    Rgb,
    Rgba,
}

impl PixelLayout {
    /// Picks the layout from an "image has alpha" flag.
    #[inline]
    pub fn with_alpha(alpha: bool) -> Self {
        if alpha { PixelLayout::Rgba } else { PixelLayout::Rgb }
    }

    #[inline]
    pub fn channels(self) -> usize {
        match self {
            PixelLayout::Rgb => 3,
            PixelLayout::Rgba => 4,
        }
    }

    /// GL format enum, also used as the internal format.
    #[inline]
    pub fn gl_format(self) -> u32 {
        match self {
            PixelLayout::Rgb => glow::RGB,
            PixelLayout::Rgba => glow::RGBA,
        }
    }
}

/// Texture load failure.
#[derive(Debug)]
pub enum TextureError {
    /// The encoded buffer was empty.
    Empty,
    /// The decoder rejected the buffer.
    Decode(image::ImageError),
    /// The decoded image does not fit GL's signed size parameters.
    TooLarge { width: u32, height: u32 },
    /// The driver refused to create a texture object.
    Gpu(String),
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::Empty => write!(f, "failed to load an image: empty buffer"),
            TextureError::Decode(e) => write!(f, "failed to load an image: {e}"),
            TextureError::TooLarge { width, height } => {
                write!(f, "image {width}x{height} is too large to upload")
            }
            TextureError::Gpu(e) => write!(f, "failed to create GL texture: {e}"),
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

/// CPU-side pixels ready for upload.
///
/// `pixels` is tightly packed, `layout.channels()` bytes per texel, rows top to bottom.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    /// Channel count found in the encoded source before conversion.
    pub source_channels: u8,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Decodes an in-memory image, detecting its format and channel count, and
    /// converts the pixels to `layout`.
    pub fn decode(bytes: &[u8], layout: PixelLayout) -> Result<Self, TextureError> {
        if bytes.is_empty() {
            return Err(TextureError::Empty);
        }

        let image = image::load_from_memory(bytes).map_err(TextureError::Decode)?;
        let source_channels = image.color().channel_count();
        let (width, height) = (image.width(), image.height());

        let pixels = match layout {
            PixelLayout::Rgb => image.into_rgb8().into_raw(),
            PixelLayout::Rgba => image.into_rgba8().into_raw(),
        };

        Ok(Self {
            width,
            height,
            layout,
            source_channels,
            pixels,
        })
    }
}

/// 2D GL texture with repeat wrapping and linear filtering.
#[derive(Debug)]
pub struct Texture {
    raw: glow::Texture,
    width: u32,
    height: u32,
}

impl Texture {
    /// Decodes `bytes` and uploads the result. Logs and returns the error on failure.
    pub fn from_encoded(
        gl: &glow::Context,
        bytes: &[u8],
        layout: PixelLayout,
    ) -> Result<Self, TextureError> {
        let result = DecodedImage::decode(bytes, layout).and_then(|image| Self::upload(gl, &image));

        if let Err(err) = &result {
            log::error!("{err}");
        }

        result
    }

    /// Creates the texture object, leaves it bound to `TEXTURE_2D` and uploads `image`.
    pub fn upload(gl: &glow::Context, image: &DecodedImage) -> Result<Self, TextureError> {
        let too_large = || TextureError::TooLarge {
            width: image.width,
            height: image.height,
        };
        let width = i32::try_from(image.width).map_err(|_| too_large())?;
        let height = i32::try_from(image.height).map_err(|_| too_large())?;
        let format = image.layout.gl_format();

        debug_assert_eq!(
            image.pixels.len(),
            image.width as usize * image.height as usize * image.layout.channels()
        );

        // SAFETY: the texture is created here on the current context and `pixels`
        // holds exactly width * height * channels bytes.
        let raw = unsafe {
            let raw = gl.create_texture().map_err(TextureError::Gpu)?;
            gl.bind_texture(glow::TEXTURE_2D, Some(raw));

            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);

            // RGB rows are not 4-byte aligned in general.
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);

            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                format as i32,
                width,
                height,
                0,
                format,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(image.pixels.as_slice())),
            );

            raw
        };

        log::info!(
            "texture uploaded: {}x{} {:?} (source had {} channels)",
            image.width,
            image.height,
            image.layout,
            image.source_channels
        );

        Ok(Self {
            raw,
            width: image.width,
            height: image.height,
        })
    }

    /// Pixel dimensions as uploaded.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Binds this texture to `TEXTURE_2D` on the given texture unit.
    pub fn bind(&self, gl: &glow::Context, unit: u32) {
        // SAFETY: `raw` was created on this context.
        unsafe {
            gl.active_texture(glow::TEXTURE0 + unit);
            gl.bind_texture(glow::TEXTURE_2D, Some(self.raw));
        }
    }

    pub fn destroy(self, gl: &glow::Context) {
        // SAFETY: `raw` was created on this context and is not used after this call.
        unsafe { gl.delete_texture(self.raw) }
    }
}

use std::ffi::CStr;
use std::num::NonZeroU32;

use anyhow::{anyhow, bail, Context, Result};
use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{ContextApi, ContextAttributesBuilder, PossiblyCurrentContext, Version};
use glutin::display::{Display, GetGlDisplay};
use glutin::prelude::*;
use glutin::surface::{Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

use super::config::choose_sample_count;
use super::error::classify_swap_error;
use super::{GlInit, SwapErrorAction};

/// Entry points every renderer in this crate calls. A context that cannot
/// resolve them is unusable.
const REQUIRED_ENTRY_POINTS: [&CStr; 8] = [
    c"glCreateShader",
    c"glCreateProgram",
    c"glLinkProgram",
    c"glGenBuffers",
    c"glVertexAttribPointer",
    c"glGenTextures",
    c"glTexImage2D",
    c"glDrawArrays",
];

/// Owns the GL context, the window surface and the loaded function table.
///
/// Field order is drop order: the context goes before the surface, and both
/// go before the window that the caller keeps alongside this value.
pub struct GlDevice {
    gl: glow::Context,
    context: PossiblyCurrentContext,
    surface: Surface<WindowSurface>,
}

impl GlDevice {
    /// Creates a window together with a current GL context bound to it.
    pub fn create(
        event_loop: &ActiveEventLoop,
        window_attributes: WindowAttributes,
        init: &GlInit,
    ) -> Result<(Window, Self)> {
        let template = ConfigTemplateBuilder::new().with_multisampling(init.multisample);
        let requested_samples = init.multisample;

        let (window, config) = DisplayBuilder::new()
            .with_window_attributes(Some(window_attributes))
            .build(event_loop, template, |configs| pick_config(configs, requested_samples))
            .map_err(|e| anyhow!("failed to create window and GL config: {e}"))?;

        let window = window.context("display builder did not create a window")?;
        let display = config.display();

        log::debug!(
            "GL config picked: samples={}, alpha={}",
            config.num_samples(),
            config.alpha_size()
        );

        let raw_window_handle = window
            .window_handle()
            .context("window has no native handle")?
            .as_raw();

        let (major, minor) = init.gl_version;
        let preferred = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .build(Some(raw_window_handle));
        let fallback = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::Gles(Some(Version::new(2, 0))))
            .build(Some(raw_window_handle));

        // SAFETY: the raw window handle comes from `window`, which outlives the context.
        let not_current = unsafe {
            display.create_context(&config, &preferred).or_else(|err| {
                log::warn!("OpenGL {major}.{minor} context unavailable ({err}); trying GLES 2.0");
                display.create_context(&config, &fallback)
            })
        }
        .context("failed to create GL context")?;

        let surface_attributes = window
            .build_surface_attributes(Default::default())
            .context("failed to describe window surface")?;

        // SAFETY: as above, `window` is kept alive by the caller for as long as the surface.
        let surface = unsafe { display.create_window_surface(&config, &surface_attributes) }
            .context("failed to create GL window surface")?;

        let context = not_current
            .make_current(&surface)
            .context("failed to make GL context current")?;

        if init.vsync {
            if let Err(err) =
                surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN))
            {
                log::warn!("vsync unavailable: {err}");
            }
        }

        let gl = load_functions(&display)?;

        Ok((window, Self { gl, context, surface }))
    }

    /// Returns the loaded GL function table.
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// Presents the back buffer.
    pub fn swap_buffers(&self) -> std::result::Result<(), SwapErrorAction> {
        self.surface.swap_buffers(&self.context).map_err(|err| {
            let action = classify_swap_error(&err.error_kind());
            log::error!("swap failed ({action:?}): {err}");
            action
        })
    }
}

fn load_functions(display: &Display) -> Result<glow::Context> {
    let missing: Vec<String> = REQUIRED_ENTRY_POINTS
        .iter()
        .filter(|name| display.get_proc_address(name).is_null())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();

    if !missing.is_empty() {
        bail!("failed to load OpenGL functions: {}", missing.join(", "));
    }

    // SAFETY: the context created from `display` is current on this thread.
    let gl = unsafe { glow::Context::from_loader_function_cstr(|name| display.get_proc_address(name)) };

    {
        use glow::HasContext as _;
        let version = gl.version();
        log::info!(
            "GL context ready: {}.{} {}{}",
            version.major,
            version.minor,
            if version.is_embedded { "ES " } else { "" },
            version.vendor_info
        );
    }

    Ok(gl)
}

fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>, requested_samples: u8) -> Config {
    let configs: Vec<Config> = configs.collect();
    let samples: Vec<u8> = configs.iter().map(|c| c.num_samples()).collect();

    let index = choose_sample_count(&samples, requested_samples).unwrap_or(0);
    if samples.get(index).copied() != Some(requested_samples) {
        log::warn!(
            "no GL config with {requested_samples}x MSAA; using {}x",
            samples.get(index).copied().unwrap_or(0)
        );
    }

    // glutin never calls the picker with an empty iterator.
    configs
        .into_iter()
        .nth(index)
        .expect("glutin offered no GL configs")
}

use std::process::ExitCode;

use winit::dpi::LogicalSize;

use texquad_engine::core::AppResult;
use texquad_engine::device::GlInit;
use texquad_engine::logging::{init_logging, LoggingConfig};
use texquad_engine::window::{Runtime, RuntimeConfig};

mod scene;

use scene::CrateScene;

const WINDOW_TITLE: &str = "SDL3, OpenGL 2.1, C++";

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: WINDOW_TITLE.to_string(),
        initial_size: LogicalSize::new(400.0, 400.0),
        resizable: false,
    };

    let gl_init = GlInit {
        multisample: 2,
        gl_version: (2, 1),
        ..Default::default()
    };

    match Runtime::run(config, gl_init, CrateScene::default()) {
        Ok(AppResult::Success) => ExitCode::SUCCESS,
        Ok(result) => {
            log::debug!("exiting with {result:?}");
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("Error {e:#}");
            ExitCode::FAILURE
        }
    }
}

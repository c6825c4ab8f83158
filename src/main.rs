use std::time::Instant;

use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;

use crate::{
    abs::*,
    config::{Settings, ShaderSettings},
    error::AppError,
    render::FrameRenderer,
};

mod abs;
mod config;
mod error;
mod logging;
mod other;
mod render;

fn main() {
    if let Err(err) = logging::init_logging() {
        eprintln!("Failed to set up logging: {err}");
        std::process::exit(1);
    }

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let settings = Settings::load()?;
    logging::apply_level(settings.log_level());

    let mut app = App::new(&settings.window)?;
    let source = shader_source(&settings.shaders);

    let mut renderer = FrameRenderer::initialize(
        &app.gl,
        &source,
        &app.window,
        &settings.renderer_options(),
    )?;

    let mut clock = other::FrameClock::new(Instant::now());

    'running: loop {
        for event in app.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => break 'running,
                Event::KeyDown {
                    keycode: Some(keycode),
                    ..
                } if keycode == Keycode::Escape => break 'running,
                Event::Window {
                    win_event: WindowEvent::SizeChanged(..),
                    ..
                } => {
                    let (width, height) = app.window.drawable_size();
                    renderer.resize(&app.gl, width, height);
                }
                _ => {}
            }
        }

        renderer.render(&app.gl, &app.window);
        app.window.gl_swap_window();

        if let Some(fps) = clock.tick(Instant::now()) {
            log::debug!("{:.1} fps", fps);
        }
    }

    renderer.destroy(&app.gl);
    log::info!("Shutting down");
    Ok(())
}

/// Shaders on disk take priority, so they can be edited without rebuilding.
fn shader_source(settings: &ShaderSettings) -> Fallback<ShaderDir, EmbeddedShaders> {
    let dir = match &settings.dir {
        Some(dir) => ShaderDir::new(dir),
        None => ShaderDir::beside_executable("shaders"),
    };
    Fallback::new(dir, EmbeddedShaders)
}

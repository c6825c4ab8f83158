//! SDL2 and OpenGL application management.
//!
//! This module defines the [`App`] struct which encapsulates the SDL2
//! and OpenGL context necessary for creating a windowed application,
//! and the [`Surface`] trait the renderer uses to query the drawable size.

use crate::abs::GlContext;
use crate::config::WindowSettings;
use crate::error::AppError;

/// Something with a size in pixels that can be rendered into.
pub trait Surface {
    fn pixel_size(&self) -> (u32, u32);
}

impl Surface for sdl2::video::Window {
    fn pixel_size(&self) -> (u32, u32) {
        self.drawable_size()
    }
}

/// The [`App`] struct encapsulates the SDL2 and OpenGL context.
pub struct App {
    pub sdl: sdl2::Sdl,
    pub video_subsystem: sdl2::VideoSubsystem,
    pub window: sdl2::video::Window,
    pub gl_context: sdl2::video::GLContext,
    pub gl: GlContext,
    pub event_pump: sdl2::EventPump,
}

impl App {
    /// Creates a new [`App`] instance from the window settings.
    /// The width and height options are ignored if `fullscreen` is set to `true`.
    pub fn new(settings: &WindowSettings) -> Result<Self, AppError> {
        let sdl = sdl2::init().map_err(AppError::Sdl)?;
        let video_subsystem = sdl.video().map_err(AppError::Sdl)?;
        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(3, 3);
        gl_attr.set_depth_size(24);
        gl_attr.set_double_buffer(true);

        let (width, height) = if settings.fullscreen {
            let display_mode = video_subsystem
                .current_display_mode(0)
                .map_err(AppError::Sdl)?;
            (display_mode.w as u32, display_mode.h as u32)
        } else {
            (settings.width, settings.height)
        };
        let mut window = video_subsystem
            .window(&settings.title, width, height)
            .opengl()
            .resizable()
            .build()?;
        window
            .set_fullscreen(if settings.fullscreen {
                sdl2::video::FullscreenType::Desktop
            } else {
                sdl2::video::FullscreenType::Off
            })
            .map_err(AppError::Sdl)?;

        let gl_context = window.gl_create_context().map_err(AppError::Sdl)?;
        window.gl_make_current(&gl_context).map_err(AppError::Sdl)?;

        let interval = if settings.vsync {
            sdl2::video::SwapInterval::VSync
        } else {
            sdl2::video::SwapInterval::Immediate
        };
        if let Err(err) = video_subsystem.gl_set_swap_interval(interval) {
            log::warn!("Could not set swap interval: {}", err);
        }

        // SAFETY: the context was made current on this thread just above and is owned by the
        // returned `App`, which is dropped on this thread.
        let gl = unsafe {
            GlContext::new(glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            }))
        };
        log::info!("OpenGL context: {}", gl.describe());

        let event_pump = sdl.event_pump().map_err(AppError::Sdl)?;

        Ok(Self {
            sdl,
            video_subsystem,
            window,
            gl_context,
            gl,
            event_pump,
        })
    }
}

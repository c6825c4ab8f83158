//! User settings.
//!
//! Settings live in `settings.json` inside the platform config directory. Every field has a
//! default, so the file may be missing or list only what it wants to override.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glam::Vec4;
use serde::Deserialize;

use crate::error::SettingsError;
use crate::render::RendererOptions;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    pub render: RenderSettings,
    pub shaders: ShaderSettings,
    /// Used when `RUST_LOG` is not set.
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub vsync: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub clear_color: [f32; 4],
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShaderSettings {
    /// Directory searched before the embedded shaders. Defaults to `shaders/` beside the
    /// executable.
    pub dir: Option<PathBuf>,
    pub vertex: String,
    pub fragment: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            render: RenderSettings::default(),
            shaders: ShaderSettings::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Ray Tracing".to_string(),
            width: 800,
            height: 600,
            fullscreen: false,
            vsync: true,
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl Default for ShaderSettings {
    fn default() -> Self {
        Self {
            dir: None,
            vertex: "raytracing/vert.glsl".to_string(),
            fragment: "raytracing/frag.glsl".to_string(),
        }
    }
}

impl Settings {
    /// Where the settings file is expected, if the platform has a config directory.
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("raytracer").join("settings.json"))
    }

    /// Loads the settings file, falling back to defaults when there is none.
    pub fn load() -> Result<Self, SettingsError> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn log_level(&self) -> Option<log::LevelFilter> {
        self.log_level.parse().ok()
    }

    pub fn renderer_options(&self) -> RendererOptions<'_> {
        RendererOptions {
            clear_color: Vec4::from_array(self.render.clear_color),
            vertex_shader: &self.shaders.vertex,
            fragment_shader: &self.shaders.fragment,
        }
    }
}

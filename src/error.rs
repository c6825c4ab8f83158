//! Error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::abs::ShaderKind;

/// Failures while building the GPU pipeline. All of them are fatal for startup.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("shader resource `{name}` not found")]
    ResourceNotFound { name: String },
    #[error("failed to read shader resource `{name}`: {source}")]
    ResourceUnreadable {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("{kind} shader failed to compile:\n{log}")]
    Compile { kind: ShaderKind, log: String },
    #[error("shader program failed to link:\n{log}")]
    Link { log: String },
    #[error("failed to allocate GPU object: {0}")]
    Allocation(String),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid settings in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Anything that can stop the application from starting.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("SDL error: {0}")]
    Sdl(String),
    #[error("failed to create window: {0}")]
    Window(#[from] sdl2::video::WindowBuildError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

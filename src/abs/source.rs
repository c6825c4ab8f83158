//! Shader source lookup.
//!
//! Shaders are requested by logical name (for example `raytracing/frag.glsl`) through the
//! [`ShaderSource`] trait, so the pipeline never depends on where the text actually lives.

use std::fs;
use std::io;
use std::path::PathBuf;

use include_dir::{Dir, include_dir};

use crate::error::PipelineError;

static EMBEDDED: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/src/render/shaders");

/// Supplies shader text by logical name.
pub trait ShaderSource {
    fn load(&self, name: &str) -> Result<String, PipelineError>;
}

/// Shaders read from a directory on disk.
#[derive(Debug, Clone)]
pub struct ShaderDir {
    root: PathBuf,
}

impl ShaderDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// A directory called `name` next to the running executable.
    pub fn beside_executable(name: &str) -> Self {
        match std::env::current_exe() {
            Ok(exe) => {
                let dir = exe.parent().map(|p| p.to_path_buf()).unwrap_or_default();
                Self::new(dir.join(name))
            }
            Err(err) => {
                log::warn!("Cannot locate executable ({}), using ./{}", err, name);
                Self::new(name)
            }
        }
    }
}

impl ShaderSource for ShaderDir {
    fn load(&self, name: &str) -> Result<String, PipelineError> {
        let path = self.root.join(name);
        match fs::read_to_string(&path) {
            Ok(text) => {
                log::debug!("Loaded shader from {}", path.display());
                Ok(text)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("No shader at {}", path.display());
                Err(PipelineError::ResourceNotFound {
                    name: name.to_string(),
                })
            }
            Err(source) => Err(PipelineError::ResourceUnreadable {
                name: name.to_string(),
                source,
            }),
        }
    }
}

/// The shaders under `src/render/shaders`, baked into the binary at build time.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedShaders;

impl ShaderSource for EmbeddedShaders {
    fn load(&self, name: &str) -> Result<String, PipelineError> {
        let file = EMBEDDED
            .get_file(name)
            .ok_or_else(|| PipelineError::ResourceNotFound {
                name: name.to_string(),
            })?;
        let text = file
            .contents_utf8()
            .ok_or_else(|| PipelineError::ResourceUnreadable {
                name: name.to_string(),
                source: io::Error::new(io::ErrorKind::InvalidData, "shader is not valid UTF-8"),
            })?;
        log::debug!("Using embedded shader `{}`", name);
        Ok(text.to_string())
    }
}

/// Tries `primary`, and falls back to `secondary` only when the resource does not exist.
#[derive(Debug, Clone)]
pub struct Fallback<A, B> {
    primary: A,
    secondary: B,
}

impl<A: ShaderSource, B: ShaderSource> Fallback<A, B> {
    pub fn new(primary: A, secondary: B) -> Self {
        Self { primary, secondary }
    }
}

impl<A: ShaderSource, B: ShaderSource> ShaderSource for Fallback<A, B> {
    fn load(&self, name: &str) -> Result<String, PipelineError> {
        match self.primary.load(name) {
            Err(PipelineError::ResourceNotFound { .. }) => self.secondary.load(name),
            other => other,
        }
    }
}

#[cfg(test)]
impl ShaderSource for std::collections::HashMap<String, String> {
    fn load(&self, name: &str) -> Result<String, PipelineError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| PipelineError::ResourceNotFound {
                name: name.to_string(),
            })
    }
}

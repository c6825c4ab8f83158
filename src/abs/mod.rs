//! This module contains the core components for talking to the GPU,
//! including application setup, the GL context handle, shader management and mesh handling.

pub mod app;
pub mod gl;
pub mod mesh;
pub mod shader;
pub mod source;

pub use app::*;
pub use gl::*;
pub use mesh::*;
pub use shader::*;
pub use source::*;

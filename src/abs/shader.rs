//! OpenGL Shaders
//!
//! This module defines [`ProgramBuilder`] for compiling and linking shader stages, and
//! [`ShaderProgram`] for a linked program that is ready to draw with. Linking consumes the
//! builder, so a program that failed to link can never be bound or receive uniforms.

use std::fmt;

use crate::abs::{GlApi, ShaderSource};
use crate::error::PipelineError;

/// The pipeline stage a shader is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    Vertex,
    Fragment,
}

impl ShaderKind {
    /// The OpenGL shader type enum for this stage.
    pub fn gl_type(self) -> u32 {
        match self {
            ShaderKind::Vertex => glow::VERTEX_SHADER,
            ShaderKind::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderKind::Vertex => f.write_str("vertex"),
            ShaderKind::Fragment => f.write_str("fragment"),
        }
    }
}

/// A program that is still accepting stages and attribute bindings.
pub struct ProgramBuilder<G: GlApi> {
    program: G::Program,
    stages: Vec<(ShaderKind, G::Shader)>,
}

impl<G: GlApi> ProgramBuilder<G> {
    /// Creates a new, empty program object.
    pub fn new(gl: &G) -> Result<Self, PipelineError> {
        let program = gl.create_program().map_err(PipelineError::Allocation)?;
        Ok(Self {
            program,
            stages: Vec::with_capacity(2),
        })
    }

    /// Reads the resource called `name`, compiles it as a `kind` stage and attaches it.
    ///
    /// The resource is resolved before any shader object is created, so a missing file never
    /// reaches the compiler. A failed load leaves the builder usable for another attempt.
    pub fn load_stage<S: ShaderSource + ?Sized>(
        &mut self,
        gl: &G,
        source: &S,
        name: &str,
        kind: ShaderKind,
    ) -> Result<G::Shader, PipelineError> {
        let text = source.load(name)?;
        let shader = self.compile_stage(gl, kind, &text)?;
        log::debug!("Compiled {} shader `{}`", kind, name);
        Ok(shader)
    }

    /// Compiles `text` as a `kind` stage and attaches it to the program.
    pub fn compile_stage(
        &mut self,
        gl: &G,
        kind: ShaderKind,
        text: &str,
    ) -> Result<G::Shader, PipelineError> {
        let shader = gl
            .create_shader(kind.gl_type())
            .map_err(PipelineError::Allocation)?;
        gl.shader_source(shader, text);
        gl.compile_shader(shader);

        if !gl.shader_compile_status(shader) {
            let log = gl.shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(PipelineError::Compile { kind, log });
        }

        gl.attach_shader(self.program, shader);
        self.stages.push((kind, shader));
        Ok(shader)
    }

    /// Binds vertex attribute slot `location` to the shader input called `name`.
    pub fn bind_attribute(&self, gl: &G, location: u32, name: &str) {
        gl.bind_attrib_location(self.program, location, name);
    }

    /// Links the attached stages into a usable program.
    ///
    /// The stage objects are released either way; on failure the program object is deleted too.
    pub fn link(self, gl: &G) -> Result<ShaderProgram<G>, PipelineError> {
        gl.link_program(self.program);

        if !gl.program_link_status(self.program) {
            let log = gl.program_info_log(self.program);
            for (_, shader) in &self.stages {
                gl.delete_shader(*shader);
            }
            gl.delete_program(self.program);
            return Err(PipelineError::Link { log });
        }

        for (kind, shader) in &self.stages {
            gl.detach_shader(self.program, *shader);
            gl.delete_shader(*shader);
            log::trace!("Released {} stage after link", kind);
        }

        Ok(ShaderProgram {
            program: self.program,
        })
    }
}

/// A successfully linked OpenGL shader program.
pub struct ShaderProgram<G: GlApi> {
    program: G::Program,
}

impl<G: GlApi> ShaderProgram<G> {
    /// Binds the shader program for use.
    pub fn use_program(&self, gl: &G) {
        gl.use_program(Some(self.program));
    }

    /// Sets a float uniform on the program, which must be the one currently in use.
    ///
    /// Names that don't resolve are ignored, since drivers strip uniforms a shader never reads.
    pub fn set_uniform_f32(&self, gl: &G, name: &str, value: f32) {
        match gl.uniform_location(self.program, name) {
            Some(location) => gl.uniform_1_f32(&location, value),
            None => log::trace!("Uniform `{}` is not active, skipping", name),
        }
    }

    pub fn delete(self, gl: &G) {
        gl.delete_program(self.program);
    }
}

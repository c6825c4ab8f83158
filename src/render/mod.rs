//! Full-screen ray tracing pass.
//!
//! The [`FrameRenderer`] draws a single quad that covers the whole viewport and lets the
//! fragment shader do the ray tracing. Its only per-frame state is the aspect ratio, which it
//! keeps in sync with the `uAspect` uniform.

pub mod viewport;

use glam::{Vec3, Vec4};

use crate::abs::{
    GlApi, Mesh, POSITION_LOCATION, ProgramBuilder, ShaderKind, ShaderProgram, ShaderSource,
    Surface,
};
use crate::error::PipelineError;
use viewport::ViewportState;

/// Name of the vertex shader input bound to [`POSITION_LOCATION`].
pub const POSITION_ATTRIBUTE: &str = "vPosition";

/// Name of the aspect-ratio uniform.
pub const ASPECT_UNIFORM: &str = "uAspect";

/// Two triangles covering clip space from (-1, -1) to (1, 1).
pub const QUAD_VERTICES: [Vec3; 6] = [
    Vec3::new(-1.0, -1.0, 0.0),
    Vec3::new(1.0, -1.0, 0.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(-1.0, 1.0, 0.0),
    Vec3::new(-1.0, -1.0, 0.0),
];

/// What the renderer needs to know at startup.
#[derive(Debug, Clone, Copy)]
pub struct RendererOptions<'a> {
    pub clear_color: Vec4,
    pub vertex_shader: &'a str,
    pub fragment_shader: &'a str,
}

/// Owns the linked program and the quad, and draws one frame at a time.
pub struct FrameRenderer<G: GlApi> {
    program: ShaderProgram<G>,
    quad: Mesh<G>,
    viewport: ViewportState,
}

impl<G: GlApi> FrameRenderer<G> {
    /// Builds the pipeline, uploads the quad and pushes the initial aspect ratio.
    pub fn initialize<S: ShaderSource + ?Sized>(
        gl: &G,
        source: &S,
        surface: &impl Surface,
        options: &RendererOptions<'_>,
    ) -> Result<Self, PipelineError> {
        gl.clear_color(options.clear_color);

        let program = build_program(gl, source, options)?;
        let quad = Mesh::new(gl, &QUAD_VERTICES, glow::TRIANGLES)?;

        let mut viewport = ViewportState::default();
        program.use_program(gl);
        let (width, height) = surface.pixel_size();
        match viewport.refresh(width, height) {
            Some(aspect) => program.set_uniform_f32(gl, ASPECT_UNIFORM, aspect),
            None => log::warn!("Surface has no area ({}x{}), aspect deferred", width, height),
        }

        log::info!(
            "Renderer ready: {} vertices, surface {}x{}",
            quad.vertex_count(),
            width,
            height
        );

        Ok(Self {
            program,
            quad,
            viewport,
        })
    }

    /// Points the viewport at the new surface size. The uniform follows on the next frame.
    pub fn resize(&mut self, gl: &G, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("Ignoring resize to {}x{}", width, height);
            return;
        }
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        let height = i32::try_from(height).unwrap_or(i32::MAX);
        gl.viewport(0, 0, width, height);
    }

    /// Draws one frame.
    pub fn render(&mut self, gl: &G, surface: &impl Surface) {
        gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        gl.enable(glow::DEPTH_TEST);

        self.program.use_program(gl);
        self.quad.bind(gl);

        let (width, height) = surface.pixel_size();
        if let Some(aspect) = self.viewport.refresh(width, height) {
            log::debug!("Aspect ratio changed to {:.4}", aspect);
            self.program.set_uniform_f32(gl, ASPECT_UNIFORM, aspect);
        }

        self.quad.draw(gl);
    }

    /// The aspect ratio currently held by the shader, if one was ever pushed.
    pub fn aspect(&self) -> Option<f32> {
        self.viewport.aspect()
    }

    /// Releases the quad and the program.
    pub fn destroy(self, gl: &G) {
        gl.bind_vertex_array(None);
        gl.use_program(None);
        self.quad.delete(gl);
        self.program.delete(gl);
    }
}

fn build_program<G: GlApi, S: ShaderSource + ?Sized>(
    gl: &G,
    source: &S,
    options: &RendererOptions<'_>,
) -> Result<ShaderProgram<G>, PipelineError> {
    let mut builder = ProgramBuilder::new(gl)?;
    builder.load_stage(gl, source, options.vertex_shader, ShaderKind::Vertex)?;
    builder.load_stage(gl, source, options.fragment_shader, ShaderKind::Fragment)?;
    builder.bind_attribute(gl, POSITION_LOCATION, POSITION_ATTRIBUTE);
    builder.link(gl)
}

//! Mesh management module.
//!
//! This module defines the [`Mesh`] struct for managing vertex data on the GPU side.
//! Vertices should implement the [`Vertex`] trait.

use glam::Vec3;

use crate::abs::GlApi;
use crate::error::PipelineError;

/// Attribute slot the vertex position stream is bound to.
pub const POSITION_LOCATION: u32 = 0;

/// Trait that defines the necessary methods for a vertex.
pub trait Vertex: bytemuck::Pod {
    /// Sets up the vertex attribute pointers for the vertex.
    fn vertex_attribs<G: GlApi>(gl: &G);
}

impl Vertex for Vec3 {
    fn vertex_attribs<G: GlApi>(gl: &G) {
        gl.enable_vertex_attrib_array(POSITION_LOCATION);
        // Three floats per vertex, tightly packed.
        gl.vertex_attrib_pointer_f32(POSITION_LOCATION, 3, 0, 0);
    }
}

/// Represents a non-indexed mesh stored on the GPU side.
pub struct Mesh<G: GlApi> {
    draw_mode: u32,
    vao: G::VertexArray,
    vbo: G::Buffer,
    vertex_count: i32,
}

impl<G: GlApi> Mesh<G> {
    /// Uploads `vertices` once into a static buffer and records their layout in a vertex array.
    pub fn new<V: Vertex>(gl: &G, vertices: &[V], draw_mode: u32) -> Result<Self, PipelineError> {
        let vbo = gl.create_buffer().map_err(PipelineError::Allocation)?;
        gl.bind_array_buffer(Some(vbo));
        gl.array_buffer_data(bytemuck::cast_slice(vertices));

        let vao = gl
            .create_vertex_array()
            .map_err(PipelineError::Allocation)?;
        gl.bind_vertex_array(Some(vao));
        V::vertex_attribs(gl);

        gl.bind_vertex_array(None);
        gl.bind_array_buffer(None);

        Ok(Self {
            draw_mode,
            vao,
            vbo,
            vertex_count: vertices.len() as i32,
        })
    }

    /// Binds the mesh's vertex array.
    pub fn bind(&self, gl: &G) {
        gl.bind_vertex_array(Some(self.vao));
    }

    /// Draws every vertex of the mesh. The vertex array must be bound.
    pub fn draw(&self, gl: &G) {
        gl.draw_arrays(self.draw_mode, 0, self.vertex_count);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count as usize
    }

    pub fn delete(self, gl: &G) {
        gl.delete_buffer(self.vbo);
        gl.delete_vertex_array(self.vao);
    }
}

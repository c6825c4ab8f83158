//! Explicit OpenGL context handle.
//!
//! Everything that touches the GPU goes through the [`GlApi`] trait, which covers exactly the
//! slice of OpenGL this program needs. The production implementation is [`GlContext`], a thin
//! wrapper over [`glow::Context`] that cannot leave the thread it was created on.

use std::marker::PhantomData;

use glam::Vec4;
use glow::HasContext;

/// The subset of OpenGL used by the shader pipeline and the frame renderer.
///
/// Handles are plain copyable values; whoever creates one is responsible for deleting it.
pub trait GlApi {
    type Shader: Copy + std::fmt::Debug;
    type Program: Copy + std::fmt::Debug;
    type Buffer: Copy + std::fmt::Debug;
    type VertexArray: Copy + std::fmt::Debug;
    type UniformLocation;

    fn create_shader(&self, shader_type: u32) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn bind_attrib_location(&self, program: Self::Program, index: u32, name: &str);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn use_program(&self, program: Option<Self::Program>);
    fn delete_program(&self, program: Self::Program);

    fn uniform_location(&self, program: Self::Program, name: &str)
    -> Option<Self::UniformLocation>;
    fn uniform_1_f32(&self, location: &Self::UniformLocation, value: f32);

    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    fn bind_array_buffer(&self, buffer: Option<Self::Buffer>);
    /// Uploads `data` into the bound array buffer with static-draw usage.
    fn array_buffer_data(&self, data: &[u8]);
    fn delete_buffer(&self, buffer: Self::Buffer);

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String>;
    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>);
    fn delete_vertex_array(&self, vertex_array: Self::VertexArray);
    fn enable_vertex_attrib_array(&self, index: u32);
    /// Describes a float attribute stream read from the bound array buffer.
    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32);

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&self, color: Vec4);
    fn clear(&self, mask: u32);
    fn enable(&self, capability: u32);
    fn draw_arrays(&self, mode: u32, first: i32, count: i32);
}

/// An OpenGL context that is current on the calling thread.
///
/// The raw-pointer marker keeps this type `!Send` and `!Sync`, so the context can only be used
/// from the thread that made it current.
pub struct GlContext {
    gl: glow::Context,
    _thread_bound: PhantomData<*const ()>,
}

impl GlContext {
    /// Wraps a glow context.
    ///
    /// # Safety
    ///
    /// The context must be current on the calling thread and stay current for as long as the
    /// returned value is alive.
    pub unsafe fn new(gl: glow::Context) -> Self {
        Self {
            gl,
            _thread_bound: PhantomData,
        }
    }

    /// Returns the driver's vendor, renderer and version strings.
    pub fn describe(&self) -> String {
        unsafe {
            format!(
                "{} / {} / {}",
                self.gl.get_parameter_string(glow::VENDOR),
                self.gl.get_parameter_string(glow::RENDERER),
                self.gl.get_parameter_string(glow::VERSION),
            )
        }
    }
}

// SAFETY (all methods below): `GlContext::new` requires the context to be current on this
// thread, and the type cannot be sent to another one.
impl GlApi for GlContext {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type Buffer = glow::Buffer;
    type VertexArray = glow::VertexArray;
    type UniformLocation = glow::UniformLocation;

    fn create_shader(&self, shader_type: u32) -> Result<Self::Shader, String> {
        unsafe { self.gl.create_shader(shader_type) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { self.gl.shader_source(shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.compile_shader(shader) }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.gl.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { self.gl.create_program() }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.attach_shader(program, shader) }
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.detach_shader(program, shader) }
    }

    fn bind_attrib_location(&self, program: Self::Program, index: u32, name: &str) {
        unsafe { self.gl.bind_attrib_location(program, index, name) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { self.gl.link_program(program) }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { self.gl.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { self.gl.use_program(program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { self.gl.delete_program(program) }
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn uniform_1_f32(&self, location: &Self::UniformLocation, value: f32) {
        unsafe { self.gl.uniform_1_f32(Some(location), value) }
    }

    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        unsafe { self.gl.create_buffer() }
    }

    fn bind_array_buffer(&self, buffer: Option<Self::Buffer>) {
        unsafe { self.gl.bind_buffer(glow::ARRAY_BUFFER, buffer) }
    }

    fn array_buffer_data(&self, data: &[u8]) {
        unsafe {
            self.gl
                .buffer_data_u8_slice(glow::ARRAY_BUFFER, data, glow::STATIC_DRAW)
        }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { self.gl.delete_buffer(buffer) }
    }

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String> {
        unsafe { self.gl.create_vertex_array() }
    }

    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>) {
        unsafe { self.gl.bind_vertex_array(vertex_array) }
    }

    fn delete_vertex_array(&self, vertex_array: Self::VertexArray) {
        unsafe { self.gl.delete_vertex_array(vertex_array) }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(index, size, glow::FLOAT, false, stride, offset)
        }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn clear_color(&self, color: Vec4) {
        unsafe { self.gl.clear_color(color.x, color.y, color.z, color.w) }
    }

    fn clear(&self, mask: u32) {
        unsafe { self.gl.clear(mask) }
    }

    fn enable(&self, capability: u32) {
        unsafe { self.gl.enable(capability) }
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(mode, first, count) }
    }
}

/// A fake GL backend that records every call, for driving the pipeline in tests.
#[cfg(test)]
pub mod testing {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    use glam::Vec4;

    use super::GlApi;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        CreateShader { shader: u32, shader_type: u32 },
        ShaderSource { shader: u32 },
        CompileShader { shader: u32 },
        DeleteShader { shader: u32 },
        CreateProgram { program: u32 },
        AttachShader { program: u32, shader: u32 },
        DetachShader { program: u32, shader: u32 },
        BindAttribLocation { program: u32, index: u32, name: String },
        LinkProgram { program: u32 },
        UseProgram { program: Option<u32> },
        DeleteProgram { program: u32 },
        Uniform1f { program: u32, name: String, value: f32 },
        CreateBuffer { buffer: u32 },
        BindArrayBuffer { buffer: Option<u32> },
        ArrayBufferData { floats: Vec<f32> },
        DeleteBuffer { buffer: u32 },
        CreateVertexArray { vertex_array: u32 },
        BindVertexArray { vertex_array: Option<u32> },
        DeleteVertexArray { vertex_array: u32 },
        EnableVertexAttribArray { index: u32 },
        VertexAttribPointer { index: u32, size: i32, stride: i32, offset: i32 },
        Viewport { x: i32, y: i32, width: i32, height: i32 },
        ClearColor { color: Vec4 },
        Clear { mask: u32 },
        Enable { capability: u32 },
        DrawArrays { mode: u32, first: i32, count: i32 },
    }

    #[derive(Debug, Clone)]
    pub struct FakeUniform {
        program: u32,
        name: String,
    }

    /// Records calls in order and hands out increasing integer handles.
    pub struct RecordingGl {
        calls: RefCell<Vec<Call>>,
        next_handle: Cell<u32>,
        sources: RefCell<HashMap<u32, String>>,
        compiled: RefCell<HashMap<u32, bool>>,
        active_uniforms: Vec<String>,
        compile_failure_marker: Option<String>,
        fail_link: bool,
    }

    impl RecordingGl {
        /// A backend whose programs expose a single `uAspect` uniform.
        pub fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                next_handle: Cell::new(1),
                sources: RefCell::new(HashMap::new()),
                compiled: RefCell::new(HashMap::new()),
                active_uniforms: vec!["uAspect".to_string()],
                compile_failure_marker: None,
                fail_link: false,
            }
        }

        /// Any shader whose source contains `marker` fails to compile.
        pub fn failing_compile_on(mut self, marker: &str) -> Self {
            self.compile_failure_marker = Some(marker.to_string());
            self
        }

        pub fn failing_link(mut self) -> Self {
            self.fail_link = true;
            self
        }

        pub fn with_uniforms(mut self, names: &[&str]) -> Self {
            self.active_uniforms = names.iter().map(|name| name.to_string()).collect();
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        pub fn clear_calls(&self) {
            self.calls.borrow_mut().clear();
        }

        pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
            self.calls.borrow().iter().filter(|call| predicate(call)).count()
        }

        pub fn position(&self, predicate: impl Fn(&Call) -> bool) -> Option<usize> {
            self.calls.borrow().iter().position(predicate)
        }

        /// Values pushed to the uniform called `name`, in order.
        pub fn uniform_values(&self, name: &str) -> Vec<f32> {
            self.calls
                .borrow()
                .iter()
                .filter_map(|call| match call {
                    Call::Uniform1f {
                        name: pushed,
                        value,
                        ..
                    } if pushed == name => Some(*value),
                    _ => None,
                })
                .collect()
        }

        pub fn draws(&self) -> Vec<Call> {
            self.calls
                .borrow()
                .iter()
                .filter(|call| matches!(call, Call::DrawArrays { .. }))
                .cloned()
                .collect()
        }

        fn record(&self, call: Call) {
            self.calls.borrow_mut().push(call);
        }

        fn allocate(&self) -> u32 {
            let handle = self.next_handle.get();
            self.next_handle.set(handle + 1);
            handle
        }
    }

    impl GlApi for RecordingGl {
        type Shader = u32;
        type Program = u32;
        type Buffer = u32;
        type VertexArray = u32;
        type UniformLocation = FakeUniform;

        fn create_shader(&self, shader_type: u32) -> Result<u32, String> {
            let shader = self.allocate();
            self.record(Call::CreateShader {
                shader,
                shader_type,
            });
            Ok(shader)
        }

        fn shader_source(&self, shader: u32, source: &str) {
            self.sources.borrow_mut().insert(shader, source.to_string());
            self.record(Call::ShaderSource { shader });
        }

        fn compile_shader(&self, shader: u32) {
            let ok = match (&self.compile_failure_marker, self.sources.borrow().get(&shader)) {
                (_, None) => false,
                (Some(marker), Some(source)) => !source.contains(marker.as_str()),
                (None, Some(_)) => true,
            };
            self.compiled.borrow_mut().insert(shader, ok);
            self.record(Call::CompileShader { shader });
        }

        fn shader_compile_status(&self, shader: u32) -> bool {
            self.compiled.borrow().get(&shader).copied().unwrap_or(false)
        }

        fn shader_info_log(&self, shader: u32) -> String {
            format!("0:1(1): error: shader {shader} rejected")
        }

        fn delete_shader(&self, shader: u32) {
            self.record(Call::DeleteShader { shader });
        }

        fn create_program(&self) -> Result<u32, String> {
            let program = self.allocate();
            self.record(Call::CreateProgram { program });
            Ok(program)
        }

        fn attach_shader(&self, program: u32, shader: u32) {
            self.record(Call::AttachShader { program, shader });
        }

        fn detach_shader(&self, program: u32, shader: u32) {
            self.record(Call::DetachShader { program, shader });
        }

        fn bind_attrib_location(&self, program: u32, index: u32, name: &str) {
            self.record(Call::BindAttribLocation {
                program,
                index,
                name: name.to_string(),
            });
        }

        fn link_program(&self, program: u32) {
            self.record(Call::LinkProgram { program });
        }

        fn program_link_status(&self, _program: u32) -> bool {
            !self.fail_link
        }

        fn program_info_log(&self, _program: u32) -> String {
            "error: vPosition is not declared".to_string()
        }

        fn use_program(&self, program: Option<u32>) {
            self.record(Call::UseProgram { program });
        }

        fn delete_program(&self, program: u32) {
            self.record(Call::DeleteProgram { program });
        }

        fn uniform_location(&self, program: u32, name: &str) -> Option<FakeUniform> {
            self.active_uniforms
                .iter()
                .any(|active| active == name)
                .then(|| FakeUniform {
                    program,
                    name: name.to_string(),
                })
        }

        fn uniform_1_f32(&self, location: &FakeUniform, value: f32) {
            self.record(Call::Uniform1f {
                program: location.program,
                name: location.name.clone(),
                value,
            });
        }

        fn create_buffer(&self) -> Result<u32, String> {
            let buffer = self.allocate();
            self.record(Call::CreateBuffer { buffer });
            Ok(buffer)
        }

        fn bind_array_buffer(&self, buffer: Option<u32>) {
            self.record(Call::BindArrayBuffer { buffer });
        }

        fn array_buffer_data(&self, data: &[u8]) {
            let floats = data
                .chunks_exact(4)
                .map(|bytes| f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
                .collect();
            self.record(Call::ArrayBufferData { floats });
        }

        fn delete_buffer(&self, buffer: u32) {
            self.record(Call::DeleteBuffer { buffer });
        }

        fn create_vertex_array(&self) -> Result<u32, String> {
            let vertex_array = self.allocate();
            self.record(Call::CreateVertexArray { vertex_array });
            Ok(vertex_array)
        }

        fn bind_vertex_array(&self, vertex_array: Option<u32>) {
            self.record(Call::BindVertexArray { vertex_array });
        }

        fn delete_vertex_array(&self, vertex_array: u32) {
            self.record(Call::DeleteVertexArray { vertex_array });
        }

        fn enable_vertex_attrib_array(&self, index: u32) {
            self.record(Call::EnableVertexAttribArray { index });
        }

        fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32) {
            self.record(Call::VertexAttribPointer {
                index,
                size,
                stride,
                offset,
            });
        }

        fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
            self.record(Call::Viewport {
                x,
                y,
                width,
                height,
            });
        }

        fn clear_color(&self, color: Vec4) {
            self.record(Call::ClearColor { color });
        }

        fn clear(&self, mask: u32) {
            self.record(Call::Clear { mask });
        }

        fn enable(&self, capability: u32) {
            self.record(Call::Enable { capability });
        }

        fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
            self.record(Call::DrawArrays { mode, first, count });
        }
    }
}

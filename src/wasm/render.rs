use js_sys::{Float32Array, Uint32Array};
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

use super::shaders;
use crate::config;
use crate::error::{Error, Result};
use crate::geometry::{uv_sphere, MeshData};
use crate::stage::StageState;

/// Below this alpha a layer is not drawn at all.
const MIN_ALPHA: f32 = 0.001;
const POINT_SIZE: f32 = 18.0;

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader> {
    let shader = gl.create_shader(kind).ok_or(Error::ContextUnavailable)?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl.get_shader_parameter(&shader, GL::COMPILE_STATUS).as_bool().unwrap_or(false) {
        Ok(shader)
    } else {
        let info = gl.get_shader_info_log(&shader).unwrap_or_else(|| "unknown shader error".to_string());
        gl.delete_shader(Some(&shader));
        Err(Error::ShaderCompile(info))
    }
}

fn link_program(gl: &GL, vertex_src: &str, fragment_src: &str) -> Result<WebGlProgram> {
    let vertex = compile_shader(gl, GL::VERTEX_SHADER, vertex_src)?;
    let fragment = compile_shader(gl, GL::FRAGMENT_SHADER, fragment_src)?;
    let program = gl.create_program().ok_or(Error::ContextUnavailable)?;
    gl.attach_shader(&program, &vertex);
    gl.attach_shader(&program, &fragment);
    gl.link_program(&program);
    let linked = gl.get_program_parameter(&program, GL::LINK_STATUS).as_bool().unwrap_or(false);
    gl.detach_shader(&program, &vertex);
    gl.detach_shader(&program, &fragment);
    gl.delete_shader(Some(&vertex));
    gl.delete_shader(Some(&fragment));
    if linked {
        Ok(program)
    } else {
        let info = gl.get_program_info_log(&program).unwrap_or_else(|| "unknown link error".to_string());
        gl.delete_program(Some(&program));
        Err(Error::ProgramLink(info))
    }
}

/// Uniform locations shared by both programs.
struct Uniforms {
    model: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    time: Option<WebGlUniformLocation>,
    magnet: Option<WebGlUniformLocation>,
    influence: Option<WebGlUniformLocation>,
    point_size: Option<WebGlUniformLocation>,
    pixel_ratio: Option<WebGlUniformLocation>,
    color_a: Option<WebGlUniformLocation>,
    color_b: Option<WebGlUniformLocation>,
    alpha: Option<WebGlUniformLocation>,
}

impl Uniforms {
    fn locate(gl: &GL, program: &WebGlProgram) -> Self {
        let at = |name: &str| gl.get_uniform_location(program, name);
        Self {
            model: at("u_model"),
            view: at("u_view"),
            projection: at("u_projection"),
            time: at("u_time"),
            magnet: at("u_magnet"),
            influence: at("u_influence"),
            point_size: at("u_point_size"),
            pixel_ratio: at("u_pixel_ratio"),
            color_a: at("u_color_a"),
            color_b: at("u_color_b"),
            alpha: at("u_alpha"),
        }
    }
}

struct Layer {
    program: WebGlProgram,
    uniforms: Uniforms,
}

pub struct Renderer {
    gl: GL,
    canvas: HtmlCanvasElement,
    mesh: Layer,
    points: Layer,
    vao: WebGlVertexArrayObject,
    buffers: Vec<WebGlBuffer>,
    index_count: i32,
    vertex_count: i32,
    pixel_ratio: f32,
    size: (u32, u32),
}

fn upload_f32(gl: &GL, location: u32, size: i32, data: &[f32]) -> Result<WebGlBuffer> {
    let buffer = gl.create_buffer().ok_or(Error::ContextUnavailable)?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
    // SAFETY: the view is consumed by bufferData before any allocation.
    unsafe {
        let view = Float32Array::view(data);
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &view, GL::STATIC_DRAW);
    }
    gl.enable_vertex_attrib_array(location);
    gl.vertex_attrib_pointer_with_i32(location, size, GL::FLOAT, false, 0, 0);
    Ok(buffer)
}

impl Renderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let gl: GL = canvas
            .get_context("webgl2")
            .ok()
            .flatten()
            .ok_or(Error::ContextUnavailable)?
            .dyn_into()
            .map_err(|_| Error::ContextUnavailable)?;

        let mesh_program = link_program(&gl, shaders::VERTEX, shaders::MESH_FRAGMENT)?;
        let points_program = link_program(&gl, shaders::VERTEX, shaders::POINTS_FRAGMENT)?;
        let mesh = Layer { uniforms: Uniforms::locate(&gl, &mesh_program), program: mesh_program };
        let points = Layer { uniforms: Uniforms::locate(&gl, &points_program), program: points_program };

        let data = uv_sphere(config::SPHERE_RADIUS, config::SPHERE_SEGMENTS, config::SPHERE_RINGS);
        let (vao, buffers) = Self::upload(&gl, &data)?;

        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);
        let [r, g, b, a] = config::CLEAR_COLOR;
        gl.clear_color(r, g, b, a);

        log::info!("renderer ready: {} vertices, {} indices", data.vertex_count(), data.indices.len());
        Ok(Self {
            gl,
            canvas,
            mesh,
            points,
            vao,
            buffers,
            index_count: data.indices.len() as i32,
            vertex_count: data.vertex_count() as i32,
            pixel_ratio: 1.0,
            size: (0, 0),
        })
    }

    fn upload(gl: &GL, data: &MeshData) -> Result<(WebGlVertexArrayObject, Vec<WebGlBuffer>)> {
        let vao = gl.create_vertex_array().ok_or(Error::ContextUnavailable)?;
        gl.bind_vertex_array(Some(&vao));
        let mut buffers = vec![
            upload_f32(gl, 0, 3, &data.positions)?,
            upload_f32(gl, 1, 3, &data.normals)?,
            upload_f32(gl, 2, 1, &data.seeds)?,
        ];
        let indices = gl.create_buffer().ok_or(Error::ContextUnavailable)?;
        gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&indices));
        // SAFETY: as in `upload_f32`.
        unsafe {
            let view = Uint32Array::view(&data.indices);
            gl.buffer_data_with_array_buffer_view(GL::ELEMENT_ARRAY_BUFFER, &view, GL::STATIC_DRAW);
        }
        gl.bind_vertex_array(None);
        buffers.push(indices);
        Ok((vao, buffers))
    }

    /// Matches the backing store to the CSS viewport, DPR capped.
    pub fn fit(&mut self, css_width: f32, css_height: f32, device_pixel_ratio: f64) {
        let dpr = device_pixel_ratio.clamp(1.0, config::MAX_PIXEL_RATIO);
        let w = (css_width as f64 * dpr).round().max(1.0) as u32;
        let h = (css_height as f64 * dpr).round().max(1.0) as u32;
        if (w, h) == self.size {
            return;
        }
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        self.gl.viewport(0, 0, w as i32, h as i32);
        self.size = (w, h);
        self.pixel_ratio = dpr as f32;
    }

    fn set_uniforms(&self, layer: &Layer, state: &StageState, alpha: f32) {
        let gl = &self.gl;
        let u = &layer.uniforms;
        let model = state.transform.borrow().matrix();
        gl.uniform_matrix4fv_with_f32_array(u.model.as_ref(), false, &model.to_cols_array());
        gl.uniform_matrix4fv_with_f32_array(u.view.as_ref(), false, &state.camera.view().to_cols_array());
        gl.uniform_matrix4fv_with_f32_array(
            u.projection.as_ref(),
            false,
            &state.camera.projection().to_cols_array(),
        );
        gl.uniform1f(u.time.as_ref(), state.elapsed);
        gl.uniform3fv_with_f32_array(u.magnet.as_ref(), &state.magnet_point.to_array());
        gl.uniform1f(u.influence.as_ref(), state.influence);
        gl.uniform1f(u.point_size.as_ref(), POINT_SIZE);
        gl.uniform1f(u.pixel_ratio.as_ref(), self.pixel_ratio);
        gl.uniform3fv_with_f32_array(u.color_a.as_ref(), &config::MESH_COLOR_A);
        gl.uniform3fv_with_f32_array(u.color_b.as_ref(), &config::MESH_COLOR_B);
        gl.uniform1f(u.alpha.as_ref(), alpha);
    }

    /// Draws the solid mesh and the point cloud, cross-faded by particle mode.
    pub fn draw(&self, state: &StageState) {
        let gl = &self.gl;
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
        gl.bind_vertex_array(Some(&self.vao));

        let particle = state.particles.current();
        let mesh_alpha = 1.0 - particle;
        if mesh_alpha > MIN_ALPHA {
            gl.enable(GL::DEPTH_TEST);
            gl.use_program(Some(&self.mesh.program));
            self.set_uniforms(&self.mesh, state, mesh_alpha);
            gl.draw_elements_with_i32(GL::TRIANGLES, self.index_count, GL::UNSIGNED_INT, 0);
        }
        if particle > MIN_ALPHA {
            gl.disable(GL::DEPTH_TEST);
            gl.use_program(Some(&self.points.program));
            self.set_uniforms(&self.points, state, particle);
            gl.draw_arrays(GL::POINTS, 0, self.vertex_count);
        }
        gl.bind_vertex_array(None);
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        for buffer in &self.buffers {
            self.gl.delete_buffer(Some(buffer));
        }
        self.gl.delete_vertex_array(Some(&self.vao));
        self.gl.delete_program(Some(&self.mesh.program));
        self.gl.delete_program(Some(&self.points.program));
    }
}

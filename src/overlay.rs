//! WebGL2 shader overlay fed from the engine's [`OverlayUniforms`].

use crate::constants::OVERLAY_UNIFORM_EPS;
use effect_core::OverlayUniforms;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader};

static OVERLAY_VERT: &str = include_str!("../shaders/overlay.vert");
static OVERLAY_FRAG: &str = include_str!("../shaders/overlay.frag");

const UNIFORM_BINDING: u32 = 0;

pub struct Overlay {
    gl: GL,
    canvas: HtmlCanvasElement,
    program: WebGlProgram,
    ubo: WebGlBuffer,
    vao: web_sys::WebGlVertexArrayObject,
    last: Option<OverlayUniforms>,
}

fn compile(gl: &GL, kind: u32, src: &str) -> anyhow::Result<WebGlShader> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| anyhow::anyhow!("create_shader failed"))?;
    gl.shader_source(&shader, src);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let info = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(anyhow::anyhow!("shader compile error: {}", info))
    }
}

fn link(gl: &GL, vert: &WebGlShader, frag: &WebGlShader) -> anyhow::Result<WebGlProgram> {
    let program = gl
        .create_program()
        .ok_or_else(|| anyhow::anyhow!("create_program failed"))?;
    gl.attach_shader(&program, vert);
    gl.attach_shader(&program, frag);
    gl.link_program(&program);
    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let info = gl.get_program_info_log(&program).unwrap_or_default();
        Err(anyhow::anyhow!("program link error: {}", info))
    }
}

impl Overlay {
    pub fn new(canvas: HtmlCanvasElement) -> anyhow::Result<Self> {
        let gl: GL = canvas
            .get_context("webgl2")
            .map_err(|e| anyhow::anyhow!("{:?}", e))?
            .ok_or_else(|| anyhow::anyhow!("WebGL2 not supported"))?
            .dyn_into()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;

        let vert = compile(&gl, GL::VERTEX_SHADER, OVERLAY_VERT)?;
        let frag = compile(&gl, GL::FRAGMENT_SHADER, OVERLAY_FRAG)?;
        let program = link(&gl, &vert, &frag)?;
        gl.delete_shader(Some(&vert));
        gl.delete_shader(Some(&frag));

        let block = gl.get_uniform_block_index(&program, "Overlay");
        if block == GL::INVALID_INDEX {
            return Err(anyhow::anyhow!("uniform block Overlay missing"));
        }
        gl.uniform_block_binding(&program, block, UNIFORM_BINDING);

        let ubo = gl
            .create_buffer()
            .ok_or_else(|| anyhow::anyhow!("create_buffer failed"))?;
        gl.bind_buffer(GL::UNIFORM_BUFFER, Some(&ubo));
        gl.buffer_data_with_u8_array(
            GL::UNIFORM_BUFFER,
            bytemuck::bytes_of(&OverlayUniforms::default()),
            GL::DYNAMIC_DRAW,
        );
        gl.bind_buffer_base(GL::UNIFORM_BUFFER, UNIFORM_BINDING, Some(&ubo));

        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| anyhow::anyhow!("create_vertex_array failed"))?;

        gl.enable(GL::BLEND);
        gl.blend_func(GL::ONE, GL::ONE_MINUS_SRC_ALPHA);
        log::info!("[overlay] WebGL2 overlay ready");
        Ok(Self {
            gl,
            canvas,
            program,
            ubo,
            vao,
            last: None,
        })
    }

    /// Canvas size in CSS pixels, which is the space the engine works in.
    pub fn resolution(&self) -> [f32; 2] {
        let rect = self.canvas.get_bounding_client_rect();
        [rect.width() as f32, rect.height() as f32]
    }

    pub fn sync_backing_size(&self) {
        if let Some(w) = web_sys::window() {
            let dpr = w.device_pixel_ratio();
            let rect = self.canvas.get_bounding_client_rect();
            self.canvas.set_width(((rect.width() * dpr) as u32).max(1));
            self.canvas.set_height(((rect.height() * dpr) as u32).max(1));
        }
    }

    /// Draw a frame. While nothing but time moves and no burst is active the
    /// previous frame stays on screen.
    pub fn draw(&mut self, uniforms: &OverlayUniforms) {
        if let Some(last) = &self.last {
            if uniforms.energy <= OVERLAY_UNIFORM_EPS && !uniforms.changed_from(last, OVERLAY_UNIFORM_EPS) {
                return;
            }
        }
        let gl = &self.gl;
        gl.viewport(0, 0, self.canvas.width() as i32, self.canvas.height() as i32);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(GL::COLOR_BUFFER_BIT);

        gl.bind_buffer(GL::UNIFORM_BUFFER, Some(&self.ubo));
        gl.buffer_sub_data_with_i32_and_u8_array(GL::UNIFORM_BUFFER, 0, bytemuck::bytes_of(uniforms));

        gl.use_program(Some(&self.program));
        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_arrays(GL::TRIANGLES, 0, 3);
        gl.bind_vertex_array(None);
        self.last = Some(*uniforms);
    }
}

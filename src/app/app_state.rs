//! AppState module.
//!
//! This module defines the [`AppState`] struct, which holds all state required
//! for a running session: the GPU renderer, the cube state, the text overlay,
//! and pointer tracking.

use crate::game::CubeState;
use crate::renderer::text::TextRenderer;
use crate::renderer::wgpu_lib::WgpuRenderer;
use winit::window::Window;

/// Holds all state required for a running session.
pub struct AppState {
    /// The WGPU renderer for the cube and overlay.
    pub wgpu_renderer: WgpuRenderer,
    /// The puzzle state: registry, engine, sequencer, gesture, camera.
    pub cube: CubeState,
    /// The text renderer for the overlay elements.
    pub text_renderer: TextRenderer,
    /// Last reported cursor position, physical pixels.
    pub cursor_position: (f64, f64),
    /// Whether the left button is currently held.
    pub left_button_down: bool,
    /// Set when a press missed the cube; the drag orbits the camera instead.
    pub orbiting: bool,
}

impl AppState {
    /// Asynchronously creates a new [`AppState`] with initialized renderers
    /// and a solved cube.
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        window: &Window,
        width: u32,
        height: u32,
    ) -> Self {
        let wgpu_renderer = WgpuRenderer::new(instance, surface, width, height).await;

        let mut text_renderer = TextRenderer::new(
            &wgpu_renderer.device,
            &wgpu_renderer.queue,
            wgpu_renderer.surface_config.format,
            window,
        );
        text_renderer.initialize_overlay(height);

        Self {
            wgpu_renderer,
            cube: CubeState::new(),
            text_renderer,
            cursor_position: (0.0, 0.0),
            left_button_down: false,
            orbiting: false,
        }
    }

    /// Resizes the WGPU surface and repositions the overlay footer.
    pub fn resize_surface(&mut self, width: u32, height: u32) {
        self.wgpu_renderer.resize(width, height);

        let help_position = crate::renderer::text::TextPosition {
            x: 20.0,
            y: height as f32 - 36.0,
            max_width: Some(700.0),
            max_height: Some(24.0),
        };
        if let Err(e) = self.text_renderer.update_position("help", help_position) {
            println!("Failed to update help position: {}", e);
        }
    }

    /// Routes a left-button press into the gesture interpreter.
    ///
    /// While a turn or scramble is running, picking is suppressed and the
    /// press falls through to orbiting, like a background press.
    pub fn handle_pointer_down(&mut self) {
        self.left_button_down = true;
        let (px, py) = self.cursor_position;
        let width = self.wgpu_renderer.surface_config.width;
        let height = self.wgpu_renderer.surface_config.height;

        let picked = !self.cube.is_busy()
            && self.cube.gesture.pointer_down(
                &self.cube.registry,
                &self.cube.camera,
                px,
                py,
                width,
                height,
            );
        self.orbiting = !picked;
    }

    /// Routes cursor motion to the active drag: a face drag classifies into a
    /// turn, a background drag orbits the camera.
    pub fn handle_pointer_move(&mut self, px: f64, py: f64) {
        let (last_x, last_y) = self.cursor_position;
        self.cursor_position = (px, py);

        if !self.left_button_down {
            return;
        }

        if self.orbiting {
            const ORBIT_SENSITIVITY: f32 = 0.008;
            let delta_yaw = -(px - last_x) as f32 * ORBIT_SENSITIVITY;
            let delta_pitch = (py - last_y) as f32 * ORBIT_SENSITIVITY;
            self.cube.camera.orbit(delta_yaw, delta_pitch);
            return;
        }

        if let Some(request) =
            self.cube
                .gesture
                .pointer_move(&self.cube.registry, &self.cube.camera, px, py)
        {
            self.cube.request_turn(request);
        }
    }

    /// Ends the current press.
    pub fn handle_pointer_up(&mut self) {
        self.left_button_down = false;
        self.orbiting = false;
        self.cube.gesture.pointer_up();
    }
}

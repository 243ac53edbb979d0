//! Update logic for the App.
//!
//! Contains the per-frame update and rendering methods for the App struct.

use std::time::Instant;

use super::event_handler::App;

impl App {
    /// Handles the main rendering loop and per-frame state updates.
    ///
    /// Called on every redraw request. Advances the rotation engine and the
    /// sequencer, refreshes the overlay, renders the frame, and requests the
    /// next redraw so animation keeps running.
    pub fn handle_redraw(&mut self) {
        let window = self
            .window
            .as_ref()
            .expect("Window must be initialized before use");
        if window.is_minimized().unwrap_or(false) {
            return;
        }

        let state = self
            .state
            .as_mut()
            .expect("State must be initialized before use");

        // Advance the engine and sequencer by one frame.
        let dt = state.cube.delta_time;
        state.cube.update(dt);

        state.text_renderer.update_overlay(&state.cube);

        let mut encoder = state
            .wgpu_renderer
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        let surface_texture = match state.wgpu_renderer.update_canvas(
            &mut encoder,
            &state.cube,
            &mut state.text_renderer,
        ) {
            Ok(texture) => texture,
            Err(err) => {
                eprintln!("Failed to update canvas: {}", err);
                return;
            }
        };

        window.request_redraw();

        state.wgpu_renderer.queue.submit(Some(encoder.finish()));
        surface_texture.present();

        // Poll the device so resources retire promptly between frames.
        state.wgpu_renderer.device.poll(wgpu::Maintain::Poll);
    }

    /// Updates frame timing: delta time for the animation step and a
    /// once-per-second FPS figure for the overlay.
    pub fn handle_frame_timing(&mut self, current_time: Instant) {
        if let Some(state) = self.state.as_mut() {
            let duration = current_time.duration_since(state.cube.last_fps_time);

            state.cube.frame_count += 1;

            if duration.as_secs_f32() >= 1.0 {
                state.cube.current_fps = state.cube.frame_count;
                state.cube.frame_count = 0;
                state.cube.last_fps_time = current_time;
            }

            let delta_time = current_time
                .duration_since(state.cube.last_frame_time)
                .as_secs_f32();

            state.cube.delta_time = delta_time;
            state.cube.last_frame_time = current_time;
        }
    }
}

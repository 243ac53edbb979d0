//! Event handler module.
//!
//! Contains the App struct and its event handling logic.

use crate::app::app_state::AppState;
use crate::game::keys::{winit_key_to_game_key, GameKey};
use std::{sync::Arc, time::Instant};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

/// Main application struct managing the window lifecycle and event routing.
///
/// Implements [`ApplicationHandler`] to handle all window events. Owns the
/// WGPU instance, the application state, and the window.
///
/// # Lifecycle
/// 1. Created with `App::new()` - initializes the WGPU instance
/// 2. `resumed()` creates the window, surface, and application state
/// 3. Events are handled via `ApplicationHandler` trait methods
/// 4. The application runs until the window is closed
#[derive(Default)]
pub struct App {
    /// The WGPU instance for graphics operations.
    pub instance: wgpu::Instance,
    /// The current application state, None until initialized.
    pub state: Option<AppState>,
    /// The application window, None until set.
    pub window: Option<Arc<Window>>,
}

impl App {
    /// Creates a new [`App`] with a default WGPU instance. The state and
    /// window stay None until `set_window()` runs.
    pub fn new() -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        Self {
            instance,
            state: None,
            window: None,
        }
    }

    /// Asynchronously sets up the application window and initializes all
    /// systems: the surface, the renderers, and the solved cube.
    pub async fn set_window(&mut self, window: Window) {
        let window = Arc::new(window);
        let initial_width = 1280;
        let initial_height = 800;

        window.set_title("Tumbler");
        let _ = window.request_inner_size(PhysicalSize::new(initial_width, initial_height));

        let surface = self
            .instance
            .create_surface(window.clone())
            .expect("Failed to create surface!");

        let state = AppState::new(
            &self.instance,
            surface,
            &window,
            initial_width,
            initial_height,
        )
        .await;

        self.window.get_or_insert(window);
        self.state.get_or_insert(state);
    }

    /// Handles window resize events.
    pub fn handle_resized(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            let state = match &mut self.state {
                Some(state) => state,
                None => {
                    eprintln!("Cannot resize surface without state initialized!");
                    return;
                }
            };
            state.resize_surface(width, height);
        }
    }
}

impl ApplicationHandler for App {
    /// Creates the window and initializes the application state on resume.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window = match event_loop.create_window(Window::default_attributes()) {
            Ok(window) => window,
            Err(err) => {
                panic!("Failed to create window: {}", err);
            }
        };
        pollster::block_on(self.set_window(window));
    }

    /// Routes window events: input to the cube and camera, lifecycle events
    /// to the renderer.
    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        let state = match self.state.as_mut() {
            Some(state) => state,
            None => {
                panic!("State not initialized");
            }
        };

        match event {
            WindowEvent::CloseRequested => {
                println!("The close button was pressed; stopping");
                state.wgpu_renderer.cleanup();
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                self.handle_resized(new_size.width, new_size.height);
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: key,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if let Some(game_key) = winit_key_to_game_key(&key) {
                    match game_key {
                        GameKey::Scramble => {
                            let _ = state.cube.shuffle();
                        }
                        GameKey::Reset => {
                            let _ = state.cube.reset();
                        }
                        GameKey::Quit => {
                            state.wgpu_renderer.cleanup();
                            event_loop.exit();
                        }
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                state.handle_pointer_move(position.x, position.y);
            }

            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } => match button_state {
                ElementState::Pressed => state.handle_pointer_down(),
                ElementState::Released => state.handle_pointer_up(),
            },

            WindowEvent::MouseWheel { delta, .. } => {
                let amount = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y * 0.8,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                state.cube.camera.zoom(amount);
            }

            WindowEvent::RedrawRequested => {
                let current_time = Instant::now();
                self.handle_frame_timing(current_time);
                self.handle_redraw();
            }

            _ => {}
        }
    }
}

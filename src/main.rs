//! Tumbler - An Interactive 3x3x3 Puzzle Cube
//!
//! This is the main entry point for the Tumbler application: a 3D puzzle cube
//! rendered with WGPU, turned by dragging faces with the mouse.
//!
//! # Features
//! - **3D Graphics**: Real-time instanced rendering of the 27 cubies
//! - **Gesture Control**: Drag a face to turn its slice, drag the background
//!   to orbit the camera, scroll to zoom
//! - **Scramble and Reset**: S plans a random scramble, R restores the solved
//!   cube
//! - **Overlay**: Status line, turn log, and key help rendered with glyphon
//!
//! # Architecture
//! The application follows a modular architecture:
//! - `app/`: Application state management and event handling
//! - `game/`: Core cube logic: registry, rotation engine, gestures, sequencer
//! - `renderer/`: Graphics rendering pipeline and text overlay
//!
//! # Usage
//! Run the application with `cargo run`.

pub mod app;
pub mod game;
pub mod renderer;

use winit::event_loop::{ControlFlow, EventLoop};

/// Main entry point for the Tumbler application.
fn main() {
    pollster::block_on(run());
}

/// Creates the event loop and runs the application until the window closes.
async fn run() {
    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            eprintln!("Error creating event loop: {}", err);
            return;
        }
    };

    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = app::App::new();

    event_loop.run_app(&mut app).expect("Failed to run app");
}

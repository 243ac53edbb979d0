//! Application module.
//!
//! This module contains the application lifecycle and event routing for the
//! cube: window creation, input handling, and the per-frame update loop.
//!
//! # Module Structure
//!
//! - [`app_state`]: Contains the [`AppState`] struct which holds all application state
//! - [`event_handler`]: Contains the [`App`] struct and event handling logic
//! - [`update`]: Contains the main update loop and rendering logic
//!
//! # Event Flow
//!
//! 1. **Input Events**: Window events are captured by the event handler and
//!    routed to the gesture interpreter, camera, or cube operations
//! 2. **State Updates**: The rotation engine and sequencer tick once per frame
//! 3. **Rendering**: The current registry poses are rendered to the screen
//!
//! The application runs on a single thread. All systems update synchronously
//! in the event loop, so no cross-thread synchronization is needed.

pub mod app_state;
pub mod event_handler;
pub mod update;

pub use app_state::AppState;
pub use event_handler::App;

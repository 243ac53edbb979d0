//! Cube state management module.
//!
//! This module defines [`CubeState`], which tracks all mutable state for the
//! puzzle: the 27-cubie registry, the rotation engine, the scramble/reset
//! sequencer, the gesture interpreter, and the orbit camera. It also defines
//! the shared vocabulary the components speak: [`Axis`], [`TurnRequest`],
//! [`TurnRecord`], and the [`TurnError`] taxonomy.
//!
//! The programmatic surface lives here too: [`CubeState::rotate_layer`],
//! [`CubeState::shuffle`], and [`CubeState::reset`], all safe to call at any
//! time, declining with [`TurnError::Busy`] while a turn is in flight.

pub mod camera;
pub mod cubie;
pub mod gesture;
pub mod keys;
pub mod rotation;
pub mod sequencer;
pub mod slice;

use std::collections::VecDeque;
use std::time::Instant;

use cgmath::Vector3;
use thiserror::Error;

use self::camera::OrbitCamera;
use self::cubie::CubieRegistry;
use self::gesture::GestureInterpreter;
use self::rotation::RotationEngine;
use self::sequencer::Sequencer;

/// Edge length of one cubie, in world units.
pub const CUBIE_SIZE: f32 = 1.0;
/// Gap between adjacent cubies, in world units.
pub const CUBIE_SPACING: f32 = 0.08;
/// Distance between adjacent cubie centers. Grid coordinates convert to world
/// positions through this pitch, and back again in the finalize snap.
pub const GRID_PITCH: f32 = CUBIE_SIZE + CUBIE_SPACING;

/// Duration of a user-initiated turn, in milliseconds.
pub const TURN_DURATION_MS: u64 = 300;
/// Duration of each scramble turn, in milliseconds. Shorter, so a 20–30 move
/// scramble doesn't drag.
pub const SCRAMBLE_TURN_DURATION_MS: u64 = 140;
/// Cumulative pointer displacement (physical pixels) before a drag is
/// classified as a turn gesture.
pub const DRAG_THRESHOLD_PX: f64 = 30.0;

/// How many committed turns the on-screen log keeps.
pub const TURN_LOG_LINES: usize = 8;

/// One of the three world axes a slice can rotate about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// World X axis.
    X,
    /// World Y axis.
    Y,
    /// World Z axis.
    Z,
}

impl Axis {
    /// All three axes, in the order the axis-snap tie-break iterates them.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Index of this axis into a `[T; 3]` coordinate triple.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Converts a coordinate index back into an axis.
    pub fn from_index(index: usize) -> Result<Axis, TurnError> {
        match index {
            0 => Ok(Axis::X),
            1 => Ok(Axis::Y),
            2 => Ok(Axis::Z),
            other => Err(TurnError::InvalidAxis(other)),
        }
    }

    /// Unit vector along this axis.
    pub fn unit(self) -> Vector3<f32> {
        match self {
            Axis::X => Vector3::new(1.0, 0.0, 0.0),
            Axis::Y => Vector3::new(0.0, 1.0, 0.0),
            Axis::Z => Vector3::new(0.0, 0.0, 1.0),
        }
    }

    /// Lowercase letter used in the turn log.
    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

/// A fully-described slice rotation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnRequest {
    /// Axis the slice rotates about.
    pub axis: Axis,
    /// Layer along that axis, in `0..=2`.
    pub layer: usize,
    /// Signed rotation angle in radians (±π/2 or ±π).
    pub angle: f32,
    /// Animation duration in milliseconds. Ignored when `animated` is false.
    pub duration_ms: u64,
    /// Whether the turn animates or applies in a single frame.
    pub animated: bool,
}

impl TurnRequest {
    /// A standard animated turn with the default duration.
    pub fn animated(axis: Axis, layer: usize, angle: f32) -> Self {
        Self {
            axis,
            layer,
            angle,
            duration_ms: TURN_DURATION_MS,
            animated: true,
        }
    }

    /// A turn that applies immediately, without animation.
    pub fn instant(axis: Axis, layer: usize, angle: f32) -> Self {
        Self {
            axis,
            layer,
            angle,
            duration_ms: 0,
            animated: false,
        }
    }
}

/// A committed turn, emitted once the registry has been made consistent.
/// Logged for observability, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnRecord {
    pub axis: Axis,
    pub layer: usize,
    pub angle: f32,
    pub duration_ms: u64,
    pub animated: bool,
}

impl std::fmt::Display for TurnRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let degrees = self.angle.to_degrees().round() as i32;
        write!(
            f,
            "{}/{} {}{}\u{b0} ({} ms)",
            self.axis.label(),
            self.layer,
            if degrees >= 0 { "+" } else { "" },
            degrees,
            if self.animated { self.duration_ms } else { 0 },
        )
    }
}

/// Everything that can decline a turn request. All of these are recoverable:
/// the engine logs, performs no move, and stays consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TurnError {
    /// Axis index outside `0..=2`.
    #[error("axis index {0} is not a cube axis")]
    InvalidAxis(usize),
    /// Layer outside `0..=2`.
    #[error("layer {0} is outside the cube (expected 0..=2)")]
    InvalidLayer(usize),
    /// A turn is already in flight; requests are rejected, never queued.
    #[error("a turn is already in flight")]
    Busy,
}

/// Represents the entire mutable state of the puzzle session.
///
/// This struct is updated every frame and contains:
/// - The cubie registry and the engine that mutates it.
/// - The sequencer driving scramble/reset scripts.
/// - The gesture interpreter and orbit camera.
/// - Timing information for frame updates and FPS calculation.
pub struct CubeState {
    /// The 27 cubie records and their solved snapshot.
    pub registry: CubieRegistry,
    /// The single-flight turn state machine.
    pub engine: RotationEngine,
    /// Scripted turn sequences (scramble) and reset gating.
    pub sequencer: Sequencer,
    /// Pointer pick + drag classification state.
    pub gesture: GestureInterpreter,
    /// The orbiting view camera.
    pub camera: OrbitCamera,
    /// Most recent committed turns, newest last.
    pub turn_log: VecDeque<String>,
    /// Time of the last frame.
    pub last_frame_time: Instant,
    /// Time elapsed since the last frame (seconds).
    pub delta_time: f32,
    /// Number of frames rendered since the last FPS update.
    pub frame_count: u32,
    /// Current frames per second.
    pub current_fps: u32,
    /// Time of the last FPS update.
    pub last_fps_time: Instant,
}

impl Default for CubeState {
    fn default() -> Self {
        Self::new()
    }
}

impl CubeState {
    /// Creates a new [`CubeState`] with a solved cube and default camera.
    pub fn new() -> Self {
        Self {
            registry: CubieRegistry::new(),
            engine: RotationEngine::new(),
            sequencer: Sequencer::new(),
            gesture: GestureInterpreter::new(),
            camera: OrbitCamera::new(),
            turn_log: VecDeque::with_capacity(TURN_LOG_LINES),
            last_frame_time: Instant::now(),
            delta_time: 0.0,
            frame_count: 0,
            current_fps: 0,
            last_fps_time: Instant::now(),
        }
    }

    /// True while any scripted or interactive turn activity is in progress.
    pub fn is_busy(&self) -> bool {
        self.engine.is_busy() || self.sequencer.is_active()
    }

    /// Rotates one layer with the default duration, animated.
    ///
    /// Declines with [`TurnError::Busy`] while a turn is in flight: callers
    /// wait for completion rather than queueing.
    pub fn rotate_layer(&mut self, axis: Axis, layer: usize, angle: f32) -> Result<(), TurnError> {
        self.rotate_layer_with(axis, layer, angle, TURN_DURATION_MS, true)
    }

    /// Rotates one layer with explicit duration and animation flag.
    pub fn rotate_layer_with(
        &mut self,
        axis: Axis,
        layer: usize,
        angle: f32,
        duration_ms: u64,
        animated: bool,
    ) -> Result<(), TurnError> {
        if self.sequencer.is_active() {
            eprintln!("rotate_layer ignored: scramble in progress");
            return Err(TurnError::Busy);
        }
        let request = TurnRequest {
            axis,
            layer,
            angle,
            duration_ms,
            animated,
        };
        match self.engine.execute(&mut self.registry, request) {
            Ok(Some(record)) => {
                self.record_completion(record);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(err) => {
                eprintln!("rotate_layer ignored: {}", err);
                Err(err)
            }
        }
    }

    /// Submits a gesture-classified turn. Busy rejections are silent; the
    /// user sees the absence of rotation, nothing else.
    pub fn request_turn(&mut self, request: TurnRequest) {
        if self.sequencer.is_active() {
            return;
        }
        match self.engine.execute(&mut self.registry, request) {
            Ok(Some(record)) => self.record_completion(record),
            Ok(None) | Err(TurnError::Busy) => {}
            Err(err) => eprintln!("gesture turn rejected: {}", err),
        }
    }

    /// Plans a scramble of 20–30 random turns, drained one per idle frame.
    ///
    /// Returns the planned move count, or [`TurnError::Busy`] if a turn or a
    /// previous scramble is still running.
    pub fn shuffle(&mut self) -> Result<usize, TurnError> {
        if self.is_busy() {
            eprintln!("shuffle ignored: a turn is already in flight");
            return Err(TurnError::Busy);
        }
        let count = self.sequencer.scramble(&mut rand::thread_rng());
        println!("scramble: {} turns planned", count);
        Ok(count)
    }

    /// Restores all 27 cubies to the solved snapshot.
    ///
    /// Declines while animating; the registry is never reset mid-turn.
    pub fn reset(&mut self) -> Result<(), TurnError> {
        if self.is_busy() {
            eprintln!("reset ignored: a turn is already in flight");
            return Err(TurnError::Busy);
        }
        self.registry.reset_all();
        self.turn_log.clear();
        self.push_log("reset to solved".to_string());
        println!("reset to solved");
        Ok(())
    }

    /// Advances the engine and sequencer by one frame.
    ///
    /// `dt` is the frame delta in seconds. Completed turns are appended to
    /// the turn log on the frame they finalize, and only then.
    pub fn update(&mut self, dt: f32) {
        if let Some(record) = self.engine.tick(&mut self.registry, dt) {
            self.record_completion(record);
        }
        if let Some(event) = self.sequencer.tick(&mut self.engine, &mut self.registry) {
            match event {
                sequencer::SequenceEvent::Completed(record) => self.record_completion(record),
                sequencer::SequenceEvent::Finished { turns } => {
                    self.push_log(format!("scramble complete ({} turns)", turns));
                    println!("scramble complete ({} turns)", turns);
                }
            }
        }
    }

    /// One-line status for the overlay.
    pub fn status_text(&self) -> String {
        if self.sequencer.is_active() {
            let (done, total) = self.sequencer.progress();
            format!("scrambling {}/{}", done, total)
        } else if self.engine.is_busy() {
            "turning...".to_string()
        } else {
            "idle".to_string()
        }
    }

    fn record_completion(&mut self, record: TurnRecord) {
        println!("turn {}", record);
        self.push_log(format!("turn {}", record));
    }

    fn push_log(&mut self, line: String) {
        if self.turn_log.len() == TURN_LOG_LINES {
            self.turn_log.pop_front();
        }
        self.turn_log.push_back(line);
    }
}

//! Pointer gesture interpretation: picking a cubie face and classifying a
//! drag into a slice turn.
//!
//! On pointer-down the cursor is unprojected into a world ray and tested
//! against all 27 cubie boxes; the nearest hit's face normal is stored in
//! the cubie's local frame so later turns don't invalidate it. On pointer
//! move, once the drag crosses the threshold, the dominant screen direction
//! plus the picked face's world normal determine the turn axis, layer, and
//! sign. One turn per press, at most.
//!
//! A press that misses the cube (or lands on a face pointing away from the
//! camera) falls through to orbiting, handled by the caller.

use cgmath::{InnerSpace, Point3, Rotation, Vector3};

use crate::game::camera::OrbitCamera;
use crate::game::cubie::CubieRegistry;
use crate::game::{Axis, TurnRequest, CUBIE_SIZE, DRAG_THRESHOLD_PX, TURN_DURATION_MS};
use std::f32::consts::FRAC_PI_2;

/// A successful pointer-down hit.
#[derive(Debug, Clone, Copy)]
pub struct PickHit {
    /// Index of the picked cubie in the registry.
    pub cubie_index: usize,
    /// Outward face normal in the cubie's local frame. Stored local so the
    /// world normal can be re-derived from the live pose at drag time.
    pub local_normal: Vector3<f32>,
}

/// Tracks one press-drag-release cycle.
pub struct GestureInterpreter {
    pick: Option<PickHit>,
    press_position: (f64, f64),
    /// Set once a turn has been issued for this press; later movement in the
    /// same press is ignored.
    committed: bool,
}

impl Default for GestureInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureInterpreter {
    pub fn new() -> Self {
        Self {
            pick: None,
            press_position: (0.0, 0.0),
            committed: false,
        }
    }

    /// True when the current press landed on a cubie face.
    pub fn has_pick(&self) -> bool {
        self.pick.is_some()
    }

    /// Starts a gesture at the given cursor position.
    ///
    /// Casts a ray through the cursor and keeps the nearest cubie whose face
    /// turns toward the camera. Returns whether anything was picked; a miss
    /// means the caller should treat the drag as a camera orbit.
    pub fn pointer_down(
        &mut self,
        registry: &CubieRegistry,
        camera: &OrbitCamera,
        px: f64,
        py: f64,
        width: u32,
        height: u32,
    ) -> bool {
        self.press_position = (px, py);
        self.committed = false;

        let (origin, direction) = camera.screen_ray(px, py, width, height);
        self.pick = pick_cubie(registry, camera, origin, direction);
        self.pick.is_some()
    }

    /// Feeds the current cursor position into an active gesture.
    ///
    /// Returns a turn request exactly once per press, when the accumulated
    /// drag distance first crosses the threshold.
    pub fn pointer_move(
        &mut self,
        registry: &CubieRegistry,
        camera: &OrbitCamera,
        px: f64,
        py: f64,
    ) -> Option<TurnRequest> {
        if self.committed {
            return None;
        }
        let pick = self.pick?;

        let dx = px - self.press_position.0;
        let dy = py - self.press_position.1;
        if (dx * dx + dy * dy).sqrt() < DRAG_THRESHOLD_PX {
            return None;
        }

        let cubie = &registry.cubies()[pick.cubie_index];
        // Re-derive the face normal in world space from the live pose.
        let world_normal = cubie
            .pose
            .orientation
            .rotate_vector(pick.local_normal)
            .normalize();

        let (right, up) = camera.basis();
        // Strictly dominant x only; an exact tie counts as vertical.
        let horizontal = dx.abs() > dy.abs();

        // The candidate turn axis is perpendicular to both the face normal
        // and the screen direction being dragged along.
        let candidate = if horizontal {
            world_normal.cross(right)
        } else {
            world_normal.cross(up)
        };
        if candidate.magnitude() < 1e-4 {
            // Dragging along the face normal's own screen direction; the
            // cross product degenerates and no slice is implied.
            self.committed = true;
            return None;
        }

        let (axis, alignment) = snap_to_axis(candidate.normalize());
        let layer = cubie.grid[axis.index()];

        // Sign falls out of the surface motion: dragging right moves the
        // face along +right, which is rotation by +angle when the snapped
        // axis agrees with the candidate direction.
        let sign = if alignment >= 0.0 { 1.0 } else { -1.0 };
        let angle = if horizontal {
            if dx > 0.0 { FRAC_PI_2 * sign } else { -FRAC_PI_2 * sign }
        } else {
            // Screen y grows downward; dragging up is dy < 0.
            if dy < 0.0 { FRAC_PI_2 * sign } else { -FRAC_PI_2 * sign }
        };

        self.committed = true;
        Some(TurnRequest {
            axis,
            layer,
            angle,
            duration_ms: TURN_DURATION_MS,
            animated: true,
        })
    }

    /// Ends the gesture. Any remaining pick state is discarded.
    pub fn pointer_up(&mut self) {
        self.pick = None;
        self.committed = false;
    }
}

/// Ray-tests the registry and returns the nearest camera-facing hit.
fn pick_cubie(
    registry: &CubieRegistry,
    camera: &OrbitCamera,
    origin: Point3<f32>,
    direction: Vector3<f32>,
) -> Option<PickHit> {
    let view = camera.view_dir();
    let mut best: Option<(f32, PickHit)> = None;

    for (index, cubie) in registry.cubies().iter().enumerate() {
        let Some((t, world_normal)) = ray_box_hit(origin, direction, cubie.pose.position) else {
            continue;
        };
        // Faces turned away from the camera can't anchor a drag.
        if world_normal.dot(view) >= 0.0 {
            continue;
        }
        if best.map_or(true, |(best_t, _)| t < best_t) {
            // Store the normal in the cubie's local frame.
            let local_normal = cubie
                .pose
                .orientation
                .invert()
                .rotate_vector(world_normal)
                .normalize();
            best = Some((
                t,
                PickHit {
                    cubie_index: index,
                    local_normal,
                },
            ));
        }
    }

    best.map(|(_, hit)| hit)
}

/// Slab test against a cubie-sized axis-aligned box at `center`.
///
/// Cubies are treated as axis-aligned regardless of orientation; at rest they
/// are, and picking is suppressed while a turn animates.
fn ray_box_hit(
    origin: Point3<f32>,
    direction: Vector3<f32>,
    center: Vector3<f32>,
) -> Option<(f32, Vector3<f32>)> {
    let half = CUBIE_SIZE / 2.0;
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut enter_axis = 0;
    let mut enter_sign = 0.0_f32;

    for axis in 0..3 {
        let o = origin[axis] - center[axis];
        let d = direction[axis];
        if d.abs() < 1e-8 {
            if o.abs() > half {
                return None;
            }
            continue;
        }
        let mut t0 = (-half - o) / d;
        let mut t1 = (half - o) / d;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        if t0 > t_enter {
            t_enter = t0;
            enter_axis = axis;
            // Entering against the ray: the -half plane for d > 0, the
            // +half plane for d < 0.
            enter_sign = -d.signum();
        }
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }

    if t_enter < 0.0 {
        // Ray starts inside or the box is behind the eye.
        return None;
    }

    let mut normal = Vector3::new(0.0, 0.0, 0.0);
    normal[enter_axis] = enter_sign;
    Some((t_enter, normal))
}

/// Snaps a unit vector to the world axis with the largest |component|,
/// returning the axis and the signed component along it. Ties resolve to the
/// earliest axis in x, y, z order.
fn snap_to_axis(candidate: Vector3<f32>) -> (Axis, f32) {
    let mut best_axis = Axis::X;
    let mut best_mag = f32::NEG_INFINITY;
    for axis in Axis::ALL {
        let component = candidate.dot(axis.unit());
        if component.abs() > best_mag {
            best_mag = component.abs();
            best_axis = axis;
        }
    }
    (best_axis, candidate.dot(best_axis.unit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::cubie::grid_to_position;
    use cgmath::{Quaternion, Rad, Rotation3};

    /// Camera straight down the -Z axis, so screen right is world +X and
    /// screen up is world +Y. Makes expected classifications hand-checkable.
    fn front_camera() -> OrbitCamera {
        let mut camera = OrbitCamera::new();
        camera.yaw = 0.0;
        camera.pitch = 0.0;
        camera.distance = 10.0;
        camera
    }

    const W: u32 = 1280;
    const H: u32 = 800;

    /// Center of the screen maps to the front-center cubie under the front
    /// camera.
    #[test]
    fn pick_hits_the_front_center_cubie() {
        let registry = CubieRegistry::new();
        let camera = front_camera();
        let mut gesture = GestureInterpreter::new();

        assert!(gesture.pointer_down(&registry, &camera, 640.0, 400.0, W, H));
        let hit = gesture.pick.expect("pick stored");
        let cubie = &registry.cubies()[hit.cubie_index];
        assert_eq!(cubie.grid, [1, 1, 2], "front-face center expected");
        // +Z face, facing the camera.
        assert!((hit.local_normal - Vector3::new(0.0, 0.0, 1.0)).magnitude() < 1e-4);
    }

    #[test]
    fn miss_reports_no_pick() {
        let registry = CubieRegistry::new();
        let camera = front_camera();
        let mut gesture = GestureInterpreter::new();
        assert!(!gesture.pointer_down(&registry, &camera, 5.0, 5.0, W, H));
        assert!(!gesture.has_pick());
    }

    #[test]
    fn short_drag_stays_below_threshold() {
        let registry = CubieRegistry::new();
        let camera = front_camera();
        let mut gesture = GestureInterpreter::new();
        gesture.pointer_down(&registry, &camera, 640.0, 400.0, W, H);
        assert!(gesture
            .pointer_move(&registry, &camera, 650.0, 400.0)
            .is_none());
    }

    /// Dragging right across the front face spins the picked cubie's
    /// horizontal slice: axis Y, middle layer, and the face must move with
    /// the drag (toward +X).
    #[test]
    fn rightward_drag_on_front_face_turns_the_y_slice() {
        let registry = CubieRegistry::new();
        let camera = front_camera();
        let mut gesture = GestureInterpreter::new();
        gesture.pointer_down(&registry, &camera, 640.0, 400.0, W, H);

        let request = gesture
            .pointer_move(&registry, &camera, 700.0, 400.0)
            .expect("drag crossed the threshold");
        assert_eq!(request.axis, Axis::Y);
        assert_eq!(request.layer, 1);

        // Check the sign physically: rotating the +Z face position by the
        // requested turn must move it in the +X (screen right) direction.
        let face = grid_to_position([1, 1, 2]);
        let rotation = Quaternion::from_axis_angle(
            request.axis.unit(),
            Rad(request.angle),
        );
        let moved = rotation.rotate_vector(face);
        assert!(moved.x > 0.1, "front face should travel screen-right");
    }

    /// Dragging up across the front face spins the vertical slice about X,
    /// carrying the face upward.
    #[test]
    fn upward_drag_on_front_face_turns_the_x_slice() {
        let registry = CubieRegistry::new();
        let camera = front_camera();
        let mut gesture = GestureInterpreter::new();
        gesture.pointer_down(&registry, &camera, 640.0, 400.0, W, H);

        let request = gesture
            .pointer_move(&registry, &camera, 640.0, 340.0)
            .expect("drag crossed the threshold");
        assert_eq!(request.axis, Axis::X);
        assert_eq!(request.layer, 1);

        let face = grid_to_position([1, 1, 2]);
        let rotation = Quaternion::from_axis_angle(
            request.axis.unit(),
            Rad(request.angle),
        );
        let moved = rotation.rotate_vector(face);
        assert!(moved.y > 0.1, "front face should travel screen-up");
    }

    /// A drag with equal horizontal and vertical travel classifies as
    /// vertical, not horizontal.
    #[test]
    fn diagonal_tie_classifies_as_vertical() {
        let registry = CubieRegistry::new();
        let camera = front_camera();
        let mut gesture = GestureInterpreter::new();
        gesture.pointer_down(&registry, &camera, 640.0, 400.0, W, H);

        let request = gesture
            .pointer_move(&registry, &camera, 690.0, 350.0)
            .expect("drag crossed the threshold");
        assert_eq!(request.axis, Axis::X, "tied drag should take the vertical path");
    }

    #[test]
    fn one_turn_per_press_at_most() {
        let registry = CubieRegistry::new();
        let camera = front_camera();
        let mut gesture = GestureInterpreter::new();
        gesture.pointer_down(&registry, &camera, 640.0, 400.0, W, H);

        assert!(gesture
            .pointer_move(&registry, &camera, 700.0, 400.0)
            .is_some());
        // Keep dragging: no second turn until the press is released.
        assert!(gesture
            .pointer_move(&registry, &camera, 900.0, 400.0)
            .is_none());

        gesture.pointer_up();
        assert!(!gesture.has_pick());
    }

    #[test]
    fn axis_snap_prefers_earlier_axis_on_ties() {
        let diagonal = Vector3::new(1.0, 1.0, 0.0).normalize();
        let (axis, alignment) = snap_to_axis(diagonal);
        assert_eq!(axis, Axis::X);
        assert!(alignment > 0.0);
    }

    #[test]
    fn snap_keeps_negative_alignment_sign() {
        let (axis, alignment) = snap_to_axis(Vector3::new(0.1, -0.9, 0.2).normalize());
        assert_eq!(axis, Axis::Y);
        assert!(alignment < 0.0);
    }

    /// A ray cast from behind the cube enters through faces pointing away
    /// from the camera; those can't anchor a drag.
    #[test]
    fn away_facing_hits_are_rejected() {
        let registry = CubieRegistry::new();
        let camera = front_camera();
        let origin = Point3::new(0.0, 0.0, -10.0);
        let direction = Vector3::new(0.0, 0.0, 1.0);
        assert!(pick_cubie(&registry, &camera, origin, direction).is_none());
    }

    #[test]
    fn ray_box_reports_the_entry_face() {
        let origin = Point3::new(0.0, 0.0, 5.0);
        let direction = Vector3::new(0.0, 0.0, -1.0);
        let (t, normal) = ray_box_hit(origin, direction, Vector3::new(0.0, 0.0, 0.0))
            .expect("ray aims at the box");
        assert!((t - 4.5).abs() < 1e-4);
        assert_eq!(normal, Vector3::new(0.0, 0.0, 1.0));
    }
}

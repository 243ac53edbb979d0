//! The rotation engine: one slice turn at a time, animated and finalized.
//!
//! Each turn walks a fixed state machine: Idle → Grouping → Animating →
//! Finalizing → Idle. Grouping happens inside [`RotationEngine::execute`]
//! (the slice's poses are captured into the active turn's custody vector),
//! Animating advances one step per [`RotationEngine::tick`], and Finalizing
//! runs on the tick where the eased progress reaches 1, the only point at
//! which the registry's grid coordinates are rewritten. While a turn is
//! active the engine rejects new requests outright; nothing is ever queued.
//!
//! The busy flag is not a standalone boolean anyone can poke: it is the
//! presence of the active turn, set and cleared only by `execute` and the
//! finalize step, and queried through [`RotationEngine::is_busy`].

use cgmath::{InnerSpace, Quaternion, Rad, Rotation, Rotation3};

use crate::game::cubie::{position_to_grid, CubieRegistry, Pose};
use crate::game::{slice, TurnError, TurnRecord, TurnRequest};

/// Cubic ease-out: fast start, decelerating into the stop. Matches the feel
/// of a physical puzzle turn coming to rest.
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// A turn in flight. Owning the slice members' start poses here is the
/// scoped-custody handover: registry poses are recomputed from these every
/// frame (never incrementally), and the vector drops when the turn leaves
/// Finalizing, on every exit path.
struct ActiveTurn {
    request: TurnRequest,
    elapsed: f32,
    duration: f32,
    members: Vec<(usize, Pose)>,
}

impl ActiveTurn {
    fn record(&self) -> TurnRecord {
        TurnRecord {
            axis: self.request.axis,
            layer: self.request.layer,
            angle: self.request.angle,
            duration_ms: self.request.duration_ms,
            animated: self.request.animated,
        }
    }
}

/// Single-flight slice turn state machine.
pub struct RotationEngine {
    active: Option<ActiveTurn>,
}

impl Default for RotationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationEngine {
    /// A new engine, idle.
    pub fn new() -> Self {
        Self { active: None }
    }

    /// True while a turn is between Grouping and Finalizing.
    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    /// Starts (and for instant turns, completes) one slice turn.
    ///
    /// Rejects with [`TurnError::Busy`] while another turn is active, and
    /// with [`TurnError::InvalidLayer`] for layers outside the cube; in both
    /// cases the registry is untouched.
    ///
    /// Returns `Ok(Some(record))` when the turn finalized synchronously
    /// (`animated == false`), `Ok(None)` when an animation started. An
    /// animated turn's record is produced by the [`tick`](Self::tick) that
    /// finalizes it.
    pub fn execute(
        &mut self,
        registry: &mut CubieRegistry,
        request: TurnRequest,
    ) -> Result<Option<TurnRecord>, TurnError> {
        if self.active.is_some() {
            return Err(TurnError::Busy);
        }

        // Grouping: capture the slice's current poses. Visually a no-op.
        let indices = slice::select(registry, request.axis, request.layer)?;
        let members: Vec<(usize, Pose)> = indices
            .into_iter()
            .map(|i| (i, registry.cubies()[i].pose))
            .collect();
        let turn = ActiveTurn {
            request,
            elapsed: 0.0,
            duration: request.duration_ms as f32 / 1000.0,
            members,
        };

        if !request.animated {
            // Pivot goes straight to the target angle; finalize in the same
            // frame. Custody is released before we return.
            apply_progress(registry, &turn, 1.0);
            finalize(registry, &turn);
            return Ok(Some(turn.record()));
        }

        self.active = Some(turn);
        Ok(None)
    }

    /// Advances the in-flight turn by `dt` seconds.
    ///
    /// Returns the committed [`TurnRecord`] on the frame the turn finalizes;
    /// only at that point may callers issue the next turn. No-op when idle.
    pub fn tick(&mut self, registry: &mut CubieRegistry, dt: f32) -> Option<TurnRecord> {
        let finished = {
            let turn = self.active.as_mut()?;
            turn.elapsed += dt;
            let t = if turn.duration > 0.0 {
                (turn.elapsed / turn.duration).min(1.0)
            } else {
                1.0
            };
            apply_progress(registry, turn, ease_out_cubic(t));
            t >= 1.0
        };

        if finished {
            let turn = self.active.take().expect("turn checked above");
            finalize(registry, &turn);
            Some(turn.record())
        } else {
            None
        }
    }
}

/// Writes the slice's poses for eased progress in `[0, 1]`.
///
/// Every frame recomputes from the grouped start poses, so intermediate
/// frames never feed error back into the next one.
fn apply_progress(registry: &mut CubieRegistry, turn: &ActiveTurn, eased: f32) {
    let rotation = Quaternion::from_axis_angle(
        turn.request.axis.unit(),
        Rad(turn.request.angle * eased),
    );
    let cubies = registry.cubies_mut();
    for &(index, start) in &turn.members {
        let cubie = &mut cubies[index];
        cubie.pose.position = rotation.rotate_vector(start.position);
        cubie.pose.orientation = (rotation * start.orientation).normalize();
    }
}

/// Finalizing: bake the exact target rotation into each member's pose and
/// re-derive its grid coordinate via the nearest-integer snap. The pivot is
/// conceptually reset to identity by dropping the turn afterwards.
fn finalize(registry: &mut CubieRegistry, turn: &ActiveTurn) {
    apply_progress(registry, turn, 1.0);
    let cubies = registry.cubies_mut();
    for &(index, _) in &turn.members {
        let cubie = &mut cubies[index];
        cubie.grid = position_to_grid(cubie.pose.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Axis;
    use cgmath::Zero;
    use std::f32::consts::{FRAC_PI_2, PI};

    const POSE_TOLERANCE: f32 = 1e-4;

    /// Integer-arithmetic reference for where a grid coordinate lands after
    /// a rigid rotation of `angle` about `axis`, independent of the float
    /// path under test.
    fn rotated_grid(grid: [usize; 3], axis: Axis, angle: f32) -> [usize; 3] {
        let quarter_turns = (angle / FRAC_PI_2).round() as i32;
        let centered = |v: usize| v as i32 - 1;
        let (mut a, mut b) = match axis {
            Axis::X => (centered(grid[1]), centered(grid[2])),
            Axis::Y => (centered(grid[2]), centered(grid[0])),
            Axis::Z => (centered(grid[0]), centered(grid[1])),
        };
        for _ in 0..quarter_turns.rem_euclid(4) {
            // +90° about the axis maps (a, b) -> (-b, a) in the right-handed
            // plane ordering chosen above.
            let (na, nb) = (-b, a);
            a = na;
            b = nb;
        }
        let restore = |v: i32| (v + 1) as usize;
        match axis {
            Axis::X => [grid[0], restore(a), restore(b)],
            Axis::Y => [restore(b), grid[1], restore(a)],
            Axis::Z => [restore(a), restore(b), grid[2]],
        }
    }

    fn poses_close(a: &Pose, b: &Pose) -> bool {
        let dp = a.position - b.position;
        let dq = a.orientation - b.orientation;
        let dq_neg = a.orientation + b.orientation;
        dp.magnitude() < POSE_TOLERANCE
            && (dq.magnitude() < POSE_TOLERANCE || dq_neg.magnitude() < POSE_TOLERANCE)
    }

    #[test]
    fn easing_hits_both_endpoints_and_is_monotone() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        let mut last = 0.0;
        for step in 1..=100 {
            let eased = ease_out_cubic(step as f32 / 100.0);
            assert!(eased >= last, "easing must never reverse");
            last = eased;
        }
    }

    #[test]
    fn coordinate_round_trip_for_every_turn() {
        for axis in Axis::ALL {
            for layer in 0..3 {
                for angle in [FRAC_PI_2, -FRAC_PI_2, PI, -PI] {
                    let mut registry = CubieRegistry::new();
                    let mut engine = RotationEngine::new();
                    let before: Vec<_> = registry.cubies().to_vec();

                    let record = engine
                        .execute(
                            &mut registry,
                            TurnRequest::instant(axis, layer, angle),
                        )
                        .expect("valid turn")
                        .expect("instant turn completes synchronously");
                    assert_eq!(record.axis, axis);

                    for (i, cubie) in registry.cubies().iter().enumerate() {
                        if before[i].grid[axis.index()] == layer {
                            assert_eq!(
                                cubie.grid,
                                rotated_grid(before[i].grid, axis, angle),
                                "slice member {} landed wrong for {:?}/{} angle {}",
                                i,
                                axis,
                                layer,
                                angle
                            );
                            assert_eq!(cubie.grid[axis.index()], layer);
                        } else {
                            assert_eq!(cubie.grid, before[i].grid);
                            assert_eq!(cubie.pose, before[i].pose, "non-member moved");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn busy_engine_rejects_and_leaves_registry_unmutated() {
        let mut registry = CubieRegistry::new();
        let mut engine = RotationEngine::new();
        engine
            .execute(
                &mut registry,
                TurnRequest::animated(Axis::X, 0, FRAC_PI_2),
            )
            .expect("first turn starts");
        let snapshot: Vec<_> = registry.cubies().to_vec();

        let result = engine.execute(
            &mut registry,
            TurnRequest::instant(Axis::Y, 1, FRAC_PI_2),
        );
        assert_eq!(result, Err(TurnError::Busy));
        for (before, after) in snapshot.iter().zip(registry.cubies()) {
            assert_eq!(before.grid, after.grid);
            assert_eq!(before.pose, after.pose);
        }
    }

    #[test]
    fn invalid_layer_is_rejected_without_mutation() {
        let mut registry = CubieRegistry::new();
        let mut engine = RotationEngine::new();
        let result = engine.execute(
            &mut registry,
            TurnRequest::instant(Axis::Z, 7, FRAC_PI_2),
        );
        assert_eq!(result, Err(TurnError::InvalidLayer(7)));
        assert!(!engine.is_busy());
        assert!(registry.is_solved());
    }

    #[test]
    fn animated_turn_finalizes_once_duration_elapses() {
        let mut registry = CubieRegistry::new();
        let mut engine = RotationEngine::new();
        engine
            .execute(
                &mut registry,
                TurnRequest {
                    axis: Axis::Y,
                    layer: 2,
                    angle: FRAC_PI_2,
                    duration_ms: 300,
                    animated: true,
                },
            )
            .expect("turn starts");
        assert!(engine.is_busy());

        // Partway through, poses have moved but grids are untouched.
        assert!(engine.tick(&mut registry, 0.1).is_none());
        let mid_moved = registry
            .cubies()
            .iter()
            .any(|c| c.grid[1] == 2 && !c.pose.position.is_zero()
                && (c.pose.position - crate::game::cubie::grid_to_position(c.grid)).magnitude()
                    > 1e-3);
        assert!(mid_moved, "slice should be mid-rotation after 100 ms");

        assert!(engine.tick(&mut registry, 0.1).is_none());
        let record = engine
            .tick(&mut registry, 0.2)
            .expect("turn finalizes once 300 ms have elapsed");
        assert_eq!(record.layer, 2);
        assert!(!engine.is_busy());

        // Finalize left the slice on exact grid memberships.
        for cubie in registry.cubies() {
            assert!(cubie.grid.iter().all(|&g| g <= 2));
        }
    }

    #[test]
    fn inverse_turns_cancel() {
        let mut registry = CubieRegistry::new();
        let mut engine = RotationEngine::new();
        let before: Vec<_> = registry.cubies().to_vec();

        engine
            .execute(&mut registry, TurnRequest::instant(Axis::X, 1, FRAC_PI_2))
            .expect("forward turn")
            .expect("completes");
        engine
            .execute(&mut registry, TurnRequest::instant(Axis::X, 1, -FRAC_PI_2))
            .expect("inverse turn")
            .expect("completes");

        for (original, after) in before.iter().zip(registry.cubies()) {
            assert_eq!(original.grid, after.grid);
            assert!(
                poses_close(&original.pose, &after.pose),
                "pose drifted beyond tolerance after inverse pair"
            );
        }
    }

    #[test]
    fn four_quarter_turns_compose_to_identity() {
        let mut registry = CubieRegistry::new();
        let mut engine = RotationEngine::new();
        let before: Vec<_> = registry.cubies().to_vec();

        for _ in 0..4 {
            engine
                .execute(&mut registry, TurnRequest::instant(Axis::Z, 0, FRAC_PI_2))
                .expect("turn")
                .expect("completes");
        }

        for (original, after) in before.iter().zip(registry.cubies()) {
            assert_eq!(original.grid, after.grid);
            assert!(poses_close(&original.pose, &after.pose));
        }
    }

    #[test]
    fn grid_stays_classifiable_across_many_turns() {
        // Drift defense: hundreds of composed quaternion rotations must not
        // push any position far enough to misclassify under the round snap.
        let mut registry = CubieRegistry::new();
        let mut engine = RotationEngine::new();
        let sequence = [
            (Axis::X, 0, FRAC_PI_2),
            (Axis::Y, 1, -FRAC_PI_2),
            (Axis::Z, 2, PI),
            (Axis::Y, 0, FRAC_PI_2),
            (Axis::X, 2, -PI),
        ];
        for _ in 0..60 {
            for &(axis, layer, angle) in &sequence {
                engine
                    .execute(&mut registry, TurnRequest::instant(axis, layer, angle))
                    .expect("turn")
                    .expect("completes");
            }
        }
        for cubie in registry.cubies() {
            let rest = crate::game::cubie::grid_to_position(cubie.grid);
            assert!(
                (cubie.pose.position - rest).magnitude() < 1e-2,
                "cubie position drifted {} from its grid slot",
                (cubie.pose.position - rest).magnitude()
            );
            let len = cubie.pose.orientation.magnitude();
            assert!((len - 1.0).abs() < 1e-3, "orientation denormalized: {}", len);
        }
    }

    #[test]
    fn instant_turn_orientation_matches_axis_rotation() {
        let mut registry = CubieRegistry::new();
        let mut engine = RotationEngine::new();
        engine
            .execute(&mut registry, TurnRequest::instant(Axis::Y, 0, FRAC_PI_2))
            .expect("turn")
            .expect("completes");
        let expected = Quaternion::from_axis_angle(Axis::Y.unit(), Rad(FRAC_PI_2));
        for cubie in registry.cubies().iter().filter(|c| c.grid[1] == 0) {
            let diff = cubie.pose.orientation - expected;
            assert!(diff.magnitude() < POSE_TOLERANCE);
        }
    }
}

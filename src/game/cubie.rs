//! Cubie records and the registry that owns them.
//!
//! A cubie is one of the 27 sub-cubes of the puzzle (the invisible center
//! core included; it is still a trackable unit). Each cubie carries a
//! discrete grid coordinate, a continuous world pose, and an immutable
//! snapshot of both taken at construction, which is what reset restores.
//!
//! # Coordinate System
//!
//! Grid coordinates are `[usize; 3]` triples in `{0, 1, 2}` per axis. At
//! rest, a cubie's world position is fully determined by its grid coordinate:
//! `position_axis = (grid_axis - 1) * GRID_PITCH`, so layer 1 sits on the
//! axis planes and layers 0/2 sit one pitch to either side. Orientation may
//! be any unit quaternion, since cubies visibly spin as they travel.

use cgmath::{One, Quaternion, Vector3};

use crate::game::GRID_PITCH;

/// Continuous world-space placement of one cubie.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Center position in world space.
    pub position: Vector3<f32>,
    /// Orientation as a unit quaternion.
    pub orientation: Quaternion<f32>,
}

impl Pose {
    /// The at-rest pose for a grid coordinate: grid-derived position,
    /// identity orientation.
    pub fn at_grid(grid: [usize; 3]) -> Self {
        Self {
            position: grid_to_position(grid),
            orientation: Quaternion::one(),
        }
    }
}

/// One of the 27 sub-cubes.
#[derive(Debug, Clone)]
pub struct Cubie {
    /// Current discrete slice membership, per axis in `{0, 1, 2}`.
    pub grid: [usize; 3],
    /// Current continuous world pose.
    pub pose: Pose,
    /// Grid coordinate at construction. Drives reset and sticker colors.
    pub home_grid: [usize; 3],
    /// Pose at construction. Restored by reset.
    pub home_pose: Pose,
}

impl Cubie {
    fn new(grid: [usize; 3]) -> Self {
        let pose = Pose::at_grid(grid);
        Self {
            grid,
            pose,
            home_grid: grid,
            home_pose: pose,
        }
    }
}

/// Owns the 27 cubie records for the whole session.
///
/// Cubies are created once at startup in the solved configuration, mutated in
/// place by the rotation engine when a turn finalizes, and never destroyed.
/// Indices into the registry are stable identities.
pub struct CubieRegistry {
    cubies: Vec<Cubie>,
}

impl Default for CubieRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CubieRegistry {
    /// Builds the solved cube: all 27 grid coordinates, identity
    /// orientations, and the home snapshot captured from that state.
    pub fn new() -> Self {
        let mut cubies = Vec::with_capacity(27);
        for x in 0..3 {
            for y in 0..3 {
                for z in 0..3 {
                    cubies.push(Cubie::new([x, y, z]));
                }
            }
        }
        Self { cubies }
    }

    /// All 27 cubies, in stable index order.
    pub fn cubies(&self) -> &[Cubie] {
        &self.cubies
    }

    /// Mutable access for the rotation engine.
    pub fn cubies_mut(&mut self) -> &mut [Cubie] {
        &mut self.cubies
    }

    /// Copies every cubie's home snapshot back into its live fields.
    ///
    /// Callers gate on the engine being idle; the registry itself only
    /// copies. With no turn in flight this is a pure state restore.
    pub fn reset_all(&mut self) {
        for cubie in &mut self.cubies {
            cubie.grid = cubie.home_grid;
            cubie.pose = cubie.home_pose;
        }
    }

    /// True when every cubie sits at its home grid and pose.
    pub fn is_solved(&self) -> bool {
        self.cubies
            .iter()
            .all(|c| c.grid == c.home_grid && c.pose == c.home_pose)
    }
}

/// World position implied by a grid coordinate.
pub fn grid_to_position(grid: [usize; 3]) -> Vector3<f32> {
    Vector3::new(
        (grid[0] as f32 - 1.0) * GRID_PITCH,
        (grid[1] as f32 - 1.0) * GRID_PITCH,
        (grid[2] as f32 - 1.0) * GRID_PITCH,
    )
}

/// Grid coordinate implied by a world position.
///
/// Nearest-integer rounding here is the sole defense against floating-point
/// drift accumulated through repeated quaternion composition; truncation
/// would misclassify cubies after enough turns.
pub fn position_to_grid(position: Vector3<f32>) -> [usize; 3] {
    let snap = |v: f32| -> usize {
        let idx = (v / GRID_PITCH + 1.0).round();
        debug_assert!(
            (0.0..=2.0).contains(&idx),
            "position component {} snapped outside the grid",
            v
        );
        idx as usize
    };
    [snap(position.x), snap(position.y), snap(position.z)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Rad, Rotation3};
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn registry_holds_all_27_grid_coordinates() {
        let registry = CubieRegistry::new();
        assert_eq!(registry.cubies().len(), 27);
        for x in 0..3 {
            for y in 0..3 {
                for z in 0..3 {
                    assert!(
                        registry.cubies().iter().any(|c| c.grid == [x, y, z]),
                        "missing cubie at {:?}",
                        [x, y, z]
                    );
                }
            }
        }
    }

    #[test]
    fn rest_positions_follow_the_grid_pitch() {
        let registry = CubieRegistry::new();
        for cubie in registry.cubies() {
            let expected = grid_to_position(cubie.grid);
            assert_eq!(cubie.pose.position, expected);
            assert_eq!(position_to_grid(cubie.pose.position), cubie.grid);
        }
    }

    #[test]
    fn grid_snap_absorbs_float_noise() {
        for grid in [[0usize, 1, 2], [2, 2, 2], [1, 0, 1]] {
            let mut position = grid_to_position(grid);
            position.x += 1e-4;
            position.y -= 1e-4;
            position.z += 3e-5;
            assert_eq!(position_to_grid(position), grid);
        }
    }

    #[test]
    fn reset_restores_mutated_cubies() {
        let mut registry = CubieRegistry::new();
        {
            let cubie = &mut registry.cubies_mut()[5];
            cubie.grid = [2, 2, 2];
            cubie.pose.position = Vector3::new(9.0, 9.0, 9.0);
            cubie.pose.orientation =
                Quaternion::from_axis_angle(Vector3::new(0.0, 1.0, 0.0), Rad(FRAC_PI_2));
        }
        assert!(!registry.is_solved());
        registry.reset_all();
        assert!(registry.is_solved());
    }
}

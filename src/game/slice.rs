//! Slice selection.
//!
//! A slice is the transient, non-owning view of the 9 cubies sharing a fixed
//! coordinate on one axis, the unit of a single turn. Slices are recomputed
//! per turn, never stored.

use crate::game::cubie::CubieRegistry;
use crate::game::{Axis, TurnError};

/// Number of cubies in every valid slice.
pub const SLICE_LEN: usize = 9;

/// Returns the registry indices of the cubies with `grid[axis] == layer`.
///
/// Pure query, no side effects. An out-of-range layer is an invalid-move
/// signal for the caller, not a crash.
pub fn select(
    registry: &CubieRegistry,
    axis: Axis,
    layer: usize,
) -> Result<Vec<usize>, TurnError> {
    if layer > 2 {
        return Err(TurnError::InvalidLayer(layer));
    }
    let indices: Vec<usize> = registry
        .cubies()
        .iter()
        .enumerate()
        .filter(|(_, cubie)| cubie.grid[axis.index()] == layer)
        .map(|(i, _)| i)
        .collect();
    debug_assert_eq!(indices.len(), SLICE_LEN, "a slice is always 9 cubies");
    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_slice_selects_nine_cubies() {
        let registry = CubieRegistry::new();
        for axis in Axis::ALL {
            for layer in 0..3 {
                let indices = select(&registry, axis, layer).expect("valid slice");
                assert_eq!(indices.len(), SLICE_LEN);
                for &i in &indices {
                    assert_eq!(registry.cubies()[i].grid[axis.index()], layer);
                }
            }
        }
    }

    #[test]
    fn slices_of_one_axis_partition_the_cube() {
        let registry = CubieRegistry::new();
        for axis in Axis::ALL {
            let mut seen = [false; 27];
            for layer in 0..3 {
                for i in select(&registry, axis, layer).expect("valid slice") {
                    assert!(!seen[i], "cubie {} appeared in two layers", i);
                    seen[i] = true;
                }
            }
            assert!(seen.iter().all(|&s| s));
        }
    }

    #[test]
    fn out_of_range_layer_is_rejected() {
        let registry = CubieRegistry::new();
        assert_eq!(
            select(&registry, Axis::Y, 3),
            Err(TurnError::InvalidLayer(3))
        );
    }
}

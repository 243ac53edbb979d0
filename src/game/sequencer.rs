//! Scripted turn sequences: the scramble planner and its frame-by-frame
//! dispatcher.
//!
//! A scramble is planned up front as a queue of turn requests, then drained
//! one move per frame: each tick submits the next request only once the
//! engine reports idle, so the single-flight rule is never violated and the
//! cube animates through the whole script move by move.

use rand::Rng;
use std::collections::VecDeque;
use std::f32::consts::{FRAC_PI_2, PI};

use crate::game::cubie::CubieRegistry;
use crate::game::rotation::RotationEngine;
use crate::game::{Axis, TurnRecord, TurnRequest, SCRAMBLE_TURN_DURATION_MS};

/// Scramble move count is drawn uniformly from this range.
const SCRAMBLE_MIN_TURNS: usize = 20;
const SCRAMBLE_MAX_TURNS: usize = 30;

const SCRAMBLE_ANGLES: [f32; 4] = [FRAC_PI_2, -FRAC_PI_2, PI, -PI];

/// What a sequencer tick produced this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SequenceEvent {
    /// One scripted turn finalized (instant turns only; animated scramble
    /// turns report through the engine's own tick).
    Completed(TurnRecord),
    /// The whole script has drained and the engine is idle again.
    Finished { turns: usize },
}

/// Drains a planned queue of turns through the engine, one per idle frame.
pub struct Sequencer {
    pending: VecDeque<TurnRequest>,
    total: usize,
    dispatched: usize,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequencer {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            total: 0,
            dispatched: 0,
        }
    }

    /// True while scripted turns remain to dispatch or finish.
    pub fn is_active(&self) -> bool {
        self.total > 0
    }

    /// Dispatched and planned move counts, for the status overlay.
    pub fn progress(&self) -> (usize, usize) {
        (self.dispatched, self.total)
    }

    /// Plans a fresh scramble: 20–30 random turns, each a quarter or half
    /// turn about a random axis and layer. Returns the planned count.
    ///
    /// Consecutive identical axis/layer pairs are allowed; a scramble does
    /// not need to be a minimal move sequence.
    pub fn scramble<R: Rng>(&mut self, rng: &mut R) -> usize {
        let count = rng.gen_range(SCRAMBLE_MIN_TURNS..=SCRAMBLE_MAX_TURNS);
        self.pending.clear();
        for _ in 0..count {
            let axis = Axis::from_index(rng.gen_range(0..3)).expect("index drawn from 0..3");
            let layer = rng.gen_range(0..3);
            let angle = SCRAMBLE_ANGLES[rng.gen_range(0..SCRAMBLE_ANGLES.len())];
            self.pending.push_back(TurnRequest {
                axis,
                layer,
                angle,
                duration_ms: SCRAMBLE_TURN_DURATION_MS,
                animated: true,
            });
        }
        self.total = count;
        self.dispatched = 0;
        count
    }

    /// Feeds the engine the next scripted turn once it is idle.
    ///
    /// Call every frame after the engine's own tick. Returns a
    /// [`SequenceEvent`] when something worth reporting happened.
    pub fn tick(
        &mut self,
        engine: &mut RotationEngine,
        registry: &mut CubieRegistry,
    ) -> Option<SequenceEvent> {
        if self.total == 0 || engine.is_busy() {
            return None;
        }

        match self.pending.pop_front() {
            Some(request) => {
                self.dispatched += 1;
                match engine.execute(registry, request) {
                    Ok(Some(record)) => Some(SequenceEvent::Completed(record)),
                    Ok(None) => None,
                    Err(err) => {
                        // Planned moves are always in range and the engine
                        // was just checked idle, so this is unreachable in
                        // practice; report and abandon the script.
                        eprintln!("scramble aborted: {}", err);
                        let turns = self.dispatched.saturating_sub(1);
                        self.pending.clear();
                        self.total = 0;
                        self.dispatched = 0;
                        Some(SequenceEvent::Finished { turns })
                    }
                }
            }
            None => {
                // Queue drained and the final turn has finalized.
                let turns = self.total;
                self.total = 0;
                self.dispatched = 0;
                Some(SequenceEvent::Finished { turns })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn scramble_plans_between_twenty_and_thirty_turns() {
        let mut sequencer = Sequencer::new();
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let count = sequencer.scramble(&mut rng);
            assert!((SCRAMBLE_MIN_TURNS..=SCRAMBLE_MAX_TURNS).contains(&count));
            assert_eq!(sequencer.progress(), (0, count));
            assert!(sequencer.is_active());
        }
    }

    #[test]
    fn scramble_drains_one_turn_per_idle_frame() {
        let mut registry = CubieRegistry::new();
        let mut engine = RotationEngine::new();
        let mut sequencer = Sequencer::new();
        let mut rng = StdRng::seed_from_u64(7);
        let planned = sequencer.scramble(&mut rng);

        let mut finished = None;
        // Generous frame budget: each turn takes a handful of 50 ms frames.
        for _ in 0..10_000 {
            engine.tick(&mut registry, 0.05);
            if let Some(SequenceEvent::Finished { turns }) =
                sequencer.tick(&mut engine, &mut registry)
            {
                finished = Some(turns);
                break;
            }
        }

        assert_eq!(finished, Some(planned));
        assert!(!sequencer.is_active());
        assert!(!engine.is_busy());
        for cubie in registry.cubies() {
            assert!(cubie.grid.iter().all(|&g| g <= 2), "grid left the cube");
        }
    }

    #[test]
    fn tick_waits_for_the_engine_between_moves() {
        let mut registry = CubieRegistry::new();
        let mut engine = RotationEngine::new();
        let mut sequencer = Sequencer::new();
        let mut rng = StdRng::seed_from_u64(3);
        sequencer.scramble(&mut rng);

        assert!(sequencer.tick(&mut engine, &mut registry).is_none());
        assert!(engine.is_busy(), "first scripted turn should have started");
        assert_eq!(sequencer.progress().0, 1);

        // While the first turn animates, further ticks dispatch nothing.
        sequencer.tick(&mut engine, &mut registry);
        assert_eq!(sequencer.progress().0, 1);
    }

    #[test]
    fn inactive_sequencer_ticks_are_no_ops() {
        let mut registry = CubieRegistry::new();
        let mut engine = RotationEngine::new();
        let mut sequencer = Sequencer::new();
        assert!(sequencer.tick(&mut engine, &mut registry).is_none());
        assert!(!engine.is_busy());
    }
}

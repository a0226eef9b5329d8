//! The single source of randomness for pieces, garbage holes and names.
//!
//! Everything random in Blockparty goes through [`Randomizer`], so a test
//! can swap in [`ScriptedRandom`] and get the same pieces (or the same
//! garbage gap) every run.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::PieceKind;

/// A uniform index source.
///
/// `Send` because rooms hold one inside a Tokio task.
pub trait Randomizer: Send {
    /// Returns an index in `0..bound`. Callers never pass `bound == 0`.
    fn pick(&mut self, bound: usize) -> usize;

    /// Draws one of the seven piece kinds.
    fn piece_kind(&mut self) -> PieceKind {
        PieceKind::ALL[self.pick(PieceKind::ALL.len())]
    }
}

/// Draws from rand's thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl Randomizer for ThreadRandom {
    fn pick(&mut self, bound: usize) -> usize {
        rand::rng().random_range(0..bound)
    }
}

/// A seeded generator: reproducible across runs.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Randomizer for SeededRandom {
    fn pick(&mut self, bound: usize) -> usize {
        self.rng.random_range(0..bound)
    }
}

/// Replays a fixed list of values forever, reducing each one modulo the
/// requested bound.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<usize>,
    cursor: usize,
}

impl ScriptedRandom {
    /// `values` must not be empty; an empty script behaves like `[0]`.
    pub fn new(values: impl Into<Vec<usize>>) -> Self {
        let mut values = values.into();
        if values.is_empty() {
            values.push(0);
        }
        Self { values, cursor: 0 }
    }

    /// A script that always draws the given piece kind.
    pub fn always(kind: PieceKind) -> Self {
        let index = PieceKind::ALL
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default();
        Self::new([index])
    }

    /// A script that draws these piece kinds in order, then repeats.
    pub fn pieces(kinds: &[PieceKind]) -> Self {
        let indices: Vec<usize> = kinds
            .iter()
            .filter_map(|kind| PieceKind::ALL.iter().position(|k| k == kind))
            .collect();
        Self::new(indices)
    }
}

impl Randomizer for ScriptedRandom {
    fn pick(&mut self, bound: usize) -> usize {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        value % bound
    }
}

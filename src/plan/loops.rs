//! Loop nests and their iteration order.

use smallvec::{SmallVec, smallvec};

use super::resolve::LoopIndex;
use crate::error::EinsumResult;
use crate::expr::Extents;

/// Loop positions of one nest, 1-based.
pub type Position = SmallVec<[i64; 8]>;

/// An ordered loop nest. Loops are stored innermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopNest {
    loops: Vec<LoopIndex>,
    vectorized: bool,
}

impl LoopNest {
    pub fn new(loops: Vec<LoopIndex>) -> Self {
        Self {
            loops,
            vectorized: false,
        }
    }

    /// Marks the innermost loop as vectorizable. No-op on an empty nest.
    pub fn vectorize(mut self, enabled: bool) -> Self {
        self.vectorized = enabled && !self.loops.is_empty();
        self
    }

    /// Loops, innermost first.
    pub fn loops(&self) -> &[LoopIndex] {
        &self.loops
    }

    pub fn len(&self) -> usize {
        self.loops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    pub fn is_vectorized(&self) -> bool {
        self.vectorized
    }

    pub fn innermost(&self) -> Option<&LoopIndex> {
        self.loops.first()
    }

    /// Index names, innermost first.
    pub fn names(&self) -> Vec<&str> {
        self.loops.iter().map(|l| l.name.as_str()).collect()
    }

    /// Evaluates every loop's trip count, innermost first.
    pub fn trip_counts<E: Extents + ?Sized>(&self, env: &E) -> EinsumResult<SmallVec<[usize; 8]>> {
        self.loops.iter().map(|l| l.dim.trip_count(env)).collect()
    }
}

/// Iterates all positions of a loop nest, position 0 running fastest.
///
/// Every position runs `1..=extent`. A nest without loops yields one empty
/// position; any zero extent yields nothing.
#[derive(Debug, Clone)]
pub struct Odometer {
    extents: SmallVec<[usize; 8]>,
    current: Position,
    done: bool,
}

impl Odometer {
    pub fn new(extents: &[usize]) -> Self {
        Self {
            extents: extents.into(),
            current: smallvec![1; extents.len()],
            done: extents.contains(&0),
        }
    }

    /// Total number of positions.
    pub fn count_positions(&self) -> usize {
        self.extents.iter().product()
    }
}

impl Iterator for Odometer {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        if self.done {
            return None;
        }
        let out = self.current.clone();

        let mut axis = 0;
        loop {
            if axis == self.extents.len() {
                self.done = true;
                break;
            }
            if self.current[axis] < self.extents[axis] as i64 {
                self.current[axis] += 1;
                break;
            }
            self.current[axis] = 1;
            axis += 1;
        }
        Some(out)
    }
}

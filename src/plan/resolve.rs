//! Classification of index occurrences into free and contracted sets.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EinsumError, EinsumResult};
use crate::expr::{AssignOp, DimExpr, Extents, Occurrence};

/// A loop index together with its trip count expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoopIndex {
    pub name: String,
    pub dim: DimExpr,
}

impl LoopIndex {
    pub fn new(name: impl Into<String>, dim: DimExpr) -> Self {
        Self {
            name: name.into(),
            dim,
        }
    }
}

/// Equality constraint between two bounds of the same index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DimCheck {
    pub index: String,
    /// Bound of the first occurrence.
    pub expected: DimExpr,
    /// Bound of the repeated occurrence.
    pub actual: DimExpr,
}

impl DimCheck {
    /// Evaluates both sides, failing with [`EinsumError::DimensionMismatch`]
    /// when they differ.
    pub fn verify<E: Extents + ?Sized>(&self, env: &E) -> EinsumResult<()> {
        let expected = self.expected.eval(env)?;
        let got = self.actual.eval(env)?;
        log::trace!("check {}: {} == {}", self.index, expected, got);
        if expected != got {
            return Err(EinsumError::DimensionMismatch {
                index: self.index.clone(),
                expected,
                got,
            });
        }
        Ok(())
    }
}

impl fmt::Display for DimCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} == {}", self.expected, self.actual)
    }
}

/// Outcome of index resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Destination indices, one per distinct left-hand symbol, discovery order.
    pub free: Vec<LoopIndex>,
    /// Summed indices, one per distinct right-only symbol, discovery order.
    pub contracted: Vec<LoopIndex>,
    /// Constraints to verify before any loop runs.
    pub checks: Vec<DimCheck>,
    /// Bound of every left-hand occurrence after folding, duplicates included.
    pub lhs_dims: Vec<DimExpr>,
}

/// Marks every repeated occurrence as folded and emits a check against the
/// first occurrence of the same symbol. Scans last to first.
fn fold_duplicates(occurrences: &[Occurrence], checks: &mut Vec<DimCheck>) -> Vec<bool> {
    let mut folded = vec![false; occurrences.len()];
    for i in (0..occurrences.len()).rev() {
        let current = &occurrences[i];
        if let Some(first) = occurrences[..i].iter().find(|o| o.index == current.index) {
            checks.push(DimCheck {
                index: current.index.clone(),
                expected: first.dim.clone(),
                actual: current.dim.clone(),
            });
            folded[i] = true;
        }
    }
    folded
}

fn survivors(occurrences: &[Occurrence], folded: &[bool]) -> Vec<LoopIndex> {
    occurrences
        .iter()
        .zip(folded)
        .filter(|(_, folded)| !**folded)
        .map(|(o, _)| LoopIndex::new(o.index.clone(), o.dim.clone()))
        .collect()
}

/// Splits the occurrences of both sides of an equation into free and
/// contracted indices.
///
/// A right-hand symbol that also appears on the left bounds the matching left
/// occurrences: a declaration takes the right-hand bound as is, every other
/// operator takes the smaller of both.
pub fn resolve(lhs: &[Occurrence], rhs: &[Occurrence], op: AssignOp) -> Resolution {
    let mut checks = Vec::new();
    let mut rhs_folded = fold_duplicates(rhs, &mut checks);

    let mut lhs: Vec<Occurrence> = lhs.to_vec();
    for (i, occurrence) in rhs.iter().enumerate() {
        if rhs_folded[i] {
            continue;
        }
        let mut on_lhs = false;
        for target in lhs.iter_mut().filter(|o| o.index == occurrence.index) {
            target.dim = if op.is_declaration() {
                occurrence.dim.clone()
            } else {
                target.dim.clone().min(occurrence.dim.clone())
            };
            on_lhs = true;
        }
        rhs_folded[i] = on_lhs;
    }
    let contracted = survivors(rhs, &rhs_folded);

    let lhs_folded = fold_duplicates(&lhs, &mut checks);
    let free = survivors(&lhs, &lhs_folded);

    Resolution {
        free,
        contracted,
        checks,
        lhs_dims: lhs.into_iter().map(|o| o.dim).collect(),
    }
}

//! Depth-first collection of indexed array references.

use super::node::Expr;
use super::offset::{Occurrence, Subscript, normalize_index};
use crate::error::{EinsumError, EinsumResult};

/// One indexed occurrence of an array. Bare symbols are zero-index references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayRef {
    pub name: String,
    pub subscripts: Vec<Subscript>,
}

impl ArrayRef {
    /// Returns true for a scalar variable reference.
    pub fn is_scalar(&self) -> bool {
        self.subscripts.is_empty()
    }
}

/// Everything collected from one side of an equation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Walk {
    /// Index occurrences with their bounds, in discovery order.
    pub occurrences: Vec<Occurrence>,
    /// Array references, in discovery order.
    pub arrays: Vec<ArrayRef>,
}

impl Walk {
    /// Index symbols in discovery order, duplicates included.
    pub fn indices(&self) -> impl Iterator<Item = &str> + '_ {
        self.occurrences.iter().map(|o| o.index.as_str())
    }

    /// Distinct array names in discovery order.
    pub fn array_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for array in &self.arrays {
            if !names.contains(&array.name.as_str()) {
                names.push(&array.name);
            }
        }
        names
    }

    /// Returns true if `index` occurs anywhere on this side.
    pub fn mentions(&self, index: &str) -> bool {
        self.indices().any(|i| i == index)
    }
}

/// Walks `expr` and returns every array reference and index occurrence in it.
pub fn walk(expr: &Expr) -> EinsumResult<Walk> {
    let mut out = Walk::default();
    walk_into(expr, &mut out)?;
    Ok(out)
}

/// Walks `expr`, appending to `out`.
pub fn walk_into(expr: &Expr, out: &mut Walk) -> EinsumResult<()> {
    match expr {
        Expr::Symbol { name } => {
            if name.is_empty() {
                return Err(EinsumError::malformed("empty symbol name"));
            }
            out.arrays.push(ArrayRef {
                name: name.clone(),
                subscripts: Vec::new(),
            });
        }
        Expr::Literal { .. } | Expr::Captured { .. } => {}
        Expr::Index { array, indices } => {
            if array.is_empty() {
                return Err(EinsumError::malformed(format!(
                    "indexing node `{}` has no array name",
                    expr
                )));
            }
            let mut subscripts = Vec::with_capacity(indices.len());
            for (axis, idx) in indices.iter().enumerate() {
                subscripts.push(normalize_index(idx, array, axis, &mut out.occurrences)?);
            }
            out.arrays.push(ArrayRef {
                name: array.clone(),
                subscripts,
            });
        }
        Expr::Call { func, args } => {
            if func.is_empty() {
                return Err(EinsumError::malformed(format!(
                    "call node `{}` has no function name",
                    expr
                )));
            }
            for arg in args {
                walk_into(arg, out)?;
            }
        }
    }
    Ok(())
}

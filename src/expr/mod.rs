//! Equation expression trees and their analysis.
//!
//! - [`node`]: the closed set of expression node shapes
//! - [`walker`]: collects array references and index occurrences
//! - [`offset`]: normalizes `index ± constant` positions
//! - [`dim`]: deferred dimension expressions

mod dim;
mod node;
mod offset;
mod walker;

pub use dim::{DimExpr, Extents, OffsetValue};
pub use node::{AssignOp, Equation, Expr, Literal};
pub use offset::{Occurrence, Shift, Sign, Subscript, normalize_index};
pub use walker::{ArrayRef, Walk, walk, walk_into};

//! # Loop Einsum
//!
//! Compiles Einstein-summation equations written in index notation into
//! nested-loop plans, and runs them against an explicit workspace.
//!
//! ## Features
//!
//! - Free and contracted index resolution with front-loaded dimension checks
//! - Index offsets (`A[i + 1]`), pinned axes (`A[i, 2]`) and captured constants
//! - Destination allocation with element type promotion (`:=`)
//! - In-place updates (`=`, `+=`, `-=`, `*=`, `/=`)
//! - Optional vectorized inner contraction loop
//! - Plans render as structured loop code
//!
//! ## Example
//!
//! ```ignore
//! use loop_einsum::{Equation, Expr, Tensor, Workspace, einsum};
//!
//! let mut ws = Workspace::new();
//! ws.insert("A", Tensor::from_f64(&[2, 3], a)?);
//! ws.insert("B", Tensor::from_f64(&[3, 4], b)?);
//!
//! // C[i, j] := A[i, k] * B[k, j]
//! let eq = Equation::declare(
//!     Expr::index("C", ["i", "j"]),
//!     Expr::index("A", ["i", "k"]) * Expr::index("B", ["k", "j"]),
//! );
//! einsum(&mut ws, &eq, None)?;
//! ```

pub mod error;
pub mod expr;
pub mod launch;
pub mod plan;
pub mod value;

pub use error::{EinsumError, EinsumResult};
pub use expr::{AssignOp, DimExpr, Equation, Expr};
pub use launch::{ArrayRuntime, EinsumConfig, Workspace, einsum};
pub use plan::{Plan, create_plan};
pub use value::{DType, Scalar, Tensor};

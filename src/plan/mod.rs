//! Compilation of equations into loop-nest plans.
//!
//! Planning happens in stages:
//! - Resolve: classify indices into free and contracted sets with checks
//! - Allocate: decide the destination for declared equations
//! - Loops: order the loop nests, marking the vectorized loop
//! - Kernel: lower the right-hand side against the loop frame
//! - Assemble: compose the above into one [`Plan`]

mod allocate;
mod assemble;
mod kernel;
mod loops;
mod render;
mod resolve;

pub use allocate::{Allocation, infer_element_type};
pub use assemble::{Plan, create_plan};
pub use kernel::{Access, Axis, Slots, Term, lower, lower_access};
pub use loops::{LoopNest, Odometer, Position};
pub use resolve::{DimCheck, LoopIndex, Resolution, resolve};

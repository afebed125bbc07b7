//! Launch module for einsum operations.
//!
//! Provides the high-level API for running plans against a workspace.

mod config;
mod executor;
mod runtime;
mod workspace;

pub use config::EinsumConfig;
pub use executor::{LANES, einsum, execute_plan};
pub use runtime::ArrayRuntime;
pub use workspace::{UserFunction, Workspace};

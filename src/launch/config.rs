//! Configuration for einsum operations.

use serde::{Deserialize, Serialize};

/// Configuration options for plan compilation and execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct EinsumConfig {
    /// Whether to verify dimension consistency before any loop runs.
    ///
    /// Element reads and writes are range checked regardless.
    pub bounds_checked: bool,
    /// Whether to vectorize the innermost contraction loop.
    pub vectorize_inner_loop: bool,
}

impl Default for EinsumConfig {
    fn default() -> Self {
        Self {
            bounds_checked: true,
            vectorize_inner_loop: false,
        }
    }
}

impl EinsumConfig {
    /// Creates a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the dimension consistency checks.
    pub fn with_bounds_checks(mut self, enabled: bool) -> Self {
        self.bounds_checked = enabled;
        self
    }

    /// Enables or disables inner-loop vectorization.
    pub fn with_vectorization(mut self, enabled: bool) -> Self {
        self.vectorize_inner_loop = enabled;
        self
    }

    /// Creates a config optimized for speed (no checks, vectorized).
    pub fn fast() -> Self {
        Self {
            bounds_checked: false,
            vectorize_inner_loop: true,
        }
    }

    /// Creates a config optimized for correctness (checked, sequential sums).
    pub fn safe() -> Self {
        Self {
            bounds_checked: true,
            vectorize_inner_loop: false,
        }
    }
}

//! Error types for einsum compilation and execution.

/// Errors that can occur while compiling or executing an einsum equation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EinsumError {
    /// The equation does not have the expected structure.
    #[error("malformed equation: {message}")]
    MalformedEquation { message: String },

    /// An index position is not a symbol, a constant, or `symbol ± constant`.
    #[error("invalid index expression `{expr}` in `{array}` at axis {axis}")]
    InvalidIndexExpression {
        array: String,
        axis: usize,
        expr: String,
    },

    /// No element type can be inferred for a declared destination.
    #[error("type inference failed: {message}")]
    TypeInference { message: String },

    /// Two occurrences of the same index bound it by different extents.
    #[error("dimension mismatch for index '{index}': {expected} vs {got}")]
    DimensionMismatch {
        index: String,
        expected: i64,
        got: i64,
    },

    /// Array referenced by the equation is not bound in the workspace.
    #[error("array '{name}' is not defined")]
    UnknownArray { name: String },

    /// Captured constant referenced by the equation is not bound.
    #[error("constant '{name}' is not defined")]
    UnknownConstant { name: String },

    /// Function called by the equation is neither built in nor registered.
    #[error("function '{name}' is not defined")]
    UnknownFunction { name: String },

    /// Array is indexed with the wrong number of subscripts.
    #[error("array '{array}' has {expected} axes, indexed with {got}")]
    RankMismatch {
        array: String,
        expected: usize,
        got: usize,
    },

    /// Read or write outside an array's extents (indices are 1-based).
    #[error("index {index:?} out of bounds for '{array}' with shape {shape:?}")]
    IndexOutOfBounds {
        array: String,
        index: Vec<i64>,
        shape: Vec<usize>,
    },

    /// Unsupported operation on the given operands.
    #[error("unsupported operation: {message}")]
    Unsupported { message: String },
}

impl EinsumError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedEquation {
            message: message.into(),
        }
    }

    pub fn invalid_index(array: impl Into<String>, axis: usize, expr: impl ToString) -> Self {
        Self::InvalidIndexExpression {
            array: array.into(),
            axis,
            expr: expr.to_string(),
        }
    }

    pub fn type_inference(message: impl Into<String>) -> Self {
        Self::TypeInference {
            message: message.into(),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    /// Returns true for errors in the equation itself: malformed structure,
    /// invalid index positions and element types that cannot be inferred.
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedEquation { .. }
                | Self::InvalidIndexExpression { .. }
                | Self::TypeInference { .. }
        )
    }
}

/// Result type for einsum operations.
pub type EinsumResult<T> = core::result::Result<T, EinsumError>;

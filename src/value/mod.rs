//! Runtime values: element types, scalars, tensors and built-in functions.

mod builtins;
mod dtype;
mod scalar;
mod tensor;

pub use builtins::call_builtin;
pub use dtype::DType;
pub use scalar::{BinaryOp, Scalar};
pub use tensor::Tensor;

//! Array access required to run a plan.

use crate::error::EinsumResult;
use crate::expr::Extents;
use crate::value::{DType, Scalar};

/// Storage a plan executes against.
///
/// Positions passed to [`read`](ArrayRuntime::read) and
/// [`write`](ArrayRuntime::write) are 1-based; implementations translate them
/// to storage offsets and reject anything outside the array.
pub trait ArrayRuntime: Extents {
    /// Element type of an array.
    fn dtype(&self, array: &str) -> EinsumResult<DType>;

    /// Reads one element.
    fn read(&self, array: &str, index: &[i64]) -> EinsumResult<Scalar>;

    /// Writes one element, converting `value` to the array's element type.
    fn write(&mut self, array: &str, index: &[i64], value: Scalar) -> EinsumResult<()>;

    /// Binds `array` to a new zero-filled array, replacing any previous one.
    fn allocate(&mut self, array: &str, dtype: DType, shape: &[usize]) -> EinsumResult<()>;

    /// Applies a named function.
    fn call(&self, func: &str, args: &[Scalar]) -> EinsumResult<Scalar>;
}

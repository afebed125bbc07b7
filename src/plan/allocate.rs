//! Destination allocation for declared equations.

use serde::{Deserialize, Serialize};

use crate::error::{EinsumError, EinsumResult};
use crate::expr::DimExpr;
use crate::launch::ArrayRuntime;
use crate::value::DType;

/// What to allocate before the loops run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Allocation {
    /// The destination already exists.
    #[default]
    None,
    /// Zero-filled array with one axis per left-hand position.
    Array { name: String, shape: Vec<DimExpr> },
    /// Zero scalar for a full contraction.
    ScalarZero { name: String },
}

impl Allocation {
    /// Allocation directive for a declared destination.
    pub fn declared(name: impl Into<String>, shape: Vec<DimExpr>) -> Self {
        let name = name.into();
        if shape.is_empty() {
            Allocation::ScalarZero { name }
        } else {
            Allocation::Array { name, shape }
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Allocation::None)
    }

    /// Evaluates the shape and allocates a zero-filled destination.
    pub fn apply<R: ArrayRuntime + ?Sized>(
        &self,
        runtime: &mut R,
        dtype: DType,
    ) -> EinsumResult<()> {
        match self {
            Allocation::None => Ok(()),
            Allocation::Array { name, shape } => {
                let dims = shape
                    .iter()
                    .map(|d| d.trip_count(&*runtime))
                    .collect::<EinsumResult<Vec<_>>>()?;
                log::debug!("allocating {} {:?} of {}", name, dims, dtype);
                runtime.allocate(name, dtype, &dims)
            }
            Allocation::ScalarZero { name } => {
                log::debug!("allocating scalar {} of {}", name, dtype);
                runtime.allocate(name, dtype, &[])
            }
        }
    }
}

/// Element type of a declared destination: pairwise promotion over the
/// element types of every right-hand array.
pub fn infer_element_type<R: ArrayRuntime + ?Sized>(
    sources: &[String],
    runtime: &R,
) -> EinsumResult<DType> {
    let dtypes = sources
        .iter()
        .map(|name| runtime.dtype(name))
        .collect::<EinsumResult<Vec<_>>>()?;

    match DType::promote_all(dtypes) {
        Ok(Some(dtype)) => Ok(dtype),
        Ok(None) => Err(EinsumError::type_inference(
            "no right-hand array to infer the element type from",
        )),
        Err((a, b)) => Err(EinsumError::type_inference(format!(
            "no common element type for {} and {}",
            a, b
        ))),
    }
}

//! Deferred dimension expressions.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EinsumError, EinsumResult};

/// Source of array extents and captured constants used to evaluate
/// dimension expressions.
pub trait Extents {
    /// Extent of `array` along zero-based `axis`.
    fn extent(&self, array: &str, axis: usize) -> EinsumResult<usize>;

    /// Value of a captured constant.
    fn constant(&self, name: &str) -> EinsumResult<i64>;
}

/// A constant offset applied to an index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetValue {
    /// Integer literal written in the equation.
    Literal(i64),
    /// Constant captured from the caller, looked up when the plan runs.
    Captured(String),
}

impl OffsetValue {
    pub fn eval<E: Extents + ?Sized>(&self, env: &E) -> EinsumResult<i64> {
        match self {
            OffsetValue::Literal(v) => Ok(*v),
            OffsetValue::Captured(name) => env.constant(name),
        }
    }
}

impl fmt::Display for OffsetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OffsetValue::Literal(v) => write!(f, "{}", v),
            OffsetValue::Captured(name) => write!(f, "${}", name),
        }
    }
}

/// A symbolic extent, carried unevaluated until the plan runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimExpr {
    /// Extent of `array` along zero-based `axis`.
    Extent { array: String, axis: usize },
    /// `base - offset`
    Sub(Box<DimExpr>, OffsetValue),
    /// `base + offset`
    Add(Box<DimExpr>, OffsetValue),
    /// Smaller of two extents.
    Min(Box<DimExpr>, Box<DimExpr>),
}

impl DimExpr {
    pub fn extent(array: impl Into<String>, axis: usize) -> Self {
        DimExpr::Extent {
            array: array.into(),
            axis,
        }
    }

    pub fn minus(self, offset: OffsetValue) -> Self {
        DimExpr::Sub(Box::new(self), offset)
    }

    pub fn plus(self, offset: OffsetValue) -> Self {
        DimExpr::Add(Box::new(self), offset)
    }

    pub fn min(self, other: DimExpr) -> Self {
        DimExpr::Min(Box::new(self), Box::new(other))
    }

    /// Evaluates the expression. The result may be zero or negative, which
    /// loops treat as an empty range.
    pub fn eval<E: Extents + ?Sized>(&self, env: &E) -> EinsumResult<i64> {
        match self {
            DimExpr::Extent { array, axis } => Ok(env.extent(array, *axis)? as i64),
            DimExpr::Sub(base, offset) => base
                .eval(env)?
                .checked_sub(offset.eval(env)?)
                .ok_or_else(|| self.overflow()),
            DimExpr::Add(base, offset) => base
                .eval(env)?
                .checked_add(offset.eval(env)?)
                .ok_or_else(|| self.overflow()),
            DimExpr::Min(a, b) => Ok(a.eval(env)?.min(b.eval(env)?)),
        }
    }

    fn overflow(&self) -> EinsumError {
        EinsumError::unsupported(format!("`{}` overflows i64", self))
    }

    /// Evaluates the expression as a loop trip count.
    pub fn trip_count<E: Extents + ?Sized>(&self, env: &E) -> EinsumResult<usize> {
        Ok(self.eval(env)?.max(0) as usize)
    }
}

impl fmt::Display for DimExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimExpr::Extent { array, axis } => write!(f, "extent({}, {})", array, axis + 1),
            DimExpr::Sub(base, offset) => write!(f, "{} - {}", base, offset),
            DimExpr::Add(base, offset) => write!(f, "{} + {}", base, offset),
            DimExpr::Min(a, b) => write!(f, "min({}, {})", a, b),
        }
    }
}

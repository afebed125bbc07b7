//! Dynamically typed scalar values and their arithmetic.

use core::cmp::Ordering;
use core::fmt;

use half::f16;
use serde::{Deserialize, Serialize};

use super::dtype::DType;
use crate::error::{EinsumError, EinsumResult};

/// A single element value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Bool(bool),
    I32(i32),
    I64(i64),
    F16(f16),
    F32(f32),
    F64(f64),
}

/// Binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

impl Scalar {
    /// Zero value of the given type.
    pub fn zero(dtype: DType) -> Self {
        match dtype {
            DType::Bool => Scalar::Bool(false),
            DType::I32 => Scalar::I32(0),
            DType::I64 => Scalar::I64(0),
            DType::F16 => Scalar::F16(f16::ZERO),
            DType::F32 => Scalar::F32(0.0),
            DType::F64 => Scalar::F64(0.0),
        }
    }

    /// Element type of this value.
    pub fn dtype(&self) -> DType {
        match self {
            Scalar::Bool(_) => DType::Bool,
            Scalar::I32(_) => DType::I32,
            Scalar::I64(_) => DType::I64,
            Scalar::F16(_) => DType::F16,
            Scalar::F32(_) => DType::F32,
            Scalar::F64(_) => DType::F64,
        }
    }

    /// Lossy view as `f64`.
    pub fn to_f64(self) -> f64 {
        match self {
            Scalar::Bool(b) => b as u8 as f64,
            Scalar::I32(v) => v as f64,
            Scalar::I64(v) => v as f64,
            Scalar::F16(v) => v.to_f64(),
            Scalar::F32(v) => v as f64,
            Scalar::F64(v) => v,
        }
    }

    /// Lossy view as `i64`.
    pub fn to_i64(self) -> i64 {
        match self {
            Scalar::Bool(b) => b as i64,
            Scalar::I32(v) => v as i64,
            Scalar::I64(v) => v,
            Scalar::F16(v) => v.to_f64() as i64,
            Scalar::F32(v) => v as i64,
            Scalar::F64(v) => v as i64,
        }
    }

    /// Converts to `dtype` with `as` semantics.
    pub fn cast(self, dtype: DType) -> Scalar {
        if self.dtype() == dtype {
            return self;
        }
        match dtype {
            DType::Bool => Scalar::Bool(self.to_f64() != 0.0),
            DType::I32 => Scalar::I32(self.to_i64() as i32),
            DType::I64 => Scalar::I64(self.to_i64()),
            DType::F16 => Scalar::F16(f16::from_f64(self.to_f64())),
            DType::F32 => Scalar::F32(self.to_f64() as f32),
            DType::F64 => Scalar::F64(self.to_f64()),
        }
    }

    /// Applies `op` after promoting both operands to a common type.
    pub fn binary(self, op: BinaryOp, rhs: Scalar) -> EinsumResult<Scalar> {
        let dtype = self.dtype().promote(rhs.dtype()).ok_or_else(|| {
            EinsumError::unsupported(format!(
                "'{}' between {} and {}",
                op.symbol(),
                self.dtype(),
                rhs.dtype()
            ))
        })?;

        let result = match (self.cast(dtype), rhs.cast(dtype)) {
            (Scalar::Bool(a), Scalar::Bool(b)) => match op {
                BinaryOp::Add => Scalar::Bool(a | b),
                BinaryOp::Mul => Scalar::Bool(a & b),
                _ => {
                    return Err(EinsumError::unsupported(format!(
                        "'{}' on bool operands",
                        op.symbol()
                    )));
                }
            },
            (Scalar::I32(a), Scalar::I32(b)) => Scalar::I32(int_op(op, a as i64, b as i64)? as i32),
            (Scalar::I64(a), Scalar::I64(b)) => Scalar::I64(int_op(op, a, b)?),
            (Scalar::F16(a), Scalar::F16(b)) => Scalar::F16(match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
            }),
            (Scalar::F32(a), Scalar::F32(b)) => Scalar::F32(match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
            }),
            (Scalar::F64(a), Scalar::F64(b)) => Scalar::F64(match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
            }),
            (a, b) => {
                return Err(EinsumError::unsupported(format!(
                    "'{}' between {} and {}",
                    op.symbol(),
                    a.dtype(),
                    b.dtype()
                )));
            }
        };
        Ok(result)
    }

    pub fn add(self, rhs: Scalar) -> EinsumResult<Scalar> {
        self.binary(BinaryOp::Add, rhs)
    }

    pub fn sub(self, rhs: Scalar) -> EinsumResult<Scalar> {
        self.binary(BinaryOp::Sub, rhs)
    }

    pub fn mul(self, rhs: Scalar) -> EinsumResult<Scalar> {
        self.binary(BinaryOp::Mul, rhs)
    }

    pub fn div(self, rhs: Scalar) -> EinsumResult<Scalar> {
        self.binary(BinaryOp::Div, rhs)
    }

    /// Arithmetic negation.
    pub fn neg(self) -> EinsumResult<Scalar> {
        match self {
            Scalar::Bool(_) => Err(EinsumError::unsupported("negation of bool")),
            Scalar::I32(v) => Ok(Scalar::I32(v.wrapping_neg())),
            Scalar::I64(v) => Ok(Scalar::I64(v.wrapping_neg())),
            Scalar::F16(v) => Ok(Scalar::F16(-v)),
            Scalar::F32(v) => Ok(Scalar::F32(-v)),
            Scalar::F64(v) => Ok(Scalar::F64(-v)),
        }
    }

    /// Absolute value.
    pub fn abs(self) -> Scalar {
        match self {
            Scalar::Bool(_) => self,
            Scalar::I32(v) => Scalar::I32(v.wrapping_abs()),
            Scalar::I64(v) => Scalar::I64(v.wrapping_abs()),
            Scalar::F16(v) => Scalar::F16(f16::from_f32(v.to_f32().abs())),
            Scalar::F32(v) => Scalar::F32(v.abs()),
            Scalar::F64(v) => Scalar::F64(v.abs()),
        }
    }

    /// Applies a floating point function, keeping float types and mapping
    /// integers to `f64`.
    pub fn map_float(self, f: impl Fn(f64) -> f64) -> EinsumResult<Scalar> {
        match self {
            Scalar::Bool(_) => Err(EinsumError::unsupported("floating point function of bool")),
            Scalar::F16(v) => Ok(Scalar::F16(f16::from_f64(f(v.to_f64())))),
            Scalar::F32(v) => Ok(Scalar::F32(f(v as f64) as f32)),
            other => Ok(Scalar::F64(f(other.to_f64()))),
        }
    }

    /// Larger of two values after promotion.
    pub fn max(self, rhs: Scalar) -> EinsumResult<Scalar> {
        self.pick(rhs, Ordering::Greater)
    }

    /// Smaller of two values after promotion.
    pub fn min(self, rhs: Scalar) -> EinsumResult<Scalar> {
        self.pick(rhs, Ordering::Less)
    }

    fn pick(self, rhs: Scalar, wanted: Ordering) -> EinsumResult<Scalar> {
        let dtype = self.dtype().promote(rhs.dtype()).ok_or_else(|| {
            EinsumError::unsupported(format!("comparing {} with {}", self.dtype(), rhs.dtype()))
        })?;
        let (a, b) = (self.cast(dtype), rhs.cast(dtype));
        let ord = match (a, b) {
            (Scalar::I32(x), Scalar::I32(y)) => x.cmp(&y),
            (Scalar::I64(x), Scalar::I64(y)) => x.cmp(&y),
            _ => a
                .to_f64()
                .partial_cmp(&b.to_f64())
                .unwrap_or(Ordering::Equal),
        };
        Ok(if ord == wanted || ord == Ordering::Equal { a } else { b })
    }
}

fn int_op(op: BinaryOp, a: i64, b: i64) -> EinsumResult<i64> {
    match op {
        BinaryOp::Add => Ok(a.wrapping_add(b)),
        BinaryOp::Sub => Ok(a.wrapping_sub(b)),
        BinaryOp::Mul => Ok(a.wrapping_mul(b)),
        BinaryOp::Div => {
            if b == 0 {
                Err(EinsumError::unsupported("integer division by zero"))
            } else {
                Ok(a.wrapping_div(b))
            }
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(v) => write!(f, "{}", v),
            Scalar::I32(v) => write!(f, "{}", v),
            Scalar::I64(v) => write!(f, "{}", v),
            Scalar::F16(v) => write!(f, "{}", v),
            Scalar::F32(v) => write!(f, "{}", v),
            Scalar::F64(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::I32(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::I64(v)
    }
}

impl From<f16> for Scalar {
    fn from(v: f16) -> Self {
        Scalar::F16(v)
    }
}

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Scalar::F32(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::F64(v)
    }
}

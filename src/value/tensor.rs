//! Dense, dtype-tagged tensors backed by `ndarray`.

use half::f16;
use ndarray::{Array1, ArrayD, IxDyn};

use super::dtype::DType;
use super::scalar::Scalar;
use crate::error::{EinsumError, EinsumResult};

/// A type-erased dense tensor. Zero-dimensional tensors hold scalars.
#[derive(Debug, Clone, PartialEq)]
pub enum Tensor {
    Bool(ArrayD<bool>),
    I32(ArrayD<i32>),
    I64(ArrayD<i64>),
    F16(ArrayD<f16>),
    F32(ArrayD<f32>),
    F64(ArrayD<f64>),
}

/// Dispatches `$body` over the array inside every variant.
macro_rules! each_array {
    ($tensor:expr, $arr:ident => $body:expr) => {
        match $tensor {
            Tensor::Bool($arr) => $body,
            Tensor::I32($arr) => $body,
            Tensor::I64($arr) => $body,
            Tensor::F16($arr) => $body,
            Tensor::F32($arr) => $body,
            Tensor::F64($arr) => $body,
        }
    };
}

impl Tensor {
    /// Creates a zero-filled tensor.
    pub fn zeros(dtype: DType, shape: &[usize]) -> Self {
        let dim = IxDyn(shape);
        match dtype {
            DType::Bool => Tensor::Bool(ArrayD::from_elem(dim, false)),
            DType::I32 => Tensor::I32(ArrayD::zeros(dim)),
            DType::I64 => Tensor::I64(ArrayD::zeros(dim)),
            DType::F16 => Tensor::F16(ArrayD::from_elem(dim, f16::ZERO)),
            DType::F32 => Tensor::F32(ArrayD::zeros(dim)),
            DType::F64 => Tensor::F64(ArrayD::zeros(dim)),
        }
    }

    /// Creates a zero-dimensional tensor holding `value`.
    pub fn scalar(value: impl Into<Scalar>) -> Self {
        let value = value.into();
        let mut tensor = Tensor::zeros(value.dtype(), &[]);
        tensor.set(&[], value);
        tensor
    }

    /// Creates a one-dimensional `f64` tensor.
    pub fn vector(data: Vec<f64>) -> Self {
        Tensor::F64(Array1::from(data).into_dyn())
    }

    /// Creates an `f64` tensor from row-major data.
    pub fn from_f64(shape: &[usize], data: Vec<f64>) -> EinsumResult<Self> {
        Ok(Tensor::F64(from_shape_vec(shape, data)?))
    }

    /// Creates an `f32` tensor from row-major data.
    pub fn from_f32(shape: &[usize], data: Vec<f32>) -> EinsumResult<Self> {
        Ok(Tensor::F32(from_shape_vec(shape, data)?))
    }

    /// Creates an `i32` tensor from row-major data.
    pub fn from_i32(shape: &[usize], data: Vec<i32>) -> EinsumResult<Self> {
        Ok(Tensor::I32(from_shape_vec(shape, data)?))
    }

    /// Creates an `i64` tensor from row-major data.
    pub fn from_i64(shape: &[usize], data: Vec<i64>) -> EinsumResult<Self> {
        Ok(Tensor::I64(from_shape_vec(shape, data)?))
    }

    /// Creates a `bool` tensor from row-major data.
    pub fn from_bool(shape: &[usize], data: Vec<bool>) -> EinsumResult<Self> {
        Ok(Tensor::Bool(from_shape_vec(shape, data)?))
    }

    /// Element type.
    pub fn dtype(&self) -> DType {
        match self {
            Tensor::Bool(_) => DType::Bool,
            Tensor::I32(_) => DType::I32,
            Tensor::I64(_) => DType::I64,
            Tensor::F16(_) => DType::F16,
            Tensor::F32(_) => DType::F32,
            Tensor::F64(_) => DType::F64,
        }
    }

    /// Extent along every axis.
    pub fn shape(&self) -> &[usize] {
        each_array!(self, a => a.shape())
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Reads the element at a zero-based position.
    pub fn get(&self, index: &[usize]) -> Option<Scalar> {
        let ix = IxDyn(index);
        match self {
            Tensor::Bool(a) => a.get(ix).map(|&v| Scalar::Bool(v)),
            Tensor::I32(a) => a.get(ix).map(|&v| Scalar::I32(v)),
            Tensor::I64(a) => a.get(ix).map(|&v| Scalar::I64(v)),
            Tensor::F16(a) => a.get(ix).map(|&v| Scalar::F16(v)),
            Tensor::F32(a) => a.get(ix).map(|&v| Scalar::F32(v)),
            Tensor::F64(a) => a.get(ix).map(|&v| Scalar::F64(v)),
        }
    }

    /// Writes the element at a zero-based position, converting `value` to the
    /// tensor's element type. Returns false when the position is out of range.
    pub fn set(&mut self, index: &[usize], value: Scalar) -> bool {
        let ix = IxDyn(index);
        let value = value.cast(self.dtype());
        match (self, value) {
            (Tensor::Bool(a), Scalar::Bool(v)) => a.get_mut(ix).map(|slot| *slot = v).is_some(),
            (Tensor::I32(a), Scalar::I32(v)) => a.get_mut(ix).map(|slot| *slot = v).is_some(),
            (Tensor::I64(a), Scalar::I64(v)) => a.get_mut(ix).map(|slot| *slot = v).is_some(),
            (Tensor::F16(a), Scalar::F16(v)) => a.get_mut(ix).map(|slot| *slot = v).is_some(),
            (Tensor::F32(a), Scalar::F32(v)) => a.get_mut(ix).map(|slot| *slot = v).is_some(),
            (Tensor::F64(a), Scalar::F64(v)) => a.get_mut(ix).map(|slot| *slot = v).is_some(),
            _ => false,
        }
    }

    /// Value of a zero-dimensional tensor.
    pub fn to_scalar(&self) -> Option<Scalar> {
        if self.ndim() == 0 { self.get(&[]) } else { None }
    }

    /// Borrows the `f64` array, if that is the element type.
    pub fn as_f64(&self) -> Option<&ArrayD<f64>> {
        match self {
            Tensor::F64(a) => Some(a),
            _ => None,
        }
    }

    /// Borrows the `f32` array, if that is the element type.
    pub fn as_f32(&self) -> Option<&ArrayD<f32>> {
        match self {
            Tensor::F32(a) => Some(a),
            _ => None,
        }
    }

    /// Borrows the `i64` array, if that is the element type.
    pub fn as_i64(&self) -> Option<&ArrayD<i64>> {
        match self {
            Tensor::I64(a) => Some(a),
            _ => None,
        }
    }

    /// Row-major copy of all elements as `f64`.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            Tensor::Bool(a) => a.iter().map(|&v| v as u8 as f64).collect(),
            Tensor::I32(a) => a.iter().map(|&v| v as f64).collect(),
            Tensor::I64(a) => a.iter().map(|&v| v as f64).collect(),
            Tensor::F16(a) => a.iter().map(|v| v.to_f64()).collect(),
            Tensor::F32(a) => a.iter().map(|&v| v as f64).collect(),
            Tensor::F64(a) => a.iter().copied().collect(),
        }
    }
}

fn from_shape_vec<T>(shape: &[usize], data: Vec<T>) -> EinsumResult<ArrayD<T>> {
    let len = data.len();
    ArrayD::from_shape_vec(IxDyn(shape), data).map_err(|_| {
        EinsumError::unsupported(format!("{} elements do not fill shape {:?}", len, shape))
    })
}

impl From<ArrayD<f64>> for Tensor {
    fn from(a: ArrayD<f64>) -> Self {
        Tensor::F64(a)
    }
}

impl From<ArrayD<f32>> for Tensor {
    fn from(a: ArrayD<f32>) -> Self {
        Tensor::F32(a)
    }
}

impl From<ArrayD<i64>> for Tensor {
    fn from(a: ArrayD<i64>) -> Self {
        Tensor::I64(a)
    }
}

impl From<ArrayD<i32>> for Tensor {
    fn from(a: ArrayD<i32>) -> Self {
        Tensor::I32(a)
    }
}

impl From<ArrayD<bool>> for Tensor {
    fn from(a: ArrayD<bool>) -> Self {
        Tensor::Bool(a)
    }
}

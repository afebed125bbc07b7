use core::fmt;

use hashbrown::HashMap;
use smallvec::SmallVec;

use super::runtime::ArrayRuntime;
use crate::error::{EinsumError, EinsumResult};
use crate::expr::Extents;
use crate::value::{DType, Scalar, Tensor, call_builtin};

/// A user function callable from equations.
pub type UserFunction = Box<dyn Fn(&[Scalar]) -> EinsumResult<Scalar>>;

/// Explicit environment a plan runs against.
///
/// Holds the caller's named tensors, captured integer constants and user
/// functions. Equations see nothing outside it.
#[derive(Default)]
pub struct Workspace {
    tensors: HashMap<String, Tensor>,
    constants: HashMap<String, i64>,
    functions: HashMap<String, UserFunction>,
}

impl Workspace {
    /// Creates a new empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a tensor, returning the one previously bound under `name`.
    pub fn insert(&mut self, name: impl Into<String>, tensor: impl Into<Tensor>) -> Option<Tensor> {
        self.tensors.insert(name.into(), tensor.into())
    }

    /// Gets a reference to a bound tensor.
    pub fn get(&self, name: &str) -> Option<&Tensor> {
        self.tensors.get(name)
    }

    /// Gets a mutable reference to a bound tensor.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Tensor> {
        self.tensors.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Tensor> {
        self.tensors.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tensors.contains_key(name)
    }

    /// Binds a captured constant, usable as `$name` in offsets and values.
    pub fn set_constant(&mut self, name: impl Into<String>, value: i64) {
        self.constants.insert(name.into(), value);
    }

    /// Registers a function. Built-in names with matching arity take precedence.
    pub fn register_function<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&[Scalar]) -> EinsumResult<Scalar> + 'static,
    {
        self.functions.insert(name.into(), Box::new(f));
    }

    fn tensor(&self, name: &str) -> EinsumResult<&Tensor> {
        self.tensors
            .get(name)
            .ok_or_else(|| EinsumError::UnknownArray { name: name.into() })
    }

    /// Translates a 1-based position into storage offsets.
    fn offsets(name: &str, tensor: &Tensor, index: &[i64]) -> EinsumResult<SmallVec<[usize; 8]>> {
        let shape = tensor.shape();
        if index.len() != shape.len() {
            return Err(EinsumError::RankMismatch {
                array: name.into(),
                expected: shape.len(),
                got: index.len(),
            });
        }
        index
            .iter()
            .zip(shape)
            .map(|(&i, &extent)| {
                if i >= 1 && (i as u64) <= extent as u64 {
                    Ok((i - 1) as usize)
                } else {
                    Err(EinsumError::IndexOutOfBounds {
                        array: name.into(),
                        index: index.to_vec(),
                        shape: shape.to_vec(),
                    })
                }
            })
            .collect()
    }
}

impl Extents for Workspace {
    fn extent(&self, array: &str, axis: usize) -> EinsumResult<usize> {
        let tensor = self.tensor(array)?;
        tensor
            .shape()
            .get(axis)
            .copied()
            .ok_or_else(|| EinsumError::RankMismatch {
                array: array.into(),
                expected: tensor.ndim(),
                got: axis + 1,
            })
    }

    fn constant(&self, name: &str) -> EinsumResult<i64> {
        self.constants
            .get(name)
            .copied()
            .ok_or_else(|| EinsumError::UnknownConstant { name: name.into() })
    }
}

impl ArrayRuntime for Workspace {
    fn dtype(&self, array: &str) -> EinsumResult<DType> {
        Ok(self.tensor(array)?.dtype())
    }

    fn read(&self, array: &str, index: &[i64]) -> EinsumResult<Scalar> {
        let tensor = self.tensor(array)?;
        let offsets = Self::offsets(array, tensor, index)?;
        tensor.get(&offsets).ok_or_else(|| EinsumError::IndexOutOfBounds {
            array: array.into(),
            index: index.to_vec(),
            shape: tensor.shape().to_vec(),
        })
    }

    fn write(&mut self, array: &str, index: &[i64], value: Scalar) -> EinsumResult<()> {
        let offsets = Self::offsets(array, self.tensor(array)?, index)?;
        let tensor = self
            .tensors
            .get_mut(array)
            .ok_or_else(|| EinsumError::UnknownArray { name: array.into() })?;
        if tensor.set(&offsets, value) {
            Ok(())
        } else {
            Err(EinsumError::IndexOutOfBounds {
                array: array.into(),
                index: index.to_vec(),
                shape: tensor.shape().to_vec(),
            })
        }
    }

    fn allocate(&mut self, array: &str, dtype: DType, shape: &[usize]) -> EinsumResult<()> {
        self.tensors.insert(array.into(), Tensor::zeros(dtype, shape));
        Ok(())
    }

    fn call(&self, func: &str, args: &[Scalar]) -> EinsumResult<Scalar> {
        if let Some(result) = call_builtin(func, args) {
            return result;
        }
        match self.functions.get(func) {
            Some(f) => f(args),
            None => Err(EinsumError::UnknownFunction { name: func.into() }),
        }
    }
}

impl fmt::Debug for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tensors: Vec<_> = self
            .tensors
            .iter()
            .map(|(name, t)| (name.as_str(), t.dtype(), t.shape()))
            .collect();
        tensors.sort_by_key(|(name, _, _)| *name);
        let mut functions: Vec<_> = self.functions.keys().map(String::as_str).collect();
        functions.sort_unstable();

        f.debug_struct("Workspace")
            .field("tensors", &tensors)
            .field("constants", &self.constants)
            .field("functions", &functions)
            .finish()
    }
}

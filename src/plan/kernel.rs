//! Lowered elementwise computation.
//!
//! The right-hand expression is lowered once at plan time: every loop index is
//! replaced by its slot in the loop frame so evaluation never looks names up.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::error::{EinsumError, EinsumResult};
use crate::expr::{Expr, Extents, OffsetValue, Shift, Sign, Subscript, normalize_index};
use crate::launch::ArrayRuntime;
use crate::value::Scalar;

/// One array axis inside a lowered access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Axis {
    /// Position taken from the loop frame, optionally shifted.
    Loop { slot: usize, shift: Option<Shift> },
    /// Pinned position.
    Fixed(OffsetValue),
}

/// A lowered `array[...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Access {
    pub array: String,
    pub axes: Vec<Axis>,
}

impl Access {
    /// Computes the 1-based position for the current loop frame.
    pub fn position<E: Extents + ?Sized>(
        &self,
        env: &E,
        frame: &[i64],
    ) -> EinsumResult<SmallVec<[i64; 8]>> {
        let mut out = SmallVec::with_capacity(self.axes.len());
        for axis in &self.axes {
            let p = match axis {
                Axis::Loop { slot, shift: None } => frame[*slot],
                Axis::Loop {
                    slot,
                    shift: Some(Shift { sign, by }),
                } => {
                    let by = by.eval(env)?;
                    let shifted = match sign {
                        Sign::Plus => frame[*slot].checked_add(by),
                        Sign::Minus => frame[*slot].checked_sub(by),
                    };
                    shifted.ok_or_else(|| {
                        EinsumError::unsupported(format!(
                            "position {} of `{}` shifted by {} overflows i64",
                            frame[*slot], self.array, by
                        ))
                    })?
                }
                Axis::Fixed(value) => value.eval(env)?,
            };
            out.push(p);
        }
        Ok(out)
    }

    /// Replaces captured offsets by their current values.
    pub fn bind<E: Extents + ?Sized>(&self, env: &E) -> EinsumResult<Access> {
        let bind_offset = |v: &OffsetValue| v.eval(env).map(OffsetValue::Literal);
        let mut axes = Vec::with_capacity(self.axes.len());
        for axis in &self.axes {
            axes.push(match axis {
                Axis::Loop { slot, shift } => Axis::Loop {
                    slot: *slot,
                    shift: match shift {
                        Some(Shift { sign, by }) => Some(Shift {
                            sign: *sign,
                            by: bind_offset(by)?,
                        }),
                        None => None,
                    },
                },
                Axis::Fixed(value) => Axis::Fixed(bind_offset(value)?),
            });
        }
        Ok(Access {
            array: self.array.clone(),
            axes,
        })
    }
}

/// Lowered right-hand expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Const(Scalar),
    Captured(String),
    Read(Access),
    Call { func: String, args: Vec<Term> },
}

impl Term {
    /// Evaluates the term at the current loop frame.
    pub fn eval<R: ArrayRuntime + ?Sized>(
        &self,
        runtime: &R,
        frame: &[i64],
    ) -> EinsumResult<Scalar> {
        match self {
            Term::Const(value) => Ok(*value),
            Term::Captured(name) => Ok(Scalar::I64(runtime.constant(name)?)),
            Term::Read(access) => {
                let position = access.position(runtime, frame)?;
                runtime.read(&access.array, &position)
            }
            Term::Call { func, args } => {
                let mut values: SmallVec<[Scalar; 4]> = SmallVec::with_capacity(args.len());
                for arg in args {
                    values.push(arg.eval(runtime, frame)?);
                }
                runtime.call(func, &values)
            }
        }
    }

    /// Resolves every captured constant once, so the loop body only sees
    /// literal values.
    pub fn bind<R: ArrayRuntime + ?Sized>(&self, runtime: &R) -> EinsumResult<Term> {
        Ok(match self {
            Term::Const(value) => Term::Const(*value),
            Term::Captured(name) => Term::Const(Scalar::I64(runtime.constant(name)?)),
            Term::Read(access) => Term::Read(access.bind(runtime)?),
            Term::Call { func, args } => Term::Call {
                func: func.clone(),
                args: args.iter().map(|a| a.bind(runtime)).collect::<EinsumResult<_>>()?,
            },
        })
    }
}

/// Maps each loop index name to its slot in the loop frame.
pub type Slots<'a> = HashMap<&'a str, usize>;

/// Lowers one array reference. `array[...]` and bare symbols both become reads.
pub fn lower_access(expr: &Expr, slots: &Slots<'_>) -> EinsumResult<Access> {
    let (array, indices): (&str, &[Expr]) = match expr {
        Expr::Index { array, indices } => (array.as_str(), indices.as_slice()),
        Expr::Symbol { name } => (name.as_str(), &[]),
        other => {
            return Err(EinsumError::malformed(format!(
                "expected an array reference, found {} `{}`",
                other.kind(),
                other
            )));
        }
    };

    let mut scratch = Vec::new();
    let mut axes = Vec::with_capacity(indices.len());
    for (axis, idx) in indices.iter().enumerate() {
        axes.push(match normalize_index(idx, array, axis, &mut scratch)? {
            Subscript::Index { name, shift } => {
                let slot = slots.get(name.as_str()).copied().ok_or_else(|| {
                    EinsumError::malformed(format!("index '{}' has no loop", name))
                })?;
                Axis::Loop { slot, shift }
            }
            Subscript::Fixed(value) => Axis::Fixed(value),
        });
    }
    Ok(Access {
        array: array.to_string(),
        axes,
    })
}

/// Lowers a right-hand expression.
pub fn lower(expr: &Expr, slots: &Slots<'_>) -> EinsumResult<Term> {
    match expr {
        Expr::Literal { value } => Ok(Term::Const(value.to_scalar())),
        Expr::Captured { name } => Ok(Term::Captured(name.clone())),
        Expr::Symbol { .. } | Expr::Index { .. } => Ok(Term::Read(lower_access(expr, slots)?)),
        Expr::Call { func, args } => Ok(Term::Call {
            func: func.clone(),
            args: args.iter().map(|a| lower(a, slots)).collect::<EinsumResult<_>>()?,
        }),
    }
}

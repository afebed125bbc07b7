//! Normalization of single bracket positions.
//!
//! Every position inside `array[...]` becomes either a bare loop index
//! (possibly shifted by a constant) or a pinned axis. Shifts are folded into
//! the dimension bound so later stages only see bare index symbols.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::dim::{DimExpr, OffsetValue};
use super::node::{Expr, Literal};
use crate::error::{EinsumError, EinsumResult};

/// Direction of an index shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    Plus,
    Minus,
}

/// `± by`, applied to an index when an array is accessed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shift {
    pub sign: Sign,
    pub by: OffsetValue,
}

/// One normalized bracket position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subscript {
    /// A loop index, optionally shifted.
    Index { name: String, shift: Option<Shift> },
    /// An axis pinned to a constant (1-based) position.
    Fixed(OffsetValue),
}

impl Subscript {
    /// The loop index this position iterates, if any.
    pub fn index_name(&self) -> Option<&str> {
        match self {
            Subscript::Index { name, .. } => Some(name),
            Subscript::Fixed(_) => None,
        }
    }

    /// Returns true for an unshifted loop index.
    pub fn is_bare(&self) -> bool {
        matches!(self, Subscript::Index { shift: None, .. })
    }
}

impl fmt::Display for Subscript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subscript::Index { name, shift: None } => write!(f, "{}", name),
            Subscript::Index {
                name,
                shift: Some(Shift { sign, by }),
            } => {
                let op = match sign {
                    Sign::Plus => "+",
                    Sign::Minus => "-",
                };
                write!(f, "{} {} {}", name, op, by)
            }
            Subscript::Fixed(v) => write!(f, "{}", v),
        }
    }
}

/// One occurrence of a loop index together with the bound it implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub index: String,
    pub dim: DimExpr,
}

fn as_offset(expr: &Expr) -> Option<OffsetValue> {
    match expr {
        Expr::Literal {
            value: Literal::Int(v),
        } => Some(OffsetValue::Literal(*v)),
        Expr::Captured { name } => Some(OffsetValue::Captured(name.clone())),
        _ => None,
    }
}

/// Normalizes the position `axis` of `array`.
///
/// Pushes an [`Occurrence`] for every iterated position; pinned positions push
/// nothing.
///
/// | position    | subscript      | bound                  |
/// |-------------|----------------|------------------------|
/// | `i`         | `i`            | `extent(array, axis)`  |
/// | `3`, `$n`   | pinned         | -                      |
/// | `i + c`     | `i` shifted +c | `extent - c`           |
/// | `i - c`     | `i` shifted -c | `extent + c`           |
pub fn normalize_index(
    expr: &Expr,
    array: &str,
    axis: usize,
    occurrences: &mut Vec<Occurrence>,
) -> EinsumResult<Subscript> {
    let invalid = || EinsumError::invalid_index(array, axis + 1, expr);
    let extent = || DimExpr::extent(array, axis);

    match expr {
        Expr::Symbol { name } => {
            occurrences.push(Occurrence {
                index: name.clone(),
                dim: extent(),
            });
            Ok(Subscript::Index {
                name: name.clone(),
                shift: None,
            })
        }
        Expr::Literal { .. } | Expr::Captured { .. } => {
            as_offset(expr).map(Subscript::Fixed).ok_or_else(invalid)
        }
        Expr::Call { func, args } if args.len() == 2 => {
            let sign = match func.as_str() {
                "+" => Sign::Plus,
                "-" => Sign::Minus,
                _ => return Err(invalid()),
            };
            let name = args[0].as_symbol().ok_or_else(invalid)?;
            let by = as_offset(&args[1]).ok_or_else(invalid)?;
            let dim = match sign {
                Sign::Plus => extent().minus(by.clone()),
                Sign::Minus => extent().plus(by.clone()),
            };
            occurrences.push(Occurrence {
                index: name.to_string(),
                dim,
            });
            Ok(Subscript::Index {
                name: name.to_string(),
                shift: Some(Shift { sign, by }),
            })
        }
        Expr::Call { .. } | Expr::Index { .. } => Err(invalid()),
    }
}

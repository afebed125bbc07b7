//! Expression trees and equations handed over by a front end.

use core::fmt;
use core::ops;

use serde::{Deserialize, Serialize};

use crate::error::EinsumResult;
use crate::value::Scalar;

/// A numeric literal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Int(i64),
    Float(f64),
}

impl Literal {
    /// Runtime value of the literal.
    pub fn to_scalar(self) -> Scalar {
        match self {
            Literal::Int(v) => Scalar::I64(v),
            Literal::Float(v) => Scalar::F64(v),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{}", v),
            Literal::Float(v) => write!(f, "{:?}", v),
        }
    }
}

/// An already-parsed expression node.
///
/// The set of node shapes is closed: every consumer matches exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Expr {
    /// A bare name. On the right-hand side this is a scalar variable, inside
    /// brackets it is a loop index.
    Symbol { name: String },
    /// A numeric literal.
    Literal { value: Literal },
    /// An integer constant captured from the caller, resolved by name when the
    /// plan runs.
    Captured { name: String },
    /// `array[idx1, idx2, ...]`.
    Index { array: String, indices: Vec<Expr> },
    /// An operator or function application, e.g. `+`, `*`, `sqrt`.
    Call { func: String, args: Vec<Expr> },
}

impl Expr {
    pub fn sym(name: impl Into<String>) -> Self {
        Expr::Symbol { name: name.into() }
    }

    pub fn int(value: i64) -> Self {
        Expr::Literal {
            value: Literal::Int(value),
        }
    }

    pub fn float(value: f64) -> Self {
        Expr::Literal {
            value: Literal::Float(value),
        }
    }

    pub fn captured(name: impl Into<String>) -> Self {
        Expr::Captured { name: name.into() }
    }

    /// Builds `array[indices...]`.
    ///
    /// ```ignore
    /// let a = Expr::index("A", ["i", "k"]);
    /// let shifted = Expr::index("A", [Expr::sym("i") + 1]);
    /// ```
    pub fn index<I, E>(array: impl Into<String>, indices: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Expr::Index {
            array: array.into(),
            indices: indices.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds `func(args...)`.
    pub fn call<I, E>(func: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Expr::Call {
            func: func.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the symbol name if this is a bare symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Expr::Symbol { name } => Some(name),
            _ => None,
        }
    }

    /// Short description of the node shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::Symbol { .. } => "symbol",
            Expr::Literal { .. } => "literal",
            Expr::Captured { .. } => "captured constant",
            Expr::Index { .. } => "indexing",
            Expr::Call { .. } => "call",
        }
    }
}

fn is_infix(func: &str) -> bool {
    matches!(func, "+" | "-" | "*" | "/")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Symbol { name } => write!(f, "{}", name),
            Expr::Literal { value } => write!(f, "{}", value),
            Expr::Captured { name } => write!(f, "${}", name),
            Expr::Index { array, indices } => {
                write!(f, "{}[", array)?;
                for (i, idx) in indices.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", idx)?;
                }
                write!(f, "]")
            }
            Expr::Call { func, args } if func == "-" && args.len() == 1 => {
                write!(f, "-{}", args[0])
            }
            Expr::Call { func, args } if is_infix(func) && args.len() >= 2 => {
                write!(f, "(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", func)?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Expr::Call { func, args } => {
                write!(f, "{}(", func)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<&str> for Expr {
    fn from(name: &str) -> Self {
        Expr::sym(name)
    }
}

impl From<String> for Expr {
    fn from(name: String) -> Self {
        Expr::sym(name)
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Expr::int(value as i64)
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::int(value)
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::float(value)
    }
}

macro_rules! binary_operator {
    ($trait:ident, $method:ident, $symbol:literal) => {
        impl<T: Into<Expr>> ops::$trait<T> for Expr {
            type Output = Expr;

            fn $method(self, rhs: T) -> Expr {
                Expr::Call {
                    func: $symbol.into(),
                    args: vec![self, rhs.into()],
                }
            }
        }
    };
}

binary_operator!(Add, add, "+");
binary_operator!(Sub, sub, "-");
binary_operator!(Mul, mul, "*");
binary_operator!(Div, div, "/");

impl ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::Call {
            func: "-".into(),
            args: vec![self],
        }
    }
}

/// How the computed value is combined into the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignOp {
    /// `=`: overwrite an existing destination.
    Assign,
    /// `:=`: allocate a new destination, inferring type and shape.
    Declare,
    /// `+=`
    AddAssign,
    /// `-=`
    SubAssign,
    /// `*=`
    MulAssign,
    /// `/=`
    DivAssign,
}

impl AssignOp {
    pub fn symbol(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Declare => ":=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
            AssignOp::MulAssign => "*=",
            AssignOp::DivAssign => "/=",
        }
    }

    #[inline]
    pub fn is_declaration(self) -> bool {
        self == AssignOp::Declare
    }

    /// Whether the destination's previous value takes part in the update.
    #[inline]
    pub fn reads_destination(self) -> bool {
        !matches!(self, AssignOp::Assign | AssignOp::Declare)
    }

    /// Combines the destination's previous value with the computed one.
    pub fn combine(self, old: Scalar, value: Scalar) -> EinsumResult<Scalar> {
        match self {
            AssignOp::Assign | AssignOp::Declare => Ok(value),
            AssignOp::AddAssign => old.add(value),
            AssignOp::SubAssign => old.sub(value),
            AssignOp::MulAssign => old.mul(value),
            AssignOp::DivAssign => old.div(value),
        }
    }
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// `lhs op rhs`, the unit that is compiled into one plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equation {
    pub lhs: Expr,
    pub op: AssignOp,
    pub rhs: Expr,
}

impl Equation {
    pub fn new(lhs: impl Into<Expr>, op: AssignOp, rhs: impl Into<Expr>) -> Self {
        Self {
            lhs: lhs.into(),
            op,
            rhs: rhs.into(),
        }
    }

    /// `lhs := rhs`
    pub fn declare(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Self {
        Self::new(lhs, AssignOp::Declare, rhs)
    }

    /// `lhs = rhs`
    pub fn assign(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Self {
        Self::new(lhs, AssignOp::Assign, rhs)
    }

    /// `lhs += rhs`
    pub fn add_assign(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Self {
        Self::new(lhs, AssignOp::AddAssign, rhs)
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op, self.rhs)
    }
}

//! Element types and type promotion.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Element type of a tensor or scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Bool,
    I32,
    I64,
    F16,
    F32,
    F64,
}

impl DType {
    /// Returns true for the integer types.
    #[inline]
    pub fn is_integer(self) -> bool {
        matches!(self, DType::I32 | DType::I64)
    }

    /// Returns true for the floating point types.
    #[inline]
    pub fn is_float(self) -> bool {
        matches!(self, DType::F16 | DType::F32 | DType::F64)
    }

    /// Width rank inside the integer or float family.
    fn rank(self) -> u8 {
        match self {
            DType::Bool => 0,
            DType::I32 | DType::F16 => 1,
            DType::I64 | DType::F32 => 2,
            DType::F64 => 3,
        }
    }

    /// Returns the smallest type both `self` and `other` convert to without
    /// leaving their numeric family, or `None` when there is none.
    ///
    /// - integers widen to the wider integer
    /// - an integer with a float gives the float
    /// - floats widen to the wider float
    /// - `Bool` only promotes with itself
    pub fn promote(self, other: DType) -> Option<DType> {
        if self == other {
            return Some(self);
        }
        match (self, other) {
            (DType::Bool, _) | (_, DType::Bool) => None,
            (a, b) if a.is_integer() && b.is_float() => Some(b),
            (a, b) if a.is_float() && b.is_integer() => Some(a),
            (a, b) => Some(if a.rank() >= b.rank() { a } else { b }),
        }
    }

    /// Promotes a whole sequence of types pairwise.
    ///
    /// Returns `Ok(None)` for an empty sequence and `Err((acc, next))` with the
    /// first incompatible pair.
    pub fn promote_all(
        types: impl IntoIterator<Item = DType>,
    ) -> Result<Option<DType>, (DType, DType)> {
        let mut acc: Option<DType> = None;
        for t in types {
            acc = match acc {
                None => Some(t),
                Some(a) => Some(a.promote(t).ok_or((a, t))?),
            };
        }
        Ok(acc)
    }

    /// Name used in rendered plans and error messages.
    pub fn name(self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::I32 => "i32",
            DType::I64 => "i64",
            DType::F16 => "f16",
            DType::F32 => "f32",
            DType::F64 => "f64",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

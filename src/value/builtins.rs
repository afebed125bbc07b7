//! Functions every workspace understands.

use super::scalar::Scalar;
use crate::error::EinsumResult;

/// Applies a built-in function.
///
/// Returns `None` when `name` with this many arguments is not a built-in, so
/// callers can fall back to user functions.
pub fn call_builtin(name: &str, args: &[Scalar]) -> Option<EinsumResult<Scalar>> {
    let result = match (name, args) {
        ("+", [first, rest @ ..]) => rest.iter().try_fold(*first, |acc, &v| acc.add(v)),
        ("*", [first, rest @ ..]) => rest.iter().try_fold(*first, |acc, &v| acc.mul(v)),
        ("-", [x]) => x.neg(),
        ("-", [a, b]) => a.sub(*b),
        ("/", [a, b]) => a.div(*b),
        ("abs", [x]) => Ok(x.abs()),
        ("sqrt", [x]) => x.map_float(f64::sqrt),
        ("exp", [x]) => x.map_float(f64::exp),
        ("min", [first, rest @ ..]) => rest.iter().try_fold(*first, |acc, &v| acc.min(v)),
        ("max", [first, rest @ ..]) => rest.iter().try_fold(*first, |acc, &v| acc.max(v)),
        _ => return None,
    };
    Some(result)
}

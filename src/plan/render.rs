//! Structured loop code for a plan.

use core::fmt;

use super::allocate::Allocation;
use super::assemble::Plan;
use super::resolve::LoopIndex;
use crate::expr::AssignOp;

const INDENT: &str = "    ";

fn pad(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str(INDENT)?;
    }
    Ok(())
}

fn open_loop(f: &mut fmt::Formatter<'_>, depth: usize, index: &LoopIndex) -> fmt::Result {
    pad(f, depth)?;
    writeln!(f, "for {} in 1..={} {{", index.name, index.dim)
}

fn close_loops(f: &mut fmt::Formatter<'_>, from: usize, to: usize) -> fmt::Result {
    for depth in (to..from).rev() {
        pad(f, depth)?;
        writeln!(f, "}}")?;
    }
    Ok(())
}

/// Renders the plan as pseudo-code, outermost loop first.
///
/// ```text
/// // C[i, j] := (A[i, k] * B[k, j])
/// check!(extent(A, 2) == extent(B, 1)); // k
/// let C = zeros([extent(A, 1), extent(B, 2)]);
/// for j in 1..=extent(B, 2) {
///     for i in 1..=extent(A, 1) {
///         let mut acc = zero;
///         for k in 1..=extent(A, 2) {
///             acc += (A[i, k] * B[k, j]);
///         }
///         C[i, j] = acc;
///     }
/// }
/// ```
impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let equation = self.equation();
        writeln!(f, "// {}", equation)?;

        let skipped = if self.config().bounds_checked { "" } else { "// skipped: " };
        for check in self.checks() {
            writeln!(f, "{}check!({}); // {}", skipped, check, check.index)?;
        }

        match self.allocation() {
            Allocation::None => {}
            Allocation::Array { name, shape } => {
                write!(f, "let {} = zeros([", name)?;
                for (i, dim) in shape.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", dim)?;
                }
                writeln!(f, "]);")?;
            }
            Allocation::ScalarZero { name } => writeln!(f, "let {} = zero;", name)?,
        }

        let mut depth = 0;
        for index in self.free().loops().iter().rev() {
            open_loop(f, depth, index)?;
            depth += 1;
        }

        let op = match equation.op {
            AssignOp::Declare => AssignOp::Assign,
            op => op,
        };
        if self.contracted().is_empty() {
            pad(f, depth)?;
            writeln!(f, "{} {} {};", equation.lhs, op, equation.rhs)?;
        } else {
            pad(f, depth)?;
            writeln!(f, "let mut acc = zero;")?;
            let body = depth;
            let innermost = self.contracted().len() - 1;
            for (i, index) in self.contracted().loops().iter().rev().enumerate() {
                if i == innermost && self.contracted().is_vectorized() {
                    pad(f, depth)?;
                    writeln!(f, "#[vectorize]")?;
                }
                open_loop(f, depth, index)?;
                depth += 1;
            }
            pad(f, depth)?;
            writeln!(f, "acc += {};", equation.rhs)?;
            close_loops(f, depth, body)?;
            depth = body;
            pad(f, depth)?;
            writeln!(f, "{} {} acc;", equation.lhs, op)?;
        }

        close_loops(f, depth, 0)
    }
}

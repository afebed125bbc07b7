//! Plan assembly.

use hashbrown::HashMap;

use super::allocate::Allocation;
use super::kernel::{Access, Slots, Term, lower, lower_access};
use super::loops::LoopNest;
use super::resolve::{DimCheck, resolve};
use crate::error::{EinsumError, EinsumResult};
use crate::expr::{AssignOp, Equation, Expr, walk};
use crate::launch::EinsumConfig;

/// A compiled equation.
///
/// Holds everything needed to run the loop nest: the free and contracted
/// nests, the consistency checks, the allocation directive and the lowered
/// right-hand side. Extents stay symbolic until the plan runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    equation: Equation,
    destination: Access,
    free: LoopNest,
    contracted: LoopNest,
    checks: Vec<DimCheck>,
    allocation: Allocation,
    sources: Vec<String>,
    kernel: Term,
    config: EinsumConfig,
}

impl Plan {
    /// The equation this plan was compiled from.
    pub fn equation(&self) -> &Equation {
        &self.equation
    }

    pub fn op(&self) -> AssignOp {
        self.equation.op
    }

    /// Lowered destination access.
    pub fn destination(&self) -> &Access {
        &self.destination
    }

    /// Destination loops, innermost first.
    pub fn free(&self) -> &LoopNest {
        &self.free
    }

    /// Summation loops, innermost first.
    pub fn contracted(&self) -> &LoopNest {
        &self.contracted
    }

    /// Checks evaluated once before any loop runs.
    pub fn checks(&self) -> &[DimCheck] {
        &self.checks
    }

    pub fn allocation(&self) -> &Allocation {
        &self.allocation
    }

    /// Distinct right-hand arrays, in discovery order.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Lowered right-hand side.
    pub fn kernel(&self) -> &Term {
        &self.kernel
    }

    pub fn config(&self) -> &EinsumConfig {
        &self.config
    }

    /// Number of slots in a loop frame: free loops first, then contracted.
    pub fn frame_len(&self) -> usize {
        self.free.len() + self.contracted.len()
    }
}

fn destination_name(lhs: &Expr) -> EinsumResult<&str> {
    match lhs {
        Expr::Index { array, .. } => Ok(array.as_str()),
        Expr::Symbol { name } => Ok(name.as_str()),
        other => Err(EinsumError::malformed(format!(
            "left-hand side must be a single array reference, found {} `{}`",
            other.kind(),
            other
        ))),
    }
}

/// Creates an execution plan for an equation.
///
/// This is the main entry point for planning. It:
/// 1. Walks both sides, normalizing offsets
/// 2. Resolves free and contracted indices and their checks
/// 3. Decides the allocation for declared destinations
/// 4. Lowers the right-hand side against the loop frame
pub fn create_plan(equation: &Equation, config: EinsumConfig) -> EinsumResult<Plan> {
    let name = destination_name(&equation.lhs)?;
    let lhs = walk(&equation.lhs)?;
    let rhs = walk(&equation.rhs)?;

    if equation.op.is_declaration() {
        let mut subscripts = lhs.arrays.iter().flat_map(|a| a.subscripts.iter());
        if let Some(position) = subscripts.find(|s| !s.is_bare()) {
            return Err(EinsumError::malformed(format!(
                "declared destination `{}` must be indexed by bare symbols, found `{}`",
                equation.lhs, position
            )));
        }
        if let Some(missing) = lhs.indices().find(|i| !rhs.mentions(i)) {
            return Err(EinsumError::malformed(format!(
                "index '{}' of declared destination `{}` does not occur on the right-hand side",
                missing, equation.lhs
            )));
        }
        if rhs.arrays.is_empty() {
            return Err(EinsumError::type_inference(format!(
                "`{}` has no right-hand array to infer the element type from",
                equation.rhs
            )));
        }
    }

    let resolution = resolve(&lhs.occurrences, &rhs.occurrences, equation.op);

    let allocation = if equation.op.is_declaration() {
        Allocation::declared(name, resolution.lhs_dims.clone())
    } else {
        Allocation::None
    };

    let free = LoopNest::new(resolution.free);
    let contracted = LoopNest::new(resolution.contracted).vectorize(config.vectorize_inner_loop);

    let (destination, kernel) = {
        let mut slots: Slots<'_> = HashMap::with_capacity(free.len() + contracted.len());
        for (slot, index) in free.loops().iter().chain(contracted.loops()).enumerate() {
            slots.insert(index.name.as_str(), slot);
        }
        (lower_access(&equation.lhs, &slots)?, lower(&equation.rhs, &slots)?)
    };

    let sources = rhs.array_names().into_iter().map(String::from).collect();

    log::debug!(
        "planned `{}`: free {:?}, contracted {:?}, {} checks",
        equation,
        free.names(),
        contracted.names(),
        resolution.checks.len()
    );

    Ok(Plan {
        equation: equation.clone(),
        destination,
        free,
        contracted,
        checks: resolution.checks,
        allocation,
        sources,
        kernel,
        config,
    })
}

//! Einsum execution engine.
//!
//! Orchestrates planning, front-loaded checks, allocation and the loop nest.

use smallvec::{SmallVec, smallvec};

use super::config::EinsumConfig;
use super::runtime::ArrayRuntime;
use crate::error::EinsumResult;
use crate::expr::Equation;
use crate::plan::{Odometer, Plan, Term, create_plan, infer_element_type};
use crate::value::{DType, Scalar};

/// Independent partial sums kept by a vectorized contraction loop.
pub const LANES: usize = 4;

/// Compiles and executes an equation.
///
/// # Arguments
/// * `runtime` - The arrays, constants and functions the equation refers to
/// * `equation` - The equation to run
/// * `config` - Optional configuration
///
/// # Example
///
/// ```ignore
/// let mut ws = Workspace::new();
/// ws.insert("A", Tensor::vector(vec![1.0, 2.0, 3.0]));
/// ws.insert("B", Tensor::vector(vec![10.0, 20.0, 30.0]));
///
/// let eq = Equation::declare(Expr::sym("s"), Expr::index("A", ["i"]) * Expr::index("B", ["i"]));
/// einsum(&mut ws, &eq, None)?;
/// ```
pub fn einsum<R: ArrayRuntime + ?Sized>(
    runtime: &mut R,
    equation: &Equation,
    config: Option<EinsumConfig>,
) -> EinsumResult<()> {
    let config = config.unwrap_or_default();

    // Create execution plan
    let plan = create_plan(equation, config)?;

    // Execute plan
    execute_plan(&plan, runtime)
}

impl Plan {
    /// Runs the plan against `runtime`.
    ///
    /// Useful when the same equation runs many times.
    pub fn execute<R: ArrayRuntime + ?Sized>(&self, runtime: &mut R) -> EinsumResult<()> {
        execute_plan(self, runtime)
    }
}

/// Executes a compiled plan.
///
/// Nothing is allocated or written unless type inference, every consistency
/// check, constant binding and trip count succeed.
pub fn execute_plan<R: ArrayRuntime + ?Sized>(plan: &Plan, runtime: &mut R) -> EinsumResult<()> {
    let destination = plan.destination();

    let dtype = if plan.allocation().is_none() {
        runtime.dtype(&destination.array)?
    } else {
        infer_element_type(plan.sources(), &*runtime)?
    };

    if plan.config().bounds_checked {
        for check in plan.checks() {
            check.verify(&*runtime)?;
        }
    } else if !plan.checks().is_empty() {
        log::warn!(
            "running `{}` with {} dimension checks disabled",
            plan.equation(),
            plan.checks().len()
        );
    }

    let kernel = plan.kernel().bind(&*runtime)?;
    let destination = destination.bind(&*runtime)?;

    // Declared bounds only refer to right-hand arrays, so they hold across the
    // allocation below.
    let free_extents = plan.free().trip_counts(&*runtime)?;
    let contracted_extents = plan.contracted().trip_counts(&*runtime)?;

    plan.allocation().apply(runtime, dtype)?;

    let op = plan.op();
    let nf = free_extents.len();
    let contraction = Contraction {
        kernel: &kernel,
        offset: nf,
        extents: &contracted_extents,
        dtype,
        vectorized: plan.contracted().is_vectorized(),
    };

    let mut frame: SmallVec<[i64; 8]> = smallvec![0; plan.frame_len()];
    for position in Odometer::new(&free_extents) {
        frame[..nf].copy_from_slice(&position);

        let value = if contracted_extents.is_empty() {
            kernel.eval(&*runtime, &frame)?
        } else {
            contraction.run(&*runtime, &mut frame)?
        };

        let index = destination.position(&*runtime, &frame)?;
        let value = if op.reads_destination() {
            op.combine(runtime.read(&destination.array, &index)?, value)?
        } else {
            value
        };
        runtime.write(&destination.array, &index, value)?;
    }
    Ok(())
}

/// Summation over the contracted nest for one destination element.
struct Contraction<'a> {
    kernel: &'a Term,
    /// First contracted slot in the frame.
    offset: usize,
    extents: &'a [usize],
    dtype: DType,
    vectorized: bool,
}

impl Contraction<'_> {
    fn run<R: ArrayRuntime + ?Sized>(
        &self,
        runtime: &R,
        frame: &mut [i64],
    ) -> EinsumResult<Scalar> {
        let zero = Scalar::zero(self.dtype);
        if !self.vectorized {
            let mut acc = zero;
            for position in Odometer::new(self.extents) {
                frame[self.offset..].copy_from_slice(&position);
                acc = acc.add(self.kernel.eval(runtime, frame)?)?;
            }
            return Ok(acc);
        }

        // Lane `l` sums the innermost iterations `k` with `(k - 1) % LANES == l`.
        let mut lanes = [zero; LANES];
        for position in Odometer::new(self.extents) {
            frame[self.offset..].copy_from_slice(&position);
            let lane = (position[0] - 1) as usize % LANES;
            lanes[lane] = lanes[lane].add(self.kernel.eval(runtime, frame)?)?;
        }
        lanes.into_iter().try_fold(zero, |acc, lane| acc.add(lane))
    }
}

//! Configuration: vectorization, disabled checks and rendering.

use loop_einsum::plan::create_plan;
use loop_einsum::{EinsumConfig, EinsumError, Equation, Expr, Tensor, Workspace, einsum};
use pretty_assertions::assert_eq;

use crate::support::{matrix, values};

fn matmul() -> Equation {
    Equation::declare(
        Expr::index("C", ["i", "j"]),
        Expr::index("A", ["i", "k"]) * Expr::index("B", ["k", "j"]),
    )
}

#[test]
fn test_vectorized_matches_sequential() {
    // Inner extents below, at and above the lane count.
    for k in [1, 3, 4, 9] {
        let mut ws = Workspace::new();
        ws.insert("A", matrix(3, k, 1));
        ws.insert("B", matrix(k, 2, 2));

        einsum(&mut ws, &matmul(), Some(EinsumConfig::safe())).unwrap();
        let sequential = values(&ws, "C");

        einsum(&mut ws, &matmul(), Some(EinsumConfig::new().with_vectorization(true))).unwrap();
        assert_eq!(values(&ws, "C"), sequential, "k = {}", k);
    }
}

#[test]
fn test_disabled_checks_skip_consistency_only() {
    let mut ws = Workspace::new();
    ws.insert("A", Tensor::vector(vec![1.0, 2.0, 3.0]));
    ws.insert("B", Tensor::vector(vec![10.0, 20.0, 30.0, 40.0]));

    let eq = Equation::declare(
        Expr::index("C", ["i"]),
        Expr::index("A", ["i"]) + Expr::index("B", ["i"]),
    );
    let unchecked = EinsumConfig::new().with_bounds_checks(false);

    // The loop runs over the first occurrence's extent, which fits both arrays.
    einsum(&mut ws, &eq, Some(unchecked)).unwrap();
    assert_eq!(values(&ws, "C"), vec![11.0, 22.0, 33.0]);

    // Swapped, the loop overruns `A` and the read is rejected.
    let eq = Equation::declare(
        Expr::index("D", ["i"]),
        Expr::index("B", ["i"]) + Expr::index("A", ["i"]),
    );
    let err = einsum(&mut ws, &eq, Some(unchecked)).unwrap_err();
    assert!(matches!(err, EinsumError::IndexOutOfBounds { .. }));
}

#[test]
fn test_presets() {
    assert_eq!(EinsumConfig::default(), EinsumConfig::safe());
    assert!(EinsumConfig::safe().bounds_checked);
    assert!(!EinsumConfig::safe().vectorize_inner_loop);
    assert!(!EinsumConfig::fast().bounds_checked);
    assert!(EinsumConfig::fast().vectorize_inner_loop);
}

#[test]
fn test_render_marks_vectorized_loop() {
    let plan = create_plan(&matmul(), EinsumConfig::fast()).unwrap();
    let code = plan.to_string();

    assert!(code.contains("// skipped: check!(extent(A, 2) == extent(B, 1)); // k"));
    assert!(code.contains("#[vectorize]\n        for k in 1..=extent(A, 2) {"));
    assert!(code.contains("let C = zeros([extent(A, 1), extent(B, 2)]);"));
}

#[test]
fn test_plan_reuse() {
    let plan = create_plan(
        &Equation::add_assign(Expr::index("acc", ["i"]), Expr::index("x", ["i"])),
        EinsumConfig::default(),
    )
    .unwrap();

    let mut ws = Workspace::new();
    ws.insert("acc", Tensor::vector(vec![0.0, 0.0]));
    for step in 1..=3 {
        ws.insert("x", Tensor::vector(vec![step as f64, 1.0]));
        plan.execute(&mut ws).unwrap();
    }
    assert_eq!(values(&ws, "acc"), vec![6.0, 3.0]);
}

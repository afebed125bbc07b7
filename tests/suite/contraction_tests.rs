//! Contractions checked against naive reference loops.

use loop_einsum::{DType, Equation, Expr, Scalar, Tensor, Workspace, einsum};
use pretty_assertions::assert_eq;

use crate::support::{matrix, reference_matmul, seq, values};

#[test]
fn test_dot_product() {
    let mut ws = Workspace::new();
    ws.insert("A", Tensor::vector(vec![1.0, 2.0, 3.0]));
    ws.insert("B", Tensor::vector(vec![10.0, 20.0, 30.0]));

    // s := A[i] * B[i]
    let eq = Equation::declare(
        Expr::sym("s"),
        Expr::index("A", ["i"]) * Expr::index("B", ["i"]),
    );
    einsum(&mut ws, &eq, None).unwrap();

    let s = ws.get("s").unwrap();
    assert_eq!(s.ndim(), 0);
    assert_eq!(s.to_scalar(), Some(Scalar::F64(140.0)));
}

#[test]
fn test_matmul_matches_reference() {
    let (m, k, n) = (3, 4, 5);
    let mut ws = Workspace::new();
    ws.insert("A", matrix(m, k, 1));
    ws.insert("B", matrix(k, n, 2));

    let eq = Equation::declare(
        Expr::index("C", ["i", "j"]),
        Expr::index("A", ["i", "k"]) * Expr::index("B", ["k", "j"]),
    );
    einsum(&mut ws, &eq, None).unwrap();

    let expected = reference_matmul(&seq(m * k, 1), &seq(k * n, 2), m, k, n);
    assert_eq!(ws.get("C").unwrap().shape(), &[m, n]);
    assert_eq!(values(&ws, "C"), expected);
}

#[test]
fn test_chain_matches_reference() {
    let mut ws = Workspace::new();
    ws.insert("A", matrix(2, 3, 3));
    ws.insert("B", matrix(3, 4, 4));
    ws.insert("C", matrix(4, 2, 5));

    // D[i, l] := A[i, j] * B[j, k] * C[k, l]
    let eq = Equation::declare(
        Expr::index("D", ["i", "l"]),
        Expr::index("A", ["i", "j"]) * Expr::index("B", ["j", "k"]) * Expr::index("C", ["k", "l"]),
    );
    einsum(&mut ws, &eq, None).unwrap();

    let ab = reference_matmul(&seq(6, 3), &seq(12, 4), 2, 3, 4);
    let expected = reference_matmul(&ab, &seq(8, 5), 2, 4, 2);
    assert_eq!(values(&ws, "D"), expected);
}

#[test]
fn test_trace() {
    let mut ws = Workspace::new();
    ws.insert("A", Tensor::from_f64(&[3, 3], (1..=9).map(f64::from).collect()).unwrap());

    let eq = Equation::declare(Expr::sym("t"), Expr::index("A", ["i", "i"]));
    einsum(&mut ws, &eq, None).unwrap();

    assert_eq!(values(&ws, "t"), vec![15.0]);
}

#[test]
fn test_transpose() {
    let mut ws = Workspace::new();
    ws.insert("A", matrix(2, 3, 0));

    let eq = Equation::declare(Expr::index("B", ["j", "i"]), Expr::index("A", ["i", "j"]));
    einsum(&mut ws, &eq, None).unwrap();

    let b = ws.get("B").unwrap();
    assert_eq!(b.shape(), &[3, 2]);
    for i in 0..2 {
        for j in 0..3 {
            assert_eq!(b.get(&[j, i]), ws.get("A").unwrap().get(&[i, j]));
        }
    }
}

#[test]
fn test_outer_product() {
    let mut ws = Workspace::new();
    ws.insert("a", Tensor::vector(vec![1.0, 2.0]));
    ws.insert("b", Tensor::vector(vec![3.0, 4.0, 5.0]));

    let eq = Equation::declare(
        Expr::index("C", ["i", "j"]),
        Expr::index("a", ["i"]) * Expr::index("b", ["j"]),
    );
    einsum(&mut ws, &eq, None).unwrap();

    assert_eq!(values(&ws, "C"), vec![3.0, 4.0, 5.0, 6.0, 8.0, 10.0]);
}

#[test]
fn test_row_sums_of_integers() {
    let mut ws = Workspace::new();
    ws.insert("A", Tensor::from_i32(&[2, 3], vec![1, 2, 3, 4, 5, 6]).unwrap());

    let eq = Equation::declare(Expr::index("r", ["i"]), Expr::index("A", ["i", "j"]));
    einsum(&mut ws, &eq, None).unwrap();

    let r = ws.get("r").unwrap();
    assert_eq!(r.dtype(), DType::I32);
    assert_eq!(r.get(&[0]), Some(Scalar::I32(6)));
    assert_eq!(r.get(&[1]), Some(Scalar::I32(15)));
}

#[test]
fn test_functions_inside_contraction() {
    let mut ws = Workspace::new();
    ws.insert("A", Tensor::vector(vec![-3.0, 4.0, -5.0]));
    ws.register_function("relu", |args| args[0].max(Scalar::F64(0.0)));

    // s := abs(A[i]) + relu(A[i])
    let eq = Equation::declare(
        Expr::sym("s"),
        Expr::call("abs", [Expr::index("A", ["i"])])
            + Expr::call("relu", [Expr::index("A", ["i"])]),
    );
    einsum(&mut ws, &eq, None).unwrap();

    assert_eq!(values(&ws, "s"), vec![3.0 + 8.0 + 5.0]);
}

#[test]
fn test_function_without_arguments() {
    let mut ws = Workspace::new();
    ws.insert("A", Tensor::vector(vec![1.0, 2.0, 3.0]));
    ws.register_function("scale", |_| Ok(Scalar::F64(10.0)));

    // s := A[i] * scale()
    let eq = Equation::declare(
        Expr::sym("s"),
        Expr::index("A", ["i"]) * Expr::call("scale", Vec::<Expr>::new()),
    );
    einsum(&mut ws, &eq, None).unwrap();

    assert_eq!(values(&ws, "s"), vec![60.0]);
}

#[test]
fn test_unknown_function() {
    let mut ws = Workspace::new();
    ws.insert("A", Tensor::vector(vec![1.0]));

    let eq = Equation::declare(
        Expr::index("B", ["i"]),
        Expr::call("nope", [Expr::index("A", ["i"])]),
    );
    let err = einsum(&mut ws, &eq, None).unwrap_err();
    assert_eq!(err, loop_einsum::EinsumError::UnknownFunction { name: "nope".into() });
}

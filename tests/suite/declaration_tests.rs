//! Declared destinations: shape, element type and failure before allocation.

use half::f16;
use loop_einsum::{DType, EinsumError, Equation, Expr, Scalar, Tensor, Workspace, einsum};
use pretty_assertions::assert_eq;

use crate::support::values;

#[test]
fn test_shape_follows_destination_order() {
    let mut ws = Workspace::new();
    ws.insert("A", Tensor::zeros(DType::F64, &[2, 3, 4]));

    // P[k, i, j] := A[i, j, k]
    let eq = Equation::declare(
        Expr::index("P", ["k", "i", "j"]),
        Expr::index("A", ["i", "j", "k"]),
    );
    einsum(&mut ws, &eq, None).unwrap();

    assert_eq!(ws.get("P").unwrap().shape(), &[4, 2, 3]);
}

#[test]
fn test_element_type_promotion() {
    let cases = [
        (DType::I32, DType::I32, DType::I32),
        (DType::I32, DType::I64, DType::I64),
        (DType::I32, DType::F32, DType::F32),
        (DType::F16, DType::F32, DType::F32),
        (DType::I64, DType::F16, DType::F16),
        (DType::Bool, DType::Bool, DType::Bool),
    ];
    for (a, b, expected) in cases {
        let mut ws = Workspace::new();
        ws.insert("A", Tensor::zeros(a, &[2]));
        ws.insert("B", Tensor::zeros(b, &[2]));

        let eq = Equation::declare(
            Expr::index("C", ["i"]),
            Expr::index("A", ["i"]) * Expr::index("B", ["i"]),
        );
        einsum(&mut ws, &eq, None).unwrap();
        assert_eq!(ws.get("C").unwrap().dtype(), expected, "{} * {}", a, b);
    }
}

#[test]
fn test_literals_do_not_widen_destination() {
    let mut ws = Workspace::new();
    ws.insert("A", Tensor::from_i32(&[3], vec![1, 2, 3]).unwrap());

    // C[i] := 2 * A[i] + 1
    let eq = Equation::declare(Expr::index("C", ["i"]), Expr::int(2) * Expr::index("A", ["i"]) + 1);
    einsum(&mut ws, &eq, None).unwrap();

    let c = ws.get("C").unwrap();
    assert_eq!(c.dtype(), DType::I32);
    assert_eq!(c.as_f64(), None);
    assert_eq!(values(&ws, "C"), vec![3.0, 5.0, 7.0]);
}

#[test]
fn test_half_precision_sources() {
    let mut ws = Workspace::new();
    let a: Vec<f16> = [1.0f32, 2.0, 3.0].into_iter().map(f16::from_f32).collect();
    ws.insert("A", Tensor::F16(ndarray::Array1::from(a).into_dyn()));

    let eq = Equation::declare(
        Expr::sym("s"),
        Expr::index("A", ["i"]) * Expr::index("A", ["i"]),
    );
    einsum(&mut ws, &eq, None).unwrap();

    assert_eq!(ws.get("s").unwrap().to_scalar(), Some(Scalar::F16(f16::from_f32(14.0))));
}

#[test]
fn test_boolean_matmul_is_reachability() {
    let mut ws = Workspace::new();
    // 1 -> 2, 2 -> 3
    ws.insert(
        "E",
        Tensor::from_bool(
            &[3, 3],
            vec![false, true, false, false, false, true, false, false, false],
        )
        .unwrap(),
    );

    let eq = Equation::declare(
        Expr::index("R", ["i", "j"]),
        Expr::index("E", ["i", "k"]) * Expr::index("E", ["k", "j"]),
    );
    einsum(&mut ws, &eq, None).unwrap();

    let r = ws.get("R").unwrap();
    assert_eq!(r.dtype(), DType::Bool);
    assert_eq!(r.get(&[0, 2]), Some(Scalar::Bool(true)));
    assert_eq!(r.get(&[0, 1]), Some(Scalar::Bool(false)));
    assert_eq!(r.get(&[1, 2]), Some(Scalar::Bool(false)));
}

#[test]
fn test_scalar_variable_on_right() {
    let mut ws = Workspace::new();
    ws.insert("alpha", Tensor::scalar(0.5f64));
    ws.insert("A", Tensor::vector(vec![2.0, 4.0]));

    let eq = Equation::declare(
        Expr::index("C", ["i"]),
        Expr::sym("alpha") * Expr::index("A", ["i"]),
    );
    einsum(&mut ws, &eq, None).unwrap();

    assert_eq!(values(&ws, "C"), vec![1.0, 2.0]);
}

#[test]
fn test_dimension_mismatch_allocates_nothing() {
    let mut ws = Workspace::new();
    ws.insert("A", Tensor::vector(vec![1.0, 2.0, 3.0]));
    ws.insert("B", Tensor::vector(vec![1.0, 2.0, 3.0, 4.0]));

    // C[i] := A[i] + B[i]
    let eq = Equation::declare(
        Expr::index("C", ["i"]),
        Expr::index("A", ["i"]) + Expr::index("B", ["i"]),
    );
    let err = einsum(&mut ws, &eq, None).unwrap_err();

    assert_eq!(
        err,
        EinsumError::DimensionMismatch {
            index: "i".into(),
            expected: 3,
            got: 4,
        }
    );
    assert!(!ws.contains("C"));
}

#[test]
fn test_type_inference_failure_allocates_nothing() {
    let mut ws = Workspace::new();
    ws.insert("M", Tensor::zeros(DType::Bool, &[2]));
    ws.insert("A", Tensor::zeros(DType::F64, &[2]));

    let eq = Equation::declare(
        Expr::index("C", ["i"]),
        Expr::index("M", ["i"]) * Expr::index("A", ["i"]),
    );
    let err = einsum(&mut ws, &eq, None).unwrap_err();

    assert!(matches!(err, EinsumError::TypeInference { .. }));
    assert!(!ws.contains("C"));
}

#[test]
fn test_failed_run_keeps_previous_destination() {
    let mut ws = Workspace::new();
    ws.insert("A", Tensor::vector(vec![1.0, 2.0]));
    ws.insert("C", Tensor::vector(vec![7.0, 7.0]));

    // `A` has one axis, so the bound of `k` cannot be evaluated.
    let eq = Equation::declare(Expr::index("C", ["i"]), Expr::index("A", ["i", "k"]));
    let err = einsum(&mut ws, &eq, None).unwrap_err();
    assert_eq!(
        err,
        EinsumError::RankMismatch {
            array: "A".into(),
            expected: 1,
            got: 2,
        }
    );
    assert_eq!(values(&ws, "C"), vec![7.0, 7.0]);

    let eq = Equation::declare(
        Expr::index("C", ["i"]),
        Expr::index("A", ["i"]) * Expr::captured("k"),
    );
    let err = einsum(&mut ws, &eq, None).unwrap_err();
    assert_eq!(err, EinsumError::UnknownConstant { name: "k".into() });
    assert_eq!(values(&ws, "C"), vec![7.0, 7.0]);
}

#[test]
fn test_redeclaration_replaces_destination() {
    let mut ws = Workspace::new();
    ws.insert("A", Tensor::vector(vec![1.0, 2.0]));
    ws.insert("C", Tensor::zeros(DType::I32, &[7]));

    let eq = Equation::declare(Expr::index("C", ["i"]), Expr::index("A", ["i"]));
    einsum(&mut ws, &eq, None).unwrap();

    let c = ws.get("C").unwrap();
    assert_eq!(c.dtype(), DType::F64);
    assert_eq!(c.shape(), &[2]);
}

#[test]
fn test_compile_errors() {
    let mut ws = Workspace::new();
    ws.insert("A", Tensor::vector(vec![1.0]));

    let cases = [
        Equation::declare(Expr::index("C", ["i", "j"]), Expr::index("A", ["i"])),
        Equation::declare(Expr::index("C", [Expr::sym("i") + 1]), Expr::index("A", ["i"])),
        Equation::declare(Expr::index("C", ["i"]), Expr::index("A", [Expr::float(1.0)])),
        Equation::declare(Expr::index("C", ["i"]), Expr::call("", [Expr::index("A", ["i"])])),
    ];
    for eq in cases {
        let err = einsum(&mut ws, &eq, None).unwrap_err();
        assert!(err.is_compile_error(), "{}: {}", eq, err);
    }
    assert!(!ws.contains("C"));
}

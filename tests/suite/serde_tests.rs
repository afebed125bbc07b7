//! Equations and configuration handed over as data.

use loop_einsum::{EinsumConfig, Equation, Expr, Tensor, Workspace, einsum};
use pretty_assertions::assert_eq;

use crate::support::values;

const SCALED_SHIFT: &str = r#"{
    "lhs": { "node": "index", "array": "B", "indices": [{ "node": "symbol", "name": "i" }] },
    "op": "declare",
    "rhs": {
        "node": "call",
        "func": "*",
        "args": [
            { "node": "literal", "value": { "int": 2 } },
            {
                "node": "index",
                "array": "A",
                "indices": [{
                    "node": "call",
                    "func": "+",
                    "args": [
                        { "node": "symbol", "name": "i" },
                        { "node": "captured", "name": "n" }
                    ]
                }]
            }
        ]
    }
}"#;

#[test]
fn test_equation_from_json() {
    let eq: Equation = serde_json::from_str(SCALED_SHIFT).unwrap();

    let expected = Equation::declare(
        Expr::index("B", ["i"]),
        Expr::int(2) * Expr::index("A", [Expr::sym("i") + Expr::captured("n")]),
    );
    assert_eq!(eq, expected);
    assert_eq!(eq.to_string(), "B[i] := (2 * A[(i + $n)])");
}

#[test]
fn test_json_equation_runs() {
    let eq: Equation = serde_json::from_str(SCALED_SHIFT).unwrap();

    let mut ws = Workspace::new();
    ws.insert("A", Tensor::vector(vec![1.0, 2.0, 3.0, 4.0]));
    ws.set_constant("n", 1);
    einsum(&mut ws, &eq, None).unwrap();

    assert_eq!(values(&ws, "B"), vec![4.0, 6.0, 8.0]);
}

#[test]
fn test_config_defaults_fill_missing_fields() {
    let config: EinsumConfig = serde_json::from_str(r#"{ "vectorize_inner_loop": true }"#).unwrap();
    assert_eq!(config, EinsumConfig::new().with_vectorization(true));
}

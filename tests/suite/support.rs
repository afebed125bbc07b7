//! Naive reference loops and fixtures shared by the suite.

use loop_einsum::{Tensor, Workspace};

/// Small integer-valued data, so every sum is exact in `f64`.
pub fn seq(len: usize, seed: usize) -> Vec<f64> {
    (0..len).map(|x| ((x * 7 + seed) % 11) as f64 - 5.0).collect()
}

/// Row-major `f64` matrix.
pub fn matrix(rows: usize, cols: usize, seed: usize) -> Tensor {
    Tensor::from_f64(&[rows, cols], seq(rows * cols, seed)).unwrap()
}

/// `C[i, j] = sum_k A[i, k] * B[k, j]`, row-major.
pub fn reference_matmul(a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Vec<f64> {
    let mut c = vec![0.0; m * n];
    for i in 0..m {
        for j in 0..n {
            let mut acc = 0.0;
            for p in 0..k {
                acc += a[i * k + p] * b[p * n + j];
            }
            c[i * n + j] = acc;
        }
    }
    c
}

/// Row-major contents of a bound tensor as `f64`.
pub fn values(ws: &Workspace, name: &str) -> Vec<f64> {
    ws.get(name)
        .unwrap_or_else(|| panic!("'{}' is not bound", name))
        .to_f64_vec()
}

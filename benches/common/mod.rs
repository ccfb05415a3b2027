#![allow(dead_code)]

use adgraph::api::{cos, logistic};
use adgraph::{Expr, Expr64};

// ─── Inputs ────────────────────────────────────────────────────────────────

pub fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("x{i}")).collect()
}

pub fn variables(n: usize) -> Vec<Expr64> {
    names(n)
        .iter()
        .map(|name| Expr::variable(name).unwrap())
        .collect()
}

pub fn point(n: usize) -> Vec<(String, f64)> {
    names(n)
        .into_iter()
        .enumerate()
        .map(|(i, name)| (name, 0.5 + 0.01 * i as f64))
        .collect()
}

// ─── Rosenbrock ────────────────────────────────────────────────────────────

pub fn rosenbrock(x: &[Expr64]) -> Expr64 {
    let mut sum = Expr64::constant(0.0);
    for i in 0..x.len() - 1 {
        let t1 = 1.0 - &x[i];
        let t2 = &x[i + 1] - &x[i] * &x[i];
        sum = sum + &t1 * &t1 + 100.0 * (&t2 * &t2);
    }
    sum
}

// ─── Rastrigin ─────────────────────────────────────────────────────────────
// f(x) = 10n + Σ[x_i² - 10·cos(2π·x_i)]

pub fn rastrigin(x: &[Expr64]) -> Expr64 {
    let two_pi = 2.0 * std::f64::consts::PI;
    let mut sum = Expr64::constant(10.0 * x.len() as f64);
    for xi in x {
        sum = sum + xi * xi - 10.0 * cos(&(two_pi * xi));
    }
    sum
}

// ─── Neural Network Layer ──────────────────────────────────────────────────
// f(x) = Σ_j logistic(Σ_i w_ji·x_i + b_j), 4 hidden units
// Deterministic weights: w_ji = sin(j*N+i+1) / (N+1), b_j = 0.1*(j+1)

pub fn nn_layer(x: &[Expr64]) -> Expr64 {
    let n = x.len();
    let mut out = Expr64::constant(0.0);
    for j in 0..4 {
        let mut z = Expr64::constant(0.1 * (j + 1) as f64);
        for (i, xi) in x.iter().enumerate() {
            let w = ((j * n + i + 1) as f64).sin() / (n + 1) as f64;
            z = z + w * xi;
        }
        out = out + logistic(&z);
    }
    out
}

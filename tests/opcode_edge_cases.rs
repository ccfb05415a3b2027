use adgraph::opcode::{eval_forward, reverse_partials, OpKind};
use adgraph::AdError;

const TOL: f64 = 1e-10;

fn eval(op: OpKind, a: f64, b: f64) -> f64 {
    eval_forward(op, a, b).unwrap()
}

// ══════════════════════════════════════════════
//  eval_forward: NaN propagation
// ══════════════════════════════════════════════

#[test]
fn nan_propagates_through_binary() {
    for op in [OpKind::Addition, OpKind::Subtraction, OpKind::Multiplication, OpKind::Division] {
        assert!(eval(op, f64::NAN, 1.0).is_nan(), "{op}");
        assert!(eval(op, 1.0, f64::NAN).is_nan(), "{op}");
    }
}

#[test]
fn nan_propagates_through_unary() {
    for op in [
        OpKind::Negation,
        OpKind::Exp,
        OpKind::Sqrt,
        OpKind::Sin,
        OpKind::Arctan,
        OpKind::Tanh,
        OpKind::Logistic,
    ] {
        assert!(eval(op, f64::NAN, 0.0).is_nan(), "{op}");
    }
}

// ══════════════════════════════════════════════
//  eval_forward: infinities and undefined results
// ══════════════════════════════════════════════

#[test]
fn exp_of_large_is_inf() {
    assert!(eval(OpKind::Exp, 1000.0, 0.0).is_infinite());
}

#[test]
fn sqrt_of_negative_is_nan() {
    assert!(eval(OpKind::Sqrt, -1.0, 0.0).is_nan());
}

#[test]
fn logistic_saturates() {
    assert_eq!(eval(OpKind::Logistic, 1000.0, 0.0), 1.0);
    assert_eq!(eval(OpKind::Logistic, -1000.0, 0.0), 0.0);
}

#[test]
fn log_of_negative_is_nan() {
    assert!(eval(OpKind::Log, -2.0, 10.0).is_nan());
}

#[test]
fn fractional_power_of_negative_is_nan() {
    assert!(eval(OpKind::Power, -8.0, 1.0 / 3.0).is_nan());
    assert_eq!(eval(OpKind::Power, -2.0, 3.0), -8.0);
}

// ══════════════════════════════════════════════
//  eval_forward: guarded singularities
// ══════════════════════════════════════════════

#[test]
fn guards_only_fire_at_the_singularity() {
    assert_eq!(eval_forward(OpKind::Division, 1.0, -0.0), Err(AdError::DivisionByZero("division")));
    assert!(eval_forward(OpKind::Division, 1.0, 1e-300).is_ok());
    assert!(eval_forward(OpKind::Arcsin, 0.999_999, 0.0).is_ok());
    assert!(eval_forward(OpKind::Tan, -std::f64::consts::FRAC_PI_2, 0.0).is_err());
    assert!(eval_forward(OpKind::Tan, 1.5, 0.0).is_ok());
}

#[test]
fn log_base_guard() {
    assert_eq!(eval_forward(OpKind::Log, 5.0, 1.0), Err(AdError::DivisionByZero("log")));
    assert!((eval(OpKind::Log, 8.0, 2.0) - 3.0).abs() < TOL);
    // fractional bases are fine
    assert!((eval(OpKind::Log, 0.25, 0.5) - 2.0).abs() < TOL);
}

#[test]
#[should_panic(expected = "not evaluated")]
fn leaves_are_never_evaluated() {
    let _ = eval_forward(OpKind::Variable, 1.0_f64, 0.0);
}

// ══════════════════════════════════════════════
//  reverse_partials
// ══════════════════════════════════════════════

#[test]
fn unary_second_partial_is_zero() {
    for op in [OpKind::Negation, OpKind::Exp, OpKind::Sin, OpKind::Cosh, OpKind::Logistic] {
        let r = eval(op, 0.3, 0.0);
        assert_eq!(reverse_partials(op, 0.3, 0.0, r, true).1, 0.0, "{op}");
    }
}

#[test]
fn sqrt_partial_at_zero_is_inf() {
    let (d, _) = reverse_partials(OpKind::Sqrt, 0.0_f64, 0.0, 0.0, true);
    assert!(d.is_infinite());
}

#[test]
fn arcsin_partial_is_positive_arccos_negative() {
    let (ds, _) = reverse_partials(OpKind::Arcsin, 0.5_f64, 0.0, 0.5_f64.asin(), true);
    let (dc, _) = reverse_partials(OpKind::Arccos, 0.5_f64, 0.0, 0.5_f64.acos(), true);
    assert!((ds - 1.0 / 0.75_f64.sqrt()).abs() < TOL);
    assert!((ds + dc).abs() < TOL);
}

#[test]
fn power_at_zero_base() {
    // d/da a^2 at a = 0 is 0; the log term is suppressed
    let (da, db) = reverse_partials(OpKind::Power, 0.0_f64, 2.0, 0.0, true);
    assert_eq!(da, 0.0);
    assert_eq!(db, 0.0);
    // unsuppressed, 0 * ln(0) = 0 * -inf
    let (_, db) = reverse_partials(OpKind::Power, 0.0_f64, 2.0, 0.0, false);
    assert!(db.is_nan());
}

#[test]
fn hyperbolic_partials() {
    let x = 0.7_f64;
    assert!((reverse_partials(OpKind::Sinh, x, 0.0, x.sinh(), true).0 - x.cosh()).abs() < TOL);
    assert!((reverse_partials(OpKind::Cosh, x, 0.0, x.cosh(), true).0 - x.sinh()).abs() < TOL);
    let t = x.tanh();
    assert!((reverse_partials(OpKind::Tanh, x, 0.0, t, true).0 - (1.0 - t * t)).abs() < TOL);
}

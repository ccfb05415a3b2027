//! Operator kinds for expression-graph nodes.
//!
//! Each kind is one elementary operation. The [`eval_forward`] and
//! [`reverse_partials`] functions evaluate / differentiate a single kind on
//! scalar operands; the graph lifts them elementwise over [`Value`](crate::Value)s.

use crate::error::{AdError, Result};
use crate::float::Float;

/// Discriminator selecting which elementary operation (if any) a node performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpKind {
    // ── Leaves ──
    /// Named input (leaf node).
    Variable,
    /// Fixed value (leaf node).
    Constant,

    // ── Binary arithmetic ──
    Addition,
    Subtraction,
    Multiplication,
    Division,
    /// `base ^ exponent`.
    Power,
    /// `ln(operand) / ln(base)`; operand first, base second.
    Log,

    // ── Unary ──
    Negation,
    Exp,
    Sqrt,

    // ── Trig ──
    Sin,
    Cos,
    Tan,
    Arcsin,
    Arccos,
    Arctan,

    // ── Hyperbolic ──
    Sinh,
    Cosh,
    Tanh,
    /// `1 / (1 + e^-x)`.
    Logistic,
}

impl OpKind {
    /// Number of children a node of this kind owns.
    #[inline]
    pub fn arity(self) -> usize {
        match self {
            OpKind::Variable | OpKind::Constant => 0,
            OpKind::Addition
            | OpKind::Subtraction
            | OpKind::Multiplication
            | OpKind::Division
            | OpKind::Power
            | OpKind::Log => 2,
            _ => 1,
        }
    }

    #[inline]
    pub fn is_leaf(self) -> bool {
        self.arity() == 0
    }

    /// Type tag used by visualization consumers.
    pub fn label(self) -> &'static str {
        match self {
            OpKind::Variable => "Variable",
            OpKind::Constant => "Constant",
            OpKind::Addition => "Addition",
            OpKind::Subtraction => "Subtraction",
            OpKind::Multiplication => "Multiplication",
            OpKind::Division => "Division",
            OpKind::Power => "Power",
            OpKind::Log => "Log",
            OpKind::Negation => "Negation",
            OpKind::Exp => "Exp",
            OpKind::Sqrt => "Sqrt",
            OpKind::Sin => "Sin",
            OpKind::Cos => "Cos",
            OpKind::Tan => "Tan",
            OpKind::Arcsin => "Arcsin",
            OpKind::Arccos => "Arccos",
            OpKind::Arctan => "Arctan",
            OpKind::Sinh => "Sinh",
            OpKind::Cosh => "Cosh",
            OpKind::Tanh => "Tanh",
            OpKind::Logistic => "Logistic",
        }
    }
}

impl std::fmt::Display for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[inline]
fn near_zero<F: Float>(x: F) -> bool {
    x.abs() <= F::zero_tolerance()
}

/// Evaluate a single operator on scalar operands.
///
/// For binary kinds, `a` and `b` are the two operand values in child order.
/// For unary kinds, `b` is ignored.
///
/// Fails with [`AdError::DivisionByZero`] when a divisor is exactly zero, when
/// `tan`, `arcsin` or `arccos` sit on a singular point (within
/// [`Float::zero_tolerance`]), or when `log` has a zero operand or a base of one.
#[inline]
pub fn eval_forward<F: Float>(op: OpKind, a: F, b: F) -> Result<F> {
    let one = F::one();
    let r = match op {
        OpKind::Variable | OpKind::Constant => {
            // leaf values are bound, never computed
            unreachable!("Variable/Constant are not evaluated via eval_forward")
        }

        // Binary
        OpKind::Addition => a + b,
        OpKind::Subtraction => a - b,
        OpKind::Multiplication => a * b,
        OpKind::Division => {
            if b == F::zero() {
                return Err(AdError::DivisionByZero("division"));
            }
            a / b
        }
        OpKind::Power => a.powf(b),
        OpKind::Log => {
            let ln_base = b.ln();
            if a == F::zero() || ln_base == F::zero() {
                return Err(AdError::DivisionByZero("log"));
            }
            a.ln() / ln_base
        }

        // Unary
        OpKind::Negation => -a,
        OpKind::Exp => a.exp(),
        OpKind::Sqrt => a.sqrt(),

        // Trig
        OpKind::Sin => a.sin(),
        OpKind::Cos => a.cos(),
        OpKind::Tan => {
            if near_zero(a.cos()) {
                return Err(AdError::DivisionByZero("tan"));
            }
            a.tan()
        }
        OpKind::Arcsin => {
            if near_zero(one - a * a) {
                return Err(AdError::DivisionByZero("arcsin"));
            }
            a.asin()
        }
        OpKind::Arccos => {
            if near_zero(one - a * a) {
                return Err(AdError::DivisionByZero("arccos"));
            }
            a.acos()
        }
        OpKind::Arctan => a.atan(),

        // Hyperbolic
        OpKind::Sinh => a.sinh(),
        OpKind::Cosh => a.cosh(),
        OpKind::Tanh => a.tanh(),
        OpKind::Logistic => one / (one + (-a).exp()),
    };
    Ok(r)
}

/// Compute the local partial derivatives of a single operator.
///
/// Returns `(∂result/∂child0, ∂result/∂child1)`; for unary kinds the second
/// partial is `F::zero()`.
///
/// `a`, `b` are the operand values and `r` the node's own value, all from the
/// same evaluation pass.
///
/// The `ln(base)` term of `Power` is undefined for a non-positive base. With
/// `suppress_log_term` set it is reported as zero there; otherwise it is left
/// as the raw (NaN / infinite) product.
#[inline]
pub fn reverse_partials<F: Float>(op: OpKind, a: F, b: F, r: F, suppress_log_term: bool) -> (F, F) {
    let zero = F::zero();
    let one = F::one();
    match op {
        OpKind::Variable | OpKind::Constant => (zero, zero),

        // Binary
        OpKind::Addition => (one, one),
        OpKind::Subtraction => (one, -one),
        OpKind::Multiplication => (b, a),
        OpKind::Division => {
            let inv = one / b;
            (inv, -a * inv * inv)
        }
        OpKind::Power => {
            // d/da a^b = b * a^(b-1)
            // d/db a^b = a^b * ln(a)
            let da = b * a.powf(b - one);
            let db = if suppress_log_term && a <= zero {
                zero
            } else {
                r * a.ln()
            };
            (da, db)
        }
        OpKind::Log => {
            // log_b(a) = ln(a) / ln(b)
            let ln_b = b.ln();
            (one / (a * ln_b), -r / (b * ln_b))
        }

        // Unary
        OpKind::Negation => (-one, zero),
        OpKind::Exp => (r, zero),
        OpKind::Sqrt => {
            let two = one + one;
            (one / (two * r), zero)
        }

        // Trig
        OpKind::Sin => (a.cos(), zero),
        OpKind::Cos => (-a.sin(), zero),
        OpKind::Tan => {
            let c = a.cos();
            (one / (c * c), zero)
        }
        OpKind::Arcsin => (one / (one - a * a).sqrt(), zero),
        OpKind::Arccos => (-one / (one - a * a).sqrt(), zero),
        OpKind::Arctan => (one / (one + a * a), zero),

        // Hyperbolic
        OpKind::Sinh => (a.cosh(), zero),
        OpKind::Cosh => (a.sinh(), zero),
        OpKind::Tanh => (one - r * r, zero),
        OpKind::Logistic => (r * (one - r), zero),
    }
}

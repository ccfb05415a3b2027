//! Elementary functions over expressions.
//!
//! Every function builds one new operator node over its operands and
//! evaluates nothing. Each free function has a method twin on [`Expr`]
//! (`sin(&x)` is `x.sin()`).
//!
//! ```
//! use adgraph::api::{cos, exp, log, sin};
//! use adgraph::Expr;
//!
//! let a = Expr::<f64>::variable("a").unwrap();
//! let b = Expr::<f64>::variable("b").unwrap();
//! let c = Expr::<f64>::variable("c").unwrap();
//! let d = Expr::<f64>::variable("d").unwrap();
//! let y = cos(&((-&a).pow(2.0) / &c)) - 4.0 * sin(&b) * log(&(exp(&d) + 1.0), 10.0);
//! assert_eq!(y.variable_names(), vec!["a", "c", "b", "d"]);
//! ```

use crate::expr::Expr;
use crate::float::Float;
use crate::opcode::OpKind;

macro_rules! unary_fns {
    ($($(#[$doc:meta])* $name:ident => $kind:expr;)*) => {
        impl<F: Float> Expr<F> {
            $(
                $(#[$doc])*
                #[inline]
                pub fn $name(&self) -> Expr<F> {
                    Expr::op($kind, vec![self.clone()])
                }
            )*
        }

        $(
            $(#[$doc])*
            #[inline]
            pub fn $name<F: Float>(x: &Expr<F>) -> Expr<F> {
                x.$name()
            }
        )*
    };
}

unary_fns! {
    /// `e^x`.
    exp => OpKind::Exp;
    /// Square root. Negative operands give NaN.
    sqrt => OpKind::Sqrt;
    sin => OpKind::Sin;
    cos => OpKind::Cos;
    /// Fails at compute time where `cos(x)` is (numerically) zero.
    tan => OpKind::Tan;
    /// Fails at compute time at `x = ±1`.
    arcsin => OpKind::Arcsin;
    /// Fails at compute time at `x = ±1`.
    arccos => OpKind::Arccos;
    arctan => OpKind::Arctan;
    sinh => OpKind::Sinh;
    cosh => OpKind::Cosh;
    tanh => OpKind::Tanh;
    /// Standard logistic sigmoid `1 / (1 + e^-x)`.
    logistic => OpKind::Logistic;
}

impl<F: Float> Expr<F> {
    /// `self ^ exponent`. A number is wrapped as a constant.
    #[inline]
    pub fn pow(&self, exponent: impl Into<Expr<F>>) -> Expr<F> {
        Expr::op(OpKind::Power, vec![self.clone(), exponent.into()])
    }

    /// Logarithm of `self` in `base`. A number is wrapped as a constant.
    ///
    /// Fails at compute time on a zero operand or a base of one.
    #[inline]
    pub fn log(&self, base: impl Into<Expr<F>>) -> Expr<F> {
        Expr::op(OpKind::Log, vec![self.clone(), base.into()])
    }

    /// Natural logarithm: [`log`](Self::log) with a constant base `e`.
    #[inline]
    pub fn ln(&self) -> Expr<F> {
        self.log(Expr::constant(F::E()))
    }
}

/// `base ^ exponent`.
#[inline]
pub fn pow<F: Float>(base: &Expr<F>, exponent: impl Into<Expr<F>>) -> Expr<F> {
    base.pow(exponent)
}

/// Logarithm of `x` in `base`.
#[inline]
pub fn log<F: Float>(x: &Expr<F>, base: impl Into<Expr<F>>) -> Expr<F> {
    x.log(base)
}

/// Natural logarithm.
#[inline]
pub fn ln<F: Float>(x: &Expr<F>) -> Expr<F> {
    x.ln()
}

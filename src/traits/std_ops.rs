use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::expr::Expr;
use crate::float::Float;
use crate::opcode::OpKind;

// ──────────────────────────────────────────────
//  Expr<F> ⊕ Expr<F>, owned and borrowed
// ──────────────────────────────────────────────

macro_rules! impl_expr_binop {
    ($trait:ident, $method:ident, $kind:expr) => {
        impl<F: Float> $trait for Expr<F> {
            type Output = Expr<F>;
            #[inline]
            fn $method(self, rhs: Expr<F>) -> Expr<F> {
                Expr::op($kind, vec![self, rhs])
            }
        }

        impl<F: Float> $trait<&Expr<F>> for Expr<F> {
            type Output = Expr<F>;
            #[inline]
            fn $method(self, rhs: &Expr<F>) -> Expr<F> {
                Expr::op($kind, vec![self, rhs.clone()])
            }
        }

        impl<F: Float> $trait<Expr<F>> for &Expr<F> {
            type Output = Expr<F>;
            #[inline]
            fn $method(self, rhs: Expr<F>) -> Expr<F> {
                Expr::op($kind, vec![self.clone(), rhs])
            }
        }

        impl<F: Float> $trait<&Expr<F>> for &Expr<F> {
            type Output = Expr<F>;
            #[inline]
            fn $method(self, rhs: &Expr<F>) -> Expr<F> {
                Expr::op($kind, vec![self.clone(), rhs.clone()])
            }
        }
    };
}

impl_expr_binop!(Add, add, OpKind::Addition);
impl_expr_binop!(Sub, sub, OpKind::Subtraction);
impl_expr_binop!(Mul, mul, OpKind::Multiplication);
impl_expr_binop!(Div, div, OpKind::Division);

impl<F: Float> Neg for Expr<F> {
    type Output = Expr<F>;
    #[inline]
    fn neg(self) -> Expr<F> {
        Expr::op(OpKind::Negation, vec![self])
    }
}

impl<F: Float> Neg for &Expr<F> {
    type Output = Expr<F>;
    #[inline]
    fn neg(self) -> Expr<F> {
        Expr::op(OpKind::Negation, vec![self.clone()])
    }
}

// Mixed ops: a primitive float on either side becomes a Constant node.
// Generated for f32 and f64.
macro_rules! impl_expr_scalar_ops {
    ($f:ty; $($trait:ident, $method:ident, $kind:expr);* $(;)?) => {
        $(
            impl $trait<$f> for Expr<$f> {
                type Output = Expr<$f>;
                #[inline]
                fn $method(self, rhs: $f) -> Expr<$f> {
                    Expr::op($kind, vec![self, Expr::constant(rhs)])
                }
            }

            impl $trait<$f> for &Expr<$f> {
                type Output = Expr<$f>;
                #[inline]
                fn $method(self, rhs: $f) -> Expr<$f> {
                    Expr::op($kind, vec![self.clone(), Expr::constant(rhs)])
                }
            }

            impl $trait<Expr<$f>> for $f {
                type Output = Expr<$f>;
                #[inline]
                fn $method(self, rhs: Expr<$f>) -> Expr<$f> {
                    Expr::op($kind, vec![Expr::constant(self), rhs])
                }
            }

            impl $trait<&Expr<$f>> for $f {
                type Output = Expr<$f>;
                #[inline]
                fn $method(self, rhs: &Expr<$f>) -> Expr<$f> {
                    Expr::op($kind, vec![Expr::constant(self), rhs.clone()])
                }
            }
        )*
    };
}

macro_rules! impl_expr_scalar_all {
    ($($f:ty),*) => {
        $(
            impl_expr_scalar_ops!($f;
                Add, add, OpKind::Addition;
                Sub, sub, OpKind::Subtraction;
                Mul, mul, OpKind::Multiplication;
                Div, div, OpKind::Division;
            );
        )*
    };
}

impl_expr_scalar_all!(f32, f64);

//! Numeric node values: a scalar or a dense vector, combined elementwise.
//!
//! Binary operations broadcast a scalar against a vector; two vectors must
//! have the same length.

use std::fmt::{self, Display};

use crate::error::{AdError, Result};
use crate::float::Float;

/// Shape of a [`Value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    Scalar,
    /// Dense vector of the given length (never zero).
    Vector(usize),
}

impl Shape {
    /// Number of elements.
    #[inline]
    pub fn len(self) -> usize {
        match self {
            Shape::Scalar => 1,
            Shape::Vector(n) => n,
        }
    }

    /// Elementwise broadcast of two shapes.
    pub fn broadcast(self, other: Shape) -> Result<Shape> {
        match (self, other) {
            (Shape::Scalar, s) | (s, Shape::Scalar) => Ok(s),
            (Shape::Vector(n), Shape::Vector(m)) if n == m => Ok(Shape::Vector(n)),
            (a, b) => Err(AdError::TypeMismatch(format!(
                "cannot broadcast {a} against {b}"
            ))),
        }
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Scalar => write!(f, "scalar"),
            Shape::Vector(n) => write!(f, "vector[{n}]"),
        }
    }
}

/// A scalar or fixed-length vector of `F`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value<F: Float> {
    Scalar(F),
    Vector(Vec<F>),
}

impl<F: Float> Value<F> {
    /// Build a value of `shape` from a per-element function.
    #[inline]
    pub fn from_fn(shape: Shape, mut f: impl FnMut(usize) -> F) -> Self {
        match shape {
            Shape::Scalar => Value::Scalar(f(0)),
            Shape::Vector(n) => Value::Vector((0..n).map(f).collect()),
        }
    }

    /// Fallible [`from_fn`](Self::from_fn); stops at the first error.
    pub fn try_from_fn(shape: Shape, mut f: impl FnMut(usize) -> Result<F>) -> Result<Self> {
        match shape {
            Shape::Scalar => Ok(Value::Scalar(f(0)?)),
            Shape::Vector(n) => (0..n).map(f).collect::<Result<Vec<F>>>().map(Value::Vector),
        }
    }

    /// All-zero value of `shape` (the additive identity).
    pub fn zeros(shape: Shape) -> Self {
        Self::from_fn(shape, |_| F::zero())
    }

    /// All-one value of `shape`.
    pub fn ones(shape: Shape) -> Self {
        Self::from_fn(shape, |_| F::one())
    }

    /// Vector of length `len` with a single one at `index`.
    pub fn one_hot(len: usize, index: usize) -> Self {
        Value::Vector((0..len).map(|i| if i == index { F::one() } else { F::zero() }).collect())
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        match self {
            Value::Scalar(_) => Shape::Scalar,
            Value::Vector(v) => Shape::Vector(v.len()),
        }
    }

    /// Number of elements (1 for a scalar).
    #[inline]
    pub fn len(&self) -> usize {
        self.shape().len()
    }

    #[inline]
    pub fn is_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }

    /// The scalar, if this is one.
    #[inline]
    pub fn as_scalar(&self) -> Option<F> {
        match self {
            Value::Scalar(x) => Some(*x),
            Value::Vector(_) => None,
        }
    }

    /// Elements as a slice (a scalar is a one-element slice).
    #[inline]
    pub fn as_slice(&self) -> &[F] {
        match self {
            Value::Scalar(x) => std::slice::from_ref(x),
            Value::Vector(v) => v,
        }
    }

    /// Element `i` under broadcasting: a scalar answers every index.
    #[inline]
    pub fn get(&self, i: usize) -> F {
        match self {
            Value::Scalar(x) => *x,
            Value::Vector(v) => v[i],
        }
    }

    /// True if any element satisfies `pred`.
    pub fn any(&self, pred: impl Fn(F) -> bool) -> bool {
        self.as_slice().iter().any(|&x| pred(x))
    }

    pub fn map(&self, f: impl Fn(F) -> F) -> Self {
        Self::from_fn(self.shape(), |i| f(self.get(i)))
    }

    pub fn try_map(&self, f: impl Fn(F) -> Result<F>) -> Result<Self> {
        Self::try_from_fn(self.shape(), |i| f(self.get(i)))
    }

    /// Elementwise binary map with broadcasting.
    pub fn zip_map(&self, other: &Self, f: impl Fn(F, F) -> F) -> Result<Self> {
        let shape = self.shape().broadcast(other.shape())?;
        Ok(Self::from_fn(shape, |i| f(self.get(i), other.get(i))))
    }

    /// Fallible elementwise binary map with broadcasting.
    pub fn try_zip_map(&self, other: &Self, f: impl Fn(F, F) -> Result<F>) -> Result<Self> {
        let shape = self.shape().broadcast(other.shape())?;
        Self::try_from_fn(shape, |i| f(self.get(i), other.get(i)))
    }

    pub fn try_add(&self, other: &Self) -> Result<Self> {
        self.zip_map(other, |a, b| a + b)
    }

    pub fn try_mul(&self, other: &Self) -> Result<Self> {
        self.zip_map(other, |a, b| a * b)
    }

    /// Repeat a scalar (or check a vector) to match `shape`.
    pub fn broadcast_to(&self, shape: Shape) -> Result<Self> {
        let target = self.shape().broadcast(shape)?;
        Ok(Self::from_fn(target, |i| self.get(i)))
    }
}

impl<F: Float> Display for Value<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(x) => write!(f, "{x}"),
            Value::Vector(v) => {
                write!(f, "[")?;
                for (i, x) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{x}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl<F: Float> From<F> for Value<F> {
    #[inline]
    fn from(x: F) -> Self {
        Value::Scalar(x)
    }
}

impl<F: Float> From<Vec<F>> for Value<F> {
    #[inline]
    fn from(v: Vec<F>) -> Self {
        Value::Vector(v)
    }
}

impl<F: Float> From<&[F]> for Value<F> {
    #[inline]
    fn from(v: &[F]) -> Self {
        Value::Vector(v.to_vec())
    }
}

impl<F: Float, const N: usize> From<[F; N]> for Value<F> {
    #[inline]
    fn from(v: [F; N]) -> Self {
        Value::Vector(v.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_broadcasts_against_vector() {
        let s = Value::Scalar(2.0_f64);
        let v = Value::Vector(vec![1.0, 2.0, 3.0]);
        assert_eq!(s.try_mul(&v).unwrap(), Value::Vector(vec![2.0, 4.0, 6.0]));
        assert_eq!(v.try_add(&s).unwrap(), Value::Vector(vec![3.0, 4.0, 5.0]));
    }

    #[test]
    fn mismatched_vectors_are_rejected() {
        let a = Value::Vector(vec![1.0_f64, 2.0]);
        let b = Value::Vector(vec![1.0_f64, 2.0, 3.0]);
        assert!(matches!(a.try_add(&b), Err(AdError::TypeMismatch(_))));
    }

    #[test]
    fn one_hot_and_ones() {
        assert_eq!(Value::<f64>::one_hot(3, 1), Value::Vector(vec![0.0, 1.0, 0.0]));
        assert_eq!(Value::<f64>::ones(Shape::Scalar), Value::Scalar(1.0));
        assert_eq!(Value::<f64>::zeros(Shape::Vector(2)), Value::Vector(vec![0.0, 0.0]));
    }

    #[test]
    fn broadcast_to_repeats_scalar() {
        let s = Value::Scalar(1.5_f64);
        assert_eq!(
            s.broadcast_to(Shape::Vector(2)).unwrap(),
            Value::Vector(vec![1.5, 1.5])
        );
        assert_eq!(s.broadcast_to(Shape::Scalar).unwrap(), s);
    }

    #[test]
    fn try_map_stops_at_first_error() {
        let v = Value::Vector(vec![1.0_f64, 0.0, 2.0]);
        let r = v.try_map(|x| {
            if x == 0.0 {
                Err(AdError::DivisionByZero("test"))
            } else {
                Ok(1.0 / x)
            }
        });
        assert_eq!(r, Err(AdError::DivisionByZero("test")));
    }

    #[test]
    fn display() {
        assert_eq!(Value::Vector(vec![1.0_f64, 2.5]).to_string(), "[1, 2.5]");
        assert_eq!(Value::Scalar(3.0_f64).to_string(), "3");
        assert_eq!(Shape::Vector(4).to_string(), "vector[4]");
    }
}

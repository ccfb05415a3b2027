use std::fmt::{Debug, Display};

use num_traits::{Float as NumFloat, FloatConst, FromPrimitive};

/// Marker trait for base floating-point types (`f32`, `f64`).
///
/// Bundles the numeric and utility traits needed throughout adgraph.
/// Only primitive float types implement this; graph handles do not.
pub trait Float:
    NumFloat + FloatConst + FromPrimitive + Copy + Default + Debug + Display + 'static
{
    /// Magnitude at or below which a denominator counts as zero.
    ///
    /// Used by the `tan`, `arcsin` and `arccos` guards, where the exact
    /// singular point is not representable (`cos(π/2)` is about `6e-17` in `f64`).
    #[inline]
    fn zero_tolerance() -> Self {
        Self::epsilon()
    }
}

impl Float for f32 {}
impl Float for f64 {}

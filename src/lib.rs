//! Automatic differentiation over explicit expression graphs.
//!
//! Build an expression from named [`Expr::variable`]s, constants, the
//! `std::ops` arithmetic operators and the elementary functions in [`api`],
//! then [`compute`](Expr::compute) it at concrete inputs. One call evaluates
//! every node and fills in partial derivatives with respect to every free
//! variable, in forward or reverse mode (see [`Config`]).
//!
//! ```
//! use adgraph::api::{cos, exp, log, sin};
//! use adgraph::{Config, Expr, Mode};
//!
//! let [a, b, c, d] = ["a", "b", "c", "d"].map(|n| Expr::<f64>::variable(n).unwrap());
//! let y = cos(&((-&a).pow(2.0) / &c)) - 4.0 * sin(&b) * log(&(exp(&d) + 1.0), 10.0);
//!
//! let inputs = [("a", 2.0), ("b", 2.0), ("c", 2.0), ("d", 2.0)];
//! let fwd = y.compute(inputs).unwrap().derivative().unwrap();
//! let rev = y
//!     .compute_with(inputs, &Config::default().with_mode(Mode::Reverse))
//!     .unwrap()
//!     .derivative()
//!     .unwrap();
//! for name in ["a", "b", "c", "d"] {
//!     let (f, r) = (fwd.scalar(name).unwrap(), rev.scalar(name).unwrap());
//!     assert!((f - r).abs() < 1e-12);
//! }
//! ```

pub mod api;
pub mod config;
pub mod derivatives;
pub mod dot;
pub mod error;
mod eval;
pub mod expr;
pub mod float;
mod forward;
pub mod opcode;
mod reverse;
mod traits;
pub mod value;

pub use config::{Config, LogTermPolicy, Mode};
pub use derivatives::Derivatives;
pub use dot::{GraphStats, TraceRow};
pub use error::{AdError, Result};
pub use expr::{Expr, NodeId};
pub use float::Float;
pub use opcode::OpKind;
pub use value::{Shape, Value};

/// Expression handle over `f64`.
pub type Expr64 = Expr<f64>;
/// Expression handle over `f32`.
pub type Expr32 = Expr<f32>;
/// Node value over `f64`.
pub type Value64 = Value<f64>;
/// Node value over `f32`.
pub type Value32 = Value<f32>;

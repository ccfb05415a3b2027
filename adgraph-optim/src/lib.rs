//! Numerical routines built on [`adgraph`] expressions.
//!
//! ```
//! use adgraph::Expr;
//! use adgraph_optim::{newton_root, NewtonConfig};
//!
//! let x = Expr::<f64>::variable("x").unwrap();
//! let f = &x * &x - 2.0;
//! let r = newton_root(&f, "x", 1.0, &NewtonConfig::default()).unwrap();
//! assert!(r.converged());
//! assert!((r.root - 2.0_f64.sqrt()).abs() < 1e-3);
//! ```

pub mod result;
pub mod solvers;

pub use result::{RootResult, TerminationReason};
pub use solvers::newton::{newton_root, NewtonConfig};

use adgraph::{AdError, Config, Expr, Float};

use crate::result::{RootResult, TerminationReason};

/// Configuration for the Newton root finder.
#[derive(Debug, Clone)]
pub struct NewtonConfig<F> {
    /// Stop when `|x_{k+1} - x_k| < tol` (default: 1e-3).
    pub tol: F,
    /// Maximum number of steps (default: 50).
    pub max_iter: usize,
    /// Damping factor on each step (default: 1).
    pub alpha: F,
    /// Passed to every [`Expr::compute_with`] call.
    pub config: Config,
}

impl Default for NewtonConfig<f64> {
    fn default() -> Self {
        NewtonConfig {
            tol: 1e-3,
            max_iter: 50,
            alpha: 1.0,
            config: Config::default(),
        }
    }
}

impl Default for NewtonConfig<f32> {
    fn default() -> Self {
        NewtonConfig {
            tol: 1e-3,
            max_iter: 50,
            alpha: 1.0,
            config: Config::default(),
        }
    }
}

/// Find a root of the scalar function `f` of the single variable `var`,
/// starting from `x0`.
///
/// Each step recomputes `f` and `f'` at the current iterate and moves to
/// `x - alpha * f(x) / f'(x)`. Errors from the compute calls propagate;
/// `f` must have exactly one free variable, named `var`.
pub fn newton_root<F: Float>(
    f: &Expr<F>,
    var: &str,
    x0: F,
    config: &NewtonConfig<F>,
) -> Result<RootResult<F>, AdError> {
    let mut x = x0;

    for iter in 0..config.max_iter {
        let node = f.compute_with([(var, x)], &config.config)?;
        let fx = node.value()?;
        let Some(value) = fx.as_scalar() else {
            return Err(AdError::TypeMismatch(format!(
                "root finding needs a scalar function, got a {} value",
                fx.shape()
            )));
        };
        let slope = node.derivative()?.scalar(var).unwrap_or(F::zero());

        if slope == F::zero() || !slope.is_finite() {
            log::debug!("newton: derivative {slope} at x = {x}, stopping after {iter} step(s)");
            return Ok(RootResult {
                root: x,
                iterations: iter,
                termination: TerminationReason::ZeroDerivative,
            });
        }

        let next = x - config.alpha * value / slope;
        log::trace!("newton step {iter}: x = {x}, f = {value}, f' = {slope}, next = {next}");

        if (next - x).abs() < config.tol {
            return Ok(RootResult {
                root: next,
                iterations: iter + 1,
                termination: TerminationReason::Converged,
            });
        }
        x = next;
    }

    Ok(RootResult {
        root: x,
        iterations: config.max_iter,
        termination: TerminationReason::MaxIterations,
    })
}

//! Differentiation strategy and derivative-domain policy.
//!
//! A [`Config`] is passed explicitly to [`Expr::compute_with`](crate::Expr::compute_with);
//! there is no process-wide mode flag.

use std::fmt;
use std::str::FromStr;

use crate::error::AdError;

/// Environment variable read by [`Config::from_env`].
pub const MODE_ENV_VAR: &str = "ADGRAPH_MODE";

/// Which differentiator [`compute`](crate::Expr::compute) runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// One tangent sweep per variable (per vector component).
    #[default]
    Forward,
    /// One adjoint sweep for all variables.
    Reverse,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Forward => write!(f, "forward"),
            Mode::Reverse => write!(f, "reverse"),
        }
    }
}

impl FromStr for Mode {
    type Err = AdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" => Ok(Mode::Forward),
            "reverse" => Ok(Mode::Reverse),
            other => Err(AdError::InvalidArgument(format!(
                "mode must be \"forward\" or \"reverse\", got {other:?}"
            ))),
        }
    }
}

/// How the `ln(base)` term of a `Power` derivative is treated when the base
/// is non-positive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogTermPolicy {
    /// The term contributes zero.
    #[default]
    Suppress,
    /// Fail with [`AdError::DomainError`] when the exponent depends on a variable.
    Error,
}

/// Options for a single compute call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Differentiation strategy (default: forward).
    pub mode: Mode,
    /// Power-rule log term policy (default: suppress).
    pub log_term: LogTermPolicy,
}

impl Config {
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_log_term(mut self, policy: LogTermPolicy) -> Self {
        self.log_term = policy;
        self
    }

    /// Select the strategy for later compute calls made with this config.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// The currently selected strategy.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Default config with the mode taken from `ADGRAPH_MODE`, if set.
    pub fn from_env() -> Result<Self, AdError> {
        match std::env::var(MODE_ENV_VAR) {
            Ok(raw) => {
                let mode = raw.parse()?;
                log::debug!("{MODE_ENV_VAR}={raw:?} selects {mode} mode");
                Ok(Config::default().with_mode(mode))
            }
            Err(std::env::VarError::NotPresent) => Ok(Config::default()),
            Err(e) => Err(AdError::InvalidArgument(format!("{MODE_ENV_VAR}: {e}"))),
        }
    }
}

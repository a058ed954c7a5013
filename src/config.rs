//! Container options.
//!
//! Options are read once, before the binder is built, from code, the
//! environment, or (with the `config` feature) a JSON document.

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{DiError, DiResult};

/// Environment variable overriding [`ContainerOptions::max_depth`].
pub const ENV_MAX_DEPTH: &str = "GRAFT_DI_MAX_DEPTH";
/// Environment variable overriding [`ContainerOptions::validate_on_build`].
pub const ENV_VALIDATE_ON_BUILD: &str = "GRAFT_DI_VALIDATE_ON_BUILD";

const DEFAULT_MAX_DEPTH: usize = 256;

/// Tuning knobs for a container.
///
/// # Examples
///
/// ```rust
/// use graft_di::{Binder, ContainerOptions};
///
/// let options = ContainerOptions::default()
///     .with_max_depth(64)
///     .with_validate_on_build(true);
///
/// let container = Binder::with_options(options).build().unwrap();
/// assert_eq!(container.options().max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerOptions {
    /// Deepest dependency chain a single resolution may walk.
    ///
    /// Every level recurses on the resolving thread's stack, a few KB per
    /// level in debug builds. The default of 256 fits a spawned thread's
    /// 2 MB stack; raise it only together with the stack size of the
    /// threads that resolve.
    pub max_depth: usize,
    /// Run [`Container::validate`](crate::Container::validate) inside
    /// [`Binder::build`](crate::Binder::build) and fail on the first issue.
    pub validate_on_build: bool,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            validate_on_build: false,
        }
    }
}

impl ContainerOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_validate_on_build(mut self, validate: bool) -> Self {
        self.validate_on_build = validate;
        self
    }

    /// Defaults overridden by `GRAFT_DI_*` environment variables.
    pub fn from_env() -> DiResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable name.
    pub fn from_lookup<F>(lookup: F) -> DiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();
        if let Some(raw) = lookup(ENV_MAX_DEPTH) {
            options.max_depth = raw
                .trim()
                .parse()
                .map_err(|_| DiError::InvalidOptions(format!("{ENV_MAX_DEPTH}={raw}")))?;
        }
        if let Some(raw) = lookup(ENV_VALIDATE_ON_BUILD) {
            options.validate_on_build = parse_flag(&raw)
                .ok_or_else(|| DiError::InvalidOptions(format!("{ENV_VALIDATE_ON_BUILD}={raw}")))?;
        }
        options.check()
    }

    /// Parses options from JSON; missing fields keep their defaults.
    #[cfg(feature = "config")]
    pub fn from_json_str(json: &str) -> DiResult<Self> {
        let options: Self =
            serde_json::from_str(json).map_err(|e| DiError::InvalidOptions(e.to_string()))?;
        options.check()
    }

    pub(crate) fn check(self) -> DiResult<Self> {
        if self.max_depth == 0 {
            return Err(DiError::InvalidOptions("max_depth must be > 0".to_string()));
        }
        Ok(self)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

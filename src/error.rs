//! # Error Types
//!
//! Routing distinguishes three outcomes that are easy to conflate:
//!
//! - **[`ConfigurationError`]** - fatal, raised while the routing table is being
//!   built (bad token pattern, bad regex, unreadable or malformed route file).
//!   Configuration must abort on these; they are never swallowed.
//! - **No match** - not an error at all. [`Route::matches`](crate::route::Route::matches)
//!   and [`RouteCollection::query`](crate::router::RouteCollection::query) return
//!   `None`, so the per-request path never allocates an error.
//! - **[`LookupError`]** - a route name that was never registered was asked for
//!   by [`RouteCollection::get_route`](crate::router::RouteCollection::get_route).

use std::fmt;
use std::path::PathBuf;

/// Error raised while building routes or loading route definitions.
#[derive(Debug)]
pub enum ConfigurationError {
    /// The route file could not be opened or read.
    Io {
        /// Path of the route file
        path: PathBuf,
        /// Underlying I/O failure
        source: std::io::Error,
    },
    /// The route file was read but its contents are not valid for its format.
    Parse {
        /// Path of the route file
        path: PathBuf,
        /// Human readable reason, including a line number where known
        message: String,
    },
    /// A token pattern is malformed (unbalanced or nested optional groups, ...).
    Pattern {
        /// The offending token pattern
        pattern: String,
        /// Why it was rejected
        reason: String,
    },
    /// A raw or generated regular expression failed to compile.
    Regex {
        /// The expression text handed to the regex engine
        expression: String,
        /// Underlying regex error
        source: regex::Error,
    },
    /// A per-parameter requirement is not a valid regular expression.
    Requirement {
        /// Name of the constrained parameter
        parameter: String,
        /// Underlying regex error
        source: regex::Error,
    },
}

impl ConfigurationError {
    pub(crate) fn pattern(pattern: &str, reason: impl Into<String>) -> Self {
        ConfigurationError::Pattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigurationError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::Io { path, source } => {
                write!(f, "cannot read route file '{}': {}", path.display(), source)
            }
            ConfigurationError::Parse { path, message } => {
                write!(f, "invalid route file '{}': {}", path.display(), message)
            }
            ConfigurationError::Pattern { pattern, reason } => {
                write!(f, "invalid route pattern '{}': {}", pattern, reason)
            }
            ConfigurationError::Regex { expression, source } => {
                write!(f, "invalid route expression '{}': {}", expression, source)
            }
            ConfigurationError::Requirement { parameter, source } => {
                write!(
                    f,
                    "invalid requirement for parameter '{}': {}",
                    parameter, source
                )
            }
        }
    }
}

impl std::error::Error for ConfigurationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigurationError::Io { source, .. } => Some(source),
            ConfigurationError::Regex { source, .. } => Some(source),
            ConfigurationError::Requirement { source, .. } => Some(source),
            ConfigurationError::Parse { .. } | ConfigurationError::Pattern { .. } => None,
        }
    }
}

/// A route name was looked up but never registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupError {
    /// The unknown route name
    pub name: String,
}

impl LookupError {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no route registered under the name '{}'", self.name)
    }
}

impl std::error::Error for LookupError {}

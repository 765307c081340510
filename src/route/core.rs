use super::params::Params;
use crate::error::ConfigurationError;
use crate::pattern::{self, CompiledExpression};
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use tracing::{trace, warn};

/// Caller-supplied matcher: returns the captured parameters, or `None` for no match.
pub type Predicate = Arc<dyn Fn(&str) -> Option<Params> + Send + Sync>;

/// How a [`Route`] decides whether a subject matches.
#[derive(Clone)]
pub enum Matcher {
    /// Compiled token pattern; supports reverse generation
    Compiled(CompiledExpression),
    /// Raw regular expression supplied by the caller, used verbatim
    Raw(Regex),
    /// Arbitrary closure
    Predicate(Predicate),
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Compiled(expr) => f.debug_tuple("Compiled").field(expr).finish(),
            Matcher::Raw(regex) => f.debug_tuple("Raw").field(&regex.as_str()).finish(),
            Matcher::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// A single routable entry: a matcher, default values and optional
/// per-parameter constraints.
///
/// Routes are built once during configuration. Builder methods consume `self`;
/// nothing mutates a route afterwards, so `matches` and `reverse` are pure
/// functions of their input and the construction-time state.
#[derive(Clone, Debug)]
pub struct Route {
    matcher: Matcher,
    defaults: Params,
    requirements: Vec<(String, Regex)>,
}

impl Route {
    /// Build a route from a token pattern.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the pattern is malformed.
    pub fn compile(pattern: &str) -> Result<Self, ConfigurationError> {
        Ok(Self::from_matcher(Matcher::Compiled(pattern::compile(pattern)?)))
    }

    /// Build a route from a raw regular expression. Named groups become
    /// parameters. Raw routes cannot be reversed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Regex`] if the expression does not compile.
    pub fn regex(expression: &str) -> Result<Self, ConfigurationError> {
        let regex = Regex::new(expression).map_err(|source| ConfigurationError::Regex {
            expression: expression.to_string(),
            source,
        })?;
        Ok(Self::from_matcher(Matcher::Raw(regex)))
    }

    /// Build a route from a closure.
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> Option<Params> + Send + Sync + 'static,
    {
        Self::from_matcher(Matcher::Predicate(Arc::new(predicate)))
    }

    fn from_matcher(matcher: Matcher) -> Self {
        Self {
            matcher,
            defaults: Params::new(),
            requirements: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_defaults<I, K, V>(mut self, defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.defaults.extend(defaults);
        self
    }

    /// Constrain a parameter. The constraint must match the whole captured value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Requirement`] if `constraint` is not a valid regex.
    pub fn with_requirement(
        mut self,
        name: impl Into<String>,
        constraint: &str,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        let regex = Regex::new(&format!("^(?:{constraint})$")).map_err(|source| {
            ConfigurationError::Requirement {
                parameter: name.clone(),
                source,
            }
        })?;
        self.requirements.retain(|(existing, _)| *existing != name);
        self.requirements.push((name, regex));
        Ok(self)
    }

    #[must_use]
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// The compiled token expression, for pattern routes.
    #[must_use]
    pub fn expression(&self) -> Option<&CompiledExpression> {
        match &self.matcher {
            Matcher::Compiled(expr) => Some(expr),
            Matcher::Raw(_) | Matcher::Predicate(_) => None,
        }
    }

    /// The template used by [`Route::reverse`], if any.
    #[must_use]
    pub fn reverse_template(&self) -> Option<&str> {
        self.expression().map(CompiledExpression::pattern)
    }

    #[must_use]
    pub fn defaults(&self) -> &Params {
        &self.defaults
    }

    /// Anchored constraint for `name`, if one was set.
    #[must_use]
    pub fn requirement(&self, name: &str) -> Option<&Regex> {
        self.requirements
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, r)| r)
    }

    /// Match `subject` against this route.
    ///
    /// Returns `None` when the subject does not match or a captured value fails its
    /// requirement. Otherwise returns the defaults overlaid with every non-blank
    /// named capture; a blank or absent optional capture never erases a default.
    #[must_use]
    pub fn matches(&self, subject: &str) -> Option<Params> {
        let captured = match &self.matcher {
            Matcher::Compiled(expr) => named_captures(expr.regex(), subject)?,
            Matcher::Raw(regex) => named_captures(regex, subject)?,
            Matcher::Predicate(predicate) => predicate(subject)?,
        };

        let mut params = self.defaults.clone();
        for (name, value) in captured {
            if value.trim().is_empty() {
                continue;
            }
            if let Some(requirement) = self.requirement(&name) {
                if !requirement.is_match(&value) {
                    trace!(
                        subject = %subject,
                        parameter = %name,
                        value = %value,
                        "Requirement rejected match"
                    );
                    return None;
                }
            }
            params.insert(name, value);
        }
        Some(params)
    }

    /// Generate a path from this route.
    ///
    /// Placeholders are filled from `params`, falling back to the route defaults.
    /// Blank values in `params` count as absent, as blank captures do in
    /// [`Route::matches`].
    /// Unresolved required placeholders stay in the output as `:name`. Routes
    /// without a reverse template (raw regex, predicate) return an empty string.
    #[must_use]
    pub fn reverse(&self, params: &Params) -> String {
        let Matcher::Compiled(expr) = &self.matcher else {
            return String::new();
        };
        let (path, unresolved) = expr.render(|name| {
            params
                .get(name)
                .filter(|value| !value.trim().is_empty())
                .or_else(|| self.defaults.get(name))
        });
        if !unresolved.is_empty() {
            warn!(
                pattern = %expr.pattern(),
                unresolved = ?unresolved,
                "Reverse generation left placeholders unresolved"
            );
        }
        path
    }
}

fn named_captures(regex: &Regex, subject: &str) -> Option<Params> {
    let caps = regex.captures(subject)?;
    // numbered groups (including the suffix group) have no name and are dropped
    Some(
        regex
            .capture_names()
            .flatten()
            .filter_map(|name| caps.name(name).map(|m| (name, m.as_str())))
            .collect(),
    )
}

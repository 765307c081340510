//! Router core module - hot path for subject routing.
//!
//! `query` runs once per request. It walks routes in registration order and
//! stops at the first match; no regex is compiled and nothing is mutated here.

use crate::error::{ConfigurationError, LookupError};
use crate::provider::RouteProvider;
use crate::route::{Params, Route};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Matching slower than this is logged as a warning.
const SLOW_MATCH_THRESHOLD: Duration = Duration::from_millis(1);

/// Result of successfully querying a [`RouteCollection`].
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// Registry name of the matched route
    pub name: String,
    /// The matched route (shared with the collection)
    pub route: Arc<Route>,
    /// Defaults overlaid with captured parameters
    pub params: Params,
}

impl RouteMatch {
    /// Get a parameter by name.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }
}

/// Ordered, named registry of routes.
///
/// Registration order is matching priority. Re-registering an existing name
/// silently replaces the route but keeps its original priority slot; removing a
/// route never reorders the others.
///
/// Cloning is cheap: routes are shared through `Arc`.
#[derive(Debug, Clone, Default)]
pub struct RouteCollection {
    routes: HashMap<String, Arc<Route>>,
    order: Vec<String>,
}

impl RouteCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `route` under `name`, replacing any previous route of that name.
    pub fn set_route(&mut self, name: impl Into<String>, route: impl Into<Arc<Route>>) {
        let name = name.into();
        let route = route.into();
        if self.routes.insert(name.clone(), route).is_some() {
            debug!(route = %name, "Replaced existing route, priority unchanged");
        } else {
            debug!(route = %name, priority = self.order.len(), "Registered route");
            self.order.push(name);
        }
    }

    /// Look up a route by name.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if no route is registered under `name`.
    pub fn get_route(&self, name: &str) -> Result<&Arc<Route>, LookupError> {
        self.routes.get(name).ok_or_else(|| LookupError::new(name))
    }

    #[must_use]
    pub fn has_route(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    /// Remove a route. Removing an unknown name is a no-op.
    pub fn remove_route(&mut self, name: &str) {
        if self.routes.remove(name).is_some() {
            self.order.retain(|n| n != name);
        }
    }

    /// Remove every route.
    pub fn remove_routes(&mut self) {
        self.routes.clear();
        self.order.clear();
    }

    /// Register every route a provider yields, in provider order.
    ///
    /// # Errors
    ///
    /// Propagates the provider's [`ConfigurationError`]; nothing is registered
    /// when the provider fails.
    pub fn register<P: RouteProvider + ?Sized>(
        &mut self,
        provider: &P,
    ) -> Result<usize, ConfigurationError> {
        provider.register(self)
    }

    /// Build a new collection from a single provider.
    ///
    /// # Errors
    ///
    /// Propagates the provider's [`ConfigurationError`].
    pub fn from_provider<P: RouteProvider + ?Sized>(provider: &P) -> Result<Self, ConfigurationError> {
        let mut routes = Self::new();
        provider.register(&mut routes)?;
        Ok(routes)
    }

    /// Route names in priority order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// `(name, route)` pairs in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<Route>)> {
        self.order
            .iter()
            .filter_map(|name| self.routes.get(name).map(|r| (name.as_str(), r)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Match `subject` against every route in priority order.
    ///
    /// Returns the first match, or `None` if no route matches. What to do about
    /// a miss (404, usage text, ...) is up to the caller.
    #[must_use]
    pub fn query(&self, subject: &str) -> Option<RouteMatch> {
        let match_start = Instant::now();

        let found = self.iter().find_map(|(name, route)| {
            route.matches(subject).map(|params| RouteMatch {
                name: name.to_string(),
                route: Arc::clone(route),
                params,
            })
        });

        let match_duration = match_start.elapsed();
        if match_duration > SLOW_MATCH_THRESHOLD {
            warn!(
                subject = %subject,
                routes_count = self.len(),
                duration_us = match_duration.as_micros(),
                "Slow route matching detected"
            );
        }

        match &found {
            Some(m) => debug!(
                subject = %subject,
                route = %m.name,
                params = ?m.params,
                duration_us = match_duration.as_micros(),
                "Route matched"
            ),
            None => debug!(
                subject = %subject,
                duration_us = match_duration.as_micros(),
                "No route matched"
            ),
        }
        found
    }

    /// Generate a path from the named route.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if no route is registered under `name`.
    pub fn reverse(&self, name: &str, params: &Params) -> Result<String, LookupError> {
        Ok(self.get_route(name)?.reverse(params))
    }

    /// Log a summary of the routing table.
    pub fn log_summary(&self) {
        let routes_summary: Vec<String> = self
            .iter()
            .take(10)
            .map(|(name, route)| match route.reverse_template() {
                Some(pattern) => format!("{name} => {pattern}"),
                None => name.to_string(),
            })
            .collect();
        info!(
            routes_count = self.len(),
            routes_summary = ?routes_summary,
            "Routing table loaded"
        );
    }
}

use crate::error::LookupError;
use crate::provider::DEFAULT_CONTROLLER_KEY;
use crate::route::Params;
use crate::router::{RouteCollection, RouteMatch};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Handler invoked for a matched subject.
pub type Handler<R> = Arc<dyn Fn(&RequestContext<'_>) -> R + Send + Sync>;

/// Everything a handler gets to see about the current dispatch.
#[derive(Debug)]
pub struct RequestContext<'a> {
    /// The subject that was routed
    pub subject: &'a str,
    /// Route name and parameters
    pub route_match: RouteMatch,
    /// The collection the match came from
    pub routes: &'a RouteCollection,
}

impl RequestContext<'_> {
    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.route_match.get(name)
    }

    #[must_use]
    pub fn params(&self) -> &Params {
        &self.route_match.params
    }

    /// Name of the route that matched.
    #[must_use]
    pub fn route_name(&self) -> &str {
        &self.route_match.name
    }

    /// Generate a path for another route of the same collection.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if `name` is not registered.
    pub fn reverse(&self, name: &str, params: &Params) -> Result<String, LookupError> {
        self.routes.reverse(name, params)
    }
}

/// Result of [`Dispatcher::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome<R> {
    /// A handler ran and returned this value
    Handled(R),
    /// No route matched the subject
    NoMatch,
    /// A route matched but no handler is registered for its controller
    MissingHandler { controller: String },
}

impl<R> DispatchOutcome<R> {
    #[must_use]
    pub fn is_handled(&self) -> bool {
        matches!(self, DispatchOutcome::Handled(_))
    }

    /// The handler's value, if one ran.
    pub fn handled(self) -> Option<R> {
        match self {
            DispatchOutcome::Handled(value) => Some(value),
            DispatchOutcome::NoMatch | DispatchOutcome::MissingHandler { .. } => None,
        }
    }
}

/// Registry of handlers keyed by controller name.
///
/// The controller of a match is the value of its controller parameter
/// (`"controller"` unless changed with [`Dispatcher::with_controller_key`]).
/// When a route carries no such parameter its registry name is used instead,
/// which is what the default provider factory sets anyway.
pub struct Dispatcher<R> {
    handlers: HashMap<String, Handler<R>>,
    controller_key: String,
}

impl<R> Default for Dispatcher<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for Dispatcher<R> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
            controller_key: self.controller_key.clone(),
        }
    }
}

impl<R> fmt::Debug for Dispatcher<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut controllers: Vec<&String> = self.handlers.keys().collect();
        controllers.sort();
        f.debug_struct("Dispatcher")
            .field("controller_key", &self.controller_key)
            .field("controllers", &controllers)
            .finish()
    }
}

impl<R> Dispatcher<R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            controller_key: DEFAULT_CONTROLLER_KEY.to_string(),
        }
    }

    /// Select handlers by another parameter than `"controller"`.
    #[must_use]
    pub fn with_controller_key(mut self, key: impl Into<String>) -> Self {
        self.controller_key = key.into();
        self
    }

    #[must_use]
    pub fn controller_key(&self) -> &str {
        &self.controller_key
    }

    /// Register `handler` for `controller`. Registering the same controller
    /// again replaces the previous handler.
    pub fn register<F>(&mut self, controller: impl Into<String>, handler: F)
    where
        F: Fn(&RequestContext<'_>) -> R + Send + Sync + 'static,
    {
        let controller = controller.into();
        if self.handlers.insert(controller.clone(), Arc::new(handler)).is_some() {
            warn!(controller = %controller, "Replaced existing handler");
        } else {
            info!(
                controller = %controller,
                total_handlers = self.handlers.len(),
                "Handler registered"
            );
        }
    }

    #[must_use]
    pub fn has_handler(&self, controller: &str) -> bool {
        self.handlers.contains_key(controller)
    }

    /// Route `subject` through `routes` and run the matching handler.
    pub fn dispatch(&self, routes: &RouteCollection, subject: &str) -> DispatchOutcome<R> {
        let Some(route_match) = routes.query(subject) else {
            return DispatchOutcome::NoMatch;
        };

        let controller = route_match
            .get(&self.controller_key)
            .unwrap_or(route_match.name.as_str())
            .to_string();

        let Some(handler) = self.handlers.get(&controller) else {
            let available: Vec<&String> = self.handlers.keys().collect();
            warn!(
                subject = %subject,
                route = %route_match.name,
                controller = %controller,
                available_handlers = ?available,
                "No handler for matched controller"
            );
            return DispatchOutcome::MissingHandler { controller };
        };

        debug!(
            subject = %subject,
            route = %route_match.name,
            controller = %controller,
            "Dispatching"
        );
        let ctx = RequestContext {
            subject,
            route_match,
            routes,
        };
        DispatchOutcome::Handled(handler(&ctx))
    }
}

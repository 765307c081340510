//! # Dispatcher Module
//!
//! Hands a matched subject to the handler registered for its controller.
//!
//! ## Overview
//!
//! The router only answers "which route, with which parameters". The dispatcher
//! is the layer on top that turns that answer into work:
//!
//! 1. [`RouteCollection::query`](crate::router::RouteCollection::query) resolves the subject
//! 2. the `controller` parameter of the match picks a handler
//! 3. the handler runs with a [`RequestContext`]
//!
//! Each outcome is a value of [`DispatchOutcome`]; the dispatcher never decides
//! what a miss looks like to the user (404 page, usage text, ...).
//!
//! ## Explicit Context
//!
//! Handlers receive everything they need through [`RequestContext`]: the
//! subject, the match, and a borrow of the collection that produced it. There
//! is no process-wide "current router"; a handler that wants to build a link
//! calls [`RequestContext::reverse`].
//!
//! ```rust
//! use tokenroute::dispatcher::{DispatchOutcome, Dispatcher};
//! use tokenroute::route::Route;
//! use tokenroute::router::RouteCollection;
//!
//! let mut routes = RouteCollection::new();
//! routes.set_route("post", Route::compile("blog/:slug").unwrap().with_default("controller", "post"));
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.register("post", |ctx| format!("showing {}", ctx.param("slug").unwrap_or("")));
//!
//! match dispatcher.dispatch(&routes, "blog/hello") {
//!     DispatchOutcome::Handled(body) => assert_eq!(body, "showing hello"),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

mod core;
#[cfg(test)]
mod tests;

pub use self::core::{DispatchOutcome, Dispatcher, Handler, RequestContext};

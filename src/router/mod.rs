//! # Router Module
//!
//! The router module holds the [`RouteCollection`]: an ordered, named registry of
//! [`Route`](crate::route::Route)s that answers "which route handles this subject".
//!
//! ## Overview
//!
//! The router is used in two phases:
//!
//! 1. **Configuration**: routes are compiled and registered with
//!    [`RouteCollection::set_route`] or loaded from a
//!    [`RouteProvider`](crate::provider::RouteProvider). Registration order is
//!    matching priority.
//!
//! 2. **Matching**: for each request the dispatch layer calls
//!    [`RouteCollection::query`] once. Routes are tried in order and the first
//!    match wins. Links are generated with [`RouteCollection::reverse`].
//!
//! Once configuration is done the collection is only read, so it can be shared
//! between threads behind an `Arc` without locking.
//!
//! ## Example
//!
//! ```rust
//! use tokenroute::route::{Params, Route};
//! use tokenroute::router::RouteCollection;
//!
//! let mut routes = RouteCollection::new();
//! routes.set_route("user", Route::compile("users/:id").unwrap());
//! routes.set_route("fallback", Route::compile("*").unwrap());
//!
//! let m = routes.query("users/42").unwrap();
//! assert_eq!(m.name, "user");
//! assert_eq!(m.get("id"), Some("42"));
//!
//! let link = routes.reverse("user", &Params::from_iter([("id", "7")])).unwrap();
//! assert_eq!(link, "users/7");
//! ```

mod core;

pub use self::core::{RouteCollection, RouteMatch};

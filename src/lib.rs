//! # tokenroute
//!
//! **tokenroute** is a declarative path router: route definitions are short token
//! patterns such as `blog/:year/(:month)/:slug`, compiled once into anchored
//! regular expressions and matched in registration order.
//!
//! ## Overview
//!
//! A subject string (the part of a request or command line to route on) goes in,
//! a flat string map of parameters comes out, or "no match". The same definitions
//! run backwards: given a route name and parameters, the router generates the
//! path that would have matched.
//!
//! ## Architecture
//!
//! - **[`pattern`]** - token pattern compiler (`:name`, `(optional)`, `*`)
//! - **[`route`]** - a single route: matcher, defaults, requirements, `matches`/`reverse`
//! - **[`router`]** - [`RouteCollection`], the ordered named registry; first match wins
//! - **[`provider`]** - loads routes from INI, JSON and YAML files
//! - **[`dispatcher`]** - hands a match to the handler registered for its controller
//! - **[`hot_reload`]** - rebuilds and swaps a collection when its route file changes
//! - **[`config`]** - TOML configuration with environment overrides
//! - **[`logging`]** - `tracing-subscriber` setup used by the binary
//! - **[`cli`]** - the `tokenroute` command line
//!
//! ### Request Flow
//!
//! ```text
//! route file ──provider──▶ RouteEntry ──factory──▶ Route ──▶ RouteCollection
//!                                                                  │
//!  subject ─────────────────────────────────────────────── query ──┤
//!                                                                  ▼
//!                             Dispatcher ◀── RouteMatch { name, params }
//! ```
//!
//! ### Key Properties
//!
//! 1. **Compile once**: patterns and requirements are compiled at configuration
//!    time; the match path never builds a regex
//! 2. **Ordered**: registration order is matching priority
//! 3. **Fail fast**: malformed patterns and unreadable route files are
//!    [`ConfigurationError`]s raised while building the table, never at match time
//! 4. **No ambient state**: handlers get the collection and the match passed in
//!
//! ## Quick Start
//!
//! ```
//! use tokenroute::{Params, Route, RouteCollection};
//!
//! let mut routes = RouteCollection::new();
//! routes.set_route(
//!     "post",
//!     Route::compile("blog/:year/(:month)/:slug")?.with_default("controller", "post"),
//! );
//!
//! let m = routes.query("blog/2024/hello-world").expect("route matches");
//! assert_eq!(m.name, "post");
//! assert_eq!(m.get("year"), Some("2024"));
//! assert_eq!(m.get("month"), None);
//!
//! let params: Params = [("year", "2024"), ("month", "03"), ("slug", "hi")].into_iter().collect();
//! assert_eq!(routes.reverse("post", &params)?, "blog/2024/03/hi");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Route Files
//!
//! ```ini
//! ; routes.ini - name = pattern, earlier lines win
//! home =
//! post = blog/:year/(:month)/:slug
//! user = users/:id
//! ```
//!
//! Loaded through a provider, every route gets `controller = <name>` as a
//! default; see [`provider`] for the JSON and YAML shapes.

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod hot_reload;
pub mod logging;
pub mod pattern;
pub mod provider;
pub mod route;
pub mod router;

pub use dispatcher::{DispatchOutcome, Dispatcher, RequestContext};
pub use error::{ConfigurationError, LookupError};
pub use pattern::{compile, CompiledExpression};
pub use provider::{
    open_provider, IniRouteProvider, JsonRouteProvider, RouteProvider, YamlRouteProvider,
};
pub use route::{Matcher, Params, Route};
pub use router::{RouteCollection, RouteMatch};

//! # Route Module
//!
//! A [`Route`] owns one matcher plus a defaults map and optional per-parameter
//! requirements. It exposes two operations:
//!
//! - [`Route::matches`] - run the subject against the matcher and return the
//!   merged parameters, or `None` when it does not match
//! - [`Route::reverse`] - generate a path from parameter values
//!
//! ## Matcher Variants
//!
//! | Variant                 | Built with            | Reversible |
//! |-------------------------|-----------------------|------------|
//! | [`Matcher::Compiled`]   | [`Route::compile`]    | yes        |
//! | [`Matcher::Raw`]        | [`Route::regex`]      | no         |
//! | [`Matcher::Predicate`]  | [`Route::predicate`]  | no         |
//!
//! ## Example
//!
//! ```rust
//! use tokenroute::route::{Params, Route};
//!
//! let route = Route::compile("blog/:year/(:month)/:slug")
//!     .unwrap()
//!     .with_default("controller", "post");
//!
//! let params = route.matches("blog/2024/hello-world").unwrap();
//! assert_eq!(params.get("controller"), Some("post"));
//! assert_eq!(params.get("year"), Some("2024"));
//! assert!(!params.contains_key("month"));
//!
//! let link = route.reverse(&Params::from_iter([("year", "2024"), ("slug", "hi")]));
//! assert_eq!(link, "blog/2024/hi");
//! ```

mod core;
mod params;

pub use self::core::{Matcher, Predicate, Route};
pub use params::{ParamVec, Params, MAX_INLINE_PARAMS};

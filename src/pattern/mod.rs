//! # Pattern Module
//!
//! Compiles human-authored token patterns into anchored regular expressions.
//!
//! ## Token Syntax
//!
//! | Token        | Meaning                                   | Compiles to                    |
//! |--------------|-------------------------------------------|--------------------------------|
//! | `:name`      | required placeholder                      | `(?P<name>[^/]+)`              |
//! | `(:name)`    | optional placeholder (slash included)     | `(?:/?(?P<name>[^/]+))?`       |
//! | `(...)`      | optional group, one level deep            | `(?:...)?`                     |
//! | `*`          | wildcard, not captured                    | `.*`                           |
//! | anything else| literal text (regex-escaped)              |                                |
//!
//! Every pattern except the bare `*` gets a trailing `(/|\.[a-z]+)?` group so that
//! a trailing slash or a dot-extension suffix is tolerated. Its capture is unnamed
//! and never reaches the caller.
//!
//! ## Example
//!
//! ```rust
//! use tokenroute::pattern::compile;
//!
//! let compiled = compile("blog/:year/(:month)/:slug").unwrap();
//! assert_eq!(
//!     compiled.as_str(),
//!     r"^blog/(?P<year>[^/]+)(?:/?(?P<month>[^/]+))?/(?P<slug>[^/]+)(/|\.[a-z]+)?$"
//! );
//! assert!(compiled.is_match("blog/2024/hello-world"));
//! ```
//!
//! ## Matching Semantics
//!
//! Placeholders are greedy. A placeholder at the end of a pattern therefore keeps a
//! dot-extension as part of its value (`a/:x` on `a/1.json` yields `x = "1.json"`),
//! while a pattern ending in literal text treats the extension as a suffix
//! (`test` matches `test.xml`, never `tests.html`).

mod compiler;

pub use compiler::{compile, CompiledExpression, Placeholder, Segment, SUFFIX_GROUP, WILDCARD};

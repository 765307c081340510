//! # Provider Module
//!
//! Route providers read route definitions from a declarative file and turn them
//! into [`Route`]s for a [`RouteCollection`].
//!
//! ## Formats
//!
//! | Format | Provider               | Shape                                                 |
//! |--------|------------------------|-------------------------------------------------------|
//! | INI    | [`IniRouteProvider`]   | `name = pattern`, one per line; sections are ignored  |
//! | JSON   | [`JsonRouteProvider`]  | `{ "name": "pattern" }` or `{ "name": { "pattern": .., "defaults": {..}, "requirements": {..} } }` |
//! | YAML   | [`YamlRouteProvider`]  | same document shape as JSON                           |
//!
//! File order is registration order, and therefore matching priority.
//!
//! ## Lifecycle
//!
//! - **Construction** checks that the file exists and is a readable regular file.
//!   A missing file is a [`ConfigurationError`] straight away, so "no routes
//!   because of I/O" is never confused with "the file is empty".
//! - **First use** reads and parses the file. The parsed entries are cached for
//!   the lifetime of the provider; registering twice reads the file once.
//! - **Factory**: every entry goes through a swappable factory
//!   (`Fn(&RouteEntry) -> Result<Route, ConfigurationError>`). The default factory
//!   compiles the pattern and sets `controller = <route name>`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tokenroute::provider::{IniRouteProvider, RouteProvider};
//! use tokenroute::router::RouteCollection;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = IniRouteProvider::new("config/routes.ini")?;
//! let mut routes = RouteCollection::new();
//! provider.register(&mut routes)?;
//! # Ok(())
//! # }
//! ```

mod document;
mod file;
mod ini;

pub use document::{Json, Yaml};
pub use file::{FileRouteProvider, RouteFormat};
pub use ini::Ini;

use crate::error::ConfigurationError;
use crate::route::{Params, Route};
use crate::router::RouteCollection;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Parameter that the default factory fills with the route name.
pub const DEFAULT_CONTROLLER_KEY: &str = "controller";

pub type IniRouteProvider = FileRouteProvider<Ini>;
pub type JsonRouteProvider = FileRouteProvider<Json>;
pub type YamlRouteProvider = FileRouteProvider<Yaml>;

/// Turns a parsed entry into a route.
pub type RouteFactory = Arc<dyn Fn(&RouteEntry) -> Result<Route, ConfigurationError> + Send + Sync>;

/// One route definition as read from a file, before it becomes a [`Route`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// Registry name (the file key)
    pub name: String,
    /// Token pattern, uncompiled
    pub pattern: String,
    /// Extra defaults declared in the file
    pub defaults: Params,
    /// Per-parameter constraints declared in the file
    pub requirements: Vec<(String, String)>,
}

impl RouteEntry {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            defaults: Params::new(),
            requirements: Vec::new(),
        }
    }
}

/// Source of route definitions.
pub trait RouteProvider {
    /// Parsed entries, in file order. Parsed on first call, then cached.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the file cannot be read or parsed.
    fn entries(&self) -> Result<&[RouteEntry], ConfigurationError>;

    /// Turn one entry into a route.
    ///
    /// # Errors
    ///
    /// Returns whatever the factory returns, typically a pattern error.
    fn build(&self, entry: &RouteEntry) -> Result<Route, ConfigurationError>;

    /// Build every route. Fails as a whole if any entry fails.
    ///
    /// # Errors
    ///
    /// See [`RouteProvider::entries`] and [`RouteProvider::build`].
    fn routes(&self) -> Result<Vec<(String, Route)>, ConfigurationError> {
        self.entries()?
            .iter()
            .map(|entry| Ok((entry.name.clone(), self.build(entry)?)))
            .collect()
    }

    /// Build every route and register them into `collection`.
    ///
    /// All routes are built before the first one is registered, so a failure
    /// leaves `collection` untouched.
    ///
    /// # Errors
    ///
    /// See [`RouteProvider::routes`].
    fn register(&self, collection: &mut RouteCollection) -> Result<usize, ConfigurationError> {
        let routes = self.routes()?;
        let count = routes.len();
        for (name, route) in routes {
            collection.set_route(name, route);
        }
        Ok(count)
    }
}

/// Factory that compiles the entry's pattern and sets `key = <route name>`,
/// then applies the entry's own defaults and requirements on top.
#[must_use]
pub fn controller_factory(key: impl Into<String>) -> RouteFactory {
    let key = key.into();
    Arc::new(move |entry: &RouteEntry| -> Result<Route, ConfigurationError> {
        let mut route = Route::compile(&entry.pattern)?
            .with_default(key.clone(), entry.name.clone())
            .with_defaults(entry.defaults.iter());
        for (parameter, constraint) in &entry.requirements {
            route = route.with_requirement(parameter.clone(), constraint)?;
        }
        Ok(route)
    })
}

/// The factory providers use unless one is swapped in.
#[must_use]
pub fn default_factory() -> RouteFactory {
    controller_factory(DEFAULT_CONTROLLER_KEY)
}

/// Supported route file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderFormat {
    Ini,
    Json,
    Yaml,
}

impl ProviderFormat {
    /// Infer the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "ini" => Some(ProviderFormat::Ini),
            "json" => Some(ProviderFormat::Json),
            "yaml" | "yml" => Some(ProviderFormat::Yaml),
            _ => None,
        }
    }
}

/// Boxed provider of any format.
pub type DynRouteProvider = Box<dyn RouteProvider + Send + Sync>;

/// Open a provider, choosing the format from the file extension.
///
/// # Errors
///
/// Returns a [`ConfigurationError`] if the extension is unknown or the file is
/// missing or unreadable.
pub fn open_provider(path: impl AsRef<Path>) -> Result<DynRouteProvider, ConfigurationError> {
    let path = path.as_ref();
    let format = ProviderFormat::from_path(path).ok_or_else(|| {
        ConfigurationError::parse(path, "unknown route file format, expected .ini, .json, .yaml or .yml")
    })?;
    open_provider_with(path, format, default_factory())
}

/// Open a provider with an explicit format and factory.
///
/// # Errors
///
/// Returns a [`ConfigurationError`] if the file is missing or unreadable.
pub fn open_provider_with(
    path: impl AsRef<Path>,
    format: ProviderFormat,
    factory: RouteFactory,
) -> Result<DynRouteProvider, ConfigurationError> {
    let path = path.as_ref();
    Ok(match format {
        ProviderFormat::Ini => Box::new(IniRouteProvider::new(path)?.with_shared_factory(factory)),
        ProviderFormat::Json => Box::new(JsonRouteProvider::new(path)?.with_shared_factory(factory)),
        ProviderFormat::Yaml => Box::new(YamlRouteProvider::new(path)?.with_shared_factory(factory)),
    })
}

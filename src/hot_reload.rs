//! # Hot Reload Module
//!
//! Live reloading of a route file without restarting the process.
//!
//! ## Overview
//!
//! [`watch_routes`] watches one provider file through its parent directory, so
//! editors that save by renaming a temporary file over it are followed too.
//! On every modification it:
//! - opens a fresh provider for the file (the old provider's parse cache is
//!   never reused)
//! - builds a brand new [`RouteCollection`] from it
//! - swaps the new collection in atomically
//! - calls the reload hook with the new collection
//!
//! Readers hold an [`ArcSwap`] and call `load()` per request; they never block
//! on a reload and always see either the old or the new table, never a mix.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use arc_swap::ArcSwap;
//! use std::path::Path;
//! use std::sync::Arc;
//! use tokenroute::hot_reload::{load_routes, watch_routes};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let path = Path::new("config/routes.ini");
//! let routes = Arc::new(ArcSwap::from_pointee(load_routes(path)?));
//! let watcher = watch_routes(path, Arc::clone(&routes), |new| {
//!     println!("reloaded {} routes", new.len());
//! })?;
//!
//! let current = routes.load();
//! let _ = current.query("blog/hello");
//! # drop(watcher);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! If the edited file fails to parse or a pattern fails to compile, the error
//! is logged and the previous collection stays active.
//!
//! ## Debouncing
//!
//! Each notification waits a short settle delay before the file is read, so a
//! save that truncates and then writes is seen as its final content.

use crate::error::ConfigurationError;
use crate::provider::{default_factory, open_provider, open_provider_with, ProviderFormat};
use crate::router::RouteCollection;
use arc_swap::ArcSwap;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Wait between a change notification and reading the file.
const SETTLE_DELAY: Duration = Duration::from_millis(50);

/// Build a fresh collection from a route file, choosing the format by extension.
///
/// # Errors
///
/// Returns a [`ConfigurationError`] if the file is missing, unreadable or invalid.
pub fn load_routes(path: &Path) -> Result<RouteCollection, ConfigurationError> {
    RouteCollection::from_provider(open_provider(path)?.as_ref())
}

/// Build a fresh collection from a route file in an explicit format.
///
/// # Errors
///
/// Returns a [`ConfigurationError`] if the file is missing, unreadable or invalid.
pub fn load_routes_as(
    path: &Path,
    format: ProviderFormat,
) -> Result<RouteCollection, ConfigurationError> {
    RouteCollection::from_provider(open_provider_with(path, format, default_factory())?.as_ref())
}

/// Watch a route file and swap a rebuilt [`RouteCollection`] into `routes`
/// whenever it changes. The format is taken from the file extension.
///
/// The watcher stops when the returned value is dropped.
///
/// # Errors
///
/// Returns a `notify` error if the watch cannot be installed.
pub fn watch_routes<P, F>(
    path: P,
    routes: Arc<ArcSwap<RouteCollection>>,
    on_reload: F,
) -> notify::Result<RecommendedWatcher>
where
    P: AsRef<Path>,
    F: FnMut(&RouteCollection) + Send + 'static,
{
    watch_routes_with(path, routes, load_routes, on_reload)
}

/// Like [`watch_routes`], with a caller-supplied loader that builds the new
/// collection from the changed file.
///
/// # Errors
///
/// Returns a `notify` error if the watch cannot be installed.
pub fn watch_routes_with<P, L, F>(
    path: P,
    routes: Arc<ArcSwap<RouteCollection>>,
    loader: L,
    mut on_reload: F,
) -> notify::Result<RecommendedWatcher>
where
    P: AsRef<Path>,
    L: Fn(&Path) -> Result<RouteCollection, ConfigurationError> + Send + 'static,
    F: FnMut(&RouteCollection) + Send + 'static,
{
    let path: PathBuf = path.as_ref().to_path_buf();
    let watch_path = path.clone();
    let file_name = path.file_name().map(ToOwned::to_owned);
    // the directory is watched so a save that renames a new file over the old
    // one keeps producing events
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    return;
                }
                if !event
                    .paths
                    .iter()
                    .any(|changed| changed.file_name() == file_name.as_deref())
                {
                    return;
                }
                // editors and `fs::write` truncate before writing
                std::thread::sleep(SETTLE_DELAY);
                match loader(&watch_path) {
                    Ok(fresh) => {
                        info!(
                            path = %watch_path.display(),
                            routes_count = fresh.len(),
                            "hot-reload: applying route updates"
                        );
                        let fresh = Arc::new(fresh);
                        routes.store(Arc::clone(&fresh));
                        on_reload(&fresh);
                    }
                    Err(e) => warn!(
                        path = %watch_path.display(),
                        error = %e,
                        "hot-reload: keeping previous routes"
                    ),
                }
            }
            Err(e) => error!(error = ?e, "hot-reload: watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

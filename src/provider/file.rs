use super::{default_factory, RouteEntry, RouteFactory, RouteProvider};
use crate::error::ConfigurationError;
use crate::route::Route;
use once_cell::sync::OnceCell;
use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// A route file syntax.
pub trait RouteFormat {
    /// Short name used in logs
    const NAME: &'static str;

    /// Parse a whole file into entries, preserving file order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Parse`] naming `path` when `content` is invalid.
    fn parse(content: &str, path: &Path) -> Result<Vec<RouteEntry>, ConfigurationError>;
}

/// Provider backed by a file in format `F`.
pub struct FileRouteProvider<F> {
    path: PathBuf,
    entries: OnceCell<Vec<RouteEntry>>,
    factory: RouteFactory,
    _format: PhantomData<fn() -> F>,
}

impl<F: RouteFormat> FileRouteProvider<F> {
    /// Create a provider for `path`. The file is not parsed yet.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Io`] if `path` does not exist, cannot be
    /// opened, or is not a regular file.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref().to_path_buf();
        let io_error = |source| ConfigurationError::Io {
            path: path.clone(),
            source,
        };

        let metadata = fs::metadata(&path).map_err(io_error)?;
        if !metadata.is_file() {
            return Err(io_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "not a regular file",
            )));
        }
        // opening proves readability without reading the contents yet
        fs::File::open(&path).map_err(io_error)?;

        Ok(Self {
            path,
            entries: OnceCell::new(),
            factory: default_factory(),
            _format: PhantomData,
        })
    }

    /// Swap the entry-to-route factory.
    #[must_use]
    pub fn with_factory<G>(self, factory: G) -> Self
    where
        G: Fn(&RouteEntry) -> Result<Route, ConfigurationError> + Send + Sync + 'static,
    {
        self.with_shared_factory(Arc::new(factory))
    }

    #[must_use]
    pub fn with_shared_factory(mut self, factory: RouteFactory) -> Self {
        self.factory = factory;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file has been parsed already.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.entries.get().is_some()
    }

    fn load(&self) -> Result<Vec<RouteEntry>, ConfigurationError> {
        let content = fs::read_to_string(&self.path).map_err(|source| ConfigurationError::Io {
            path: self.path.clone(),
            source,
        })?;
        let entries = F::parse(&content, &self.path)?;
        info!(
            path = %self.path.display(),
            format = F::NAME,
            routes_count = entries.len(),
            "Loaded route definitions"
        );
        Ok(entries)
    }
}

impl<F: RouteFormat> RouteProvider for FileRouteProvider<F> {
    fn entries(&self) -> Result<&[RouteEntry], ConfigurationError> {
        self.entries
            .get_or_try_init(|| self.load())
            .map(Vec::as_slice)
    }

    fn build(&self, entry: &RouteEntry) -> Result<Route, ConfigurationError> {
        (self.factory)(entry)
    }
}

impl<F: RouteFormat> fmt::Debug for FileRouteProvider<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileRouteProvider")
            .field("format", &F::NAME)
            .field("path", &self.path)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// Insert or replace an entry by name; a replaced entry keeps its position.
pub(super) fn upsert(entries: &mut Vec<RouteEntry>, entry: RouteEntry) {
    match entries.iter_mut().find(|e| e.name == entry.name) {
        Some(existing) => *existing = entry,
        None => entries.push(entry),
    }
}

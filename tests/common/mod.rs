#![allow(dead_code)]

pub mod temp_files {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

    /// Creates a route file with a unique name in the system temp dir
    pub fn create_temp_routes(content: &str, ext: &str) -> PathBuf {
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::SeqCst);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();

        let path = std::env::temp_dir().join(format!(
            "tokenroute_test_{}_{}_{}.{}",
            std::process::id(),
            counter,
            nanos,
            ext
        ));

        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn create_temp_ini(content: &str) -> PathBuf {
        create_temp_routes(content, "ini")
    }

    pub fn create_temp_json(content: &str) -> PathBuf {
        create_temp_routes(content, "json")
    }

    pub fn create_temp_yaml(content: &str) -> PathBuf {
        create_temp_routes(content, "yaml")
    }

    /// Cleanup temporary files (best effort)
    pub fn cleanup_temp_files(paths: &[PathBuf]) {
        for path in paths {
            let _ = std::fs::remove_file(path);
        }
    }
}

pub mod fixtures {
    use tokenroute::{Route, RouteCollection};

    /// A small site: blog with optional month, users, static files and a catch-all.
    pub fn site_routes() -> RouteCollection {
        let mut routes = RouteCollection::new();
        for (name, pattern) in [
            ("home", ""),
            ("post", "blog/:year/(:month)/:slug"),
            ("archive", "blog/:year"),
            ("user", "users/:id"),
            ("user_posts", "users/:id/posts/(:page)"),
            ("assets", "static/*"),
            ("fallback", "*"),
        ] {
            routes.set_route(
                name,
                Route::compile(pattern)
                    .unwrap()
                    .with_default("controller", name),
            );
        }
        routes
    }
}

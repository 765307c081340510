use tokenroute::provider::{open_provider, RouteEntry};
use tokenroute::{
    ConfigurationError, IniRouteProvider, JsonRouteProvider, Route, RouteCollection,
    RouteProvider, YamlRouteProvider,
};

mod common;
use common::temp_files;

const SITE_INI: &str = r#"; site routes
[routes]
home = ""
post = blog/:year/(:month)/:slug
user = 'users/:id'
"#;

const SITE_JSON: &str = r#"{
    "home": "",
    "post": {
        "pattern": "blog/:year/(:month)/:slug",
        "defaults": { "controller": "article", "format": "html" },
        "requirements": { "year": "\\d{4}" }
    },
    "user": "users/:id"
}"#;

const SITE_YAML: &str = r#"
home: ""
post:
  pattern: blog/:year/(:month)/:slug
  defaults:
    controller: article
    format: html
  requirements:
    year: '\d{4}'
user: users/:id
"#;

#[test]
fn test_provider_fail_fast() {
    let missing = std::env::temp_dir().join("tokenroute_definitely_missing.ini");
    let mut routes = RouteCollection::new();

    match IniRouteProvider::new(&missing) {
        Err(ConfigurationError::Io { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected an I/O configuration error, got {other:?}"),
    }
    assert!(JsonRouteProvider::new(missing.with_extension("json")).is_err());
    assert!(open_provider(&missing).is_err());
    assert!(routes.is_empty());

    // an empty file is not an error, just no routes
    let empty = temp_files::create_temp_ini("");
    let provider = IniRouteProvider::new(&empty).unwrap();
    assert_eq!(provider.register(&mut routes).unwrap(), 0);
    assert!(routes.is_empty());
    temp_files::cleanup_temp_files(&[empty]);
}

#[test]
fn test_ini_provider_end_to_end() {
    let path = temp_files::create_temp_ini(SITE_INI);
    let provider = IniRouteProvider::new(&path).unwrap();
    let mut routes = RouteCollection::new();
    routes.register(&provider).unwrap();

    let names: Vec<_> = routes.names().collect();
    assert_eq!(names, vec!["home", "post", "user"]);

    let m = routes.query("blog/2024/03/hello-world").unwrap();
    assert_eq!(m.get("controller"), Some("post"));
    assert_eq!(m.get("month"), Some("03"));
    assert_eq!(routes.query("").unwrap().get("controller"), Some("home"));
    temp_files::cleanup_temp_files(&[path]);
}

#[test]
fn test_json_and_yaml_agree() {
    let json = temp_files::create_temp_json(SITE_JSON);
    let yaml = temp_files::create_temp_yaml(SITE_YAML);

    let mut from_json = RouteCollection::new();
    JsonRouteProvider::new(&json).unwrap().register(&mut from_json).unwrap();
    let mut from_yaml = RouteCollection::new();
    YamlRouteProvider::new(&yaml).unwrap().register(&mut from_yaml).unwrap();

    for routes in [&from_json, &from_yaml] {
        let names: Vec<_> = routes.names().collect();
        assert_eq!(names, vec!["home", "post", "user"]);

        let m = routes.query("blog/2024/hello").unwrap();
        assert_eq!(m.name, "post");
        assert_eq!(m.get("controller"), Some("article"));
        assert_eq!(m.get("format"), Some("html"));

        // year must be four digits, so this falls through to nothing
        assert!(routes.query("blog/24/hello").is_none());
    }
    temp_files::cleanup_temp_files(&[json, yaml]);
}

#[test]
fn test_swapped_factory() {
    let path = temp_files::create_temp_ini(SITE_INI);
    let provider = IniRouteProvider::new(&path)
        .unwrap()
        .with_factory(|entry: &RouteEntry| {
            Ok(Route::compile(&format!("v2/{}", entry.pattern))?
                .with_default("action", format!("{}_action", entry.name)))
        });
    let mut routes = RouteCollection::new();
    routes.register(&provider).unwrap();

    let m = routes.query("v2/users/5").unwrap();
    assert_eq!(m.get("action"), Some("user_action"));
    assert!(routes.query("users/5").is_none());
    temp_files::cleanup_temp_files(&[path]);
}

#[test]
fn test_bad_pattern_aborts_configuration() {
    let path = temp_files::create_temp_ini("ok = a/:id\nbroken = b/((:id))\n");
    let provider = IniRouteProvider::new(&path).unwrap();
    let mut routes = RouteCollection::new();
    routes.set_route("existing", Route::compile("x").unwrap());

    let err = routes.register(&provider).unwrap_err();
    assert!(err.to_string().contains("b/((:id))"), "{err}");
    let names: Vec<_> = routes.names().collect();
    assert_eq!(names, vec!["existing"]);
    temp_files::cleanup_temp_files(&[path]);
}

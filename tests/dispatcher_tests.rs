//! Dispatch on top of provider-loaded routes: the default factory's
//! `controller = <name>` default selects the handler.

use tokenroute::{DispatchOutcome, Dispatcher, IniRouteProvider, Params, RouteCollection};

mod common;
use common::temp_files;

#[derive(Debug, PartialEq)]
enum Page {
    Post { slug: String, link: String },
    User(String),
}

#[test]
fn test_dispatch_provider_routes() {
    let path = temp_files::create_temp_ini(
        "post = blog/:year/(:month)/:slug\nuser = users/:id\nfeed = feed\n",
    );
    let mut routes = RouteCollection::new();
    routes
        .register(&IniRouteProvider::new(&path).unwrap())
        .unwrap();

    let mut dispatcher = Dispatcher::new();
    dispatcher.register("post", |ctx| {
        let slug = ctx.param("slug").unwrap_or_default().to_string();
        let author: Params = [("id", "me")].into_iter().collect();
        Page::Post {
            slug,
            link: ctx.reverse("user", &author).unwrap_or_default(),
        }
    });
    dispatcher.register("user", |ctx| Page::User(ctx.param("id").unwrap_or("").to_string()));

    assert_eq!(
        dispatcher.dispatch(&routes, "blog/2024/03/hello"),
        DispatchOutcome::Handled(Page::Post {
            slug: "hello".to_string(),
            link: "users/me".to_string()
        })
    );
    assert_eq!(
        dispatcher.dispatch(&routes, "users/12.json"),
        DispatchOutcome::Handled(Page::User("12.json".to_string()))
    );
    assert_eq!(
        dispatcher.dispatch(&routes, "feed.xml"),
        DispatchOutcome::MissingHandler {
            controller: "feed".to_string()
        }
    );
    assert_eq!(dispatcher.dispatch(&routes, "nothing"), DispatchOutcome::NoMatch);

    temp_files::cleanup_temp_files(&[path]);
}

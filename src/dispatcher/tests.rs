use super::{DispatchOutcome, Dispatcher};
use crate::route::{Params, Route};
use crate::router::RouteCollection;

fn blog_routes() -> RouteCollection {
    let mut routes = RouteCollection::new();
    routes.set_route(
        "post",
        Route::compile("blog/:year/(:month)/:slug")
            .unwrap()
            .with_default("controller", "post"),
    );
    routes.set_route(
        "archive",
        Route::compile("blog/:year")
            .unwrap()
            .with_default("controller", "archive"),
    );
    routes.set_route("about", Route::compile("about").unwrap());
    routes
}

#[test]
fn test_dispatch_to_controller() {
    let routes = blog_routes();
    let mut dispatcher = Dispatcher::new();
    dispatcher.register("post", |ctx| {
        format!(
            "{}:{}:{}",
            ctx.route_name(),
            ctx.param("year").unwrap_or("-"),
            ctx.param("slug").unwrap_or("-")
        )
    });

    let outcome = dispatcher.dispatch(&routes, "blog/2024/03/hello-world");
    assert_eq!(
        outcome,
        DispatchOutcome::Handled("post:2024:hello-world".to_string())
    );
}

#[test]
fn test_no_match() {
    let routes = blog_routes();
    let dispatcher: Dispatcher<()> = Dispatcher::new();
    assert_eq!(dispatcher.dispatch(&routes, "shop/cart"), DispatchOutcome::NoMatch);
}

#[test]
fn test_missing_handler() {
    let routes = blog_routes();
    let mut dispatcher = Dispatcher::new();
    dispatcher.register("post", |_| 1);

    assert_eq!(
        dispatcher.dispatch(&routes, "blog/2024"),
        DispatchOutcome::MissingHandler {
            controller: "archive".to_string()
        }
    );
}

#[test]
fn test_route_name_without_controller_param() {
    let routes = blog_routes();
    let mut dispatcher = Dispatcher::new();
    dispatcher.register("about", |ctx| ctx.subject.to_string());

    let outcome = dispatcher.dispatch(&routes, "about/");
    assert_eq!(outcome.handled(), Some("about/".to_string()));
}

#[test]
fn test_handler_reverses_through_context() {
    let routes = blog_routes();
    let mut dispatcher = Dispatcher::new();
    dispatcher.register("archive", |ctx| {
        let params: Params = [("year", ctx.param("year").unwrap_or("")), ("slug", "latest")]
            .into_iter()
            .collect();
        ctx.reverse("post", &params)
    });

    let link = dispatcher.dispatch(&routes, "blog/2023").handled().unwrap();
    assert_eq!(link.unwrap(), "blog/2023/latest");

    dispatcher.register("archive", |ctx| ctx.reverse("missing", ctx.params()));
    let err = dispatcher
        .dispatch(&routes, "blog/2023")
        .handled()
        .unwrap()
        .unwrap_err();
    assert_eq!(err.name, "missing");
}

#[test]
fn test_custom_controller_key() {
    let mut routes = RouteCollection::new();
    routes.set_route(
        "users",
        Route::compile("users/:id")
            .unwrap()
            .with_default("handler", "user_show"),
    );
    let mut dispatcher = Dispatcher::new().with_controller_key("handler");
    dispatcher.register("user_show", |ctx| ctx.param("id").map(str::to_string));

    assert_eq!(dispatcher.controller_key(), "handler");
    assert!(dispatcher.has_handler("user_show"));
    assert_eq!(
        dispatcher.dispatch(&routes, "users/9").handled(),
        Some(Some("9".to_string()))
    );
}

#[test]
fn test_register_replaces_handler() {
    let routes = blog_routes();
    let mut dispatcher = Dispatcher::new();
    dispatcher.register("archive", |_| "first");
    dispatcher.register("archive", |_| "second");
    let cloned = dispatcher.clone();
    assert_eq!(cloned.dispatch(&routes, "blog/2020").handled(), Some("second"));
}

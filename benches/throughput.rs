use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use tokenroute::{compile, Params, Route, RouteCollection};

const PATTERNS: &[(&str, &str)] = &[
    ("home", ""),
    ("animals", "zoo/animals"),
    ("animal", "zoo/animals/:id"),
    ("animal_toy", "zoo/animals/:id/toys/:toy_id"),
    ("habitat_section", "zoo/:category/animals/:id/habitats/:habitat_id/sections/:section_id"),
    ("item_batch", "inventory/:warehouse_id/feeds/:feed_id/items/:item_id/batches/:batch_id"),
    ("complex_many_params", "complex/:a/:b/:c/:d/:e/:f/:g/:h/:i"),
    ("post", "blog/:year/(:month)/:slug"),
    ("assets", "static/*"),
];

fn build_routes() -> RouteCollection {
    let mut routes = RouteCollection::new();
    for (name, pattern) in PATTERNS {
        let route = Route::compile(pattern)
            .expect("valid pattern")
            .with_default("controller", *name);
        routes.set_route(*name, route);
    }
    routes
}

fn bench_route_throughput(c: &mut Criterion) {
    let routes = build_routes();
    c.bench_function("route_match", |b| {
        let subjects = [
            "zoo/animals/123",
            "zoo/animals/123/toys/456",
            "zoo/cats/animals/123/habitats/88/sections/5",
            "inventory/1/feeds/2/items/3/batches/4",
            "complex/1/2/3/4/5/6/7/8/9",
            "blog/2024/hello-world",
            "not/registered",
        ];
        b.iter(|| {
            for subject in subjects.iter() {
                let res = routes.query(subject);
                black_box(&res);
            }
        })
    });
}

fn bench_reverse(c: &mut Criterion) {
    let routes = build_routes();
    let params: Params = [("year", "2024"), ("month", "03"), ("slug", "hello-world")]
        .into_iter()
        .collect();
    c.bench_function("route_reverse", |b| {
        b.iter(|| black_box(routes.reverse("post", &params)))
    });
}

fn bench_compile(c: &mut Criterion) {
    c.bench_function("pattern_compile", |b| {
        b.iter(|| {
            for (_, pattern) in PATTERNS {
                black_box(compile(pattern).expect("valid pattern"));
            }
        })
    });
}

criterion_group!(benches, bench_route_throughput, bench_reverse, bench_compile);
criterion_main!(benches);

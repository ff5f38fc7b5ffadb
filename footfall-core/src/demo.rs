// Built-in demo site: a small storefront with a browse/cart/checkout loop.
// Used when no site spec is given, and exportable as a template.

use footfall_sim::{LinkSpec, Method, PageSpec, SiteGraph, SiteSpec};

fn page(url: &str, size: u64, quit: f64) -> PageSpec {
    PageSpec {
        url: url.to_string(),
        size,
        quit,
    }
}

fn link(from: usize, to: Option<usize>, method: Method, weight: f64, mean_seconds: f64) -> LinkSpec {
    LinkSpec {
        from,
        to,
        method,
        status: None,
        weight,
        mean_seconds,
    }
}

pub fn demo_spec() -> SiteSpec {
    SiteSpec {
        pages: vec![
            page("http://www.example.com/index.html", 3500, 0.05),
            page("http://www.example.com/products.html", 8200, 0.10),
            page("http://www.example.com/products/anvil.html", 5400, 0.15),
            page("http://www.example.com/products/rocket-skates.html", 6100, 0.15),
            page("http://www.example.com/cart.html", 2900, 0.10),
            page("http://www.example.com/checkout.html", 3300, 0.20),
            page("http://www.example.com/about.html", 1800, 0.30),
        ],
        links: vec![
            link(0, Some(1), Method::Get, 5.0, 25.0),
            link(0, Some(6), Method::Get, 1.0, 40.0),
            link(0, None, Method::Get, 1.0, 10.0),
            link(1, Some(2), Method::Get, 3.0, 35.0),
            link(1, Some(3), Method::Get, 3.0, 35.0),
            link(1, Some(0), Method::Get, 1.0, 20.0),
            link(2, Some(4), Method::Post, 2.0, 50.0),
            link(2, Some(1), Method::Get, 2.0, 30.0),
            link(3, Some(4), Method::Post, 2.0, 50.0),
            link(3, Some(1), Method::Get, 2.0, 30.0),
            link(4, Some(5), Method::Post, 3.0, 45.0),
            link(4, Some(1), Method::Get, 1.0, 25.0),
            link(5, None, Method::Get, 3.0, 60.0),
            link(5, Some(0), Method::Get, 1.0, 30.0),
            link(6, Some(0), Method::Get, 1.0, 30.0),
            link(6, None, Method::Get, 1.0, 15.0),
        ],
    }
}

pub fn demo_graph() -> SiteGraph {
    SiteGraph::from_spec(&demo_spec()).expect("demo site spec is valid")
}

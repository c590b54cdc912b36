use axum::{
    extract::State,
    http::{HeaderMap, header},
    response::Html,
};

use crate::api::AppState;

/// A route served by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub method: &'static str,
    pub path: &'static str,
}

impl Route {
    const fn new(method: &'static str, path: &'static str) -> Self {
        Self { method, path }
    }

    /// GET routes without path parameters can be followed directly
    fn is_linkable(&self) -> bool {
        self.method == "GET" && !self.path.contains('{') && self.path != "/"
    }
}

pub const ROUTES: &[Route] = &[
    Route::new("GET", "/"),
    Route::new("GET", "/members"),
    Route::new("POST", "/member"),
    Route::new("GET", "/member/{id}"),
    Route::new("DELETE", "/member/{id}"),
];

/// GET /
pub async fn sitemap(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");
    Html(render(host, state.family_name()))
}

/// Render the route listing as an HTML page
pub fn render(host: &str, family_name: &str) -> String {
    let base = format!("http://{}", escape(host));
    let items: String = ROUTES
        .iter()
        .map(|route| {
            let path = escape(route.path);
            if route.is_linkable() {
                format!(
                    "<li><code>{}</code> <a href=\"{}{}\">{}</a></li>",
                    route.method, base, path, path
                )
            } else {
                format!("<li><code>{}</code> {}</li>", route.method, path)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "<div style=\"text-align: center;\">\n\
         <h1>{} family API</h1>\n\
         <p>API HOST: <code>{}</code></p>\n\
         <ul style=\"text-align: left;\">\n{}\n</ul>\n\
         </div>\n",
        escape(family_name),
        base,
        items
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

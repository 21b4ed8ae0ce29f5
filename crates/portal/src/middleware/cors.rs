use tower_http::cors::{Any, CorsLayer};

/// Build the CORS layer. Guest views are served cross-origin; tighten the
/// origin list for production.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

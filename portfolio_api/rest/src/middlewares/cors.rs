use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

pub fn add<S: Clone + Send + Sync + 'static>(
    allowed_origins: &[String],
) -> impl FnOnce(Router<S>) -> Router<S> {
    let origins = allowed_origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|err| warn!(%origin, "Ignoring invalid allowed origin: {err}"))
                .ok()
        })
        .collect::<Vec<_>>();

    let layer = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    |router| router.layer(layer)
}

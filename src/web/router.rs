//! Web application router and middleware setup.

use crate::metrics::MetricsProvider;
use crate::web::config::WebConfig;
use crate::web::handlers;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the axum application serving snapshots from `provider`.
pub fn create_app<P: MetricsProvider>(config: &WebConfig, provider: Arc<P>) -> Router {
    let mut app = Router::new()
        .route("/", get(handlers::get_snapshot::<P>))
        .route("/healthcheck", get(handlers::health_check))
        .with_state(provider);

    if config.enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

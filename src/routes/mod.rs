pub mod simulation_routes;

use axum::{response::Html, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::Scalar;

use crate::api_docs::ApiDoc;
use crate::shared_state::AppState;

/// Full HTTP application: API, OpenAPI UI, tracing and CORS layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", simulation_routes::api_routes(state))
        .route("/scalar", get(|| async {
            Html(Scalar::new(ApiDoc::openapi()).to_html())
        }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

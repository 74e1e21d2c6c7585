pub mod car_routes;
pub mod page_routes;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::cors_layer;
use crate::state::AppState;

/// Crear el router principal de la aplicación
pub fn create_app(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .merge(page_routes::create_page_router(max_upload_bytes))
        .nest("/api/cars", car_routes::create_car_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

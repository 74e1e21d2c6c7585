use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::controllers::car_controller::{CarController, FormOutcome};
use crate::state::AppState;
use crate::views::html::page;
use crate::views::{CarForm, FormSubmission};

const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="300" viewBox="0 0 400 300"><rect width="400" height="300" fill="#e5e7eb"/><text x="200" y="155" font-family="sans-serif" font-size="20" text-anchor="middle" fill="#9ca3af">No image</text></svg>"##;

pub fn create_page_router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(list_page))
        .route(
            "/add-car",
            get(new_car_page)
                .post(submit_car_form)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/placeholder.svg", get(placeholder))
        .route("/health", get(health))
}

async fn list_page(State(state): State<AppState>) -> impl IntoResponse {
    let controller = CarController::new(state.cars.clone());
    let grid = controller.listing().await;
    // Volver a `/` siempre vuelve a pedir el listado
    (
        [(header::CACHE_CONTROL, "no-store")],
        Html(page("All Vehicle Details", &grid.render_page())),
    )
}

async fn new_car_page() -> Html<String> {
    Html(page("New Vehicle", &CarForm::default().render_page()))
}

async fn submit_car_form(State(state): State<AppState>, multipart: Multipart) -> Response {
    let submission = match FormSubmission::read(multipart).await {
        Ok(submission) => submission,
        Err(incomplete) => {
            // Se vuelve a mostrar lo que llegó en lugar de perder el formulario
            tracing::warn!("⚠️ Car form body could not be read: {}", incomplete.error);
            let status = incomplete.status();
            let form = incomplete.into_form();
            return (status, Html(page("New Vehicle", &form.render_page()))).into_response();
        }
    };
    let controller = CarController::new(state.cars.clone());

    match controller.submit(submission).await {
        FormOutcome::Created(_) => Redirect::to("/").into_response(),
        FormOutcome::Invalid(form) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(page("New Vehicle", &form.render_page())),
        )
            .into_response(),
        FormOutcome::Edited(form) | FormOutcome::Failed(form) => {
            Html(page("New Vehicle", &form.render_page())).into_response()
        }
    }
}

async fn placeholder() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/svg+xml")], PLACEHOLDER_SVG)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "car_rental_web",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

use axum::{
    extract::{Path, Query, State},
    routing::{get, patch},
    Json, Router,
};

use crate::controllers::car_controller::CarController;
use crate::models::car::{Car, CarUpdate, QueryParams};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Paso directo en JSON hacia el servicio remoto
pub fn create_car_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cars))
        .route("/:id", patch(update_car).delete(delete_car))
}

async fn list_cars(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<Car>>, AppError> {
    let controller = CarController::new(state.cars.clone());
    let cars = controller.list(params).await?;
    Ok(Json(cars))
}

async fn update_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(changes): Json<CarUpdate>,
) -> Result<Json<Car>, AppError> {
    let controller = CarController::new(state.cars.clone());
    let car = controller.update(&id, changes).await?;
    Ok(Json(car))
}

async fn delete_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = CarController::new(state.cars.clone());
    let response = controller.delete(&id).await?;
    Ok(Json(response))
}

use std::sync::Arc;
use validator::Validate;

use crate::clients::CarService;
use crate::models::car::{Car, CarUpdate, QueryParams};
use crate::utils::errors::{bad_request_error, AppError};
use crate::utils::validation::first_messages;
use crate::views::{CarForm, CarGrid, FormIntent, FormSubmission};

/// Resultado de procesar un envío del formulario de alta
#[derive(Debug)]
pub enum FormOutcome {
    /// Se adjuntaron o quitaron imágenes; no se valida
    Edited(CarForm),
    /// Validación fallida; el create no se llamó
    Invalid(CarForm),
    /// El create falló; el formulario conserva todo lo introducido
    Failed(CarForm),
    Created(Car),
}

pub struct CarController {
    service: Arc<dyn CarService>,
}

impl CarController {
    pub fn new(service: Arc<dyn CarService>) -> Self {
        Self { service }
    }

    /// Listado para la página principal
    pub async fn listing(&self) -> CarGrid {
        let mut grid = CarGrid::new();
        grid.load(self.service.as_ref()).await;
        grid
    }

    pub async fn submit(&self, submission: FormSubmission) -> FormOutcome {
        let FormSubmission { mut draft, intent } = submission;

        match intent {
            FormIntent::Attach => {
                tracing::debug!("🖼️ {} images selected", draft.images.len());
                return FormOutcome::Edited(CarForm::new(draft));
            }
            FormIntent::Remove(index) => {
                if draft.images.remove(index).is_none() {
                    tracing::warn!("⚠️ Image index {} out of range", index);
                }
                return FormOutcome::Edited(CarForm::new(draft));
            }
            FormIntent::Save => {}
        }

        if let Err(errors) = draft.validate() {
            tracing::info!("📝 Car form rejected: {} invalid fields", errors.field_errors().len());
            return FormOutcome::Invalid(CarForm::with_errors(draft, first_messages(&errors)));
        }

        let payload = match draft.to_payload() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("❌ Error building car payload: {}", e);
                return FormOutcome::Failed(CarForm::new(draft));
            }
        };

        match self.service.create(payload).await {
            Ok(car) => {
                tracing::info!("✅ Car {} {} created", car.car_make, car.car_model);
                FormOutcome::Created(car)
            }
            Err(e) => {
                tracing::error!("❌ Error uploading car: {}", e);
                FormOutcome::Failed(CarForm::new(draft))
            }
        }
    }

    pub async fn list(&self, params: QueryParams) -> Result<Vec<Car>, AppError> {
        let params = if params.is_empty() { None } else { Some(&params) };
        Ok(self.service.list_all(params).await?)
    }

    pub async fn update(&self, id: &str, changes: CarUpdate) -> Result<Car, AppError> {
        if id.trim().is_empty() {
            return Err(bad_request_error("Car id is required"));
        }
        if changes.is_empty() {
            return Err(bad_request_error("No fields to update"));
        }
        Ok(self.service.update(id, &changes).await?)
    }

    pub async fn delete(&self, id: &str) -> Result<serde_json::Value, AppError> {
        if id.trim().is_empty() {
            return Err(bad_request_error("Car id is required"));
        }
        Ok(self.service.delete(id).await?)
    }
}

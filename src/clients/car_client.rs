//! Cliente HTTP para el servicio remoto de vehículos
//!
//! Único punto de red de la aplicación. Expone list/create/update/delete
//! sobre `/cars` y propaga cualquier fallo después de registrarlo. No
//! valida, no cachea y no reintenta.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::dto::car_dto::{CarPayload, PayloadPart};
use crate::models::car::{Car, CarUpdate, QueryParams};
use crate::utils::errors::CarServiceError;

/// Operaciones del servicio remoto de vehículos
///
/// Se inyecta como `Arc<dyn CarService>` en el estado para poder
/// sustituirlo por fakes en tests.
#[async_trait]
pub trait CarService: Send + Sync {
    /// `GET /cars` con parámetros de query opcionales
    async fn list_all(&self, params: Option<&QueryParams>) -> Result<Vec<Car>, CarServiceError>;

    /// `POST /cars` con cuerpo multipart
    async fn create(&self, payload: CarPayload) -> Result<Car, CarServiceError>;

    /// `PATCH /cars/{id}` con los campos presentes en `changes`
    async fn update(&self, id: &str, changes: &CarUpdate) -> Result<Car, CarServiceError>;

    /// `DELETE /cars/{id}`, devuelve el cuerpo de la respuesta tal cual
    async fn delete(&self, id: &str) -> Result<serde_json::Value, CarServiceError>;
}

/// Implementación de `CarService` sobre reqwest
pub struct HttpCarClient {
    client: Client,
    base_url: String,
}

impl HttpCarClient {
    /// Crear cliente con los valores por defecto de reqwest (sin timeout)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/cars", self.base_url)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/cars/{}", self.base_url, urlencoding::encode(id))
    }

    /// Convertir el payload a un formulario multipart de reqwest
    fn build_form(payload: CarPayload) -> Result<Form, CarServiceError> {
        let mut form = Form::new();
        for part in payload.into_parts() {
            form = match part {
                PayloadPart::Text { name, value } => form.text(name, value),
                PayloadPart::File { name, file } => {
                    let content_type = if file.content_type.trim().is_empty() {
                        "application/octet-stream".to_string()
                    } else {
                        file.content_type
                    };
                    let part = Part::bytes(file.bytes.to_vec())
                        .file_name(file.file_name)
                        .mime_str(&content_type)?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }

    /// Enviar la request y parsear el JSON de respuesta
    ///
    /// Un cuerpo vacío se interpreta como `null`.
    async fn execute<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, CarServiceError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(CarServiceError::Status { status, body });
        }

        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        Ok(serde_json::from_str(body)?)
    }
}

fn logged(context: &str, error: CarServiceError) -> CarServiceError {
    log::error!("❌ {}: {}", context, error);
    error
}

#[async_trait]
impl CarService for HttpCarClient {
    async fn list_all(&self, params: Option<&QueryParams>) -> Result<Vec<Car>, CarServiceError> {
        let url = self.collection_url();
        log::debug!("🚗 GET {} (params: {:?})", url, params);

        let mut request = self.client.get(&url);
        if let Some(params) = params {
            request = request.query(params);
        }

        let cars: Vec<Car> = Self::execute(request)
            .await
            .map_err(|e| logged("Error fetching cars", e))?;

        log::info!("✅ {} cars received", cars.len());
        Ok(cars)
    }

    async fn create(&self, payload: CarPayload) -> Result<Car, CarServiceError> {
        let url = self.collection_url();
        log::debug!("📤 POST {} ({} parts)", url, payload.parts().len());

        let form = Self::build_form(payload).map_err(|e| logged("Error uploading car", e))?;
        let car: Car = Self::execute(self.client.post(&url).multipart(form))
            .await
            .map_err(|e| logged("Error uploading car", e))?;

        log::info!("✅ Car created with id {:?}", car.id);
        Ok(car)
    }

    async fn update(&self, id: &str, changes: &CarUpdate) -> Result<Car, CarServiceError> {
        let url = self.item_url(id);
        log::debug!("✏️ PATCH {}", url);

        Self::execute(self.client.patch(&url).json(changes))
            .await
            .map_err(|e| logged("Error updating car", e))
    }

    async fn delete(&self, id: &str) -> Result<serde_json::Value, CarServiceError> {
        let url = self.item_url(id);
        log::debug!("🗑️ DELETE {}", url);

        Self::execute(self.client.delete(&url))
            .await
            .map_err(|e| logged("Error deleting car", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::car_dto::ImageFile;

    #[test]
    fn test_urls() {
        let client = HttpCarClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.collection_url(), "http://localhost:5000/cars");
        assert_eq!(client.item_url("abc 1"), "http://localhost:5000/cars/abc%201");
    }

    #[test]
    fn test_build_form_accepts_text_and_files() {
        let payload = CarPayload::new()
            .text("carMake", "honda")
            .file("images", ImageFile::new("a.png", "image/png", vec![1u8, 2, 3]))
            .file("images", ImageFile::new("b.bin", "", vec![4u8]));

        assert!(HttpCarClient::build_form(payload).is_ok());
    }
}

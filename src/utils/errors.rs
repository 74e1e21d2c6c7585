//! Sistema de manejo de errores
//!
//! Este módulo define los errores del cliente del servicio remoto de
//! vehículos y los errores de la aplicación con su conversión a respuestas
//! HTTP.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Fallos de transporte/HTTP al hablar con el servicio remoto
#[derive(Error, Debug)]
pub enum CarServiceError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl CarServiceError {
    /// Status devuelto por el servicio remoto, si llegó a responder
    pub fn status(&self) -> Option<u16> {
        match self {
            CarServiceError::Transport(e) => e.status().map(|s| s.as_u16()),
            CarServiceError::Status { status, .. } => Some(status.as_u16()),
            CarServiceError::Decode(_) => None,
        }
    }
}

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("External API error: {0}")]
    ExternalApi(#[from] CarServiceError),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::BadRequest(msg) => {
                log::warn!("⚠️ Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Bad Request".to_string(),
                        message: msg,
                        details: None,
                        code: Some("BAD_REQUEST".to_string()),
                    },
                )
            }

            AppError::ExternalApi(e) => {
                log::error!("❌ External API error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse {
                        error: "External API Error".to_string(),
                        message: "An error occurred while communicating with the vehicle service".to_string(),
                        details: Some(json!({
                            "external_api_error": e.to_string(),
                            "upstream_status": e.status(),
                        })),
                        code: Some("EXTERNAL_API_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_maps_to_bad_gateway() {
        let error = AppError::from(CarServiceError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".to_string(),
        });

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_upstream_status_is_reported() {
        let error = CarServiceError::Status {
            status: reqwest::StatusCode::NOT_FOUND,
            body: String::new(),
        };
        assert_eq!(error.status(), Some(404));

        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(CarServiceError::from(decode).status(), None);
    }

    #[test]
    fn test_bad_request_helper() {
        let response = bad_request_error("missing id").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

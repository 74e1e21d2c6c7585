//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! del formulario y conversión de tipos.

use std::borrow::Cow;
use std::collections::BTreeMap;
use validator::{ValidationError, ValidationErrors};

/// Convertir texto del formulario a número
///
/// Vacío cuenta como 0; se ignoran espacios alrededor. Texto no numérico
/// o no finito es un error.
pub fn parse_number(value: &str) -> Result<f64, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }

    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => {
            let mut error = ValidationError::new("number");
            error.add_param("value".into(), &value.to_string());
            error.message = Some(Cow::from("Expected number"));
            Err(error)
        }
    }
}

/// Validar que el texto sea un número >= 0
pub fn validate_non_negative(value: &str, message: &'static str) -> Result<(), ValidationError> {
    let number = parse_number(value)?;
    if number < 0.0 {
        let mut error = ValidationError::new("range");
        error.add_param("min".into(), &0);
        error.add_param("actual".into(), &number);
        error.message = Some(Cow::from(message));
        return Err(error);
    }
    Ok(())
}

pub fn validate_rate_per_day(value: &str) -> Result<(), ValidationError> {
    validate_non_negative(value, "Rate per day must be positive")
}

pub fn validate_price_of_vehicle(value: &str) -> Result<(), ValidationError> {
    validate_non_negative(value, "Price of vehicle must be positive")
}

/// Primer mensaje por campo, listo para mostrar junto al input
pub fn first_messages(errors: &ValidationErrors) -> BTreeMap<&'static str, String> {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, list)| {
            list.first().map(|error| {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", error.code));
                (field, message)
            })
        })
        .collect()
}

//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::clients::{CarService, HttpCarClient};
use crate::config::environment::EnvironmentConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub cars: Arc<dyn CarService>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, cars: Arc<dyn CarService>) -> Self {
        Self { config, cars }
    }

    /// Estado con el cliente HTTP real apuntando a `cars_api_base_url`
    pub fn from_config(config: EnvironmentConfig) -> Self {
        let client = HttpCarClient::new(config.cars_api_base_url.clone());
        Self::new(config, Arc::new(client))
    }
}

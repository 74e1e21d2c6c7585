//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean los documentos
//! JSON del servicio remoto de vehículos.

pub mod car;

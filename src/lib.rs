//! Frontend web de alquiler de coches
//!
//! Listado de vehículos y formulario de alta sobre un servicio REST remoto.

pub mod clients;
pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;
pub mod views;

//! Vistas HTML
//!
//! Este módulo contiene el listado de vehículos, el formulario de alta y
//! los helpers de HTML compartidos.

pub mod car_form;
pub mod car_grid;
pub mod html;

pub use car_form::{CarDraft, CarForm, FormIntent, FormSubmission, ImageSelection, IncompleteSubmission};
pub use car_grid::{CarGrid, ListingState};

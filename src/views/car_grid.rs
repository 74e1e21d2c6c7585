//! Vista de listado de vehículos
//!
//! Máquina de estados `Empty → Loading → Populated | EmptyResult`. Cada carga
//! hace exactamente un `list_all` sin parámetros; si falla, el error se
//! registra y la vista vuelve a su estado anterior sin mostrar nada.

use crate::clients::CarService;
use crate::models::car::Car;
use crate::views::html::escape;

/// Imagen usada por las tarjetas sin imágenes
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

pub const EMPTY_MESSAGE: &str = "No cars available";

#[derive(Debug, Clone, PartialEq)]
pub enum ListingState {
    Empty,
    Loading,
    Populated(Vec<Car>),
    EmptyResult,
}

#[derive(Debug)]
pub struct CarGrid {
    state: ListingState,
}

impl Default for CarGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl CarGrid {
    pub fn new() -> Self {
        Self {
            state: ListingState::Empty,
        }
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    pub fn cars(&self) -> &[Car] {
        match &self.state {
            ListingState::Populated(cars) => cars,
            _ => &[],
        }
    }

    /// Cargar el listado completo desde el servicio remoto
    pub async fn load(&mut self, service: &dyn CarService) {
        let prior = std::mem::replace(&mut self.state, ListingState::Loading);

        match service.list_all(None).await {
            Ok(cars) if cars.is_empty() => {
                self.state = ListingState::EmptyResult;
            }
            Ok(cars) => {
                tracing::debug!("📋 Listing populated with {} cars", cars.len());
                self.state = ListingState::Populated(cars);
            }
            Err(e) => {
                tracing::error!("❌ Error loading cars: {}", e);
                self.state = prior;
            }
        }
    }

    /// Grid de tarjetas, o el mensaje de vacío
    pub fn render(&self) -> String {
        let cars = self.cars();
        if cars.is_empty() {
            return format!(r#"<div class="car-grid"><p>{}</p></div>"#, EMPTY_MESSAGE);
        }

        let cards: String = cars.iter().map(render_card).collect();
        format!(r#"<div class="car-grid">{}</div>"#, cards)
    }

    /// Contenido de la página principal
    pub fn render_page(&self) -> String {
        format!(
            r#"<div class="page-header">
<h1>All Vehicle Details</h1>
<a class="button" href="/add-car"><span>+</span> <span>Add Car</span></a>
</div>
{}"#,
            self.render()
        )
    }
}

fn render_card(car: &Car) -> String {
    let image = car.cover_image().unwrap_or(PLACEHOLDER_IMAGE);
    let id_attr = car
        .id
        .as_deref()
        .map(|id| format!(r#" data-car-id="{}""#, escape(id)))
        .unwrap_or_default();

    // Edit/Delete no tienen handler
    format!(
        r#"<div class="card"{id_attr}>
<div class="card-image"><img src="{image}" alt="{alt}"></div>
<div class="card-body">
<h3>{title}</h3>
<p class="city">{city}</p>
</div>
<div class="card-footer">
<div><p>Per Day Charge:</p><p class="rate">Rs.{rate}</p></div>
<div class="actions">
<button type="button" class="edit" aria-label="Edit">Edit</button>
<button type="button" class="delete" aria-label="Delete">Delete</button>
</div>
</div>
</div>
"#,
        id_attr = id_attr,
        image = escape(image),
        alt = escape(&format!("{} {}", car.car_make, car.car_model)),
        title = escape(&car.title()),
        city = escape(&car.registered_city),
        rate = car.rate_per_day,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::car_dto::CarPayload;
    use crate::models::car::{Amount, CarUpdate, QueryParams};
    use crate::utils::errors::CarServiceError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubService {
        result: fn() -> Result<Vec<Car>, CarServiceError>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CarService for StubService {
        async fn list_all(&self, params: Option<&QueryParams>) -> Result<Vec<Car>, CarServiceError> {
            assert!(params.is_none());
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.result)()
        }

        async fn create(&self, _payload: CarPayload) -> Result<Car, CarServiceError> {
            unreachable!()
        }

        async fn update(&self, _id: &str, _changes: &CarUpdate) -> Result<Car, CarServiceError> {
            unreachable!()
        }

        async fn delete(&self, _id: &str) -> Result<serde_json::Value, CarServiceError> {
            unreachable!()
        }
    }

    fn sample_car() -> Car {
        Car {
            id: Some("1".to_string()),
            car_make: "toyota".to_string(),
            car_model: "Corolla".to_string(),
            year_of_model: "2020".to_string(),
            registered_city: "Karachi".to_string(),
            rate_per_day: Amount::Number(4500.0),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_load_populates() {
        let service = StubService {
            result: || Ok(vec![sample_car()]),
            calls: AtomicUsize::new(0),
        };
        let mut grid = CarGrid::new();
        grid.load(&service).await;

        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
        assert_eq!(grid.cars().len(), 1);

        let html = grid.render();
        assert!(html.contains("<h3>toyota Corolla 2020</h3>"));
        assert!(html.contains("Karachi"));
        assert!(html.contains("Rs.4500"));
        assert!(html.contains(r#"src="/placeholder.svg""#));
        assert!(!html.contains(EMPTY_MESSAGE));
    }

    #[tokio::test]
    async fn test_load_empty_result() {
        let service = StubService {
            result: || Ok(Vec::new()),
            calls: AtomicUsize::new(0),
        };
        let mut grid = CarGrid::new();
        grid.load(&service).await;

        assert_eq!(grid.state(), &ListingState::EmptyResult);
        assert!(grid.render().contains(EMPTY_MESSAGE));
    }

    #[tokio::test]
    async fn test_load_failure_keeps_prior_state() {
        let service = StubService {
            result: || {
                Err(CarServiceError::Status {
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                    body: String::new(),
                })
            },
            calls: AtomicUsize::new(0),
        };
        let mut grid = CarGrid::new();
        grid.load(&service).await;

        assert_eq!(grid.state(), &ListingState::Empty);
        assert!(grid.render().contains(EMPTY_MESSAGE));
    }

    #[tokio::test]
    async fn test_record_without_images_still_renders() {
        let service = StubService {
            result: || {
                let bare: Car = serde_json::from_value(serde_json::json!({
                    "_id": "2",
                    "carMake": "honda",
                    "carModel": "Civic",
                    "yearOfModel": 2022,
                    "registeredCity": "Islamabad",
                    "ratePerDay": "5,000",
                    "images": null
                }))
                .unwrap();
                Ok(vec![sample_car(), bare])
            },
            calls: AtomicUsize::new(0),
        };
        let mut grid = CarGrid::new();
        grid.load(&service).await;

        let html = grid.render();
        assert_eq!(html.matches(r#"<div class="card""#).count(), 2);
        assert!(html.contains("<h3>honda Civic 2022</h3>"));
        assert!(html.contains("Rs.5,000"));
        assert!(html.contains(r#"src="/placeholder.svg""#));
    }

    #[test]
    fn test_card_escapes_and_uses_first_image() {
        let mut car = sample_car();
        car.car_model = "<Civic>".to_string();
        car.images = vec!["https://cdn.test/a.jpg".to_string(), "https://cdn.test/b.jpg".to_string()];

        let html = render_card(&car);
        assert!(html.contains(r#"src="https://cdn.test/a.jpg""#));
        assert!(!html.contains("b.jpg"));
        assert!(html.contains("toyota &lt;Civic&gt; 2020"));
        assert!(html.contains(r#"data-car-id="1""#));
    }
}

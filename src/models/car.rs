//! Modelo de Car
//!
//! Este módulo contiene el registro de vehículo tal como lo entrega el
//! servicio remoto, el mapa fijo de 17 features y la actualización parcial.
//! El servidor es dueño del `_id` y de las URLs de imágenes.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Parámetros de query abiertos para el listado (`GET /cars`)
pub type QueryParams = BTreeMap<String, String>;

macro_rules! car_features {
    ($($field:ident => $key:literal),+ $(,)?) => {
        /// Features del vehículo - 17 flags booleanos fijos
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct CarFeatures {
            $(
                #[serde(rename = $key)]
                pub $field: bool,
            )+
        }

        impl CarFeatures {
            /// Claves en el orden en que se muestran y se serializan
            pub const KEYS: [&'static str; 17] = [$($key),+];

            pub fn get(&self, key: &str) -> Option<bool> {
                match key {
                    $($key => Some(self.$field),)+
                    _ => None,
                }
            }

            /// Devuelve `false` si la clave no pertenece al mapa
            pub fn set(&mut self, key: &str, value: bool) -> bool {
                match key {
                    $($key => {
                        self.$field = value;
                        true
                    })+
                    _ => false,
                }
            }
        }
    };
}

car_features! {
    air_conditioner => "airConditioner",
    heater => "heater",
    sun_roof => "sunRoof",
    cd_dvd_player => "cdDvdPlayer",
    android_player => "androidPlayer",
    front_camera => "frontCamera",
    rear_camera => "rearCamera",
    cigarette_lighter => "cigaretteLighter",
    steering_lock => "steeringLock",
    wheel_cups => "wheelCups",
    spare_wheel => "spareWheel",
    air_compressor => "airCompressor",
    jack_handle => "jackHandle",
    wheel_panna => "wheelPanna",
    mud_flaps => "mudFlaps",
    floor_mats => "floorMats",
    vehicle_documents => "vehicleDocuments",
}

impl CarFeatures {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        Self::KEYS
            .iter()
            .map(move |key| (*key, self.get(key).unwrap_or(false)))
    }

    pub fn enabled_count(&self) -> usize {
        self.iter().filter(|(_, enabled)| *enabled).count()
    }
}

/// Importe tal como lo guarda el servidor
///
/// Los textos que no son número (`"5,000"`) se conservan para mostrarlos
/// literalmente en lugar de invalidar el registro.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Amount::Number(value) => Some(*value),
            Amount::Text(_) => None,
        }
    }
}

impl Default for Amount {
    fn default() -> Self {
        Amount::Number(0.0)
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::Number(value)
    }
}

impl PartialEq<f64> for Amount {
    fn eq(&self, other: &f64) -> bool {
        self.as_f64() == Some(*other)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Number(value) => write!(f, "{}", value),
            Amount::Text(text) => f.write_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(Amount::default()),
            Some(Value::Number(number)) => number
                .as_f64()
                .map(Amount::Number)
                .ok_or_else(|| de::Error::custom("number out of range")),
            Some(Value::String(text)) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Ok(Amount::default());
                }
                match trimmed.parse::<f64>() {
                    Ok(number) if number.is_finite() => Ok(Amount::Number(number)),
                    _ => Ok(Amount::Text(trimmed.to_string())),
                }
            }
            Some(Value::Bool(flag)) => Ok(Amount::Text(flag.to_string())),
            Some(other) => Err(de::Error::custom(format!(
                "expected number, got {}",
                other
            ))),
        }
    }
}

/// Car principal - mapea al documento JSON del servicio remoto
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "string_or_number")]
    pub registration_no: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub year_of_model: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub registered_city: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub car_type: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub car_make: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub car_model: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub color: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub transmission_type: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub engine_capacity: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub chassis_no: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub engine_no: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub fuel_type: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub fuel_tank_capacity: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub max_speed: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub seating_capacity: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub inspection_date: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub inspection_mileage: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub inspection_location: String,

    #[serde(default)]
    pub rate_per_day: Amount,
    #[serde(default)]
    pub price_of_vehicle: Amount,

    #[serde(default, deserialize_with = "string_or_number")]
    pub fuel_average: String,

    #[serde(default, deserialize_with = "features_from_object_or_json")]
    pub features: CarFeatures,

    #[serde(default, deserialize_with = "urls_or_null")]
    pub images: Vec<String>,
}

impl Car {
    /// Primera imagen alojada en el servidor, si existe
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    pub fn title(&self) -> String {
        format!("{} {} {}", self.car_make, self.car_model, self.year_of_model)
    }
}

/// Request para actualizar parcialmente un vehículo (`PATCH /cars/{id}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_of_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmission_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_capacity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chassis_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_tank_capacity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_speed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seating_capacity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspection_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspection_mileage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspection_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_per_day: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_of_vehicle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_average: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<CarFeatures>,
}

impl CarUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Acepta string o número (el servidor puede devolver `yearOfModel` como número)
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(text)) => Ok(text),
        Some(Value::Number(number)) => Ok(number.to_string()),
        Some(Value::Bool(flag)) => Ok(flag.to_string()),
        Some(other) => Err(de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

/// `null` o ausente cuenta como sin imágenes; entradas que no son texto se ignoran
fn urls_or_null<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(url) if !url.trim().is_empty() => Some(url),
                _ => None,
            })
            .collect()),
        Some(Value::String(url)) if !url.trim().is_empty() => Ok(vec![url]),
        Some(Value::String(_)) => Ok(Vec::new()),
        Some(other) => Err(de::Error::custom(format!(
            "expected list of image URLs, got {}",
            other
        ))),
    }
}

/// El create envía `features` como texto JSON; el servidor puede devolverlo igual
fn features_from_object_or_json<'de, D>(deserializer: D) -> Result<CarFeatures, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(CarFeatures::default()),
        Some(Value::String(raw)) => serde_json::from_str(&raw).map_err(de::Error::custom),
        Some(other) => serde_json::from_value(other).map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_features_serialize_all_keys() {
        let value = serde_json::to_value(CarFeatures::default()).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 17);
        for key in CarFeatures::KEYS {
            assert_eq!(object[key], json!(false), "missing or wrong key {}", key);
        }
    }

    #[test]
    fn test_features_get_and_set() {
        let mut features = CarFeatures::default();
        assert!(features.set("sunRoof", true));
        assert!(!features.set("jetPack", true));

        assert_eq!(features.get("sunRoof"), Some(true));
        assert_eq!(features.get("jetPack"), None);
        assert!(features.sun_roof);
        assert_eq!(features.enabled_count(), 1);
    }

    #[test]
    fn test_car_from_server_document() {
        let car: Car = serde_json::from_value(json!({
            "_id": "65f0c0ffee",
            "registrationNo": "LEA-1234",
            "yearOfModel": 2021,
            "registeredCity": "Lahore",
            "carMake": "toyota",
            "carModel": "Corolla",
            "ratePerDay": "5000",
            "priceOfVehicle": 4500000,
            "features": "{\"airConditioner\":true}",
            "images": ["https://cdn.example/1.jpg"],
            "__v": 0
        }))
        .unwrap();

        assert_eq!(car.id.as_deref(), Some("65f0c0ffee"));
        assert_eq!(car.year_of_model, "2021");
        assert_eq!(car.rate_per_day, 5000.0);
        assert_eq!(car.price_of_vehicle, 4_500_000.0);
        assert!(car.features.air_conditioner);
        assert!(!car.features.heater);
        assert_eq!(car.color, "");
        assert_eq!(car.cover_image(), Some("https://cdn.example/1.jpg"));
        assert_eq!(car.title(), "toyota Corolla 2021");
    }

    #[test]
    fn test_car_accepts_plain_id_and_object_features() {
        let car: Car = serde_json::from_value(json!({
            "id": "42",
            "features": { "heater": true },
            "ratePerDay": null
        }))
        .unwrap();

        assert_eq!(car.id.as_deref(), Some("42"));
        assert!(car.features.heater);
        assert_eq!(car.rate_per_day, 0.0);
        assert!(car.cover_image().is_none());
    }

    #[test]
    fn test_lenient_records_still_decode() {
        let cars: Vec<Car> = serde_json::from_value(json!([
            { "_id": "a", "images": null, "ratePerDay": "5,000" },
            { "_id": "b", "images": ["https://cdn.example/b.jpg", null], "ratePerDay": " 3500 " }
        ]))
        .unwrap();

        assert_eq!(cars.len(), 2);
        assert!(cars[0].images.is_empty());
        assert_eq!(cars[0].rate_per_day, Amount::Text("5,000".to_string()));
        assert_eq!(cars[0].rate_per_day.to_string(), "5,000");
        assert_eq!(cars[1].images, vec!["https://cdn.example/b.jpg"]);
        assert_eq!(cars[1].rate_per_day, 3500.0);
        assert_eq!(cars[1].rate_per_day.to_string(), "3500");
    }

    #[test]
    fn test_amount_serializes_as_received() {
        assert_eq!(serde_json::to_value(Amount::Number(12.5)).unwrap(), json!(12.5));
        assert_eq!(serde_json::to_value(Amount::Text("5,000".to_string())).unwrap(), json!("5,000"));
    }

    #[test]
    fn test_car_update_serializes_only_present_fields() {
        let update = CarUpdate {
            color: Some("red".to_string()),
            rate_per_day: Some(3500.0),
            ..Default::default()
        };

        assert!(!update.is_empty());
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "color": "red", "ratePerDay": 3500.0 })
        );
        assert!(CarUpdate::default().is_empty());
    }
}

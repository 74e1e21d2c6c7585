//! Formulario de alta de vehículo
//!
//! Contiene el borrador (`CarDraft`) con sus reglas de validación, la
//! selección de imágenes limitada a 10, la construcción del payload
//! multipart para el servicio remoto, la lectura del formulario enviado
//! por el navegador y el render HTML con errores junto a cada campo.

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use validator::Validate;

use crate::dto::car_dto::{CarPayload, ImageFile, FEATURES_FIELD, IMAGES_FIELD};
use crate::models::car::CarFeatures;
use crate::utils::validation::{parse_number, validate_price_of_vehicle, validate_rate_per_day};
use crate::views::html::escape;

/// Máximo de imágenes por vehículo
pub const MAX_IMAGES: usize = 10;

/// Campo oculto que reenvía las imágenes ya seleccionadas
pub const STAGED_IMAGES_FIELD: &str = "stagedImages";

pub const INTENT_FIELD: &str = "intent";

const FEATURE_PREFIX: &str = "features.";

/// Campos que no pueden quedar vacíos
pub const REQUIRED_FIELDS: [&str; 9] = [
    "registrationNo",
    "yearOfModel",
    "registeredCity",
    "carType",
    "carMake",
    "carModel",
    "engineCapacity",
    "chassisNo",
    "engineNo",
];

lazy_static! {
    static ref CAMEL_BOUNDARY: Regex = Regex::new(r"([A-Z])").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputKind {
    Text,
    Number,
    Date,
    Select(&'static [(&'static str, &'static str)]),
}

/// Metadatos de un campo escalar del formulario
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Nombre del campo en Rust (clave de los errores de validación)
    pub key: &'static str,
    /// Nombre en el formulario y en el multipart
    pub name: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub input: InputKind,
}

const CAR_TYPES: &[(&str, &str)] = &[("sedan", "Sedan"), ("suv", "SUV"), ("hatchback", "Hatchback")];
const CAR_MAKES: &[(&str, &str)] = &[("toyota", "Toyota"), ("honda", "Honda"), ("suzuki", "Suzuki")];
const TRANSMISSIONS: &[(&str, &str)] = &[("manual", "Manual"), ("automatic", "Automatic")];
const FUEL_TYPES: &[(&str, &str)] = &[("petrol", "Petrol"), ("diesel", "Diesel"), ("hybrid", "Hybrid")];

const fn field(
    key: &'static str,
    name: &'static str,
    label: &'static str,
    placeholder: &'static str,
    input: InputKind,
) -> FieldSpec {
    FieldSpec { key, name, label, placeholder, input }
}

/// "Vehicle Information"
pub const INFORMATION_FIELDS: [FieldSpec; 11] = [
    field("registration_no", "registrationNo", "Registration No", "Enter registration number", InputKind::Text),
    field("year_of_model", "yearOfModel", "Year of Model", "Enter year", InputKind::Number),
    field("registered_city", "registeredCity", "Registered City", "Enter city", InputKind::Text),
    field("car_type", "carType", "Car Type", "Select Car Type", InputKind::Select(CAR_TYPES)),
    field("car_make", "carMake", "Car Make", "Select Car Make", InputKind::Select(CAR_MAKES)),
    field("car_model", "carModel", "Car Model", "Enter car model", InputKind::Text),
    field("color", "color", "Color", "Enter color", InputKind::Text),
    field("transmission_type", "transmissionType", "Transmission Type", "Select", InputKind::Select(TRANSMISSIONS)),
    field("engine_capacity", "engineCapacity", "Engine Capacity", "Enter engine capacity", InputKind::Text),
    field("chassis_no", "chassisNo", "Chassis No", "Enter chassis number", InputKind::Text),
    field("engine_no", "engineNo", "Engine No", "Enter engine number", InputKind::Text),
];

/// "Vehicle Details"
pub const DETAIL_FIELDS: [FieldSpec; 10] = [
    field("fuel_type", "fuelType", "Fuel Type", "Select Fuel Type", InputKind::Select(FUEL_TYPES)),
    field("fuel_tank_capacity", "fuelTankCapacity", "Fuel Tank Capacity", "Enter capacity", InputKind::Text),
    field("max_speed", "maxSpeed", "Max Speed", "Enter max speed", InputKind::Text),
    field("seating_capacity", "seatingCapacity", "Seating Capacity", "Enter seating capacity", InputKind::Number),
    field("inspection_date", "inspectionDate", "Inspection Date", "", InputKind::Date),
    field("inspection_mileage", "inspectionMileage", "Inspection Mileage", "Enter mileage", InputKind::Text),
    field("inspection_location", "inspectionLocation", "Inspection Location", "Enter location", InputKind::Text),
    field("rate_per_day", "ratePerDay", "Rate per Day", "Enter daily rate", InputKind::Number),
    field("price_of_vehicle", "priceOfVehicle", "Price of Vehicle", "Enter vehicle price", InputKind::Number),
    field("fuel_average", "fuelAverage", "Fuel Average", "Enter fuel average", InputKind::Text),
];

/// Todos los campos escalares en orden de envío
pub fn scalar_fields() -> impl Iterator<Item = &'static FieldSpec> {
    INFORMATION_FIELDS.iter().chain(DETAIL_FIELDS.iter())
}

/// "cdDvdPlayer" -> "Cd Dvd Player"
pub fn feature_label(key: &str) -> String {
    let spaced = CAMEL_BOUNDARY.replace_all(key, " $1");
    spaced
        .trim()
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Número en su forma de texto para el multipart (`0`, `1500`, `12.5`)
fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Imágenes seleccionadas, en orden de selección, como mucho `MAX_IMAGES`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageSelection {
    files: Vec<ImageFile>,
}

impl ImageSelection {
    /// Añadir al final y recortar a las primeras `MAX_IMAGES`; no deduplica
    pub fn extend<I>(&mut self, files: I)
    where
        I: IntoIterator<Item = ImageFile>,
    {
        self.files.extend(files);
        self.files.truncate(MAX_IMAGES);
    }

    /// Quitar la imagen `index`; fuera de rango no hace nada
    pub fn remove(&mut self, index: usize) -> Option<ImageFile> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }

    pub fn files(&self) -> &[ImageFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Referencias locales para la vista previa (`data:` URIs)
    pub fn preview_urls(&self) -> Vec<String> {
        self.files.iter().map(preview_url).collect()
    }

    /// `<content-type>|<nombre codificado>|<base64>`
    pub fn encode_staged(file: &ImageFile) -> String {
        format!(
            "{}|{}|{}",
            file.content_type,
            urlencoding::encode(&file.file_name),
            STANDARD.encode(&file.bytes)
        )
    }

    pub fn decode_staged(raw: &str) -> Option<ImageFile> {
        let mut pieces = raw.splitn(3, '|');
        let content_type = pieces.next()?;
        let file_name = urlencoding::decode(pieces.next()?).ok()?;
        let bytes = STANDARD.decode(pieces.next()?.trim()).ok()?;
        Some(ImageFile::new(file_name.into_owned(), content_type, bytes))
    }
}

fn preview_url(file: &ImageFile) -> String {
    let content_type = if file.content_type.is_empty() {
        "application/octet-stream"
    } else {
        file.content_type.as_str()
    };
    format!("data:{};base64,{}", content_type, STANDARD.encode(&file.bytes))
}

/// Borrador de vehículo tal como lo escribe el usuario
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct CarDraft {
    #[validate(length(min = 1, message = "Registration number is required"))]
    pub registration_no: String,
    #[validate(length(min = 1, message = "Year of model is required"))]
    pub year_of_model: String,
    #[validate(length(min = 1, message = "Registered city is required"))]
    pub registered_city: String,
    #[validate(length(min = 1, message = "Car type is required"))]
    pub car_type: String,
    #[validate(length(min = 1, message = "Car make is required"))]
    pub car_make: String,
    #[validate(length(min = 1, message = "Car model is required"))]
    pub car_model: String,
    pub color: String,
    pub transmission_type: String,
    #[validate(length(min = 1, message = "Engine capacity is required"))]
    pub engine_capacity: String,
    #[validate(length(min = 1, message = "Chassis number is required"))]
    pub chassis_no: String,
    #[validate(length(min = 1, message = "Engine number is required"))]
    pub engine_no: String,
    pub fuel_type: String,
    pub fuel_tank_capacity: String,
    pub max_speed: String,
    pub seating_capacity: String,
    pub inspection_date: String,
    pub inspection_mileage: String,
    pub inspection_location: String,
    #[validate(custom = "validate_rate_per_day")]
    pub rate_per_day: String,
    #[validate(custom = "validate_price_of_vehicle")]
    pub price_of_vehicle: String,
    pub fuel_average: String,
    pub features: CarFeatures,
    pub images: ImageSelection,
}

impl Default for CarDraft {
    fn default() -> Self {
        Self {
            registration_no: String::new(),
            year_of_model: String::new(),
            registered_city: String::new(),
            car_type: String::new(),
            car_make: String::new(),
            car_model: String::new(),
            color: String::new(),
            transmission_type: String::new(),
            engine_capacity: String::new(),
            chassis_no: String::new(),
            engine_no: String::new(),
            fuel_type: String::new(),
            fuel_tank_capacity: String::new(),
            max_speed: String::new(),
            seating_capacity: String::new(),
            inspection_date: String::new(),
            inspection_mileage: String::new(),
            inspection_location: String::new(),
            rate_per_day: "0".to_string(),
            price_of_vehicle: "0".to_string(),
            fuel_average: String::new(),
            features: CarFeatures::default(),
            images: ImageSelection::default(),
        }
    }
}

impl CarDraft {
    fn field_ref(&self, name: &str) -> Option<&String> {
        let value = match name {
            "registrationNo" => &self.registration_no,
            "yearOfModel" => &self.year_of_model,
            "registeredCity" => &self.registered_city,
            "carType" => &self.car_type,
            "carMake" => &self.car_make,
            "carModel" => &self.car_model,
            "color" => &self.color,
            "transmissionType" => &self.transmission_type,
            "engineCapacity" => &self.engine_capacity,
            "chassisNo" => &self.chassis_no,
            "engineNo" => &self.engine_no,
            "fuelType" => &self.fuel_type,
            "fuelTankCapacity" => &self.fuel_tank_capacity,
            "maxSpeed" => &self.max_speed,
            "seatingCapacity" => &self.seating_capacity,
            "inspectionDate" => &self.inspection_date,
            "inspectionMileage" => &self.inspection_mileage,
            "inspectionLocation" => &self.inspection_location,
            "ratePerDay" => &self.rate_per_day,
            "priceOfVehicle" => &self.price_of_vehicle,
            "fuelAverage" => &self.fuel_average,
            _ => return None,
        };
        Some(value)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        let value = match name {
            "registrationNo" => &mut self.registration_no,
            "yearOfModel" => &mut self.year_of_model,
            "registeredCity" => &mut self.registered_city,
            "carType" => &mut self.car_type,
            "carMake" => &mut self.car_make,
            "carModel" => &mut self.car_model,
            "color" => &mut self.color,
            "transmissionType" => &mut self.transmission_type,
            "engineCapacity" => &mut self.engine_capacity,
            "chassisNo" => &mut self.chassis_no,
            "engineNo" => &mut self.engine_no,
            "fuelType" => &mut self.fuel_type,
            "fuelTankCapacity" => &mut self.fuel_tank_capacity,
            "maxSpeed" => &mut self.max_speed,
            "seatingCapacity" => &mut self.seating_capacity,
            "inspectionDate" => &mut self.inspection_date,
            "inspectionMileage" => &mut self.inspection_mileage,
            "inspectionLocation" => &mut self.inspection_location,
            "ratePerDay" => &mut self.rate_per_day,
            "priceOfVehicle" => &mut self.price_of_vehicle,
            "fuelAverage" => &mut self.fuel_average,
            _ => return None,
        };
        Some(value)
    }

    /// Valor de un campo escalar por su nombre de formulario
    pub fn get(&self, name: &str) -> Option<&str> {
        self.field_ref(name).map(String::as_str)
    }

    /// Devuelve `false` si el campo no existe
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.field_mut(name) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Payload multipart: escalares en orden, `features` como JSON, luego imágenes
    ///
    /// Se llama sobre un borrador ya validado.
    pub fn to_payload(&self) -> Result<CarPayload, serde_json::Error> {
        let mut payload = CarPayload::new();

        for def in scalar_fields() {
            let raw = self.get(def.name).unwrap_or_default();
            let value = match def.name {
                "ratePerDay" | "priceOfVehicle" => parse_number(raw)
                    .map(format_number)
                    .unwrap_or_else(|_| raw.trim().to_string()),
                _ => raw.to_string(),
            };
            payload = payload.text(def.name, value);
        }

        let mut payload = payload.json(FEATURES_FIELD, &self.features)?;

        for file in self.images.files() {
            payload = payload.file(IMAGES_FIELD, file.clone());
        }

        Ok(payload)
    }
}

/// Acción pedida por el botón que envió el formulario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormIntent {
    Save,
    Attach,
    Remove(usize),
}

impl FormIntent {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw == "attach" {
            return FormIntent::Attach;
        }
        match raw.strip_prefix("remove-").map(str::parse::<usize>) {
            Some(Ok(index)) => FormIntent::Remove(index),
            _ => FormIntent::Save,
        }
    }
}

/// Formulario recibido del navegador
#[derive(Debug, Clone, PartialEq)]
pub struct FormSubmission {
    pub draft: CarDraft,
    pub intent: FormIntent,
}

impl FormSubmission {
    /// Leer el multipart de `POST /add-car`
    ///
    /// Las imágenes ya seleccionadas van primero y las nuevas a continuación;
    /// la selección resultante se recorta a `MAX_IMAGES`. Si el cuerpo se
    /// corta a mitad (p. ej. supera el límite de subida) se devuelve lo leído.
    pub async fn read(mut multipart: Multipart) -> Result<Self, IncompleteSubmission> {
        let mut draft = CarDraft::default();
        let mut intent = FormIntent::Save;
        let mut staged = Vec::new();
        let mut fresh = Vec::new();

        let outcome = async {
            while let Some(field) = multipart.next_field().await? {
                let name = field.name().unwrap_or_default().to_string();

                if name == INTENT_FIELD {
                    intent = FormIntent::parse(&field.text().await?);
                } else if name == STAGED_IMAGES_FIELD {
                    let raw = field.text().await?;
                    match ImageSelection::decode_staged(&raw) {
                        Some(file) => staged.push(file),
                        None => tracing::warn!("⚠️ Ignoring malformed staged image"),
                    }
                } else if name == IMAGES_FIELD {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().unwrap_or_default().to_string();
                    let bytes = field.bytes().await?;
                    // Input de archivo vacío: parte sin nombre ni contenido
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    fresh.push(ImageFile::new(file_name, content_type, bytes));
                } else if let Some(key) = name.strip_prefix(FEATURE_PREFIX) {
                    let _ = field.text().await?;
                    if !draft.features.set(key, true) {
                        tracing::debug!("Ignoring unknown feature '{}'", key);
                    }
                } else {
                    let value = field.text().await?;
                    if !draft.set(&name, value) {
                        tracing::debug!("Ignoring unknown form field '{}'", name);
                    }
                }
            }
            Ok::<(), MultipartError>(())
        }
        .await;

        draft.images.extend(staged);
        draft.images.extend(fresh);

        match outcome {
            Ok(()) => Ok(Self { draft, intent }),
            Err(error) => Err(IncompleteSubmission { draft, error }),
        }
    }
}

/// Envío cortado a mitad de lectura, con los campos que llegaron
#[derive(Debug)]
pub struct IncompleteSubmission {
    pub draft: CarDraft,
    pub error: MultipartError,
}

impl IncompleteSubmission {
    pub fn status(&self) -> StatusCode {
        self.error.status()
    }

    /// Formulario para volver a mostrar, con el aviso junto a las imágenes
    pub fn into_form(self) -> CarForm {
        let message = if self.status() == StatusCode::PAYLOAD_TOO_LARGE {
            "Selected images exceed the upload limit"
        } else {
            "The form could not be read completely"
        };
        let mut errors = BTreeMap::new();
        errors.insert(IMAGES_FIELD, message.to_string());
        CarForm::with_errors(self.draft, errors)
    }
}

/// Estado del formulario para renderizar: valores y errores por campo
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarForm {
    pub draft: CarDraft,
    pub errors: BTreeMap<&'static str, String>,
}

impl CarForm {
    pub fn new(draft: CarDraft) -> Self {
        Self {
            draft,
            errors: BTreeMap::new(),
        }
    }

    pub fn with_errors(draft: CarDraft, errors: BTreeMap<&'static str, String>) -> Self {
        Self { draft, errors }
    }

    pub fn error_for(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    pub fn render_page(&self) -> String {
        format!(
            r#"<h1>New Vehicle</h1>
<div class="form-container">
{}
</div>"#,
            self.render()
        )
    }

    pub fn render(&self) -> String {
        let mut html = String::new();
        html.push_str(r#"<form method="post" action="/add-car" enctype="multipart/form-data" class="car-form">"#);
        // Enter en cualquier input debe guardar, no adjuntar ni quitar
        html.push_str(r#"<button type="submit" name="intent" value="save" tabindex="-1" aria-hidden="true" style="position:absolute;left:-9999px">Save</button>"#);

        html.push_str(&self.render_section("Vehicle Information", &INFORMATION_FIELDS));
        html.push_str(&self.render_section("Vehicle Details", &DETAIL_FIELDS));
        html.push_str(&self.render_features());
        html.push_str(&self.render_images());

        html.push_str(r#"<div class="form-actions"><button type="submit" name="intent" value="save">Save</button></div>"#);
        html.push_str("</form>");
        html
    }

    fn render_section(&self, title: &str, fields: &[FieldSpec]) -> String {
        let items: String = fields.iter().map(|def| self.render_field(def)).collect();
        format!(
            r#"<section><h2>{}</h2><div class="form-grid">{}</div></section>"#,
            escape(title),
            items
        )
    }

    fn render_field(&self, def: &FieldSpec) -> String {
        let value = self.draft.get(def.name).unwrap_or_default();

        let control = match def.input {
            InputKind::Select(options) => {
                let mut select = format!(
                    r#"<select id="{name}" name="{name}"><option value=""{selected}>{placeholder}</option>"#,
                    name = def.name,
                    selected = if value.is_empty() { " selected" } else { "" },
                    placeholder = escape(def.placeholder),
                );
                for (option_value, option_label) in options {
                    select.push_str(&format!(
                        r#"<option value="{}"{}>{}</option>"#,
                        option_value,
                        if *option_value == value { " selected" } else { "" },
                        option_label
                    ));
                }
                select.push_str("</select>");
                select
            }
            kind => {
                let input_type = match kind {
                    InputKind::Number => r#"number" step="any"#,
                    InputKind::Date => "date",
                    _ => "text",
                };
                let placeholder = if def.placeholder.is_empty() {
                    String::new()
                } else {
                    format!(r#" placeholder="{}""#, escape(def.placeholder))
                };
                format!(
                    r#"<input id="{name}" name="{name}" type="{input_type}"{placeholder} value="{value}">"#,
                    name = def.name,
                    input_type = input_type,
                    placeholder = placeholder,
                    value = escape(value),
                )
            }
        };

        let error = self
            .error_for(def.key)
            .map(|message| format!(r#"<p class="form-error" data-field="{}">{}</p>"#, def.name, escape(message)))
            .unwrap_or_default();

        format!(
            r#"<div class="form-item"><label for="{name}">{label}</label>{control}{error}</div>"#,
            name = def.name,
            label = escape(def.label),
            control = control,
            error = error,
        )
    }

    fn render_features(&self) -> String {
        let items: String = self
            .draft
            .features
            .iter()
            .map(|(key, checked)| {
                format!(
                    r#"<div class="form-item checkbox"><input type="checkbox" id="features-{key}" name="{prefix}{key}"{checked}><label for="features-{key}">{label}</label></div>"#,
                    key = key,
                    prefix = FEATURE_PREFIX,
                    checked = if checked { " checked" } else { "" },
                    label = feature_label(key),
                )
            })
            .collect();
        format!(r#"<section><h2>Features</h2><div class="form-grid features">{}</div></section>"#, items)
    }

    fn render_images(&self) -> String {
        let images = &self.draft.images;
        let previews: String = images
            .files()
            .iter()
            .zip(images.preview_urls())
            .enumerate()
            .map(|(index, (file, src))| {
                format!(
                    r#"<div class="image-preview"><img src="{src}" alt="Car Image {number}"><input type="hidden" name="{staged}" value="{encoded}"><button type="submit" name="intent" value="remove-{index}">Remove</button></div>"#,
                    src = src,
                    number = index + 1,
                    staged = STAGED_IMAGES_FIELD,
                    encoded = escape(&ImageSelection::encode_staged(file)),
                    index = index,
                )
            })
            .collect();

        let error = self
            .error_for(IMAGES_FIELD)
            .map(|message| format!(r#"<p class="form-error" data-field="{}">{}</p>"#, IMAGES_FIELD, escape(message)))
            .unwrap_or_default();

        format!(
            r#"<section><h2>Images</h2>
<input type="file" name="{images}" multiple accept="image/*">
<button type="submit" name="intent" value="attach">Attach</button>
<p class="hint">Maximum {max} images allowed</p>{error}
<div class="image-grid">{previews}</div>
</section>"#,
            images = IMAGES_FIELD,
            max = MAX_IMAGES,
            error = error,
            previews = previews,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::car_dto::PayloadPart;

    fn image(name: &str) -> ImageFile {
        ImageFile::new(name, "image/jpeg", name.as_bytes().to_vec())
    }

    fn valid_draft() -> CarDraft {
        let mut draft = CarDraft::default();
        for (name, value) in [
            ("registrationNo", "LEA-1234"),
            ("yearOfModel", "2021"),
            ("registeredCity", "Lahore"),
            ("carType", "sedan"),
            ("carMake", "toyota"),
            ("carModel", "Corolla"),
            ("engineCapacity", "1800cc"),
            ("chassisNo", "CH-99"),
            ("engineNo", "EN-42"),
        ] {
            assert!(draft.set(name, value));
        }
        draft
    }

    #[test]
    fn test_default_draft_is_invalid_on_every_mandatory_field() {
        let errors = CarDraft::default().validate().unwrap_err();
        let fields = errors.field_errors();

        for key in [
            "registration_no",
            "year_of_model",
            "registered_city",
            "car_type",
            "car_make",
            "car_model",
            "engine_capacity",
            "chassis_no",
            "engine_no",
        ] {
            assert!(fields.contains_key(key), "expected error for {}", key);
        }
        assert_eq!(fields.len(), 9);
    }

    #[test]
    fn test_each_mandatory_field_blocks_alone() {
        for def in scalar_fields() {
            let mut draft = valid_draft();
            draft.set(def.name, "");
            let mandatory = REQUIRED_FIELDS.contains(&def.name);
            assert_eq!(draft.validate().is_err(), mandatory, "field {}", def.name);
        }
    }

    #[test]
    fn test_rate_and_price_must_be_non_negative() {
        let mut draft = valid_draft();
        assert!(draft.validate().is_ok());

        draft.set("ratePerDay", "-5");
        let errors = draft.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("rate_per_day"));

        draft.set("ratePerDay", "0");
        draft.set("priceOfVehicle", "-1");
        let errors = draft.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price_of_vehicle"));
        assert!(!errors.field_errors().contains_key("rate_per_day"));

        draft.set("priceOfVehicle", "3500000");
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_image_selection_caps_at_ten() {
        let mut selection = ImageSelection::default();
        selection.extend((0..7).map(|i| image(&format!("a{}.jpg", i))));
        selection.extend((0..6).map(|i| image(&format!("b{}.jpg", i))));

        assert_eq!(selection.len(), MAX_IMAGES);
        let names: Vec<_> = selection.files().iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names[0], "a0.jpg");
        assert_eq!(names[6], "a6.jpg");
        assert_eq!(names[9], "b2.jpg");
    }

    #[test]
    fn test_image_selection_keeps_duplicates() {
        let mut selection = ImageSelection::default();
        selection.extend(vec![image("same.jpg"), image("same.jpg")]);
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_remove_image_preserves_order() {
        let mut selection = ImageSelection::default();
        selection.extend(vec![image("0"), image("1"), image("2"), image("3")]);

        let removed = selection.remove(1).unwrap();
        assert_eq!(removed.file_name, "1");
        let names: Vec<_> = selection.files().iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["0", "2", "3"]);

        assert!(selection.remove(10).is_none());
        assert_eq!(selection.len(), 3);
        assert_eq!(selection.preview_urls().len(), 3);
    }

    #[test]
    fn test_staged_round_trip_keeps_name_and_type() {
        let file = ImageFile::new("my car|1.png", "image/png", vec![0u8, 159, 146, 150]);
        let encoded = ImageSelection::encode_staged(&file);
        assert_eq!(ImageSelection::decode_staged(&encoded), Some(file));
        assert!(ImageSelection::decode_staged("garbage").is_none());
    }

    #[test]
    fn test_payload_layout() {
        let mut draft = valid_draft();
        draft.set("ratePerDay", " 2500 ");
        draft.features.heater = true;
        draft.images.extend(vec![image("x.jpg"), image("y.jpg")]);

        let payload = draft.to_payload().unwrap();
        let names: Vec<_> = payload.parts().iter().map(PayloadPart::name).collect();

        assert_eq!(names.len(), 21 + 1 + 2);
        assert_eq!(names[0], "registrationNo");
        assert_eq!(names[20], "fuelAverage");
        assert_eq!(names[21], "features");
        assert_eq!(&names[22..], &["images", "images"]);

        assert_eq!(payload.text_value("ratePerDay"), Some("2500"));
        assert_eq!(payload.text_value("priceOfVehicle"), Some("0"));
        assert_eq!(payload.text_value("color"), Some(""));

        let features: CarFeatures = serde_json::from_str(payload.text_value("features").unwrap()).unwrap();
        assert!(features.heater);
        assert_eq!(features.enabled_count(), 1);
        assert_eq!(payload.files("images")[1].file_name, "y.jpg");
    }

    #[test]
    fn test_render_shows_image_error() {
        let mut draft = valid_draft();
        draft.images.extend(vec![image("a.jpg"), image("b.jpg")]);

        let mut errors = BTreeMap::new();
        errors.insert(IMAGES_FIELD, "Selected images exceed the upload limit".to_string());
        let html = CarForm::with_errors(draft, errors).render();

        assert!(html.contains(r#"<p class="form-error" data-field="images">Selected images exceed the upload limit</p>"#));
        assert!(html.contains(r#"value="LEA-1234""#));
        assert!(html.contains(r#"alt="Car Image 2""#));
        assert_eq!(html.matches("data:image/jpeg;base64,").count(), 2);
    }

    #[test]
    fn test_intent_parse() {
        assert_eq!(FormIntent::parse("save"), FormIntent::Save);
        assert_eq!(FormIntent::parse("attach"), FormIntent::Attach);
        assert_eq!(FormIntent::parse("remove-3"), FormIntent::Remove(3));
        assert_eq!(FormIntent::parse("remove-x"), FormIntent::Save);
        assert_eq!(FormIntent::parse(""), FormIntent::Save);
    }

    #[test]
    fn test_feature_labels() {
        assert_eq!(feature_label("airConditioner"), "Air Conditioner");
        assert_eq!(feature_label("cdDvdPlayer"), "Cd Dvd Player");
        assert_eq!(feature_label("heater"), "Heater");
    }

    #[test]
    fn test_render_shows_inline_errors_and_values() {
        let mut draft = valid_draft();
        draft.set("carModel", "");
        draft.set("color", r#"deep "blue""#);
        draft.features.sun_roof = true;
        draft.images.extend(vec![image("p.jpg")]);

        let errors = draft.validate().unwrap_err();
        let form = CarForm::with_errors(draft, crate::utils::validation::first_messages(&errors));
        let html = form.render();

        assert!(html.contains(r#"<p class="form-error" data-field="carModel">Car model is required</p>"#));
        assert!(html.contains(r#"value="deep &quot;blue&quot;""#));
        assert!(html.contains(r#"<option value="toyota" selected>Toyota</option>"#));
        assert!(html.contains(r#"name="features.sunRoof" checked"#));
        assert!(html.contains(r#"name="intent" value="remove-0""#));
        assert!(html.contains("data:image/jpeg;base64,"));
        assert_eq!(html.matches(r#"type="checkbox""#).count(), 17);
    }
}

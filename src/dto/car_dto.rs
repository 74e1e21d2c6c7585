use axum::body::Bytes;
use serde::Serialize;

/// Nombre compartido de las partes binarias de imagen
pub const IMAGES_FIELD: &str = "images";

/// Nombre de la parte de texto que lleva el JSON de features
pub const FEATURES_FIELD: &str = "features";

// Archivo de imagen seleccionado en el formulario, antes de subirlo
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

// Parte individual del multipart del create
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadPart {
    Text { name: String, value: String },
    File { name: String, file: ImageFile },
}

impl PayloadPart {
    pub fn name(&self) -> &str {
        match self {
            PayloadPart::Text { name, .. } | PayloadPart::File { name, .. } => name,
        }
    }
}

// Payload multipart para `POST /cars`, en orden de envío
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarPayload {
    parts: Vec<PayloadPart>,
}

impl CarPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(PayloadPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn json<T: Serialize>(self, name: impl Into<String>, value: &T) -> Result<Self, serde_json::Error> {
        let encoded = serde_json::to_string(value)?;
        Ok(self.text(name, encoded))
    }

    pub fn file(mut self, name: impl Into<String>, file: ImageFile) -> Self {
        self.parts.push(PayloadPart::File {
            name: name.into(),
            file,
        });
        self
    }

    pub fn parts(&self) -> &[PayloadPart] {
        &self.parts
    }

    pub fn into_parts(self) -> Vec<PayloadPart> {
        self.parts
    }

    /// Valor de la primera parte de texto con ese nombre
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            PayloadPart::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn files(&self, name: &str) -> Vec<&ImageFile> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                PayloadPart::File { name: n, file } if n == name => Some(file),
                _ => None,
            })
            .collect()
    }
}

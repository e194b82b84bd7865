// src/api/multipart.rs

use std::fmt;
use std::path::{Path, PathBuf};

use reqwest::{
    multipart::{Form, Part},
    Method,
};
use serde_json::Value;

use crate::{
    api::client::{ApiClient, RequestBody},
    common::error::AppError,
};

/// Nombre fijo del campo binario que espera el backend.
pub const IMAGE_FIELD: &str = "imagen";
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";
const DEFAULT_FILENAME: &str = "imagen.jpg";

/// Imagen local elegida por el usuario (galería o cámara).
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    pub local_uri: PathBuf,
    pub filename: Option<String>,
    pub mime_type: Option<String>,
}

impl ImageAsset {
    /// Acepta rutas y URIs `file://`.
    pub fn from_uri(uri: &str) -> Self {
        let path = uri.strip_prefix("file://").unwrap_or(uri);
        let local_uri = PathBuf::from(path);
        let filename = local_uri
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .filter(|name| !name.is_empty());

        Self {
            local_uri,
            filename,
            mime_type: None,
        }
    }

    pub fn filename(&self) -> String {
        self.filename.clone().unwrap_or_else(|| DEFAULT_FILENAME.to_string())
    }

    pub fn mime(&self) -> String {
        self.mime_type
            .clone()
            .unwrap_or_else(|| infer_image_mime(&self.filename()))
    }
}

/// MIME por extensión; cualquier cosa que no sea imagen conocida cae en `image/jpeg`.
pub fn infer_image_mime(filename: &str) -> String {
    mime_guess::from_path(Path::new(filename))
        .first()
        .filter(|mime| mime.type_() == mime_guess::mime::IMAGE)
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    Number(f64),
}

impl fmt::Display for FormValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormValue::Text(text) => f.write_str(text),
            // 12.5 → "12.5", 3.0 → "3"
            FormValue::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Arma el formulario completo. La imagen se lee del disco antes de enviar
/// nada: si no se puede leer, no sale ninguna petición.
pub async fn build_form(fields: &[(&str, FormValue)], image: Option<&ImageAsset>) -> Result<Form, AppError> {
    let mut form = Form::new();
    for (name, value) in fields {
        form = form.text(name.to_string(), value.to_string());
    }

    if let Some(asset) = image {
        let bytes = tokio::fs::read(&asset.local_uri).await?;
        let part = Part::bytes(bytes)
            .file_name(asset.filename())
            .mime_str(&asset.mime())?;
        form = form.part(IMAGE_FIELD, part);
    }

    Ok(form)
}

#[derive(Clone)]
pub struct MultipartSubmitter {
    client: ApiClient,
}

impl MultipartSubmitter {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Envía campos + imagen opcional. El backend acepta todo o nada.
    pub async fn submit(
        &self,
        method: Method,
        endpoint: &str,
        fields: &[(&str, FormValue)],
        image: Option<&ImageAsset>,
    ) -> Result<Value, AppError> {
        let form = build_form(fields, image).await?;

        tracing::info!(
            "📤 Multipart {} {} ({} campos, imagen: {})",
            method,
            endpoint,
            fields.len(),
            image.is_some()
        );

        let response = self
            .client
            .send(method, endpoint, RequestBody::Multipart(form))
            .await?
            .into_result()?;

        response.json_value()
    }
}

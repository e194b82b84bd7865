// src/models/catalog.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

use crate::api::multipart::{FormValue, ImageAsset};
use crate::common::normalizer::RecordShape;
use crate::models::{parse_number, validate_positive_number, validate_required, Entity};

pub const UNIDADES_MEDIDA: [&str; 4] = ["Kg", "Pzas", "Combo", "Bolsa"];

// --- Producto (catálogo) ---
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id_producto: i64,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub unidad_medida: Option<String>,
    #[serde(default)]
    pub precio: f64,
    #[serde(default)]
    pub stock: Option<f64>,
    #[serde(default)]
    pub imagen: Option<String>,

    // Campos extra del backend, intactos
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Product {
    const SHAPE: RecordShape = RecordShape {
        discriminator: "id_producto",
        plural_keys: &["products", "productos"],
        numeric_fields: &["id_producto", "precio", "stock"],
    };
    const ENDPOINT: &'static str = "/products";
}

fn validate_unidad_medida(value: &str) -> Result<(), ValidationError> {
    validate_required(value).map_err(|mut err| {
        err.message = Some("Por favor, completa todos los campos obligatorios.".into());
        err
    })?;

    if UNIDADES_MEDIDA.contains(&value.trim()) {
        return Ok(());
    }
    let mut err = ValidationError::new("unidad_medida");
    err.message = Some("Selecciona una unidad de medida válida.".into());
    Err(err)
}

// ---
// Formulario: nuevo producto (con imagen opcional)
// ---
#[derive(Debug, Clone, Validate)]
pub struct ProductForm {
    #[validate(custom(function = "validate_required", message = "Por favor, completa todos los campos obligatorios."))]
    pub descripcion: String,

    #[validate(custom(function = "validate_unidad_medida"))]
    pub unidad_medida: String,

    #[validate(custom(function = "validate_positive_number", message = "Por favor, ingresa un precio válido."))]
    pub precio: String,

    pub imagen: Option<ImageAsset>,
}

impl ProductForm {
    /// Campos de texto del multipart, en el orden en que se envían.
    pub fn fields(&self) -> Vec<(&'static str, FormValue)> {
        vec![
            ("descripcion", FormValue::Text(self.descripcion.trim().to_string())),
            ("unidad_medida", FormValue::Text(self.unidad_medida.trim().to_string())),
            ("precio", FormValue::Number(parse_number(&self.precio).unwrap_or_default())),
        ]
    }
}

// src/models/crm.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::common::normalizer::RecordShape;
use crate::models::{non_blank, validate_required, Entity};

// --- Cliente ---
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id_cliente: i64,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub razon_social: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub direccion: Option<String>,

    // Otros nombres posibles (nombre_cliente, nombreCompleto, name...) quedan aquí
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Client {
    const SHAPE: RecordShape = RecordShape {
        discriminator: "id_cliente",
        plural_keys: &["clients", "clientes"],
        numeric_fields: &["id_cliente"],
    };
    const ENDPOINT: &'static str = "/clients";
}

impl Client {
    /// Nombre para el selector de clientes.
    pub fn display_name(&self) -> String {
        let extra = |key: &str| {
            self.extra
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        };

        self.nombre
            .as_deref()
            .and_then(non_blank)
            .or_else(|| self.razon_social.as_deref().and_then(non_blank))
            .or_else(|| extra("nombre_cliente"))
            .or_else(|| extra("nombreCompleto"))
            .or_else(|| extra("name"))
            .unwrap_or_else(|| format!("Cliente #{}", self.id_cliente))
    }
}

// ---
// Formulario: nuevo cliente
// ---
#[derive(Debug, Clone, Default, Validate)]
pub struct ClientForm {
    #[validate(custom(function = "validate_required", message = "Por favor, ingresa el nombre del cliente."))]
    pub nombre: String,
    pub razon_social: String,
    pub email: String,
    pub telefono: String,
    pub direccion: String,
}

impl ClientForm {
    /// Solo se envían los campos opcionales que tienen contenido.
    pub fn to_payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("nombre".into(), Value::String(self.nombre.trim().to_string()));

        let optional = [
            ("razon_social", &self.razon_social),
            ("email", &self.email),
            ("telefono", &self.telefono),
            ("direccion", &self.direccion),
        ];
        for (key, value) in optional {
            if let Some(value) = non_blank(value) {
                payload.insert(key.into(), Value::String(value));
            }
        }

        Value::Object(payload)
    }
}

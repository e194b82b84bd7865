// src/models/tenancy.rs

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use validator::Validate;

use crate::common::normalizer::RecordShape;
use crate::models::{validate_required, Entity};

// --- Sucursal ---
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Branch {
    pub id_sucursal: i64,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub imagen: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Branch {
    const SHAPE: RecordShape = RecordShape {
        discriminator: "id_sucursal",
        plural_keys: &["sucursales", "branches"],
        numeric_fields: &["id_sucursal"],
    };
    const ENDPOINT: &'static str = "/sucursales";
}

impl Branch {
    pub fn display_name(&self) -> String {
        match self.nombre.as_deref().map(str::trim) {
            Some(nombre) if !nombre.is_empty() => nombre.to_string(),
            _ => format!("Sucursal #{}", self.id_sucursal),
        }
    }
}

// ---
// Formulario: nuevo usuario de la sucursal
// ---
#[derive(Debug, Clone, Default, Validate)]
pub struct UserForm {
    #[validate(custom(function = "validate_required", message = "Por favor, completa todos los campos obligatorios."))]
    pub nombre: String,

    #[validate(custom(function = "validate_required", message = "Por favor, completa todos los campos obligatorios."))]
    pub email: String,

    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres."))]
    pub password: String,

    // Si viene vacío se toma la sucursal del usuario en sesión
    #[validate(required(message = "Por favor, completa todos los campos obligatorios."))]
    pub id_sucursal: Option<i64>,
}

impl UserForm {
    pub fn to_payload(&self) -> Value {
        json!({
            "nombre": self.nombre.trim(),
            "email": self.email.trim(),
            "password": self.password,
            "id_sucursal": self.id_sucursal,
        })
    }
}

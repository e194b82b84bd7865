// src/models/auth.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::models::validate_required;

// Datos para login
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginForm {
    #[validate(custom(function = "validate_required", message = "Por favor completa todos los campos"))]
    pub email: String,
    #[validate(custom(function = "validate_required", message = "Por favor completa todos los campos"))]
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            // El email se recorta, la contraseña se envía tal cual
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }
}

/// Perfil del usuario tal como lo entrega el backend. No se impone esquema:
/// todos los campos pasan intactos y se leen de forma defensiva.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(pub Map<String, Value>);

impl UserProfile {
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str).filter(|s| !s.trim().is_empty())
    }

    fn integer(&self, key: &str) -> Option<i64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn nombre(&self) -> Option<&str> {
        self.text("nombre").or_else(|| self.text("name"))
    }

    pub fn email(&self) -> Option<&str> {
        self.text("email")
    }

    pub fn id_usuario(&self) -> Option<i64> {
        self.integer("id_usuario")
    }

    pub fn id_sucursal(&self) -> Option<i64> {
        self.integer("id_sucursal")
    }
}

/// Estado de sesión persistido: token bearer y perfil.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub profile: Option<UserProfile>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

// src/models/production.rs

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use validator::{Validate, ValidationError};

use crate::common::normalizer::RecordShape;
use crate::models::{
    parse_number, validate_not_negative, validate_optional_not_negative, validate_positive_number, Entity,
};

// --- Registro de producción ---
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductionEntry {
    pub id_produccion: i64,
    #[serde(default)]
    pub produccion_kg: f64,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub devolucion: f64,
    #[serde(default)]
    pub id_cliente: Option<i64>,
    #[serde(default)]
    pub fecha: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for ProductionEntry {
    const SHAPE: RecordShape = RecordShape {
        discriminator: "id_produccion",
        plural_keys: &["production", "produccion", "producciones"],
        numeric_fields: &["id_produccion", "produccion_kg", "total", "devolucion", "id_cliente"],
    };
    const ENDPOINT: &'static str = "/production";
}

// ---
// Formulario: nueva producción
// ---
#[derive(Debug, Clone, Default, Validate)]
#[validate(schema(function = "validate_required_fields", skip_on_field_errors = false))]
pub struct ProductionForm {
    #[validate(custom(function = "validate_positive_number", message = "Por favor, ingresa una producción válida en kg."))]
    pub produccion_kg: String,

    #[validate(custom(function = "validate_not_negative", message = "Por favor, ingresa un total válido."))]
    pub total: String,

    // Vacío equivale a 0
    #[validate(custom(function = "validate_optional_not_negative", message = "Por favor, ingresa una devolución válida."))]
    pub devolucion: String,

    #[validate(required(message = "Por favor, completa todos los campos obligatorios."))]
    pub id_cliente: Option<i64>,
}

// Campos vacíos se reportan antes que los valores inválidos
fn validate_required_fields(form: &ProductionForm) -> Result<(), ValidationError> {
    if form.produccion_kg.trim().is_empty() || form.total.trim().is_empty() || form.id_cliente.is_none() {
        let mut err = ValidationError::new("required");
        err.message = Some("Por favor, completa todos los campos obligatorios.".into());
        return Err(err);
    }
    Ok(())
}

impl ProductionForm {
    pub fn to_payload(&self) -> Value {
        json!({
            "produccion_kg": parse_number(&self.produccion_kg).unwrap_or_default(),
            "total": parse_number(&self.total).unwrap_or_default(),
            "devolucion": parse_number(&self.devolucion).unwrap_or_default(),
            "id_cliente": self.id_cliente,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::AppError;

    fn form(kg: &str, total: &str, devolucion: &str, cliente: Option<i64>) -> ProductionForm {
        ProductionForm {
            produccion_kg: kg.into(),
            total: total.into(),
            devolucion: devolucion.into(),
            id_cliente: cliente,
        }
    }

    #[test]
    fn validation_rules() {
        assert!(form("10", "0", "", Some(1)).validate().is_ok());
        assert!(form("0", "100", "", Some(1)).validate().is_err());
        assert!(form("10", "-1", "", Some(1)).validate().is_err());
        assert!(form("10", "100", "x", Some(1)).validate().is_err());
        assert!(form("10", "100", "", None).validate().is_err());
    }

    #[test]
    fn blank_required_field_wins_over_invalid_value() {
        let message = |f: ProductionForm| AppError::from(f.validate().unwrap_err()).user_message();
        let required = "Por favor, completa todos los campos obligatorios.";

        assert_eq!(message(form("10", "", "", Some(1))), required);
        assert_eq!(message(form("0", " ", "", Some(1))), required);
        assert_eq!(message(form("", "100", "", Some(1))), required);
        assert_eq!(message(form("0", "100", "", Some(1))), "Por favor, ingresa una producción válida en kg.");
        assert_eq!(message(form("10", "-1", "", Some(1))), "Por favor, ingresa un total válido.");
    }

    #[test]
    fn blank_devolucion_is_sent_as_zero() {
        let payload = form("12.5", "300", "  ", Some(4)).to_payload();
        assert_eq!(payload["produccion_kg"], json!(12.5));
        assert_eq!(payload["devolucion"], json!(0.0));
        assert_eq!(payload["id_cliente"], json!(4));
    }
}

pub mod auth;
pub mod catalog;
pub mod crm;
pub mod production;
pub mod sales;
pub mod tenancy;

use serde::de::DeserializeOwned;
use validator::ValidationError;

use crate::common::normalizer::RecordShape;

/// Una colección del backend que se puede normalizar y tipar.
pub trait Entity: DeserializeOwned + Clone + Send + Sync + 'static {
    const SHAPE: RecordShape;
    /// Ruta de la colección, relativa a `/api`
    const ENDPOINT: &'static str;
}

// ---
// Validaciones compartidas por los formularios
// ---

pub(crate) fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

pub(crate) fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

pub(crate) fn validate_positive_number(value: &str) -> Result<(), ValidationError> {
    match parse_number(value) {
        Some(n) if n > 0.0 => Ok(()),
        _ => {
            let mut err = ValidationError::new("range");
            err.add_param("min".into(), &0.0);
            Err(err)
        }
    }
}

pub(crate) fn validate_not_negative(value: &str) -> Result<(), ValidationError> {
    match parse_number(value) {
        Some(n) if n >= 0.0 => Ok(()),
        _ => Err(ValidationError::new("range")),
    }
}

/// Campo opcional: vacío equivale a 0.
pub(crate) fn validate_optional_not_negative(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    validate_not_negative(value)
}

pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

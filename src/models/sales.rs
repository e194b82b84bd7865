// src/models/sales.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::normalizer::RecordShape;
use crate::models::Entity;

/// Formato de fecha que espera el backend (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// --- Reporte de ventas por día ---
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalesReport {
    pub fecha: String,
    #[serde(default)]
    pub id_sucursal: Option<i64>,
    #[serde(default)]
    pub total_ventas: f64,
    #[serde(default)]
    pub numero_ventas: f64,
    #[serde(default)]
    pub total: f64,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for SalesReport {
    const SHAPE: RecordShape = RecordShape {
        discriminator: "fecha",
        plural_keys: &["reportes", "reports"],
        numeric_fields: &["id_sucursal", "total_ventas", "numero_ventas", "total"],
    };
    // Se completa con el id de sucursal: /sales-integration/reportes/:idSucursal
    const ENDPOINT: &'static str = "/sales-integration/reportes";
}

impl SalesReport {
    pub fn date(&self) -> Option<NaiveDate> {
        // El backend a veces manda timestamp completo; basta con el día
        let day = self.fecha.get(..10).unwrap_or(&self.fecha);
        NaiveDate::parse_from_str(day, DATE_FORMAT).ok()
    }
}

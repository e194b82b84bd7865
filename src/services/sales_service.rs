// src/services/sales_service.rs

use chrono::NaiveDate;
use reqwest::Method;
use serde_json::Value;

use crate::{
    api::client::{ApiClient, ApiResponse, RequestBody},
    common::{error::AppError, normalizer::decode_one},
    models::{
        sales::{format_date, SalesReport},
        Entity,
    },
    services::list_store::RemoteListStore,
};

/// Rutas alternativas de "ventas de hoy". Se prueban en este orden.
pub const SALES_TODAY_PATHS: [&str; 4] = [
    "/sales-integration/ventas-hoy",
    "/sales-integration/sales-today",
    "/sales-integration/today",
    "/sales-integration/reporte-hoy",
];

/// Resultado del sondeo: qué ruta respondió y su cuerpo.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesToday {
    pub path: String,
    pub payload: Value,
}

#[derive(Clone)]
pub struct SalesService {
    client: ApiClient,
}

impl SalesService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Reportes por día de una sucursal. El rango se fija con `set_date_range`.
    pub fn reports(&self, id_sucursal: i64) -> RemoteListStore<SalesReport> {
        RemoteListStore::with_path(
            self.client.clone(),
            format!("{}/{}", SalesReport::ENDPOINT, id_sucursal),
        )
    }

    pub async fn report_detail(&self, id_sucursal: i64, fecha: NaiveDate) -> Result<Option<SalesReport>, AppError> {
        let path = format!("/sales-integration/reporte/{}/{}", id_sucursal, format_date(fecha));
        let response = self.client.get(&path).await?.into_result()?;
        let payload = response.json_value()?;
        Ok(decode_one(&payload, &SalesReport::SHAPE, &["reporte", "report"])?)
    }

    /// Pide al backend sincronizar las ventas de la sucursal.
    pub async fn request_sync(&self, id_sucursal: i64) -> Result<Value, AppError> {
        self.client.session().require_token().await?;
        let path = format!("/sales-integration/request-sync/{}", id_sucursal);
        let response = self
            .client
            .send(Method::POST, &path, RequestBody::Empty)
            .await?
            .into_result()?;

        tracing::info!("🔄 Sincronización solicitada para sucursal {}", id_sucursal);
        response.json_value()
    }

    /// Prueba las rutas en orden; gana la primera 2xx y las siguientes no se
    /// llaman. Un 401 corta el sondeo.
    pub async fn sales_today(&self, id_sucursal: i64) -> Result<SalesToday, AppError> {
        self.probe(&SALES_TODAY_PATHS, id_sucursal).await
    }

    async fn probe(&self, paths: &[&str], id_sucursal: i64) -> Result<SalesToday, AppError> {
        let mut last_error = AppError::NotFound {
            path: "ventas de hoy".to_string(),
        };

        for base in paths {
            let path = format!("{}/{}", base, id_sucursal);
            match self.client.get(&path).await.and_then(ApiResponse::into_result) {
                Ok(response) => {
                    tracing::info!("✅ Ventas de hoy obtenidas desde {}", path);
                    return Ok(SalesToday {
                        path,
                        payload: response.json_value()?,
                    });
                }
                Err(AppError::SessionExpired) => return Err(AppError::SessionExpired),
                Err(e) => {
                    tracing::debug!("{} falló, se prueba la siguiente: {}", path, e);
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}

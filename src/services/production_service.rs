// src/services/production_service.rs

use reqwest::Method;
use serde_json::Value;
use validator::Validate;

use crate::{
    api::client::{ApiClient, RequestBody},
    common::error::AppError,
    models::{
        production::{ProductionEntry, ProductionForm},
        Entity,
    },
    services::list_store::RemoteListStore,
};

#[derive(Clone)]
pub struct ProductionService {
    client: ApiClient,
}

impl ProductionService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn entries(&self) -> RemoteListStore<ProductionEntry> {
        RemoteListStore::new(self.client.clone())
    }

    pub async fn create_production(&self, form: &ProductionForm) -> Result<Value, AppError> {
        form.validate()?;
        self.client.session().require_token().await?;

        let response = self
            .client
            .send(Method::POST, ProductionEntry::ENDPOINT, RequestBody::Json(form.to_payload()))
            .await?
            .into_result()?;

        tracing::info!("🏭 Producción registrada para cliente {:?}", form.id_cliente);
        response.json_value()
    }
}

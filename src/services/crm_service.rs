// src/services/crm_service.rs

use reqwest::Method;
use serde_json::Value;
use validator::Validate;

use crate::{
    api::client::{ApiClient, RequestBody},
    common::error::AppError,
    models::{
        crm::{Client, ClientForm},
        Entity,
    },
    services::list_store::RemoteListStore,
};

#[derive(Clone)]
pub struct CrmService {
    client: ApiClient,
}

impl CrmService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Clientes para el selector del formulario de producción.
    pub fn clients(&self) -> RemoteListStore<Client> {
        RemoteListStore::new(self.client.clone())
    }

    pub async fn create_client(&self, form: &ClientForm) -> Result<Value, AppError> {
        form.validate()?;
        self.client.session().require_token().await?;

        let response = self
            .client
            .send(Method::POST, Client::ENDPOINT, RequestBody::Json(form.to_payload()))
            .await?
            .into_result()?;

        tracing::info!("👤 Cliente agregado: {}", form.nombre.trim());
        response.json_value()
    }
}

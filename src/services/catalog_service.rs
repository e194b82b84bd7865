// src/services/catalog_service.rs

use reqwest::Method;
use serde_json::Value;
use validator::Validate;

use crate::{
    api::{client::ApiClient, multipart::MultipartSubmitter},
    common::error::AppError,
    models::{
        catalog::{Product, ProductForm},
        Entity,
    },
    services::list_store::RemoteListStore,
};

#[derive(Clone)]
pub struct CatalogService {
    client: ApiClient,
    submitter: MultipartSubmitter,
}

impl CatalogService {
    pub fn new(client: ApiClient) -> Self {
        Self {
            submitter: MultipartSubmitter::new(client.clone()),
            client,
        }
    }

    /// Lista de productos para la pantalla de catálogo.
    pub fn products(&self) -> RemoteListStore<Product> {
        RemoteListStore::new(self.client.clone())
    }

    /// Alta de producto (multipart, imagen opcional).
    pub async fn create_product(&self, form: &ProductForm) -> Result<Value, AppError> {
        form.validate()?;
        self.client.session().require_token().await?;

        let created = self
            .submitter
            .submit(Method::POST, Product::ENDPOINT, &form.fields(), form.imagen.as_ref())
            .await?;

        tracing::info!("📦 Producto agregado: {}", form.descripcion.trim());
        Ok(created)
    }
}

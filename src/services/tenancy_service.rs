// src/services/tenancy_service.rs

use reqwest::Method;
use serde_json::Value;
use validator::Validate;

use crate::{
    api::{
        client::{ApiClient, RequestBody},
        multipart::{ImageAsset, MultipartSubmitter},
    },
    common::{error::AppError, normalizer::decode_one},
    models::{
        tenancy::{Branch, UserForm},
        Entity,
    },
    services::list_store::RemoteListStore,
};

pub const BRANCH_INFO_PATH: &str = "/auth/sucursal";
pub const BRANCH_IMAGE_PATH: &str = "/auth/sucursal/imagen";
pub const USERS_PATH: &str = "/usuarios";

#[derive(Clone)]
pub struct TenancyService {
    client: ApiClient,
    submitter: MultipartSubmitter,
}

impl TenancyService {
    pub fn new(client: ApiClient) -> Self {
        Self {
            submitter: MultipartSubmitter::new(client.clone()),
            client,
        }
    }

    /// Sucursales para el selector del alta de usuarios.
    pub fn branches(&self) -> RemoteListStore<Branch> {
        RemoteListStore::new(self.client.clone())
    }

    /// Sucursal del usuario en sesión. Un 404 significa que el backend no
    /// ofrece este endpoint: `Ok(None)`, sin error.
    pub async fn branch_info(&self) -> Result<Option<Branch>, AppError> {
        let response = match self.client.get(BRANCH_INFO_PATH).await?.into_result() {
            Ok(response) => response,
            Err(AppError::NotFound { .. }) => {
                tracing::info!("{} no disponible, se omite", BRANCH_INFO_PATH);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let payload = response.json_value()?;
        Ok(decode_one(&payload, &Branch::SHAPE, &["sucursal", "branch"])?)
    }

    /// Reemplaza la imagen de la sucursal (PUT multipart, imagen obligatoria).
    pub async fn update_branch_image(&self, image: &ImageAsset) -> Result<Value, AppError> {
        self.client.session().require_token().await?;
        self.submitter
            .submit(Method::PUT, BRANCH_IMAGE_PATH, &[], Some(image))
            .await
    }

    /// Alta de usuario. Sin sucursal explícita se usa la del perfil en sesión.
    pub async fn create_user(&self, form: &UserForm) -> Result<Value, AppError> {
        let mut form = form.clone();
        if form.id_sucursal.is_none() {
            form.id_sucursal = self
                .client
                .session()
                .profile()
                .await?
                .and_then(|profile| profile.id_sucursal());
        }

        form.validate()?;
        self.client.session().require_token().await?;

        let response = self
            .client
            .send(Method::POST, USERS_PATH, RequestBody::Json(form.to_payload()))
            .await?
            .into_result()?;

        tracing::info!("🧑‍💼 Usuario agregado: {}", form.email.trim());
        response.json_value()
    }
}

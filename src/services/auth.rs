// src/services/auth.rs

use reqwest::{Method, StatusCode};
use serde_json::Value;
use validator::Validate;

use crate::{
    api::client::{ApiClient, RequestBody},
    common::error::{extract_server_message, AppError},
    models::auth::{LoginForm, Session, UserProfile},
};

pub const LOGIN_PATH: &str = "/auth/login";

#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Valida, autentica y guarda token + perfil en la sesión.
    pub async fn login(&self, form: &LoginForm) -> Result<Session, AppError> {
        form.validate()?;

        tracing::info!("🔐 Iniciando sesión para {}", form.email);

        let body = serde_json::json!({ "email": form.email, "password": form.password });
        let response = self
            .client
            .send_anonymous(Method::POST, LOGIN_PATH, RequestBody::Json(body))
            .await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED => return Err(AppError::InvalidCredentials),
            StatusCode::NOT_FOUND => {
                return Err(AppError::NotFound {
                    path: self.client.url(LOGIN_PATH),
                })
            }
            StatusCode::INTERNAL_SERVER_ERROR => {
                return Err(AppError::Server {
                    status: 500,
                    message: "Error interno del servidor".to_string(),
                })
            }
            status => {
                return Err(AppError::Server {
                    status: status.as_u16(),
                    message: extract_server_message(status, response.text()),
                })
            }
        }

        let payload = response.json_value()?;
        let token = find_token(&payload).ok_or_else(|| AppError::Server {
            status: response.status().as_u16(),
            message: "Respuesta de login sin token".to_string(),
        })?;
        let profile = find_profile(&payload);

        let session = self.client.session().start(&token, profile.as_ref()).await?;
        tracing::info!(
            "✅ Sesión iniciada ({})",
            profile.as_ref().and_then(UserProfile::nombre).unwrap_or("sin perfil")
        );
        Ok(session)
    }

    pub async fn logout(&self) -> Result<(), AppError> {
        self.client.session().logout().await
    }

    pub async fn current_session(&self) -> Result<Session, AppError> {
        self.client.session().current().await
    }
}

// El backend ha entregado el token en varios lugares distintos
fn find_token(payload: &Value) -> Option<String> {
    ["/token", "/data/token", "/accessToken", "/data/accessToken"]
        .iter()
        .filter_map(|pointer| payload.pointer(pointer))
        .filter_map(Value::as_str)
        .find(|token| !token.is_empty())
        .map(str::to_string)
}

fn find_profile(payload: &Value) -> Option<UserProfile> {
    ["/user", "/usuario", "/data/usuario", "/data/user"]
        .iter()
        .filter_map(|pointer| payload.pointer(pointer))
        .find_map(|value| UserProfile::from_value(value.clone()))
}

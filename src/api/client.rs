// src/api/client.rs

use reqwest::{
    header::{ACCEPT, AUTHORIZATION},
    multipart::Form,
    Client, Method, StatusCode, Url,
};
use serde_json::Value;

use crate::{
    common::error::AppError,
    config::{AppConfig, BuildProfile, API_PREFIX},
    services::session::SessionService,
};

/// Cuerpo de la petición. Solo `Json` lleva `Content-Type: application/json`;
/// para multipart reqwest pone el boundary.
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(Form),
}

/// Respuesta ya leída por completo.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    path: String,
    body: String,
}

impl ApiResponse {
    pub fn new(status: StatusCode, path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            path: path.into(),
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    /// Cuerpo vacío se lee como `null`.
    pub fn json_value(&self) -> Result<Value, AppError> {
        if self.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&self.body)?)
    }

    /// 2xx pasa; cualquier otro status se clasifica como error.
    pub fn into_result(self) -> Result<Self, AppError> {
        if self.is_success() {
            return Ok(self);
        }
        Err(AppError::from_status(self.status, &self.path, &self.body))
    }
}

/// Cliente HTTP autenticado: agrega el bearer de la sesión, e invalida el
/// token ante un 401. No reintenta.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: SessionService,
    // Pista de diagnóstico solo para builds de desarrollo
    connection_hint: Option<String>,
}

impl ApiClient {
    pub fn new(config: &AppConfig, session: SessionService) -> Result<Self, AppError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        let base_url = config.api_url();
        let connection_hint = match config.profile {
            BuildProfile::Development => expected_host(&base_url),
            BuildProfile::Production => None,
        };

        Ok(Self {
            http,
            base_url,
            session,
            connection_hint,
        })
    }

    /// Cliente contra una URL de servidor arbitraria (se le agrega `/api`).
    pub fn with_base_url(server_url: &str, session: SessionService) -> Result<Self, AppError> {
        let config = AppConfig {
            base_url_override: Some(server_url.to_string()),
            ..AppConfig::default()
        };
        Self::new(&config, session)
    }

    pub fn session(&self) -> &SessionService {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    pub async fn send(&self, method: Method, path: &str, body: RequestBody) -> Result<ApiResponse, AppError> {
        self.execute(method, path, &[], body, true).await
    }

    pub async fn send_with_query(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: RequestBody,
    ) -> Result<ApiResponse, AppError> {
        self.execute(method, path, query, body, true).await
    }

    /// Sin bearer (login).
    pub async fn send_anonymous(&self, method: Method, path: &str, body: RequestBody) -> Result<ApiResponse, AppError> {
        self.execute(method, path, &[], body, false).await
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse, AppError> {
        self.send(Method::GET, path, RequestBody::Empty).await
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: RequestBody,
        authenticated: bool,
    ) -> Result<ApiResponse, AppError> {
        let url = self.url(path);
        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(ACCEPT, "application/json");

        if !query.is_empty() {
            request = request.query(query);
        }

        if authenticated {
            let token = self.session.token().await?;
            tracing::debug!("{} {} (token presente: {})", method, url, token.is_some());
            if let Some(token) = token {
                request = request.header(AUTHORIZATION, format!("Bearer {token}"));
            }
        }

        request = match body {
            RequestBody::Empty => request,
            // `.json` agrega Content-Type: application/json
            RequestBody::Json(value) => request.json(&value),
            RequestBody::Multipart(form) => request.multipart(form),
        };

        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        tracing::info!("{} {} → {}", method, path, status);

        if status == StatusCode::UNAUTHORIZED && authenticated {
            // Que las siguientes peticiones no reutilicen un token muerto
            self.session.clear_token().await?;
            tracing::warn!("🔒 401 en {}: token eliminado de la sesión", path);
        }

        let shown_path = format!("{}/{}", API_PREFIX, path.trim_start_matches('/'));
        Ok(ApiResponse::new(status, shown_path, body))
    }

    fn transport_error(&self, e: reqwest::Error) -> AppError {
        if e.is_builder() {
            return AppError::Http(e);
        }
        tracing::error!("🔥 Sin conexión con el servidor: {}", e);
        AppError::Connection {
            message: e.to_string(),
            hint: self.connection_hint.clone(),
        }
    }
}

fn expected_host(base_url: &str) -> Option<String> {
    let url = Url::parse(base_url).ok()?;
    let host = url.host_str()?;
    let port = url.port_or_known_default()?;
    Some(format!("servidor esperado en {host}:{port}"))
}

// src/config.rs

use std::{env, path::PathBuf, str::FromStr, sync::Arc, time::Duration};

use anyhow::{bail, Context};

use crate::{
    api::client::ApiClient,
    common::storage::{FileStore, KeyValueStore},
    services::{
        auth::AuthService, catalog_service::CatalogService, crm_service::CrmService,
        production_service::ProductionService, sales_service::SalesService, session::SessionService,
        tenancy_service::TenancyService,
    },
};

pub const API_PREFIX: &str = "/api";
const DEFAULT_DEVICE_IP: &str = "192.168.1.18";
const DEFAULT_PORT: u16 = 4000;
const DEFAULT_SESSION_FILE: &str = ".portal-session.json";

/// A qué backend apunta el build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiTarget {
    /// Dispositivo físico en la LAN
    Physical { ip: String },
    /// Alias de loopback del emulador Android
    Emulator,
    Localhost,
    Production { url: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildProfile {
    Development,
    Production,
}

impl FromStr for BuildProfile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => bail!("PORTAL_PROFILE desconocido: {other}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub target: ApiTarget,
    pub port: u16,
    /// Si está definido, ignora `target` por completo
    pub base_url_override: Option<String>,
    pub profile: BuildProfile,
    pub session_file: PathBuf,
    pub request_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target: ApiTarget::Physical {
                ip: DEFAULT_DEVICE_IP.to_string(),
            },
            port: DEFAULT_PORT,
            base_url_override: None,
            profile: BuildProfile::Development,
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            request_timeout: None,
        }
    }
}

impl AppConfig {
    /// Lee `.env` (si existe) y las variables `PORTAL_*`.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match var("PORTAL_API_PORT") {
            Some(raw) => raw.parse().with_context(|| format!("PORTAL_API_PORT inválido: {raw}"))?,
            None => DEFAULT_PORT,
        };

        let target = match var("PORTAL_API_TARGET").as_deref().unwrap_or("physical") {
            "physical" => ApiTarget::Physical {
                ip: var("PORTAL_DEVICE_IP").unwrap_or_else(|| DEFAULT_DEVICE_IP.to_string()),
            },
            "emulator" => ApiTarget::Emulator,
            "localhost" => ApiTarget::Localhost,
            "production" => ApiTarget::Production {
                url: var("PORTAL_PRODUCTION_URL")
                    .context("PORTAL_PRODUCTION_URL debe definirse para el target production")?,
            },
            other => bail!("PORTAL_API_TARGET desconocido: {other}"),
        };

        let profile = match var("PORTAL_PROFILE") {
            Some(raw) => raw.parse()?,
            None => BuildProfile::Development,
        };

        let request_timeout = match var("PORTAL_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .parse()
                    .with_context(|| format!("PORTAL_REQUEST_TIMEOUT_SECS inválido: {raw}"))?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            target,
            port,
            base_url_override: var("PORTAL_API_BASE_URL"),
            profile,
            session_file: var("PORTAL_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE)),
            request_timeout,
        })
    }

    pub fn base_url(&self) -> String {
        if let Some(url) = &self.base_url_override {
            return url.trim_end_matches('/').to_string();
        }
        match &self.target {
            ApiTarget::Physical { ip } => format!("http://{}:{}", ip, self.port),
            ApiTarget::Emulator => format!("http://10.0.2.2:{}", self.port),
            ApiTarget::Localhost => format!("http://localhost:{}", self.port),
            ApiTarget::Production { url } => url.trim_end_matches('/').to_string(),
        }
    }

    /// URL base con el prefijo `/api`.
    pub fn api_url(&self) -> String {
        format!("{}{}", self.base_url(), API_PREFIX)
    }
}

// El grafo de dependencias completo, armado una sola vez
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub session: SessionService,
    pub client: ApiClient,
    pub auth_service: AuthService,
    pub catalog_service: CatalogService,
    pub production_service: ProductionService,
    pub crm_service: CrmService,
    pub tenancy_service: TenancyService,
    pub sales_service: SalesService,
}

impl AppState {
    /// Arma el estado con la sesión persistida en `config.session_file`.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let store = Arc::new(FileStore::new(config.session_file.clone()));
        Self::with_store(config, store)
    }

    pub fn with_store(config: AppConfig, store: Arc<dyn KeyValueStore>) -> anyhow::Result<Self> {
        let session = SessionService::new(store);
        let client = ApiClient::new(&config, session.clone())
            .context("No se pudo construir el cliente HTTP")?;

        tracing::info!("✅ Cliente configurado contra {}", config.api_url());

        Ok(Self {
            auth_service: AuthService::new(client.clone()),
            catalog_service: CatalogService::new(client.clone()),
            production_service: ProductionService::new(client.clone()),
            crm_service: CrmService::new(client.clone()),
            tenancy_service: TenancyService::new(client.clone()),
            sales_service: SalesService::new(client.clone()),
            config,
            session,
            client,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_physical_device() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.api_url(), "http://192.168.1.18:4000/api");
        assert_eq!(cfg.profile, BuildProfile::Development);
        assert_eq!(cfg.request_timeout, None);
    }

    #[test]
    fn targets_select_base_url() {
        assert_eq!(config(&[("PORTAL_API_TARGET", "emulator")]).unwrap().api_url(), "http://10.0.2.2:4000/api");
        assert_eq!(
            config(&[("PORTAL_API_TARGET", "localhost"), ("PORTAL_API_PORT", "5000")]).unwrap().api_url(),
            "http://localhost:5000/api"
        );
        assert_eq!(
            config(&[("PORTAL_API_TARGET", "production"), ("PORTAL_PRODUCTION_URL", "https://api.ejemplo.mx/")])
                .unwrap()
                .api_url(),
            "https://api.ejemplo.mx/api"
        );
    }

    #[test]
    fn override_wins_and_bad_values_fail() {
        let cfg = config(&[("PORTAL_API_TARGET", "emulator"), ("PORTAL_API_BASE_URL", "http://127.0.0.1:9999")]).unwrap();
        assert_eq!(cfg.api_url(), "http://127.0.0.1:9999/api");

        assert!(config(&[("PORTAL_API_TARGET", "production")]).is_err());
        assert!(config(&[("PORTAL_API_TARGET", "marte")]).is_err());
        assert!(config(&[("PORTAL_API_PORT", "abc")]).is_err());
        assert!(config(&[("PORTAL_PROFILE", "qa")]).is_err());
    }

    #[test]
    fn zero_timeout_means_none() {
        assert_eq!(config(&[("PORTAL_REQUEST_TIMEOUT_SECS", "0")]).unwrap().request_timeout, None);
        assert_eq!(
            config(&[("PORTAL_REQUEST_TIMEOUT_SECS", "15")]).unwrap().request_timeout,
            Some(Duration::from_secs(15))
        );
    }
}

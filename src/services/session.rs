// src/services/session.rs

use std::sync::Arc;

use crate::{
    common::{error::AppError, storage::KeyValueStore},
    models::auth::{Session, UserProfile},
};

pub const TOKEN_KEY: &str = "authToken";
pub const PROFILE_KEY: &str = "userData";

/// Único punto de acceso a la sesión persistida. Todas las lecturas y
/// escrituras del token pasan por aquí; un 401 la invalida vía `clear_token`.
#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn KeyValueStore>,
}

impl SessionService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn token(&self) -> Result<Option<String>, AppError> {
        Ok(self.store.get(TOKEN_KEY).await?.filter(|t| !t.is_empty()))
    }

    pub async fn require_token(&self) -> Result<String, AppError> {
        self.token().await?.ok_or(AppError::MissingToken)
    }

    pub async fn set_token(&self, token: &str) -> Result<(), AppError> {
        self.store.set(TOKEN_KEY, token).await
    }

    pub async fn clear_token(&self) -> Result<(), AppError> {
        self.store.remove(TOKEN_KEY).await
    }

    pub async fn profile(&self) -> Result<Option<UserProfile>, AppError> {
        let Some(raw) = self.store.get(PROFILE_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<UserProfile>(&raw) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                // Un perfil corrupto no debe tumbar la app: se trata como ausente
                tracing::warn!("⚠️ Perfil guardado ilegible, se ignora: {}", e);
                Ok(None)
            }
        }
    }

    pub async fn set_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        let json = serde_json::to_string(profile)?;
        self.store.set(PROFILE_KEY, &json).await
    }

    pub async fn current(&self) -> Result<Session, AppError> {
        Ok(Session {
            token: self.token().await?,
            profile: self.profile().await?,
        })
    }

    /// Guarda token y perfil tras un login exitoso.
    pub async fn start(&self, token: &str, profile: Option<&UserProfile>) -> Result<Session, AppError> {
        self.set_token(token).await?;
        match profile {
            Some(profile) => self.set_profile(profile).await?,
            None => self.store.remove(PROFILE_KEY).await?,
        }
        self.current().await
    }

    pub async fn logout(&self) -> Result<(), AppError> {
        self.store.remove(TOKEN_KEY).await?;
        self.store.remove(PROFILE_KEY).await?;
        tracing::info!("👋 Sesión cerrada");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::storage::{FileStore, MemoryStore};
    use serde_json::json;

    fn service() -> (Arc<MemoryStore>, SessionService) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), SessionService::new(store))
    }

    #[tokio::test]
    async fn start_persists_under_fixed_keys() {
        let (store, session) = service();
        let profile = UserProfile::from_value(json!({ "nombre": "Ana", "id_sucursal": 5 })).unwrap();

        let current = session.start("tok-1", Some(&profile)).await.unwrap();
        assert_eq!(current.token.as_deref(), Some("tok-1"));
        assert_eq!(current.profile.unwrap().nombre(), Some("Ana"));

        assert_eq!(store.get("authToken").await.unwrap().as_deref(), Some("tok-1"));
        let raw = store.get("userData").await.unwrap().unwrap();
        assert_eq!(serde_json::from_str::<serde_json::Value>(&raw).unwrap()["id_sucursal"], json!(5));
    }

    #[tokio::test]
    async fn clear_token_keeps_profile_and_logout_removes_both() {
        let (_, session) = service();
        let profile = UserProfile::from_value(json!({ "nombre": "Ana" })).unwrap();
        session.start("tok-1", Some(&profile)).await.unwrap();

        session.clear_token().await.unwrap();
        assert!(session.token().await.unwrap().is_none());
        assert!(session.profile().await.unwrap().is_some());
        assert!(matches!(session.require_token().await, Err(AppError::MissingToken)));

        session.logout().await.unwrap();
        assert_eq!(session.current().await.unwrap(), Session::default());
    }

    #[tokio::test]
    async fn unreadable_profile_reads_as_absent() {
        let (store, session) = service();
        store.set("userData", "{no es json").await.unwrap();
        assert!(session.profile().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn truncated_session_file_still_allows_logout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"authToken": "tok"#).unwrap();
        let session = SessionService::new(Arc::new(FileStore::new(&path)));

        assert_eq!(session.token().await.unwrap(), None);
        session.logout().await.unwrap();
        session.start("tok-2", None).await.unwrap();
        assert_eq!(session.token().await.unwrap().as_deref(), Some("tok-2"));
    }
}

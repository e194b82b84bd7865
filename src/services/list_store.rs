// src/services/list_store.rs

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use chrono::NaiveDate;
use reqwest::Method;
use tokio::sync::{Mutex, RwLock};

use crate::{
    api::client::{ApiClient, RequestBody},
    common::{
        error::AppError,
        normalizer::{decode_records, normalize},
    },
    models::{sales::format_date, Entity},
};

/// Estado que la pantalla renderiza para una colección.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub refreshing: bool,
    pub error_message: String,
}

impl<T> ListState<T> {
    /// Estado al montar la pantalla: vacío y cargando.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            loading: true,
            refreshing: false,
            error_message: String::new(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.loading || self.refreshing
    }

    pub fn has_error(&self) -> bool {
        !self.error_message.is_empty()
    }
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    Load,
    Refresh,
}

/// Ciclo cargar / error / refrescar de una colección remota.
///
/// Cada llamada toma una generación nueva; si al terminar ya empezó otra más
/// reciente, su resultado se descarta. Nunca devuelve error: toda falla
/// termina como estado (lista vacía + mensaje).
#[derive(Clone)]
pub struct RemoteListStore<T: Entity> {
    client: ApiClient,
    path: String,
    query: Arc<RwLock<Vec<(String, String)>>>,
    // 404 = "función no disponible": se limpia sin mensaje
    optional: bool,
    state: Arc<RwLock<ListState<T>>>,
    // Error completo de la última carga fallida, para quien necesite clasificarlo
    last_error: Arc<Mutex<Option<AppError>>>,
    generation: Arc<AtomicU64>,
}

impl<T: Entity> RemoteListStore<T> {
    pub fn new(client: ApiClient) -> Self {
        Self::with_path(client, T::ENDPOINT)
    }

    pub fn with_path(client: ApiClient, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            query: Arc::new(RwLock::new(Vec::new())),
            optional: false,
            state: Arc::new(RwLock::new(ListState::new())),
            last_error: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub async fn set_query(&self, query: Vec<(String, String)>) {
        *self.query.write().await = query;
    }

    /// Filtro `fechaDesde` / `fechaHasta` (YYYY-MM-DD). `None` quita el límite.
    pub async fn set_date_range(&self, desde: Option<NaiveDate>, hasta: Option<NaiveDate>) {
        let mut query = Vec::new();
        if let Some(desde) = desde {
            query.push(("fechaDesde".to_string(), format_date(desde)));
        }
        if let Some(hasta) = hasta {
            query.push(("fechaHasta".to_string(), format_date(hasta)));
        }
        self.set_query(query).await;
    }

    /// Copia del estado actual para renderizar.
    pub async fn state(&self) -> ListState<T> {
        self.state.read().await.clone()
    }

    pub async fn items(&self) -> Vec<T> {
        self.state.read().await.items.clone()
    }

    /// Saca el error de la última carga, si falló. `error_message` en el
    /// estado se conserva.
    pub async fn take_error(&self) -> Option<AppError> {
        self.last_error.lock().await.take()
    }

    pub async fn load(&self) {
        self.fetch(FetchKind::Load).await;
    }

    /// Igual que `load`, pero marca `refreshing` (pull-to-refresh).
    pub async fn refresh(&self) {
        self.fetch(FetchKind::Refresh).await;
    }

    async fn fetch(&self, kind: FetchKind) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut state = self.state.write().await;
            state.error_message.clear();
            match kind {
                FetchKind::Load => state.loading = true,
                FetchKind::Refresh => state.refreshing = true,
            }
        }

        let outcome = self.request().await;

        let mut state = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("Respuesta obsoleta de {} descartada (gen {})", self.path, generation);
            return;
        }

        let mut last_error = self.last_error.lock().await;
        match outcome {
            Ok(items) => {
                tracing::info!("✅ {}: {} registros", self.path, items.len());
                state.items = items;
                state.error_message.clear();
                *last_error = None;
            }
            Err(AppError::NotFound { .. }) if self.optional => {
                tracing::info!("{} no disponible en este backend", self.path);
                state.items.clear();
                state.error_message.clear();
                *last_error = None;
            }
            Err(e) => {
                tracing::error!("❌ Error cargando {}: {}", self.path, e);
                state.items.clear();
                state.error_message = e.user_message();
                *last_error = Some(e);
            }
        }
        state.loading = false;
        state.refreshing = false;
    }

    async fn request(&self) -> Result<Vec<T>, AppError> {
        let query = self.query.read().await.clone();
        let response = self
            .client
            .send_with_query(Method::GET, &self.path, &query, RequestBody::Empty)
            .await?
            .into_result()?;

        let payload = response.json_value()?;
        Ok(decode_records(normalize(&payload, &T::SHAPE), &T::SHAPE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{common::storage::MemoryStore, models::catalog::Product, services::session::SessionService};

    #[test]
    fn new_state_is_loading_and_empty() {
        let state: ListState<Product> = ListState::new();
        assert!(state.loading);
        assert!(!state.refreshing);
        assert!(state.items.is_empty());
        assert!(!state.has_error());
    }

    #[tokio::test]
    async fn connection_failure_is_terminal_state() {
        let session = SessionService::new(Arc::new(MemoryStore::new()));
        // Puerto 9 (discard) en loopback: conexión rechazada
        let client = ApiClient::with_base_url("http://127.0.0.1:9", session).unwrap();
        let store: RemoteListStore<Product> = RemoteListStore::new(client);

        store.load().await;
        let state = store.state().await;
        assert!(state.items.is_empty());
        assert!(!state.is_busy());
        assert!(state.error_message.starts_with("Error de conexión"));
        assert!(store.take_error().await.is_some_and(|e| e.is_connection()));
        assert!(store.take_error().await.is_none());
    }
}

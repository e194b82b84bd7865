#![allow(dead_code)]

use std::sync::Arc;

use portal_client::{
    config::{AppConfig, AppState, BuildProfile},
    MemoryStore,
};
use wiremock::MockServer;

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_test_writer()
        .try_init();
}

/// Backend simulado + estado completo del cliente con sesión en memoria.
pub struct TestContext {
    pub server: MockServer,
    pub state: AppState,
}

impl TestContext {
    pub async fn new() -> Self {
        init_logging();
        let server = MockServer::start().await;

        let config = AppConfig {
            base_url_override: Some(server.uri()),
            profile: BuildProfile::Development,
            ..AppConfig::default()
        };
        let state = AppState::with_store(config, Arc::new(MemoryStore::new())).expect("estado de prueba");

        Self { server, state }
    }

    /// Igual que `new`, pero con un token ya guardado.
    pub async fn logged_in(token: &str) -> Self {
        let ctx = Self::new().await;
        ctx.state.session.set_token(token).await.expect("guardar token");
        ctx
    }
}

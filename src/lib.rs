//! Cliente del portal de empleados: sesión, colecciones remotas normalizadas
//! y formularios (incluidas imágenes) contra la API REST del backend.

pub mod api;
pub mod common;
pub mod config;
pub mod models;
pub mod services;

pub use api::{ApiClient, ApiResponse, FormValue, ImageAsset, MultipartSubmitter, RequestBody};
pub use common::{AppError, FileStore, KeyValueStore, MemoryStore, RecordShape};
pub use config::{AppConfig, AppState};
pub use models::Entity;
pub use services::{ListState, RemoteListStore, SessionService};

// src/common/error.rs

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

pub const CONNECTION_MESSAGE: &str = "Error de conexión. Verifica que el servidor esté corriendo.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Tu sesión ha expirado. Por favor, inicia sesión de nuevo.";
pub const MISSING_TOKEN_MESSAGE: &str = "No hay token de autenticación. Por favor, inicia sesión de nuevo.";
pub const GENERIC_SERVER_MESSAGE: &str = "Ocurrió un error inesperado.";

// Taxonomía de errores del cliente. Ninguno escapa a un manejador global:
// cada llamada clasifica y decide cómo mostrarlo.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de conexión: {message}")]
    Connection {
        message: String,
        // Solo se llena en builds de desarrollo (host/puerto esperado)
        hint: Option<String>,
    },

    #[error("Sesión expirada")]
    SessionExpired,

    #[error("Recurso no encontrado: {path}")]
    NotFound { path: String },

    #[error("Error del servidor ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Error de validación")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Credenciales inválidas")]
    InvalidCredentials,

    #[error("Token ausente")]
    MissingToken,

    #[error("Respuesta JSON inválida: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Error de E/S: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error construyendo la petición: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Error interno")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    /// Mensaje listo para mostrar al usuario (banner de lista o alerta de formulario).
    pub fn user_message(&self) -> String {
        match self {
            AppError::Connection { hint: Some(hint), .. } => format!("{CONNECTION_MESSAGE} ({hint})"),
            AppError::Connection { hint: None, .. } => CONNECTION_MESSAGE.to_string(),
            AppError::SessionExpired => SESSION_EXPIRED_MESSAGE.to_string(),
            AppError::NotFound { path } => format!("Ruta no encontrada: {path}"),
            AppError::Server { message, .. } => message.clone(),
            AppError::ValidationError(errors) => first_validation_message(errors),
            AppError::InvalidCredentials => "Usuario o contraseña incorrectos".to_string(),
            AppError::MissingToken => MISSING_TOKEN_MESSAGE.to_string(),
            AppError::Decode(_) => "La respuesta del servidor no es válida.".to_string(),
            AppError::Io(e) => format!("No se pudo leer el archivo: {e}"),
            e => {
                tracing::error!("Error interno del cliente: {}", e);
                GENERIC_SERVER_MESSAGE.to_string()
            }
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, AppError::SessionExpired)
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, AppError::Connection { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound { .. })
    }

    /// Clasifica una respuesta no-2xx según su status.
    pub fn from_status(status: StatusCode, path: &str, body: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => AppError::SessionExpired,
            StatusCode::NOT_FOUND => AppError::NotFound { path: path.to_string() },
            _ => AppError::Server {
                status: status.as_u16(),
                message: extract_server_message(status, body),
            },
        }
    }
}

/// Prioridad: `message` → `error` del cuerpo JSON, texto del status,
/// cuerpo crudo, mensaje genérico.
pub fn extract_server_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(msg) = map.get(key).and_then(Value::as_str) {
                if !msg.trim().is_empty() {
                    return msg.to_string();
                }
            }
        }
    }

    if let Some(reason) = status.canonical_reason() {
        return reason.to_string();
    }

    let raw = body.trim();
    if !raw.is_empty() {
        return raw.to_string();
    }

    GENERIC_SERVER_MESSAGE.to_string()
}

fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    // Orden estable: primero las reglas de formulario completo (`__all__`),
    // luego por nombre de campo
    fields.sort_by(|a, b| (a.0 != "__all__", &a.0).cmp(&(b.0 != "__all__", &b.0)));

    fields
        .into_iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Por favor, completa todos los campos obligatorios.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_message_then_error_field() {
        let body = r#"{"message":"Precio inválido","error":"bad"}"#;
        assert_eq!(extract_server_message(StatusCode::BAD_REQUEST, body), "Precio inválido");

        let body = r#"{"error":"Duplicado"}"#;
        assert_eq!(extract_server_message(StatusCode::CONFLICT, body), "Duplicado");
    }

    #[test]
    fn falls_back_to_status_text_then_raw_body() {
        assert_eq!(
            extract_server_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>boom</html>"),
            "Internal Server Error"
        );

        let unknown = StatusCode::from_u16(599).unwrap();
        assert_eq!(extract_server_message(unknown, "  caído  "), "caído");
        assert_eq!(extract_server_message(unknown, ""), GENERIC_SERVER_MESSAGE);
    }

    #[test]
    fn status_classification() {
        assert!(AppError::from_status(StatusCode::UNAUTHORIZED, "/x", "").is_session_expired());
        assert!(AppError::from_status(StatusCode::NOT_FOUND, "/x", "").is_not_found());

        match AppError::from_status(StatusCode::BAD_GATEWAY, "/x", r#"{"message":"caído"}"#) {
            AppError::Server { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "caído");
            }
            other => panic!("clasificación inesperada: {other:?}"),
        }
    }

    #[test]
    fn connection_hint_only_when_present() {
        let plain = AppError::Connection { message: "refused".into(), hint: None };
        assert_eq!(plain.user_message(), CONNECTION_MESSAGE);

        let hinted = AppError::Connection {
            message: "refused".into(),
            hint: Some("esperado 192.168.1.18:4000".into()),
        };
        assert!(hinted.user_message().ends_with("(esperado 192.168.1.18:4000)"));
    }
}

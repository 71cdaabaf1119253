//! Ошибки клиентского ядра.
//!
//! `ApiError` покрывает REST backend, `WalletError` - границу с кошельком / SDK.
//! Обе ошибки `Clone`: одна и та же ошибка запроса раздаётся всем наблюдателям ключа кеша.

use reqwest::StatusCode;
use thiserror::Error;

/// Сообщение для ошибок транспорта (сервер недоступен, таймаут и т.п.).
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// Запрос не дошёл до сервера или ответ не был получен.
    #[error("{NETWORK_ERROR_MESSAGE} ({cause})")]
    Network { cause: String },
    /// Сервер ответил не-2xx. `message` берётся из поля `error` ответа, если оно есть.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    /// Тело ответа не соответствует ожидаемому DTO.
    #[error("Failed to decode response: {0}")]
    Decode(String),
    /// DTO запроса не прошёл валидацию до отправки.
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    /// Read-only скрипт сети не выполнился. Текст SDK как есть.
    #[error("{0}")]
    Chain(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }

    /// Собирает ошибку из тела не-2xx ответа: `error`, затем `message`, затем общий текст.
    pub fn from_response_body(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .and_then(|e| e.as_str())
                    .or_else(|| v.get("message").and_then(|m| m.as_str()))
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "An error occurred".to_string());

        ApiError::Http { status: status.as_u16(), message }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network { cause: e.to_string() }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        ApiError::Validation(e.to_string())
    }
}

/// Ошибки кошелька и блокчейн SDK. Текст SDK пробрасывается как есть.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WalletError {
    #[error("Wallet is not connected")]
    NotConnected,
    #[error("Transaction rejected: {0}")]
    Rejected(String),
    #[error("{0}")]
    Sdk(String),
    /// Access node ещё не знает такой ID (только что отправленная транзакция не проиндексирована).
    #[error("{0}")]
    NotFound(String),
    #[error("{NETWORK_ERROR_MESSAGE} ({0})")]
    Network(String),
}

impl WalletError {
    /// Сбой, после которого статус транзакции имеет смысл спросить ещё раз.
    pub fn is_transient(&self) -> bool {
        matches!(self, WalletError::Network(_) | WalletError::NotFound(_))
    }
}

impl From<reqwest::Error> for WalletError {
    fn from(e: reqwest::Error) -> Self {
        WalletError::Network(e.to_string())
    }
}

impl From<WalletError> for ApiError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::Network(cause) => ApiError::Network { cause },
            other => ApiError::Chain(other.to_string()),
        }
    }
}

/// Ошибка мутации: либо REST, либо кошелёк (например, не подключен при check-in).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MutationError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Wallet(#[from] WalletError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_field_wins() {
        let err = ApiError::from_response_body(
            StatusCode::BAD_REQUEST,
            r#"{"error":"quota exceeded","message":"ignored"}"#,
        );
        assert_eq!(err, ApiError::Http { status: 400, message: "quota exceeded".into() });
    }

    #[test]
    fn message_field_is_second_choice() {
        let err = ApiError::from_response_body(StatusCode::CONFLICT, r#"{"message":"already registered"}"#);
        assert_eq!(err.to_string(), "HTTP 409: already registered");
    }

    #[test]
    fn non_json_body_gets_generic_message() {
        let err = ApiError::from_response_body(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(err, ApiError::Http { status: 502, message: "An error occurred".into() });
        assert!(!err.is_not_found());
    }
}

//! REST клиент backend'а платформы.
//!
//! `ApiClient` - тонкая обёртка над `reqwest::Client`: собирает URL, логирует запрос,
//! превращает не-2xx ответы в `ApiError::Http` с текстом из поля `error` ответа.
//! Ресурсные методы лежат в подмодулях отдельными `impl ApiClient` блоками.

use reqwest::{multipart::Form, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::ApiError;

pub mod accessories;
pub mod events;
pub mod listings;
pub mod moments;
pub mod passes;
pub mod social;
pub mod upload;
pub mod users;

pub use moments::{FreeMintForm, MintMomentForm};
pub use upload::{ImageFile, UploadResponse, UploadcareClient, UploadedImage};

/// Параметры строки запроса.
pub type Params = Vec<(&'static str, String)>;

#[derive(Clone)]
pub struct ApiClient {
    /// Базовый URL backend'а без завершающего `/`.
    base_url: String,
    http_client: reqwest::Client,
}

impl ApiClient {
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self::with_client(&config.base_url, http_client))
    }

    pub fn with_client(base_url: &str, http_client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http_client
    }

    fn url(&self, path: &str, params: &[(&'static str, String)]) -> Result<String, ApiError> {
        let mut url = format!("{}{}", self.base_url, path);
        if !params.is_empty() {
            let query = serde_urlencoded::to_string(params)
                .map_err(|e| ApiError::Validation(e.to_string()))?;
            url.push('?');
            url.push_str(&query);
        }
        Ok(url)
    }

    /// GET с разбором тела ответа в `T`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&'static str, String)]) -> Result<T, ApiError> {
        let url = self.url(path, params)?;
        debug!("GET {}", url);
        let response = self.http_client.get(&url).send().await?;
        Self::read(response).await
    }

    /// GET для детальных страниц: 404 - это "не найдено", а не ошибка.
    pub async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<Option<T>, ApiError> {
        let url = self.url(path, params)?;
        debug!("GET {} (404 -> None)", url);
        let response = self.http_client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::read(response).await.map(Some)
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path, &[])?;
        debug!("POST {}", url);
        let response = self.http_client.post(&url).json(body).send().await?;
        Self::read(response).await
    }

    /// POST без тела, параметры только в строке запроса.
    pub async fn post_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(path, params)?;
        debug!("POST {}", url);
        let response = self.http_client.post(&url).send().await?;
        Self::read(response).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T, ApiError> {
        let url = self.url(path, &[])?;
        debug!("POST {} (multipart)", url);
        let response = self.http_client.post(&url).multipart(form).send().await?;
        Self::read(response).await
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::from_response_body(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

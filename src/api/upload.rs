use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::ApiClient;
use crate::config::UploadConfig;
use crate::error::ApiError;

/// Картинка, готовая к отправке формой.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn png(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { file_name: file_name.into(), mime: "image/png".to_string(), bytes }
    }

    pub(crate) fn into_part(self) -> Result<Part, ApiError> {
        Ok(Part::bytes(self.bytes).file_name(self.file_name).mime_str(&self.mime)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
    #[serde(default)]
    pub message: String,
}

impl ApiClient {
    /// Загрузка через backend (`POST /upload`, поле `thumbnail`).
    pub async fn upload_image(&self, file: ImageFile) -> Result<UploadResponse, ApiError> {
        let form = Form::new().part("thumbnail", file.into_part()?);
        self.post_multipart("/upload", form).await
    }
}

/// Результат прямой загрузки в Uploadcare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub id: String,
    pub image: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct UploadcareBaseResponse {
    file: String,
}

/// Прямая загрузка в CDN Uploadcare, минуя backend.
#[derive(Clone)]
pub struct UploadcareClient {
    public_key: String,
    upload_url: String,
    cdn_url: String,
    http_client: reqwest::Client,
}

impl UploadcareClient {
    /// `None`, если публичный ключ не настроен.
    pub fn from_config(config: &UploadConfig, http_client: reqwest::Client) -> Option<Self> {
        let public_key = config.public_key.clone()?;
        Some(Self {
            public_key,
            upload_url: config.upload_url.trim_end_matches('/').to_string(),
            cdn_url: config.cdn_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub async fn upload(&self, file: ImageFile) -> Result<UploadedImage, ApiError> {
        let name = file.file_name.clone();
        let form = Form::new()
            .text("UPLOADCARE_PUB_KEY", self.public_key.clone())
            .text("UPLOADCARE_STORE", "auto")
            .part("file", file.into_part()?);

        info!("Uploading {} to Uploadcare", name);
        let response = self
            .http_client
            .post(format!("{}/base/", self.upload_url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::from_response_body(status, &body));
        }

        let uploaded: UploadcareBaseResponse = serde_json::from_str(&body)?;
        Ok(UploadedImage {
            image: self.preview_url(&uploaded.file, &name),
            id: uploaded.file,
            name,
        })
    }

    /// URL превью карточки 630x880.
    pub fn preview_url(&self, uuid: &str, name: &str) -> String {
        format!("{}/{}/-/preview/630x880/{}", self.cdn_url, uuid, urlencoding::encode(name))
    }
}

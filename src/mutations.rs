//! REST мутации. После успеха сбрасываются ресурсы из таблицы инвалидации.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::api::events::CheckInResult;
use crate::api::{ApiClient, FreeMintForm, ImageFile, MintMomentForm, UploadResponse, UploadcareClient, UploadedImage};
use crate::cache::{invalidation, QueryCache, Resource};
use crate::error::{ApiError, MutationError};
use crate::models::FlowAddress;
use crate::transactions::CurrentUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MutationKind {
    CheckIn,
    MintMoment,
    FreeMintMoment,
    ToggleLike,
    AddComment,
    UploadImage,
}

impl MutationKind {
    pub const ALL: &'static [MutationKind] = &[
        MutationKind::CheckIn,
        MutationKind::MintMoment,
        MutationKind::FreeMintMoment,
        MutationKind::ToggleLike,
        MutationKind::AddComment,
        MutationKind::UploadImage,
    ];

    pub fn invalidates(self) -> &'static [Resource] {
        invalidation::for_mutation(self)
    }
}

#[derive(Clone)]
pub struct Mutations {
    api: ApiClient,
    cache: QueryCache,
    uploadcare: Option<UploadcareClient>,
}

impl Mutations {
    pub fn new(api: ApiClient, cache: QueryCache, uploadcare: Option<UploadcareClient>) -> Self {
        Self { api, cache, uploadcare }
    }

    fn settle<T>(&self, kind: MutationKind, result: Result<T, ApiError>) -> Result<T, ApiError> {
        match &result {
            Ok(_) => {
                let count = self.cache.invalidate_resources(kind.invalidates());
                info!("{:?} succeeded, {} cached queries invalidated", kind, count);
            }
            Err(e) => error!("{:?} failed: {}", kind, e),
        }
        result
    }

    /// Check-in на событие. Нужен подключенный кошелёк.
    pub async fn check_in(&self, user: &CurrentUser, event_id: &str) -> Result<CheckInResult, MutationError> {
        let address = user.require()?;
        let result = self.api.check_in(address, event_id).await;
        Ok(self.settle(MutationKind::CheckIn, result)?)
    }

    pub async fn mint_moment(&self, form: MintMomentForm) -> Result<serde_json::Value, ApiError> {
        let result = self.api.mint_moment_with_pass(form).await;
        self.settle(MutationKind::MintMoment, result)
    }

    pub async fn free_mint_moment(&self, form: FreeMintForm) -> Result<serde_json::Value, ApiError> {
        let result = self.api.free_mint_moment(form).await;
        self.settle(MutationKind::FreeMintMoment, result)
    }

    pub async fn toggle_like(&self, moment_id: i64, user: &FlowAddress) -> Result<serde_json::Value, ApiError> {
        let result = self.api.toggle_like(moment_id, user).await;
        self.settle(MutationKind::ToggleLike, result)
    }

    pub async fn add_comment(&self, moment_id: i64, user: &FlowAddress, content: &str) -> Result<serde_json::Value, ApiError> {
        let result = self.api.add_comment(moment_id, user, content).await;
        self.settle(MutationKind::AddComment, result)
    }

    pub async fn upload_image(&self, file: ImageFile) -> Result<UploadResponse, ApiError> {
        let result = self.api.upload_image(file).await;
        self.settle(MutationKind::UploadImage, result)
    }

    /// Прямая загрузка в CDN. Без публичного ключа Uploadcare - ошибка валидации.
    pub async fn upload_to_cdn(&self, file: ImageFile) -> Result<UploadedImage, ApiError> {
        let client = self
            .uploadcare
            .as_ref()
            .ok_or_else(|| ApiError::Validation("Uploadcare public key is not configured".to_string()))?;
        let result = client.upload(file).await;
        self.settle(MutationKind::UploadImage, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WalletError;

    #[tokio::test]
    async fn check_in_requires_connected_wallet() {
        let api = ApiClient::with_client("http://127.0.0.1:9", reqwest::Client::new());
        let mutations = Mutations::new(api, QueryCache::default(), None);

        let err = mutations.check_in(&CurrentUser::anonymous(), "3").await.unwrap_err();
        assert_eq!(err, MutationError::Wallet(WalletError::NotConnected));
    }

    #[tokio::test]
    async fn cdn_upload_needs_public_key() {
        let api = ApiClient::with_client("http://127.0.0.1:9", reqwest::Client::new());
        let mutations = Mutations::new(api, QueryCache::default(), None);

        let err = mutations.upload_to_cdn(ImageFile::png("a.png", vec![1, 2, 3])).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}

use reqwest::multipart::Form;

use super::{ApiClient, ImageFile};
use crate::error::ApiError;
use crate::models::{FlowAddress, Moment, Page};

/// Сетка 3x3 в профиле.
pub const OWNER_MOMENTS_PAGE_SIZE: u32 = 9;
/// Лента моментов.
pub const FEED_PAGE_SIZE: u32 = 10;

/// Минт момента с использованием Event Pass.
#[derive(Debug, Clone)]
pub struct MintMomentForm {
    pub recipient: FlowAddress,
    pub event_pass_id: u64,
    pub name: String,
    pub description: String,
    pub thumbnail: ImageFile,
    pub tier: Option<String>,
}

/// Бесплатный минт (один раз на пользователя).
#[derive(Debug, Clone)]
pub struct FreeMintForm {
    pub recipient: FlowAddress,
    pub name: String,
    pub description: Option<String>,
    pub thumbnail: ImageFile,
}

impl ApiClient {
    pub async fn moments_by_owner(&self, owner: &FlowAddress, page: u32) -> Result<Page<Moment>, ApiError> {
        self.get(
            "/moments",
            &[
                ("owner_address", owner.to_string()),
                ("page", page.to_string()),
                ("pageSize", OWNER_MOMENTS_PAGE_SIZE.to_string()),
            ],
        )
        .await
    }

    /// Лента. `viewer` нужен backend'у, чтобы проставить `is_liked`.
    pub async fn moments_feed(&self, page: u32, viewer: Option<&FlowAddress>) -> Result<Page<Moment>, ApiError> {
        let mut params = vec![("page", page.to_string()), ("pageSize", FEED_PAGE_SIZE.to_string())];
        if let Some(viewer) = viewer {
            params.push(("viewer", viewer.to_string()));
        }

        self.get("/moments", &params).await
    }

    /// Момент по on-chain ID: список с фильтром `nft_id`, берём первый элемент.
    pub async fn moment_by_nft_id(&self, nft_id: u64) -> Result<Option<Moment>, ApiError> {
        let page: Page<Moment> = self
            .get(
                "/moments",
                &[
                    ("nft_id", nft_id.to_string()),
                    ("page", "1".to_string()),
                    ("pageSize", "1".to_string()),
                ],
            )
            .await?;

        Ok(page.data.into_iter().next())
    }

    pub async fn mint_moment_with_pass(&self, form: MintMomentForm) -> Result<serde_json::Value, ApiError> {
        let mut multipart = Form::new()
            .text("recipient", form.recipient.to_string())
            .text("eventPassID", form.event_pass_id.to_string())
            .text("name", form.name)
            .text("description", form.description)
            .part("thumbnail", form.thumbnail.into_part()?);

        if let Some(tier) = form.tier {
            multipart = multipart.text("tier", tier);
        }

        self.post_multipart("/moment/with-event-pass", multipart).await
    }

    pub async fn free_mint_moment(&self, form: FreeMintForm) -> Result<serde_json::Value, ApiError> {
        let mut multipart = Form::new()
            .text("recipient", form.recipient.to_string())
            .text("name", form.name);

        if let Some(description) = form.description {
            multipart = multipart.text("description", description);
        }

        let multipart = multipart.part("thumbnail", form.thumbnail.into_part()?);
        self.post_multipart("/moment/free", multipart).await
    }
}

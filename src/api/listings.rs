use super::ApiClient;
use crate::error::ApiError;
use crate::models::{Listing, Page};

pub const LISTINGS_PAGE_SIZE: u32 = 12;

impl ApiClient {
    pub async fn listings(&self, page: u32, page_size: u32) -> Result<Page<Listing>, ApiError> {
        self.get(
            "/listings",
            &[("page", page.to_string()), ("pageSize", page_size.to_string())],
        )
        .await
    }
}

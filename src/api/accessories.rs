use super::ApiClient;
use crate::error::ApiError;
use crate::models::{Accessory, FlowAddress, Page};

pub const ACCESSORIES_PAGE_SIZE: u32 = 12;

impl ApiClient {
    /// С адресом - инвентарь владельца, без адреса - все аксессуары (explore).
    pub async fn accessories(
        &self,
        owner: Option<&FlowAddress>,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Accessory>, ApiError> {
        let mut params = vec![("page", page.to_string()), ("pageSize", page_size.to_string())];
        if let Some(owner) = owner {
            params.push(("owner_address", owner.to_string()));
        }

        self.get("/accessories", &params).await
    }
}

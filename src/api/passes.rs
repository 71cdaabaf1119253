use futures::future::try_join_all;
use tracing::debug;

use super::ApiClient;
use crate::error::ApiError;
use crate::models::{EventPass, FlowAddress, Page};

/// 2 ряда по 4 на странице билетов.
pub const PASSES_PAGE_SIZE: u32 = 8;

impl ApiClient {
    pub async fn event_passes(&self, owner: &FlowAddress, page: u32) -> Result<Page<EventPass>, ApiError> {
        self.get(
            "/event-passes",
            &[
                ("owner_address", owner.to_string()),
                ("page", page.to_string()),
                ("pageSize", PASSES_PAGE_SIZE.to_string()),
            ],
        )
        .await
    }

    pub async fn event_pass_by_id(&self, pass_id: u64) -> Result<Option<EventPass>, ApiError> {
        let page: Page<EventPass> = self
            .get(
                "/event-passes",
                &[("pass_id", pass_id.to_string()), ("pageSize", "1".to_string())],
            )
            .await?;

        Ok(page.data.into_iter().next())
    }

    /// Пачка пропусков по on-chain ID.
    ///
    /// Backend не умеет bulk-фильтр, поэтому N параллельных запросов. Любой упавший
    /// запрос валит всю пачку; пропуска, которых нет (пустая страница), просто выкидываются.
    pub async fn event_passes_by_ids(&self, ids: &[u64]) -> Result<Vec<EventPass>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Fetching {} event passes by id", ids.len());
        let results = try_join_all(ids.iter().map(|id| self.event_pass_by_id(*id))).await?;
        Ok(results.into_iter().flatten().collect())
    }
}

use super::{MarketplacePage, Pages, SearchPage, TicketsPage};
use crate::api::listings::LISTINGS_PAGE_SIZE;
use crate::error::ApiError;
use crate::models::FlowAddress;

impl Pages {
    /// `/marketplace?page`
    pub async fn marketplace(&self, page: u32) -> Result<MarketplacePage, ApiError> {
        let listings = self
            .queries
            .fetch(&self.queries.listings(page.max(1), LISTINGS_PAGE_SIZE))
            .await?;
        Ok(MarketplacePage { next_page: listings.next_page(), listings })
    }

    /// `/search?q` - пустой запрос отдаёт первую страницу всех пользователей.
    pub async fn search(&self, term: &str) -> Result<SearchPage, ApiError> {
        let term = term.trim().to_string();
        let users = self.queries.fetch(&self.queries.user_search(&term)).await?;
        Ok(SearchPage { term, users })
    }

    /// `/tickets?address&page`
    pub async fn tickets(&self, owner: &FlowAddress, page: u32) -> Result<TicketsPage, ApiError> {
        let passes = self.queries.fetch(&self.queries.event_passes(owner, page.max(1))).await?;
        Ok(TicketsPage { next_page: passes.next_page(), passes })
    }
}

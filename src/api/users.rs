use super::ApiClient;
use crate::error::ApiError;
use crate::models::{Envelope, FlowAddress, Page, UserProfile, UserSummary};

pub const USER_SEARCH_PAGE_SIZE: u32 = 12;

impl ApiClient {
    /// Профиль по адресу. 404 значит, что пользователь ещё не настроил профиль.
    pub async fn user_profile(&self, address: &FlowAddress) -> Result<Option<UserProfile>, ApiError> {
        let envelope: Option<Envelope<UserProfile>> =
            self.get_optional(&format!("/users/{}", address), &[]).await?;
        Ok(envelope.map(|e| e.data))
    }

    /// Пустой запрос - список по умолчанию (`/users`), иначе `/users/search?q=`.
    pub async fn search_users(&self, term: &str) -> Result<Vec<UserSummary>, ApiError> {
        let term = term.trim();
        let mut params = vec![("page", "1".to_string()), ("pageSize", USER_SEARCH_PAGE_SIZE.to_string())];

        let endpoint = if term.is_empty() {
            "/users"
        } else {
            params.insert(0, ("q", term.to_string()));
            "/users/search"
        };

        let page: Page<UserSummary> = self.get(endpoint, &params).await?;
        Ok(page.data)
    }
}

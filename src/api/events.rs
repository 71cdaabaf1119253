use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::error::ApiError;
use crate::models::event::CheckInRequest;
use crate::models::{Envelope, Event, FlowAddress, Page};

/// Сколько событий на странице главной.
pub const EVENTS_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInResult {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user_address: String,
    #[serde(default, rename = "eventID")]
    pub event_id: String,
}

impl ApiClient {
    pub async fn list_events(&self, page: u32, page_size: u32) -> Result<Page<Event>, ApiError> {
        self.get(
            "/events",
            &[("page", page.to_string()), ("pageSize", page_size.to_string())],
        )
        .await
    }

    /// Детали события. `None`, если backend ответил 404.
    pub async fn event_detail(&self, id: u64, viewer: Option<&FlowAddress>) -> Result<Option<Event>, ApiError> {
        let mut params = Vec::new();
        if let Some(viewer) = viewer {
            params.push(("viewer", viewer.to_string()));
        }

        let envelope: Option<Envelope<Event>> = self.get_optional(&format!("/events/{}", id), &params).await?;
        Ok(envelope.map(|e| e.data))
    }

    /// События, которые создал бренд / в которых участвует пользователь.
    pub async fn user_events(
        &self,
        address: &FlowAddress,
        page: u32,
        limit: u32,
        status: Option<&str>,
    ) -> Result<Page<Event>, ApiError> {
        let mut params = vec![
            ("userAddress", address.to_string()),
            ("page", page.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(status) = status {
            params.push(("status", status.to_string()));
        }

        self.get("/event/user", &params).await
    }

    pub async fn check_in(&self, user: &FlowAddress, event_id: &str) -> Result<CheckInResult, ApiError> {
        let request = CheckInRequest {
            user_address: user.to_string(),
            event_id: event_id.to_string(),
        };

        let response: Envelope<CheckInResult> = self.post_json("/event/check-in", &request).await?;
        Ok(response.data)
    }
}

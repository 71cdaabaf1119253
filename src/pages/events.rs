use tracing::debug;

use super::{AdminPage, EventDetailPage, HomePage, Pages, ADMIN_EVENTS_LIMIT};
use crate::error::ApiError;
use crate::models::FlowAddress;

impl Pages {
    /// `/` - первая страница событий.
    pub async fn home(&self) -> Result<HomePage, ApiError> {
        let events = self.queries.fetch(&self.queries.events_list(1)).await?;
        Ok(HomePage { events })
    }

    /// `/events/{id}`. `None` - события нет (404 backend'а).
    pub async fn event_detail(&self, id: u64, viewer: Option<&FlowAddress>) -> Result<Option<EventDetailPage>, ApiError> {
        let event = self.queries.fetch(&self.queries.event_detail(id, viewer)).await?;
        let Some(event) = event else {
            debug!("Event {} not found", id);
            return Ok(None);
        };

        Ok(Some(EventDetailPage {
            status_label: event.status.label(),
            is_full: event.is_full(),
            event,
        }))
    }

    /// `/admin` - события, которые проводит бренд.
    pub async fn admin(&self, host: &FlowAddress, page: u32) -> Result<AdminPage, ApiError> {
        let events = self
            .queries
            .fetch(&self.queries.user_events(host, page.max(1), ADMIN_EVENTS_LIMIT, None))
            .await?;
        Ok(AdminPage { host: host.to_string(), events })
    }
}

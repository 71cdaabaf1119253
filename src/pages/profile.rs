use serde::Serialize;
use tracing::debug;

use super::Pages;
use crate::error::ApiError;
use crate::models::{Accessory, EventPass, FlowAddress, Moment, Page, UserProfile};

/// `/users/{address}`: профиль, моменты, аксессуары и то, что владелец выделил.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePage {
    pub address: String,
    /// `None` - профиль ещё не настроен, страница показывается с дефолтами.
    pub profile: Option<UserProfile>,
    pub moments: Page<Moment>,
    pub accessories: Page<Accessory>,
    pub highlighted_moment: Option<Moment>,
    pub highlighted_passes: Vec<EventPass>,
}

impl Pages {
    pub async fn user_profile(
        &self,
        address: &FlowAddress,
        moments_page: u32,
        accessories_page: u32,
    ) -> Result<ProfilePage, ApiError> {
        let q = &self.queries;
        let profile_spec = q.user_profile(address);
        let moments_spec = q.moments_by_owner(Some(address), moments_page.max(1));
        let accessories_spec = q.accessories(Some(address), accessories_page.max(1), None);

        let (profile, moments, accessories) = tokio::try_join!(
            q.fetch(&profile_spec),
            q.fetch(&moments_spec),
            q.fetch(&accessories_spec),
        )?;

        // Выделенное зависит от профиля, поэтому второй волной
        let highlighted_moment_id = profile.as_ref().and_then(|p| p.highlighted_moment_id);
        let highlighted_pass_ids = profile
            .as_ref()
            .map(|p| p.highlighted_event_pass_ids.clone())
            .unwrap_or_default();

        let highlighted_moment = match highlighted_moment_id {
            Some(nft_id) => q.fetch(&q.moment_detail(nft_id)).await?,
            None => None,
        };
        let highlighted_passes = q.fetch(&q.event_passes_by_ids(&highlighted_pass_ids)).await?;

        debug!(
            "Profile page for {}: {} moments, {} accessories, {} highlighted passes",
            address,
            moments.len(),
            accessories.len(),
            highlighted_passes.len()
        );

        Ok(ProfilePage {
            address: address.to_string(),
            profile,
            moments,
            accessories,
            highlighted_moment,
            highlighted_passes,
        })
    }
}

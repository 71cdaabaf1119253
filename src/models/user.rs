use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use super::{Accessory, Event, EventPass, Listing, Moment};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserEdges {
    #[serde(default)]
    pub moments: Vec<Moment>,
    #[serde(default)]
    pub accessories: Vec<Accessory>,
    #[serde(default)]
    pub event_passes: Vec<EventPass>,
    #[serde(default)]
    pub hosted_events: Vec<Event>,
    #[serde(default)]
    pub listings: Vec<Listing>,
}

/// Профиль пользователя, ключ - адрес кошелька.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: i64,
    pub address: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub pfp: Option<String>,
    #[serde(default)]
    pub bg_image: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub socials: BTreeMap<String, String>,
    #[serde(default)]
    pub highlighted_moment_id: Option<u64>,
    #[serde(default, rename = "highlighted_eventPass_ids")]
    pub highlighted_event_pass_ids: Vec<u64>,
    #[serde(default)]
    pub is_free_minted: bool,
    #[serde(default)]
    pub edges: UserEdges,
}

impl UserProfile {
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().filter(|n| !n.is_empty()).unwrap_or(&self.address)
    }
}

/// Короткая карточка пользователя из поиска.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(default)]
    pub id: i64,
    pub address: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub pfp: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub bg_image: Option<String>,
}

/// Форма редактирования профиля, уходит в транзакцию UpdateProfile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    #[validate(length(max = 32))]
    pub nickname: Option<String>,
    #[validate(length(max = 280))]
    pub bio: Option<String>,
    #[serde(default)]
    pub socials: BTreeMap<String, String>,
    pub pfp: Option<String>,
    #[validate(length(max = 120))]
    pub short_description: Option<String>,
    pub bg_image: Option<String>,
    #[serde(default)]
    pub highlighted_event_pass_ids: Vec<u64>,
    pub moment_id: Option<u64>,
}

impl UpdateProfileInput {
    /// Заготовка формы из текущего профиля (для highlight-модалок).
    pub fn from_profile(profile: &UserProfile) -> Self {
        UpdateProfileInput {
            nickname: profile.nickname.clone(),
            bio: profile.bio.clone(),
            socials: profile.socials.clone(),
            pfp: profile.pfp.clone(),
            short_description: profile.short_description.clone(),
            bg_image: profile.bg_image.clone(),
            highlighted_event_pass_ids: profile.highlighted_event_pass_ids.clone(),
            moment_id: profile.highlighted_moment_id,
        }
    }
}

//! Данные страниц: каждая страница собирает несколько запросов через общий кеш.
//!
//! Страницы разложены по подмодулям отдельными `impl Pages` блоками, как ресурсы в `api`.

use serde::Serialize;

use crate::models::{Event, EventPass, Listing, Page, UserSummary};
use crate::queries::Queries;

pub mod events;
pub mod marketplace;
pub mod profile;

pub use profile::ProfilePage;

/// Сколько событий бренда показывать на странице админки.
pub const ADMIN_EVENTS_LIMIT: u32 = 10;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    pub events: Page<Event>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetailPage {
    pub event: Event,
    pub status_label: &'static str,
    pub is_full: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplacePage {
    pub listings: Page<Listing>,
    pub next_page: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub term: String,
    pub users: Vec<UserSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketsPage {
    pub passes: Page<EventPass>,
    pub next_page: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPage {
    pub host: String,
    pub events: Page<Event>,
}

#[derive(Clone)]
pub struct Pages {
    queries: Queries,
}

impl Pages {
    pub fn new(queries: Queries) -> Self {
        Self { queries }
    }

    pub fn queries(&self) -> &Queries {
        &self.queries
    }
}

//! Корни ключей кеша и построители ключей.
//!
//! Первый сегмент ключа - корень ресурса; инвалидация идёт по префиксу,
//! поэтому `["moments"]` задевает и `["moments", addr, page]`.

use super::QueryKey;
use crate::models::FlowAddress;

pub const EVENTS: &str = "events";
pub const EVENTS_LIST: &str = "events-list";
pub const EVENT_DETAIL: &str = "event-detail";
pub const USER_EVENTS: &str = "user-events";
pub const MOMENTS: &str = "moments";
pub const MOMENTS_FEED: &str = "moments-feed";
pub const MOMENT_DETAIL: &str = "moment-detail";
pub const ACCESSORIES: &str = "accessories";
pub const EVENT_PASSES: &str = "event-passes";
pub const EVENT_PASSES_BULK: &str = "event-passes-bulk";
pub const LISTINGS: &str = "listings";
pub const USER_PROFILE: &str = "user-profile";
pub const USER_SEARCH: &str = "user-search";
pub const COMMENTS: &str = "comments";
pub const GACHA_RECEIPT: &str = "gacha-receipt";
pub const ACCESSORY_METADATA: &str = "accessory-metadata";

pub fn events_list(page: u32) -> QueryKey {
    QueryKey::new(EVENTS_LIST).with(page)
}

pub fn event_detail(id: u64, viewer: Option<&FlowAddress>) -> QueryKey {
    QueryKey::new(EVENT_DETAIL).with(id).with_opt(viewer)
}

pub fn user_events(address: &FlowAddress, page: u32, limit: u32, status: Option<&str>) -> QueryKey {
    QueryKey::new(USER_EVENTS).with(address).with(page).with(limit).with_opt(status)
}

pub fn moments_by_owner(owner: Option<&FlowAddress>, page: u32) -> QueryKey {
    QueryKey::new(MOMENTS).with_opt(owner).with(page)
}

pub fn moments_feed(viewer: Option<&FlowAddress>, page: u32) -> QueryKey {
    QueryKey::new(MOMENTS_FEED).with_opt(viewer).with(page)
}

pub fn moment_detail(nft_id: u64) -> QueryKey {
    QueryKey::new(MOMENT_DETAIL).with(nft_id)
}

pub fn accessories(owner: Option<&FlowAddress>, page: u32, page_size: u32) -> QueryKey {
    QueryKey::new(ACCESSORIES).with_opt(owner).with(page).with(page_size)
}

pub fn event_passes(owner: &FlowAddress, page: u32) -> QueryKey {
    QueryKey::new(EVENT_PASSES).with(owner).with(page)
}

pub fn event_passes_bulk(ids: &[u64]) -> QueryKey {
    let joined = ids.iter().map(u64::to_string).collect::<Vec<_>>().join(",");
    QueryKey::new(EVENT_PASSES_BULK).with(joined)
}

pub fn listings(page: u32, page_size: u32) -> QueryKey {
    QueryKey::new(LISTINGS).with(page).with(page_size)
}

pub fn user_profile(address: &FlowAddress) -> QueryKey {
    QueryKey::new(USER_PROFILE).with(address)
}

pub fn user_search(term: &str) -> QueryKey {
    QueryKey::new(USER_SEARCH).with(term.trim())
}

pub fn comments(moment_id: i64) -> QueryKey {
    QueryKey::new(COMMENTS).with(moment_id)
}

pub fn gacha_receipt(address: &FlowAddress) -> QueryKey {
    QueryKey::new(GACHA_RECEIPT).with(address)
}

pub fn accessory_metadata(address: &FlowAddress, nft_id: u64) -> QueryKey {
    QueryKey::new(ACCESSORY_METADATA).with(address).with(nft_id)
}

//! Описания запросов к backend и сети: ключ кеша, свежесть, повторы.
//!
//! Каждый метод только строит `QuerySpec`; загрузку делает `QueryCache` / `QueryObserver`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::api::accessories::ACCESSORIES_PAGE_SIZE;
use crate::api::events::EVENTS_PAGE_SIZE;
use crate::api::moments::OWNER_MOMENTS_PAGE_SIZE;
use crate::api::ApiClient;
use crate::cache::{keys, QueryCache, QueryOptions, QuerySpec};
use crate::error::ApiError;
use crate::models::{Accessory, Comment, Event, EventPass, FlowAddress, Listing, Moment, Page, UserProfile, UserSummary};
use crate::transactions::{CadenceValue, ChainQuery, TransactionBuilder};

const ONE_MINUTE: Duration = Duration::from_secs(60);
const TWO_MINUTES: Duration = Duration::from_secs(2 * 60);
const FIVE_MINUTES: Duration = Duration::from_secs(5 * 60);

/// Имя и картинка аксессуара прямо из сети.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryMetadata {
    pub name: String,
    pub thumbnail: String,
}

impl AccessoryMetadata {
    fn from_cadence(value: &CadenceValue) -> Option<Self> {
        Some(Self {
            name: value.field("name")?.as_str()?.to_string(),
            thumbnail: value.field("thumbnail")?.as_str()?.to_string(),
        })
    }
}

#[derive(Clone)]
pub struct Queries {
    api: ApiClient,
    cache: QueryCache,
    chain: Arc<dyn ChainQuery>,
    builder: TransactionBuilder,
}

impl Queries {
    pub fn new(api: ApiClient, cache: QueryCache, chain: Arc<dyn ChainQuery>, builder: TransactionBuilder) -> Self {
        Self { api, cache, chain, builder }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Загрузить через общий кеш.
    pub async fn fetch<T>(&self, spec: &QuerySpec<T>) -> Result<T, ApiError>
    where
        T: Serialize + serde::de::DeserializeOwned,
    {
        self.cache.fetch(spec).await
    }

    pub fn events_list(&self, page: u32) -> QuerySpec<Page<Event>> {
        let api = self.api.clone();
        QuerySpec::new(keys::events_list(page), QueryOptions::stale(TWO_MINUTES).keep_previous(), move || {
            let api = api.clone();
            async move { api.list_events(page, EVENTS_PAGE_SIZE).await }
        })
    }

    /// 404 - это `None`, повторов нет.
    pub fn event_detail(&self, id: u64, viewer: Option<&FlowAddress>) -> QuerySpec<Option<Event>> {
        let api = self.api.clone();
        let viewer = viewer.cloned();
        QuerySpec::new(
            keys::event_detail(id, viewer.as_ref()),
            QueryOptions::default().no_retry(),
            move || {
                let api = api.clone();
                let viewer = viewer.clone();
                async move { api.event_detail(id, viewer.as_ref()).await }
            },
        )
    }

    pub fn user_events(&self, address: &FlowAddress, page: u32, limit: u32, status: Option<&str>) -> QuerySpec<Page<Event>> {
        let api = self.api.clone();
        let address = address.clone();
        let status = status.map(str::to_string);
        QuerySpec::new(
            keys::user_events(&address, page, limit, status.as_deref()),
            QueryOptions::stale(ONE_MINUTE).keep_previous(),
            move || {
                let api = api.clone();
                let address = address.clone();
                let status = status.clone();
                async move { api.user_events(&address, page, limit, status.as_deref()).await }
            },
        )
    }

    /// Моменты владельца. Без адреса запрос не делается, отдаётся пустая страница.
    pub fn moments_by_owner(&self, owner: Option<&FlowAddress>, page: u32) -> QuerySpec<Page<Moment>> {
        let api = self.api.clone();
        let owner = owner.cloned();
        QuerySpec::new(keys::moments_by_owner(owner.as_ref(), page), QueryOptions::stale(ONE_MINUTE).keep_previous(), move || {
            let api = api.clone();
            let owner = owner.clone();
            async move {
                match owner {
                    Some(owner) => api.moments_by_owner(&owner, page).await,
                    None => Ok(Page::empty(OWNER_MOMENTS_PAGE_SIZE)),
                }
            }
        })
    }

    pub fn moments_feed(&self, viewer: Option<&FlowAddress>, page: u32) -> QuerySpec<Page<Moment>> {
        let api = self.api.clone();
        let viewer = viewer.cloned();
        QuerySpec::new(
            keys::moments_feed(viewer.as_ref(), page),
            QueryOptions::stale(ONE_MINUTE).keep_previous(),
            move || {
                let api = api.clone();
                let viewer = viewer.clone();
                async move { api.moments_feed(page, viewer.as_ref()).await }
            },
        )
    }

    pub fn moment_detail(&self, nft_id: u64) -> QuerySpec<Option<Moment>> {
        let api = self.api.clone();
        QuerySpec::new(keys::moment_detail(nft_id), QueryOptions::stale(FIVE_MINUTES), move || {
            let api = api.clone();
            async move { api.moment_by_nft_id(nft_id).await }
        })
    }

    pub fn accessories(&self, owner: Option<&FlowAddress>, page: u32, page_size: Option<u32>) -> QuerySpec<Page<Accessory>> {
        let api = self.api.clone();
        let owner = owner.cloned();
        let page_size = page_size.unwrap_or(ACCESSORIES_PAGE_SIZE);
        QuerySpec::new(
            keys::accessories(owner.as_ref(), page, page_size),
            QueryOptions::stale(ONE_MINUTE).keep_previous(),
            move || {
                let api = api.clone();
                let owner = owner.clone();
                async move { api.accessories(owner.as_ref(), page, page_size).await }
            },
        )
    }

    pub fn event_passes(&self, owner: &FlowAddress, page: u32) -> QuerySpec<Page<EventPass>> {
        let api = self.api.clone();
        let owner = owner.clone();
        QuerySpec::new(
            keys::event_passes(&owner, page),
            QueryOptions::stale(ONE_MINUTE).keep_previous(),
            move || {
                let api = api.clone();
                let owner = owner.clone();
                async move { api.event_passes(&owner, page).await }
            },
        )
    }

    /// Пачка по ID: всё или ничего, пустой список - без запросов.
    pub fn event_passes_by_ids(&self, ids: &[u64]) -> QuerySpec<Vec<EventPass>> {
        let api = self.api.clone();
        let ids = ids.to_vec();
        QuerySpec::new(keys::event_passes_bulk(&ids), QueryOptions::stale(FIVE_MINUTES), move || {
            let api = api.clone();
            let ids = ids.clone();
            async move { api.event_passes_by_ids(&ids).await }
        })
    }

    pub fn listings(&self, page: u32, page_size: u32) -> QuerySpec<Page<Listing>> {
        let api = self.api.clone();
        QuerySpec::new(
            keys::listings(page, page_size),
            QueryOptions::stale(ONE_MINUTE).keep_previous(),
            move || {
                let api = api.clone();
                async move { api.listings(page, page_size).await }
            },
        )
    }

    /// 404 - профиль не настроен, это `None`. Повторов нет.
    pub fn user_profile(&self, address: &FlowAddress) -> QuerySpec<Option<UserProfile>> {
        let api = self.api.clone();
        let address = address.clone();
        QuerySpec::new(
            keys::user_profile(&address),
            QueryOptions::stale(ONE_MINUTE).no_retry(),
            move || {
                let api = api.clone();
                let address = address.clone();
                async move { api.user_profile(&address).await }
            },
        )
    }

    pub fn user_search(&self, term: &str) -> QuerySpec<Vec<UserSummary>> {
        let api = self.api.clone();
        let term = term.trim().to_string();
        QuerySpec::new(
            keys::user_search(&term),
            QueryOptions::stale(ONE_MINUTE).keep_previous(),
            move || {
                let api = api.clone();
                let term = term.clone();
                async move { api.search_users(&term).await }
            },
        )
    }

    pub fn comments(&self, moment_id: i64) -> QuerySpec<Page<Comment>> {
        let api = self.api.clone();
        QuerySpec::new(keys::comments(moment_id), QueryOptions::default(), move || {
            let api = api.clone();
            async move { api.comments(moment_id).await }
        })
    }

    /// Есть ли у адреса неоткрытый гача-чек. Всегда свежий запрос в сеть.
    pub fn gacha_receipt(&self, address: &FlowAddress) -> QuerySpec<bool> {
        let chain = self.chain.clone();
        let script = self.builder.has_gacha_receipt(address);
        QuerySpec::new(keys::gacha_receipt(address), QueryOptions::default(), move || {
            let chain = chain.clone();
            let script = script.clone();
            async move {
                let value = chain.query(&script).await?;
                Ok::<_, ApiError>(value.as_bool().unwrap_or(false))
            }
        })
    }

    pub fn accessory_metadata(&self, address: &FlowAddress, nft_id: u64) -> QuerySpec<Option<AccessoryMetadata>> {
        let chain = self.chain.clone();
        let script = self.builder.accessory_metadata(address, nft_id);
        QuerySpec::new(
            keys::accessory_metadata(address, nft_id),
            QueryOptions::stale(FIVE_MINUTES),
            move || {
                let chain = chain.clone();
                let script = script.clone();
                async move {
                    let value = chain.query(&script).await?;
                    Ok::<_, ApiError>(AccessoryMetadata::from_cadence(&value))
                }
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions::cadence::{Composite, CompositeField};

    #[test]
    fn accessory_metadata_from_struct() {
        let value = CadenceValue::optional(Some(CadenceValue::Struct(Composite {
            id: "s.1.AccessoryData".into(),
            fields: vec![
                CompositeField { name: "name".into(), value: CadenceValue::string("Frame") },
                CompositeField { name: "thumbnail".into(), value: CadenceValue::string("ipfs://f") },
            ],
        })));
        let meta = AccessoryMetadata::from_cadence(&value).unwrap();
        assert_eq!(meta.name, "Frame");
        assert!(AccessoryMetadata::from_cadence(&CadenceValue::Optional(None)).is_none());
    }
}

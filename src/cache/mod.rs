//! Кеш запросов - общий на процесс, ключ -> данные.
//!
//! Данные хранятся сериализованными в JSON (`serde_json::Value`), как раньше в Redis,
//! только в памяти процесса. Ключ инвалидируется по префиксу, параллельные запросы
//! одного ключа схлопываются в один поход на backend.

use futures::future::BoxFuture;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::CacheConfig;
use crate::error::ApiError;

pub mod invalidation;
pub mod keys;
pub mod observer;

pub use invalidation::Resource;
pub use observer::{QueryObserver, QueryState, QueryStatus};

/// Потолок задержки между повторами.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Ключ запроса: упорядоченный список сегментов, первый - корень ресурса.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new(root: &str) -> Self {
        QueryKey(vec![root.to_string()])
    }

    pub fn with(mut self, segment: impl ToString) -> Self {
        self.0.push(segment.to_string());
        self
    }

    /// Отсутствующий сегмент кодируется как `null`, чтобы ключи с `None` и без него не совпадали.
    pub fn with_opt<S: ToString>(self, segment: Option<S>) -> Self {
        match segment {
            Some(s) => self.with(s),
            None => self.with("null"),
        }
    }

    pub fn root(&self) -> &str {
        &self.0[0]
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// `self` совпадает с фильтром, если сегменты фильтра - его префикс.
    pub fn matches(&self, filter: &QueryKey) -> bool {
        filter.0.len() <= self.0.len() && self.0.iter().zip(&filter.0).all(|(a, b)| a == b)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

/// Настройки отдельного запроса.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Сколько данные считаются свежими после загрузки.
    pub stale_time: Duration,
    /// `None` - политика кеша по умолчанию, `Some(0)` - без повторов.
    pub retry: Option<u32>,
    /// Показывать данные предыдущего ключа, пока грузится новый (пагинация без мигания).
    pub keep_previous: bool,
}

impl QueryOptions {
    pub fn stale(stale_time: Duration) -> Self {
        Self { stale_time, ..Self::default() }
    }

    pub fn no_retry(mut self) -> Self {
        self.retry = Some(0);
        self
    }

    pub fn keep_previous(mut self) -> Self {
        self.keep_previous = true;
        self
    }
}

type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, ApiError>> + Send + Sync>;

/// Описание запроса: ключ, настройки и функция загрузки.
pub struct QuerySpec<T> {
    pub key: QueryKey,
    pub options: QueryOptions,
    fetcher: Fetcher<T>,
}

impl<T> Clone for QuerySpec<T> {
    fn clone(&self) -> Self {
        Self { key: self.key.clone(), options: self.options, fetcher: self.fetcher.clone() }
    }
}

impl<T> QuerySpec<T> {
    pub fn new<F, Fut>(key: QueryKey, options: QueryOptions, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        Self {
            key,
            options,
            fetcher: Arc::new(move || Box::pin(fetch())),
        }
    }

    fn call(&self) -> BoxFuture<'static, Result<T, ApiError>> {
        (self.fetcher)()
    }
}

/// Что произошло в кеше. Подписчики (gateway, наблюдатели) решают, перезапрашивать ли.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEvent {
    Updated(QueryKey),
    Invalidated { filter: QueryKey, count: usize },
    Removed(QueryKey),
}

/// Политика повторов для временных ошибок.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &CacheConfig) -> Self {
        Self {
            retries: config.retry_count,
            base_delay: Duration::from_millis(config.retry_base_delay_ms),
        }
    }

    /// `base * 2^attempt`, но не больше 30 секунд.
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(MAX_RETRY_DELAY)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { retries: 3, base_delay: Duration::from_millis(1000) }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Option<serde_json::Value>,
    error: Option<ApiError>,
    /// Когда последний раз пришли данные. Ошибка его не сдвигает.
    updated_at: Instant,
    last_access: Instant,
    /// Растёт с каждой записью, по нему ждущие запросы видят, что ключ уже загрузили.
    version: u64,
    invalidated: bool,
}

impl CacheEntry {
    fn is_fresh(&self, stale_time: Duration, now: Instant) -> bool {
        self.data.is_some() && !self.invalidated && now.duration_since(self.updated_at) < stale_time
    }
}

struct Inner {
    entries: Mutex<HashMap<QueryKey, CacheEntry>>,
    inflight: Mutex<HashMap<QueryKey, Arc<tokio::sync::Mutex<()>>>>,
    events: broadcast::Sender<CacheEvent>,
    retry: RetryPolicy,
}

#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Inner>,
}

impl QueryCache {
    pub fn new(retry: RetryPolicy) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                inflight: Mutex::new(HashMap::new()),
                events,
                retry,
            }),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(RetryPolicy::from_config(config))
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<QueryKey, CacheEntry>> {
        self.inner.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn key_lock(&self, key: &QueryKey) -> Arc<tokio::sync::Mutex<()>> {
        let mut inflight = self.inner.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        inflight.entry(key.clone()).or_default().clone()
    }

    fn emit(&self, event: CacheEvent) {
        // Ошибка только если нет подписчиков - это нормально
        let _ = self.inner.events.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.inner.events.subscribe()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.inner.retry
    }

    /// Загрузить данные запроса: свежие из кеша, иначе через fetcher.
    pub async fn fetch<T>(&self, spec: &QuerySpec<T>) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
    {
        if let Some(data) = self.fresh_data(&spec.key, spec.options.stale_time) {
            return Ok(data);
        }

        // Один поход на backend на ключ: остальные ждут и забирают результат первого
        let seen = self.version(&spec.key);
        let lock = self.key_lock(&spec.key);
        let _guard = lock.lock().await;

        if let Some(result) = self.settled_after::<T>(&spec.key, seen) {
            debug!("Query {} deduplicated", spec.key);
            return result;
        }

        let retries = spec.options.retry.unwrap_or(self.inner.retry.retries);
        let mut attempt = 0;
        let result = loop {
            match spec.call().await {
                Ok(data) => break Ok(data),
                Err(e) if attempt < retries && is_transient(&e) => {
                    let delay = self.inner.retry.delay(attempt);
                    warn!("Query {} failed ({}), retry {} in {:?}", spec.key, e, attempt + 1, delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => break Err(e),
            }
        };

        match &result {
            Ok(data) => self.store(&spec.key, Some(serde_json::to_value(data)?), None),
            Err(e) => self.store(&spec.key, None, Some(e.clone())),
        }
        result
    }

    fn store(&self, key: &QueryKey, data: Option<serde_json::Value>, error: Option<ApiError>) {
        let now = Instant::now();
        {
            let mut entries = self.entries();
            let entry = entries.entry(key.clone()).or_insert_with(|| CacheEntry {
                data: None,
                error: None,
                updated_at: now,
                last_access: now,
                version: 0,
                invalidated: false,
            });

            // При ошибке старые данные остаются (и остаются устаревшими), ошибка запоминается
            if data.is_some() {
                entry.data = data;
                entry.error = None;
                entry.invalidated = false;
                entry.updated_at = now;
            } else {
                entry.error = error;
            }
            entry.version += 1;
            entry.last_access = now;
        }
        self.emit(CacheEvent::Updated(key.clone()));
    }

    fn version(&self, key: &QueryKey) -> u64 {
        self.entries().get(key).map(|e| e.version).unwrap_or(0)
    }

    /// Результат последней записи, если она случилась после `seen`.
    fn settled_after<T: DeserializeOwned>(&self, key: &QueryKey, seen: u64) -> Option<Result<T, ApiError>> {
        let entries = self.entries();
        let entry = entries.get(key)?;
        if entry.version == seen {
            return None;
        }
        if let Some(error) = &entry.error {
            return Some(Err(error.clone()));
        }
        let value = entry.data.clone()?;
        Some(serde_json::from_value(value).map_err(ApiError::from))
    }

    /// Данные, если они есть и ещё свежие.
    pub fn fresh_data<T: DeserializeOwned>(&self, key: &QueryKey, stale_time: Duration) -> Option<T> {
        let now = Instant::now();
        let mut entries = self.entries();
        let entry = entries.get_mut(key)?;
        if !entry.is_fresh(stale_time, now) {
            return None;
        }
        entry.last_access = now;
        entry.data.clone().and_then(|v| serde_json::from_value(v).ok())
    }

    /// Данные из кеша без учёта свежести.
    pub fn get_data<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let mut entries = self.entries();
        let entry = entries.get_mut(key)?;
        entry.last_access = Instant::now();
        entry.data.clone().and_then(|v| serde_json::from_value(v).ok())
    }

    /// Положить данные руками (например, ответ мутации).
    pub fn set_data<T: Serialize>(&self, key: &QueryKey, data: &T) -> Result<(), ApiError> {
        let value = serde_json::to_value(data)?;
        self.store(key, Some(value), None);
        Ok(())
    }

    pub fn is_invalidated(&self, key: &QueryKey) -> bool {
        self.entries().get(key).map(|e| e.invalidated).unwrap_or(false)
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn keys(&self) -> Vec<QueryKey> {
        let mut keys: Vec<QueryKey> = self.entries().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Пометить устаревшими все ключи под фильтром. Следующий fetch пойдёт на backend.
    pub fn invalidate(&self, filter: &QueryKey) -> usize {
        let count = {
            let mut entries = self.entries();
            let mut count = 0;
            for (key, entry) in entries.iter_mut() {
                if key.matches(filter) {
                    entry.invalidated = true;
                    count += 1;
                }
            }
            count
        };

        info!("Invalidated {} cached queries under {}", count, filter);
        self.emit(CacheEvent::Invalidated { filter: filter.clone(), count });
        count
    }

    /// Инвалидировать все корни ключей перечисленных ресурсов.
    pub fn invalidate_resources(&self, resources: &[Resource]) -> usize {
        resources
            .iter()
            .flat_map(|r| r.key_roots().iter())
            .map(|root| self.invalidate(&QueryKey::new(root)))
            .sum()
    }

    pub fn remove(&self, key: &QueryKey) -> bool {
        let removed = self.entries().remove(key).is_some();
        if removed {
            self.emit(CacheEvent::Removed(key.clone()));
        }
        removed
    }

    /// Выкинуть записи, к которым не обращались дольше `max_idle`.
    pub fn gc(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let expired: Vec<QueryKey> = self
            .entries()
            .iter()
            .filter(|(_, e)| now.duration_since(e.last_access) >= max_idle)
            .map(|(k, _)| k.clone())
            .collect();

        for key in &expired {
            self.remove(key);
        }

        // Блокировки ключей, которых больше нет и которые никто не держит
        let entries = self.entries();
        let mut inflight = self.inner.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        inflight.retain(|k, lock| entries.contains_key(k) || Arc::strong_count(lock) > 1);

        if !expired.is_empty() {
            debug!("Cache GC removed {} entries", expired.len());
        }
        expired.len()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

/// Повторяем только сетевые сбои и 5xx.
fn is_transient(error: &ApiError) -> bool {
    match error {
        ApiError::Network { .. } => true,
        ApiError::Http { status, .. } => *status >= 500,
        _ => false,
    }
}

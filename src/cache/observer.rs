//! Наблюдатель запроса: состояние одного "хука" поверх общего кеша.

use serde::{de::DeserializeOwned, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::debug;

use super::{QueryCache, QueryKey, QuerySpec};
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryState<T> {
    pub key: Option<QueryKey>,
    pub status: QueryStatus,
    pub data: Option<T>,
    pub error: Option<String>,
    pub is_fetching: bool,
    /// Данные принадлежат предыдущему ключу (keep previous).
    pub is_placeholder: bool,
}

impl<T> QueryState<T> {
    pub fn idle() -> Self {
        QueryState {
            key: None,
            status: QueryStatus::Idle,
            data: None,
            error: None,
            is_fetching: false,
            is_placeholder: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }
}

pub struct QueryObserver<T> {
    cache: QueryCache,
    state: watch::Sender<QueryState<T>>,
    generation: AtomicU64,
}

impl<T> QueryObserver<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(cache: QueryCache) -> Self {
        let (state, _) = watch::channel(QueryState::idle());
        Self { cache, state, generation: AtomicU64::new(0) }
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState<T>> {
        self.state.subscribe()
    }

    pub fn state(&self) -> QueryState<T> {
        self.state.borrow().clone()
    }

    /// Переключиться на `spec` и загрузить его. Результат устаревшего запуска
    /// (ключ успели сменить) не публикуется.
    pub async fn run(&self, spec: &QuerySpec<T>) -> QueryState<T> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let pending = self.pending_state(spec);
        self.state.send_replace(pending);

        let result = self.cache.fetch(spec).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Dropping stale result for {}", spec.key);
            return self.state();
        }

        let next = match result {
            Ok(data) => QueryState {
                key: Some(spec.key.clone()),
                status: QueryStatus::Success,
                data: Some(data),
                error: None,
                is_fetching: false,
                is_placeholder: false,
            },
            Err(e) => self.error_state(spec, e),
        };
        self.state.send_replace(next.clone());
        next
    }

    fn pending_state(&self, spec: &QuerySpec<T>) -> QueryState<T> {
        // Что-то уже лежит в кеше под этим ключом - показываем, пока идёт обновление
        if let Some(cached) = self.cache.get_data::<T>(&spec.key) {
            return QueryState {
                key: Some(spec.key.clone()),
                status: QueryStatus::Success,
                data: Some(cached),
                error: None,
                is_fetching: true,
                is_placeholder: false,
            };
        }

        let previous = self.state.borrow().data.clone();
        match previous {
            Some(data) if spec.options.keep_previous => QueryState {
                key: Some(spec.key.clone()),
                status: QueryStatus::Success,
                data: Some(data),
                error: None,
                is_fetching: true,
                is_placeholder: true,
            },
            _ => QueryState {
                key: Some(spec.key.clone()),
                status: QueryStatus::Loading,
                data: None,
                error: None,
                is_fetching: true,
                is_placeholder: false,
            },
        }
    }

    fn error_state(&self, spec: &QuerySpec<T>, error: ApiError) -> QueryState<T> {
        // Старые данные ключа не теряем, но статус - ошибка
        let data = self.cache.get_data::<T>(&spec.key);
        QueryState {
            key: Some(spec.key.clone()),
            status: QueryStatus::Error,
            data,
            error: Some(error.to_string()),
            is_fetching: false,
            is_placeholder: false,
        }
    }
}

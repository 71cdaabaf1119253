//! Жизненный цикл одной транзакции: отправка -> опрос статуса -> инвалидация кеша.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

use super::cadence::TransactionRequest;
use super::wallet::{TransactionStatusSource, Wallet};
use super::{TransactionKind, TransactionStatus};
use crate::cache::QueryCache;
use crate::config::TransactionConfig;
use crate::error::WalletError;

/// Сколько сбоев опроса подряд терпим (сеть, ещё не проиндексированный ID).
const MAX_STATUS_FAILURES: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionState {
    pub kind: Option<TransactionKind>,
    pub tx_id: Option<String>,
    /// Кошелёк ещё подписывает / отправляет.
    pub is_mutating: bool,
    pub status: Option<TransactionStatus>,
    pub error: Option<String>,
}

impl TransactionState {
    /// Идёт отправка, либо ID уже есть, а статус ещё не Sealed и не Expired.
    pub fn is_pending(&self) -> bool {
        let terminal = self.status.map(TransactionStatus::is_terminal).unwrap_or(false);
        self.is_mutating || (self.tx_id.is_some() && !terminal)
    }

    pub fn is_sealed(&self) -> bool {
        self.status == Some(TransactionStatus::Sealed)
    }

    pub fn is_expired(&self) -> bool {
        self.status == Some(TransactionStatus::Expired)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSnapshot {
    #[serde(flatten)]
    pub state: TransactionState,
    pub is_pending: bool,
    pub is_sealed: bool,
}

impl From<TransactionState> for TransactionSnapshot {
    fn from(state: TransactionState) -> Self {
        Self { is_pending: state.is_pending(), is_sealed: state.is_sealed(), state }
    }
}

pub struct TransactionTracker {
    status_source: Arc<dyn TransactionStatusSource>,
    cache: QueryCache,
    poll_interval: Duration,
    state: watch::Sender<TransactionState>,
    /// Опрос закончен: терминальный статус или окончательная ошибка.
    finished: AtomicBool,
}

impl TransactionTracker {
    pub fn new(status_source: Arc<dyn TransactionStatusSource>, cache: QueryCache, poll_interval: Duration) -> Self {
        let (state, _) = watch::channel(TransactionState::default());
        Self {
            status_source,
            cache,
            poll_interval,
            state,
            finished: AtomicBool::new(false),
        }
    }

    pub fn from_config(
        status_source: Arc<dyn TransactionStatusSource>,
        cache: QueryCache,
        config: &TransactionConfig,
    ) -> Self {
        Self::new(status_source, cache, Duration::from_millis(config.poll_interval_ms))
    }

    pub fn state(&self) -> TransactionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TransactionState> {
        self.state.subscribe()
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.state.send_replace(TransactionState::default());
    }

    /// Отправить транзакцию через кошелёк и дождаться терминального статуса.
    pub async fn submit(&self, wallet: &dyn Wallet, request: &TransactionRequest) -> Result<TransactionState, WalletError> {
        self.state.send_replace(TransactionState {
            kind: Some(request.kind),
            is_mutating: true,
            ..TransactionState::default()
        });

        let tx_id = match wallet.mutate(request).await {
            Ok(id) => id,
            Err(e) => {
                error!("Failed to submit {} transaction: {}", request.kind, e);
                self.state.send_modify(|s| {
                    s.is_mutating = false;
                    s.error = Some(e.to_string());
                });
                return Err(e);
            }
        };

        info!("Submitted {} transaction {}", request.kind, tx_id);
        self.follow(request.kind, tx_id).await
    }

    /// Следить за транзакцией, отправленной снаружи.
    pub async fn track(&self, kind: TransactionKind, tx_id: &str) -> Result<TransactionState, WalletError> {
        self.state.send_replace(TransactionState {
            kind: Some(kind),
            ..TransactionState::default()
        });
        self.follow(kind, tx_id.to_string()).await
    }

    async fn follow(&self, kind: TransactionKind, tx_id: String) -> Result<TransactionState, WalletError> {
        self.state.send_modify(|s| {
            s.is_mutating = false;
            s.tx_id = Some(tx_id.clone());
        });

        self.finished.store(false, Ordering::SeqCst);
        let mut last_status = None;
        let mut failures = 0;
        loop {
            let result = match self.status_source.status(&tx_id).await {
                Ok(result) => {
                    failures = 0;
                    result
                }
                Err(e) if e.is_transient() && failures < MAX_STATUS_FAILURES => {
                    failures += 1;
                    warn!("Status of transaction {} unavailable ({}), attempt {}", tx_id, e, failures);
                    self.state.send_modify(|s| s.error = Some(e.to_string()));
                    tokio::time::sleep(self.poll_interval).await;
                    continue;
                }
                Err(e) => {
                    error!("Status of transaction {} unavailable: {}", tx_id, e);
                    self.finished.store(true, Ordering::SeqCst);
                    self.state.send_modify(|s| s.error = Some(e.to_string()));
                    return Err(e);
                }
            };

            if last_status != Some(result.status) {
                info!("Transaction {} ({}) is now {:?}", tx_id, kind, result.status);
                last_status = Some(result.status);
            }

            // Флаг раньше состояния: кто увидел терминальный статус, видит и is_finished
            if result.status.is_terminal() {
                self.finished.store(true, Ordering::SeqCst);
            }
            self.state.send_modify(|s| {
                s.status = Some(result.status);
                s.error = result.error_message.clone();
            });

            match result.status {
                TransactionStatus::Sealed => {
                    if let Some(message) = &result.error_message {
                        warn!("Transaction {} sealed with error: {}", tx_id, message);
                    }
                    self.cache.invalidate_resources(kind.invalidates());
                    break;
                }
                TransactionStatus::Expired => {
                    warn!("Transaction {} expired", tx_id);
                    break;
                }
                _ => tokio::time::sleep(self.poll_interval).await,
            }
        }

        Ok(self.state())
    }
}

/// Транзакции, за которыми следит gateway, по ID.
#[derive(Clone)]
pub struct TransactionRegistry {
    status_source: Arc<dyn TransactionStatusSource>,
    cache: QueryCache,
    poll_interval: Duration,
    trackers: Arc<Mutex<HashMap<String, Arc<TransactionTracker>>>>,
}

impl TransactionRegistry {
    pub fn new(status_source: Arc<dyn TransactionStatusSource>, cache: QueryCache, config: &TransactionConfig) -> Self {
        Self {
            status_source,
            cache,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            trackers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Начать слежение в фоне. Повторный вызов с тем же ID возвращает уже существующий трекер.
    pub fn track(&self, kind: TransactionKind, tx_id: &str) -> Arc<TransactionTracker> {
        let mut trackers = self.trackers.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = trackers.get(tx_id) {
            return existing.clone();
        }

        let tracker = Arc::new(TransactionTracker::new(
            self.status_source.clone(),
            self.cache.clone(),
            self.poll_interval,
        ));
        // Сразу помечаем ID, чтобы is_pending был true до первого ответа сети
        tracker.state.send_replace(TransactionState {
            kind: Some(kind),
            tx_id: Some(tx_id.to_string()),
            ..TransactionState::default()
        });
        trackers.insert(tx_id.to_string(), tracker.clone());

        let task_tracker = tracker.clone();
        let tx_id = tx_id.to_string();
        tokio::spawn(async move {
            if let Err(e) = task_tracker.follow(kind, tx_id.clone()).await {
                warn!("Stopped tracking {}: {}", tx_id, e);
            }
        });

        tracker
    }

    pub fn get(&self, tx_id: &str) -> Option<TransactionState> {
        let trackers = self.trackers.lock().unwrap_or_else(PoisonError::into_inner);
        trackers.get(tx_id).map(|t| t.state())
    }

    /// Забыть транзакции, опрос которых закончен (терминальный статус или окончательная ошибка).
    pub fn prune(&self) -> usize {
        let mut trackers = self.trackers.lock().unwrap_or_else(PoisonError::into_inner);
        let before = trackers.len();
        trackers.retain(|_, t| !t.is_finished());
        before - trackers.len()
    }

    pub fn len(&self) -> usize {
        self.trackers.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

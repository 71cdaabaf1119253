//! Оверлей перехода между страницами: карточка "раскрывается" на весь экран.
//!
//! `trigger` поднимает флаг и запоминает прямоугольник карточки, через фиксированное
//! время сбрасывается и то и другое. Сброс не отменяется: каждый вызов планирует свой.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

use crate::config::TransitionConfig;

/// Прямоугольник карточки, из которой стартует переход.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Скругление углов, px.
    pub border_radius: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionState {
    pub is_transitioning: bool,
    pub bounds: Option<TransitionBounds>,
}

#[derive(Clone)]
pub struct TransitionService {
    duration: Duration,
    state: Arc<watch::Sender<TransitionState>>,
}

impl TransitionService {
    pub fn new(duration: Duration) -> Self {
        let (state, _) = watch::channel(TransitionState::default());
        Self { duration, state: Arc::new(state) }
    }

    pub fn from_config(config: &TransitionConfig) -> Self {
        Self::new(Duration::from_millis(config.duration_ms))
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn state(&self) -> TransitionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TransitionState> {
        self.state.subscribe()
    }

    /// Запустить переход. Нужен tokio runtime: сброс идёт отдельной задачей.
    pub fn trigger(&self, bounds: TransitionBounds) {
        debug!("Transition started from {:?}", bounds);
        self.state.send_replace(TransitionState { is_transitioning: true, bounds: Some(bounds) });

        let state = self.state.clone();
        let duration = self.duration;
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            state.send_replace(TransitionState::default());
            debug!("Transition finished");
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> TransitionBounds {
        TransitionBounds { x: 10.0, y: 20.0, width: 300.0, height: 420.0, border_radius: 16.0 }
    }

    #[tokio::test(start_paused = true)]
    async fn flag_clears_after_duration() {
        let service = TransitionService::new(Duration::from_millis(1000));
        service.trigger(card());
        assert!(service.state().is_transitioning);
        assert_eq!(service.state().bounds, Some(card()));

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert!(service.state().is_transitioning);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(service.state(), TransitionState::default());
    }

    #[test]
    fn bounds_use_client_field_names() {
        let bounds: TransitionBounds = serde_json::from_value(serde_json::json!({
            "x": 10.0, "y": 20.0, "width": 300.0, "height": 420.0, "borderRadius": 16.0
        }))
        .unwrap();
        assert_eq!(bounds, card());
    }

    #[tokio::test(start_paused = true)]
    async fn earlier_reset_is_not_cancelled() {
        let service = TransitionService::new(Duration::from_millis(1000));
        service.trigger(card());
        tokio::time::sleep(Duration::from_millis(600)).await;
        service.trigger(TransitionBounds { x: 0.0, ..card() });

        // Первый сброс срабатывает на 1000 мс, несмотря на второй вызов
        tokio::time::sleep(Duration::from_millis(401)).await;
        assert!(!service.state().is_transitioning);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_both_edges() {
        let service = TransitionService::new(Duration::from_millis(50));
        let mut rx = service.subscribe();
        service.trigger(card());

        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_transitioning);
        rx.changed().await.unwrap();
        assert!(!rx.borrow_and_update().is_transitioning);
    }
}

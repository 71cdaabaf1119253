use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassEvent {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub event_id: u64,
    pub name: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPassEdges {
    #[serde(default)]
    pub event: Option<PassEvent>,
}

/// Event Pass (SBT). `is_redeemed` - пропуск уже использован для минта момента.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPass {
    pub id: i64,
    pub pass_id: u64,
    #[serde(default)]
    pub is_redeemed: bool,
    #[serde(default)]
    pub edges: EventPassEdges,
}

impl EventPass {
    pub fn event(&self) -> Option<&PassEvent> {
        self.edges.event.as_ref()
    }

    pub fn can_mint(&self) -> bool {
        !self.is_redeemed
    }
}

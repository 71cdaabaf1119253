use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Статус события на backend: 0 = Upcoming, 1 = Active, 2 = Ended, 3 = Cancelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Active,
    Ended,
    Cancelled,
    Unknown(u8),
}

impl From<u8> for EventStatus {
    fn from(code: u8) -> Self {
        match code {
            0 => EventStatus::Upcoming,
            1 => EventStatus::Active,
            2 => EventStatus::Ended,
            3 => EventStatus::Cancelled,
            other => EventStatus::Unknown(other),
        }
    }
}

impl From<EventStatus> for u8 {
    fn from(status: EventStatus) -> Self {
        match status {
            EventStatus::Upcoming => 0,
            EventStatus::Active => 1,
            EventStatus::Ended => 2,
            EventStatus::Cancelled => 3,
            EventStatus::Unknown(code) => code,
        }
    }
}

impl EventStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "Upcoming",
            EventStatus::Active => "Open",
            EventStatus::Ended => "Ended",
            EventStatus::Cancelled => "Cancelled",
            EventStatus::Unknown(_) => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostRef {
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    pub id: i64,
    pub user_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventEdges {
    #[serde(default)]
    pub host: Option<HostRef>,
    #[serde(default)]
    pub attendances: Vec<Attendance>,
}

/// Событие в том виде, в каком его отдаёт backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: i64,
    /// ID события в контракте
    pub event_id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub long: Option<f64>,
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub quota: u64,
    #[serde(default)]
    pub counter: u64,
    #[serde(default)]
    pub status: EventStatus,
    // Флаги зрителя (только если в запросе был ?viewer=)
    #[serde(default)]
    pub is_registered: bool,
    #[serde(default)]
    pub is_checked_in: bool,
    #[serde(default)]
    pub edges: EventEdges,
}

impl Event {
    pub fn host_address(&self) -> Option<&str> {
        self.edges.host.as_ref().map(|h| h.address.as_str())
    }

    pub fn is_full(&self) -> bool {
        self.quota > 0 && self.counter >= self.quota
    }

    pub fn attendee_count(&self) -> usize {
        self.edges.attendances.len()
    }
}

/// Тип события при создании: online = 0, offline = 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Online,
    Offline,
}

impl EventKind {
    pub fn code(self) -> u8 {
        match self {
            EventKind::Online => 0,
            EventKind::Offline => 1,
        }
    }
}

/// Форма создания события (admin), уходит в транзакцию CreateEvent.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_schedule"))]
pub struct CreateEventInput {
    #[validate(length(min = 1, max = 120))]
    pub event_name: String,
    #[validate(length(max = 5000))]
    pub description: String,
    #[validate(url)]
    pub thumbnail_url: String,
    pub event_pass_img: Option<String>,
    pub event_type: EventKind,
    pub location: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub long: f64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[validate(range(min = 1))]
    pub quota: u64,
}

fn validate_schedule(input: &CreateEventInput) -> Result<(), ValidationError> {
    if input.end_date <= input.start_date {
        return Err(ValidationError::new("end_date_before_start"));
    }
    Ok(())
}

/// Тело `POST /event/check-in`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInRequest {
    #[serde(rename = "userAddress")]
    pub user_address: String,
    #[serde(rename = "eventID")]
    pub event_id: String,
}

use serde::{Deserialize, Serialize};

/// Статус транзакции Flow. Коды совпадают с теми, что отдаёт SDK кошелька.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Unknown,
    Pending,
    Finalized,
    Executed,
    Sealed,
    Expired,
}

impl TransactionStatus {
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => TransactionStatus::Pending,
            2 => TransactionStatus::Finalized,
            3 => TransactionStatus::Executed,
            4 => TransactionStatus::Sealed,
            5 => TransactionStatus::Expired,
            _ => TransactionStatus::Unknown,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            TransactionStatus::Unknown => 0,
            TransactionStatus::Pending => 1,
            TransactionStatus::Finalized => 2,
            TransactionStatus::Executed => 3,
            TransactionStatus::Sealed => 4,
            TransactionStatus::Expired => 5,
        }
    }

    /// Имя статуса из REST API access node (`"Sealed"`, `"Pending"`, ...).
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "pending" => TransactionStatus::Pending,
            "finalized" => TransactionStatus::Finalized,
            "executed" => TransactionStatus::Executed,
            "sealed" => TransactionStatus::Sealed,
            "expired" => TransactionStatus::Expired,
            _ => TransactionStatus::Unknown,
        }
    }

    /// Дальше статус уже не изменится.
    pub fn is_terminal(self) -> bool {
        matches!(self, TransactionStatus::Sealed | TransactionStatus::Expired)
    }
}

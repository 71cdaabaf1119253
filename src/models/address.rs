use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;

/// Адрес аккаунта Flow: 8 байт, 16 hex-символов, всегда с префиксом `0x` в нижнем регистре.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FlowAddress(String);

impl FlowAddress {
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ApiError::InvalidAddress("Address is required".to_string()));
        }

        let hex = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ApiError::InvalidAddress(format!("{}. Must be hexadecimal.", raw)));
        }
        if hex.len() > 16 {
            return Err(ApiError::InvalidAddress(format!(
                "{}. Flow addresses must be 16 hex characters (8 bytes).",
                raw
            )));
        }

        Ok(FlowAddress(format!("0x{:0>16}", hex.to_ascii_lowercase())))
    }

    pub fn is_valid(raw: &str) -> bool {
        Self::parse(raw).is_ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Короткая форма для UI: `0x1234...5678`.
    pub fn shorten(&self, chars: usize) -> String {
        if self.0.len() <= chars * 2 + 2 {
            return self.0.clone();
        }
        format!("{}...{}", &self.0[..chars + 2], &self.0[self.0.len() - chars..])
    }
}

impl FromStr for FlowAddress {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FlowAddress {
    type Error = ApiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FlowAddress> for String {
    fn from(address: FlowAddress) -> Self {
        address.0
    }
}

impl fmt::Display for FlowAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FlowAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

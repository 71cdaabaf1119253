//! Граница с кошельком и блокчейн SDK.
//!
//! Подпись транзакций и аутентификация живут во внешнем кошельке; здесь только трейты,
//! через которые ядро с ним разговаривает.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::cadence::{CadenceValue, Script, TransactionRequest};
use super::TransactionStatus;
use crate::error::WalletError;
use crate::models::FlowAddress;

/// Текущий пользователь кошелька.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub address: Option<FlowAddress>,
    pub logged_in: bool,
}

impl CurrentUser {
    pub fn connected(address: FlowAddress) -> Self {
        Self { address: Some(address), logged_in: true }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Адрес, если пользователь залогинен.
    pub fn require(&self) -> Result<&FlowAddress, WalletError> {
        match (&self.address, self.logged_in) {
            (Some(address), true) => Ok(address),
            _ => Err(WalletError::NotConnected),
        }
    }
}

/// Результат транзакции в сети.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResult {
    pub status: TransactionStatus,
    /// Текст ошибки исполнения, как его отдала сеть.
    pub error_message: Option<String>,
}

#[async_trait]
pub trait ChainQuery: Send + Sync {
    /// Выполнить read-only скрипт и вернуть его результат.
    async fn query(&self, script: &Script) -> Result<CadenceValue, WalletError>;
}

#[async_trait]
pub trait TransactionStatusSource: Send + Sync {
    async fn status(&self, tx_id: &str) -> Result<TransactionResult, WalletError>;
}

#[async_trait]
pub trait Wallet: Send + Sync {
    async fn current_user(&self) -> CurrentUser;

    async fn authenticate(&self) -> Result<CurrentUser, WalletError>;

    async fn unauthenticate(&self) -> Result<(), WalletError>;

    /// Подписать и отправить транзакцию. Возвращает ID транзакции.
    async fn mutate(&self, request: &TransactionRequest) -> Result<String, WalletError>;
}

/// Всё, что умеет SDK кошелька.
pub trait WalletSdk: Wallet + ChainQuery + TransactionStatusSource {}

impl<T: Wallet + ChainQuery + TransactionStatusSource> WalletSdk for T {}

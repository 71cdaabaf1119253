//! flow.rs
//!
//! REST клиент access node сети Flow. Умеет две вещи из границы SDK:
//! 1.  **Скрипты**: `POST /v1/scripts` - Cadence и аргументы уходят в base64,
//!     результат приходит строкой base64 с JSON-Cadence внутри.
//! 2.  **Статус транзакции**: `GET /v1/transaction_results/{id}` - имя статуса и текст
//!     ошибки исполнения, который отдаётся наверх как есть.
//!
//! Подписи здесь нет: отправка транзакций остаётся за кошельком.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Response;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::cadence::{CadenceValue, Script};
use super::wallet::{ChainQuery, TransactionResult, TransactionStatusSource};
use super::TransactionStatus;
use crate::config::FlowConfig;
use crate::error::WalletError;

#[derive(Debug, Serialize)]
struct ScriptBody {
    script: String,
    arguments: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TransactionResultBody {
    #[serde(default)]
    status: String,
    #[serde(default)]
    error_message: String,
}

#[derive(Debug, Deserialize)]
struct AccessNodeError {
    #[serde(default)]
    message: String,
}

#[derive(Clone)]
pub struct FlowAccessNode {
    base_url: String,
    http_client: reqwest::Client,
}

impl FlowAccessNode {
    pub fn from_config(config: &FlowConfig, http_client: reqwest::Client) -> Self {
        Self::new(&config.access_node_url, http_client)
    }

    pub fn new(base_url: &str, http_client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn check(response: Response) -> Result<Response, WalletError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await?;
        let message = serde_json::from_str::<AccessNodeError>(&body)
            .map(|e| e.message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or(body);

        warn!("Access node responded {}: {}", status, message);
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(WalletError::NotFound(message));
        }
        Err(WalletError::Sdk(message))
    }
}

fn encode_script(script: &Script) -> Result<ScriptBody, WalletError> {
    let arguments = script
        .args
        .iter()
        .map(|arg| serde_json::to_vec(arg).map(|json| BASE64.encode(json)))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| WalletError::Sdk(e.to_string()))?;

    Ok(ScriptBody {
        script: BASE64.encode(script.cadence.as_bytes()),
        arguments,
    })
}

fn decode_value(encoded: &str) -> Result<CadenceValue, WalletError> {
    let bytes = BASE64
        .decode(encoded.trim().trim_matches('"'))
        .map_err(|e| WalletError::Sdk(format!("Invalid script result encoding: {}", e)))?;
    serde_json::from_slice(&bytes).map_err(|e| WalletError::Sdk(format!("Invalid script result: {}", e)))
}

#[async_trait]
impl ChainQuery for FlowAccessNode {
    async fn query(&self, script: &Script) -> Result<CadenceValue, WalletError> {
        let url = format!("{}/v1/scripts?block_height=sealed", self.base_url);
        debug!("POST {} ({} args)", url, script.args.len());

        let body = encode_script(script)?;
        let response = self.http_client.post(&url).json(&body).send().await?;
        let response = Self::check(response).await?;

        // Тело - JSON-строка с base64 внутри
        let encoded: String = response.json().await?;
        decode_value(&encoded)
    }
}

#[async_trait]
impl TransactionStatusSource for FlowAccessNode {
    async fn status(&self, tx_id: &str) -> Result<TransactionResult, WalletError> {
        let url = format!("{}/v1/transaction_results/{}", self.base_url, tx_id);
        debug!("GET {}", url);

        let response = self.http_client.get(&url).send().await?;
        let body: TransactionResultBody = Self::check(response).await?.json().await?;

        Ok(TransactionResult {
            status: TransactionStatus::from_name(&body.status),
            error_message: Some(body.error_message).filter(|m| !m.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn script_body_is_base64() {
        let script = Script {
            cadence: "access(all) fun main(): Bool { return true }".into(),
            args: vec![CadenceValue::UInt64(7)],
        };
        let body = encode_script(&script).unwrap();

        let cadence = BASE64.decode(&body.script).unwrap();
        assert_eq!(String::from_utf8(cadence).unwrap(), script.cadence);

        let arg: serde_json::Value = serde_json::from_slice(&BASE64.decode(&body.arguments[0]).unwrap()).unwrap();
        assert_eq!(arg, json!({"type": "UInt64", "value": "7"}));
    }

    #[test]
    fn decodes_base64_result() {
        let encoded = BASE64.encode(br#"{"type":"Bool","value":false}"#);
        assert_eq!(decode_value(&encoded).unwrap(), CadenceValue::Bool(false));
        assert!(matches!(decode_value("%%%"), Err(WalletError::Sdk(_))));
    }
}

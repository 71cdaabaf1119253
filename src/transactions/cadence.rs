//! Cadence: аргументы в формате JSON-Cadence и сборка запросов транзакций / скриптов.
//!
//! Тексты транзакций лежат в `scripts/*.cdc` с импортами вида `import "NFTMoment"`.
//! Перед отправкой импорты разворачиваются в адреса контрактов текущей сети.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use super::TransactionKind;
use crate::config::FlowConfig;
use crate::error::ApiError;
use crate::models::event::CreateEventInput;
use crate::models::user::UpdateProfileInput;
use crate::models::FlowAddress;

/// Лимит вычислений по умолчанию для всех транзакций.
pub const DEFAULT_COMPUTE_LIMIT: u64 = 9999;

const SETUP_ACCOUNT: &str = include_str!("scripts/setup_account.cdc");
const CREATE_EVENT: &str = include_str!("scripts/create_event.cdc");
const REGISTER_EVENT: &str = include_str!("scripts/register_event.cdc");
const EQUIP_ACCESSORY: &str = include_str!("scripts/equip_accessory.cdc");
const UNEQUIP_ACCESSORY: &str = include_str!("scripts/unequip_accessory.cdc");
const LIST_MOMENT: &str = include_str!("scripts/list_moment.cdc");
const LIST_ACCESSORY: &str = include_str!("scripts/list_accessory.cdc");
const BUY_ITEM: &str = include_str!("scripts/buy_item.cdc");
const CANCEL_LISTING: &str = include_str!("scripts/cancel_listing.cdc");
const BUY_GACHA: &str = include_str!("scripts/buy_gacha.cdc");
const REVEAL_GACHA: &str = include_str!("scripts/reveal_gacha.cdc");
const UPDATE_PROFILE: &str = include_str!("scripts/update_profile.cdc");
const HAS_GACHA_RECEIPT: &str = include_str!("scripts/has_gacha_receipt.cdc");
const ACCESSORY_METADATA: &str = include_str!("scripts/accessory_metadata.cdc");

/// Значение в формате JSON-Cadence: `{"type": "UInt64", "value": "5"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CadenceValue {
    Void,
    Bool(bool),
    String(String),
    Address(String),
    UInt8(#[serde(with = "numeric_string")] u8),
    UInt64(#[serde(with = "numeric_string")] u64),
    Int(#[serde(with = "numeric_string")] i64),
    Fix64(String),
    UFix64(String),
    Optional(Option<Box<CadenceValue>>),
    Array(Vec<CadenceValue>),
    Dictionary(Vec<DictionaryEntry>),
    Struct(Composite),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub key: CadenceValue,
    pub value: CadenceValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composite {
    pub id: String,
    pub fields: Vec<CompositeField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeField {
    pub name: String,
    pub value: CadenceValue,
}

// Целые в JSON-Cadence передаются строками
mod numeric_string {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::fmt::Display;
    use std::str::FromStr;

    pub fn serialize<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

impl CadenceValue {
    pub fn string(value: impl Into<String>) -> Self {
        CadenceValue::String(value.into())
    }

    pub fn address(address: &FlowAddress) -> Self {
        CadenceValue::Address(address.to_string())
    }

    pub fn optional(value: Option<CadenceValue>) -> Self {
        CadenceValue::Optional(value.map(Box::new))
    }

    /// Пустая / пробельная строка уходит как `nil`.
    pub fn optional_string(value: Option<&str>) -> Self {
        let trimmed = value.map(str::trim).filter(|v| !v.is_empty());
        Self::optional(trimmed.map(Self::string))
    }

    pub fn fix64(value: f64, decimals: usize) -> Self {
        CadenceValue::Fix64(format!("{:.*}", decimals, value))
    }

    pub fn ufix64(value: f64, decimals: usize) -> Self {
        CadenceValue::UFix64(format!("{:.*}", decimals, value.max(0.0)))
    }

    /// Unix-время в секундах с одним знаком после точки (`"1733047200.0"`).
    pub fn timestamp(at: DateTime<Utc>) -> Self {
        Self::ufix64(at.timestamp_millis() as f64 / 1000.0, 1)
    }

    pub fn string_dictionary(entries: &BTreeMap<String, String>) -> Self {
        CadenceValue::Dictionary(
            entries
                .iter()
                .map(|(k, v)| DictionaryEntry { key: Self::string(k.as_str()), value: Self::string(v.as_str()) })
                .collect(),
        )
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.unwrap_optional()? {
            CadenceValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.unwrap_optional()? {
            CadenceValue::String(s) | CadenceValue::Address(s) => Some(s),
            _ => None,
        }
    }

    /// Поле структуры по имени.
    pub fn field(&self, name: &str) -> Option<&CadenceValue> {
        match self.unwrap_optional()? {
            CadenceValue::Struct(composite) => composite.fields.iter().find(|f| f.name == name).map(|f| &f.value),
            _ => None,
        }
    }

    /// Снимает обёртку `Optional`; `nil` даёт `None`.
    pub fn unwrap_optional(&self) -> Option<&CadenceValue> {
        match self {
            CadenceValue::Optional(inner) => inner.as_deref().and_then(CadenceValue::unwrap_optional),
            other => Some(other),
        }
    }
}

/// Транзакция, готовая к подписи кошельком.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub kind: TransactionKind,
    pub cadence: String,
    pub args: Vec<CadenceValue>,
    pub compute_limit: u64,
}

/// Read-only скрипт.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Script {
    pub cadence: String,
    pub args: Vec<CadenceValue>,
}

/// Покупка листинга с маркетплейса.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyItemInput {
    pub listing_resource_id: u64,
    pub storefront_address: FlowAddress,
    #[serde(default)]
    pub commission_recipient: Option<FlowAddress>,
    /// Тип NFT (`A.<addr>.NFTAccessory.NFT`), по нему транзакция находит коллекцию покупателя.
    pub nft_type_identifier: String,
}

/// Адреса контрактов для разворачивания импортов.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractAddresses {
    network: String,
    nft_moment: FlowAddress,
    event_platform: FlowAddress,
    moment_utility: FlowAddress,
}

impl ContractAddresses {
    pub fn from_config(config: &FlowConfig) -> Result<Self, ApiError> {
        Ok(Self {
            network: config.network.clone(),
            nft_moment: FlowAddress::parse(&config.nft_moment_address)?,
            event_platform: FlowAddress::parse(&config.event_platform_address)?,
            moment_utility: FlowAddress::parse(&config.moment_utility_address)?,
        })
    }

    /// Адрес контракта по имени: сначала наши контракты, потом стандартные контракты сети.
    pub fn resolve(&self, contract: &str) -> Option<String> {
        let own = match contract {
            "NFTMoment" | "NFTAccessory" | "AccessoryPack" => Some(&self.nft_moment),
            "EventManager" | "EventPass" => Some(&self.event_platform),
            "UserProfile" => Some(&self.moment_utility),
            _ => None,
        };
        own.map(FlowAddress::to_string)
            .or_else(|| core_contract(&self.network, contract).map(str::to_string))
    }

    /// `import "Name"` -> `import Name from 0x...`. Неизвестные импорты не трогаем.
    pub fn resolve_imports(&self, cadence: &str) -> String {
        let mut out = String::with_capacity(cadence.len() + 64);
        for line in cadence.lines() {
            let trimmed = line.trim();
            let name = trimmed
                .strip_prefix("import \"")
                .and_then(|rest| rest.strip_suffix('"'));

            match name.and_then(|n| self.resolve(n).map(|addr| (n, addr))) {
                Some((name, address)) => out.push_str(&format!("import {} from {}", name, address)),
                None => out.push_str(line),
            }
            out.push('\n');
        }
        out
    }
}

fn core_contract(network: &str, contract: &str) -> Option<&'static str> {
    let address = match (network, contract) {
        ("mainnet", "NonFungibleToken" | "MetadataViews" | "ViewResolver") => "0x1d7e57aa55817448",
        ("mainnet", "FungibleToken" | "FungibleTokenMetadataViews") => "0xf233dcee88fe0abe",
        ("mainnet", "FlowToken") => "0x1654653399040a61",
        ("mainnet", "NFTStorefrontV2") => "0x4eb8a10cb9f87357",
        ("testnet", "NonFungibleToken" | "MetadataViews" | "ViewResolver") => "0x631e88ae7f1d7c20",
        ("testnet", "FungibleToken" | "FungibleTokenMetadataViews") => "0x9a0766d93b6608b7",
        ("testnet", "FlowToken") => "0x7e60df042a9c0868",
        ("testnet", "NFTStorefrontV2") => "0x2d55b98eb200daef",
        (_, "NonFungibleToken" | "MetadataViews" | "ViewResolver" | "NFTStorefrontV2") => "0xf8d6e0586b0a20c7",
        (_, "FungibleToken" | "FungibleTokenMetadataViews") => "0xee82856bf20e2aa6",
        (_, "FlowToken") => "0x0ae53cb6e3f42a79",
        _ => return None,
    };
    Some(address)
}

/// Собирает запросы транзакций и скриптов с развёрнутыми импортами.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    contracts: ContractAddresses,
}

impl TransactionBuilder {
    pub fn new(contracts: ContractAddresses) -> Self {
        Self { contracts }
    }

    pub fn contracts(&self) -> &ContractAddresses {
        &self.contracts
    }

    fn request(&self, kind: TransactionKind, cadence: &str, args: Vec<CadenceValue>) -> TransactionRequest {
        TransactionRequest {
            kind,
            cadence: self.contracts.resolve_imports(cadence),
            args,
            compute_limit: DEFAULT_COMPUTE_LIMIT,
        }
    }

    fn script(&self, cadence: &str, args: Vec<CadenceValue>) -> Script {
        Script { cadence: self.contracts.resolve_imports(cadence), args }
    }

    pub fn setup_account(&self) -> TransactionRequest {
        self.request(TransactionKind::SetupAccount, SETUP_ACCOUNT, Vec::new())
    }

    pub fn create_event(&self, input: &CreateEventInput) -> Result<TransactionRequest, ApiError> {
        input.validate()?;

        let args = vec![
            CadenceValue::string(input.event_name.trim()),
            CadenceValue::string(input.description.as_str()),
            CadenceValue::string(input.thumbnail_url.as_str()),
            CadenceValue::optional_string(input.event_pass_img.as_deref()),
            CadenceValue::UInt8(input.event_type.code()),
            CadenceValue::string(input.location.as_str()),
            CadenceValue::fix64(input.lat, 4),
            CadenceValue::fix64(input.long, 4),
            CadenceValue::timestamp(input.start_date),
            CadenceValue::timestamp(input.end_date),
            CadenceValue::UInt64(input.quota),
        ];
        Ok(self.request(TransactionKind::CreateEvent, CREATE_EVENT, args))
    }

    pub fn register_event(&self, event_id: u64) -> TransactionRequest {
        self.request(TransactionKind::RegisterEvent, REGISTER_EVENT, vec![CadenceValue::UInt64(event_id)])
    }

    /// Аргументы в порядке транзакции: сначала аксессуар, потом момент.
    pub fn equip_accessory(&self, moment_id: u64, accessory_id: u64) -> TransactionRequest {
        self.request(
            TransactionKind::EquipAccessory,
            EQUIP_ACCESSORY,
            vec![CadenceValue::UInt64(accessory_id), CadenceValue::UInt64(moment_id)],
        )
    }

    pub fn unequip_accessory(&self, moment_id: u64) -> TransactionRequest {
        self.request(TransactionKind::UnequipAccessory, UNEQUIP_ACCESSORY, vec![CadenceValue::UInt64(moment_id)])
    }

    pub fn list_moment(&self, nft_id: u64, price: f64) -> TransactionRequest {
        self.request(
            TransactionKind::ListMoment,
            LIST_MOMENT,
            vec![CadenceValue::UInt64(nft_id), CadenceValue::ufix64(price, 8)],
        )
    }

    pub fn list_accessory(&self, nft_id: u64, price: f64) -> TransactionRequest {
        self.request(
            TransactionKind::ListAccessory,
            LIST_ACCESSORY,
            vec![CadenceValue::UInt64(nft_id), CadenceValue::ufix64(price, 8)],
        )
    }

    pub fn buy_item(&self, input: &BuyItemInput) -> TransactionRequest {
        let args = vec![
            CadenceValue::UInt64(input.listing_resource_id),
            CadenceValue::address(&input.storefront_address),
            CadenceValue::optional(input.commission_recipient.as_ref().map(CadenceValue::address)),
            CadenceValue::string(input.nft_type_identifier.as_str()),
        ];
        self.request(TransactionKind::BuyItem, BUY_ITEM, args)
    }

    pub fn cancel_listing(&self, listing_resource_id: u64) -> TransactionRequest {
        self.request(TransactionKind::CancelListing, CANCEL_LISTING, vec![CadenceValue::UInt64(listing_resource_id)])
    }

    pub fn buy_gacha(&self) -> TransactionRequest {
        self.request(TransactionKind::BuyGacha, BUY_GACHA, Vec::new())
    }

    pub fn reveal_gacha(&self) -> TransactionRequest {
        self.request(TransactionKind::RevealGacha, REVEAL_GACHA, Vec::new())
    }

    /// Пустые соцсети выкидываются, пустые необязательные поля уходят как `nil`.
    pub fn update_profile(&self, input: &UpdateProfileInput) -> Result<TransactionRequest, ApiError> {
        input.validate()?;

        let socials: BTreeMap<String, String> = input
            .socials
            .iter()
            .map(|(k, v)| (k.clone(), v.trim().to_string()))
            .filter(|(_, v)| !v.is_empty())
            .collect();

        let highlighted = input
            .highlighted_event_pass_ids
            .iter()
            .map(|id| CadenceValue::optional(Some(CadenceValue::UInt64(*id))))
            .collect();

        let args = vec![
            CadenceValue::optional_string(input.nickname.as_deref()),
            CadenceValue::optional_string(input.bio.as_deref()),
            CadenceValue::string_dictionary(&socials),
            CadenceValue::optional_string(input.pfp.as_deref()),
            CadenceValue::optional_string(input.short_description.as_deref()),
            CadenceValue::optional_string(input.bg_image.as_deref()),
            CadenceValue::Array(highlighted),
            CadenceValue::optional(input.moment_id.map(CadenceValue::UInt64)),
        ];
        Ok(self.request(TransactionKind::UpdateProfile, UPDATE_PROFILE, args))
    }

    pub fn has_gacha_receipt(&self, address: &FlowAddress) -> Script {
        self.script(HAS_GACHA_RECEIPT, vec![CadenceValue::address(address)])
    }

    pub fn accessory_metadata(&self, address: &FlowAddress, nft_id: u64) -> Script {
        self.script(ACCESSORY_METADATA, vec![CadenceValue::address(address), CadenceValue::UInt64(nft_id)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn builder(network: &str) -> TransactionBuilder {
        let address = FlowAddress::parse("0xf8d6e0586b0a20c7").unwrap();
        TransactionBuilder::new(ContractAddresses {
            network: network.to_string(),
            nft_moment: address.clone(),
            event_platform: FlowAddress::parse("0x01").unwrap(),
            moment_utility: address,
        })
    }

    #[test]
    fn json_cadence_encoding() {
        assert_eq!(serde_json::to_value(CadenceValue::UInt64(5)).unwrap(), json!({"type": "UInt64", "value": "5"}));
        assert_eq!(
            serde_json::to_value(CadenceValue::optional_string(Some("  "))).unwrap(),
            json!({"type": "Optional", "value": null})
        );
        assert_eq!(
            serde_json::to_value(CadenceValue::optional(Some(CadenceValue::string("hi")))).unwrap(),
            json!({"type": "Optional", "value": {"type": "String", "value": "hi"}})
        );
        assert_eq!(serde_json::to_value(CadenceValue::Void).unwrap(), json!({"type": "Void"}));
    }

    #[test]
    fn decodes_script_results() {
        let raw = json!({
            "type": "Optional",
            "value": {"type": "Struct", "value": {"id": "s.abc.AccessoryData", "fields": [
                {"name": "name", "value": {"type": "String", "value": "Golden Frame"}},
                {"name": "thumbnail", "value": {"type": "String", "value": "ipfs://frame"}}
            ]}}
        });
        let value: CadenceValue = serde_json::from_value(raw).unwrap();
        assert_eq!(value.field("name").and_then(CadenceValue::as_str), Some("Golden Frame"));

        let flag: CadenceValue = serde_json::from_value(json!({"type": "Bool", "value": true})).unwrap();
        assert_eq!(flag.as_bool(), Some(true));

        let id: CadenceValue = serde_json::from_value(json!({"type": "UInt64", "value": "18446744073709551615"})).unwrap();
        assert_eq!(id, CadenceValue::UInt64(u64::MAX));
    }

    #[test]
    fn decimal_formatting() {
        assert_eq!(CadenceValue::fix64(-6.2, 4), CadenceValue::Fix64("-6.2000".into()));
        assert_eq!(CadenceValue::ufix64(12.5, 8), CadenceValue::UFix64("12.50000000".into()));
        let at = Utc.with_ymd_and_hms(2025, 12, 1, 10, 0, 0).unwrap();
        assert_eq!(CadenceValue::timestamp(at), CadenceValue::UFix64("1764583200.0".into()));
    }

    #[test]
    fn imports_resolve_per_network() {
        let b = builder("testnet");
        let cadence = b.contracts().resolve_imports("import \"NFTMoment\"\nimport \"FlowToken\"\nimport \"Mystery\"\n");
        assert_eq!(
            cadence,
            "import NFTMoment from 0xf8d6e0586b0a20c7\nimport FlowToken from 0x7e60df042a9c0868\nimport \"Mystery\"\n"
        );
        assert_eq!(b.contracts().resolve("EventManager").as_deref(), Some("0x0000000000000001"));
        assert_eq!(builder("emulator").contracts().resolve("FungibleToken").as_deref(), Some("0xee82856bf20e2aa6"));
    }

    #[test]
    fn equip_passes_accessory_first() {
        let request = builder("testnet").equip_accessory(10, 77);
        assert_eq!(request.kind, TransactionKind::EquipAccessory);
        assert_eq!(request.args, vec![CadenceValue::UInt64(77), CadenceValue::UInt64(10)]);
        assert!(request.cadence.contains("import NFTAccessory from 0xf8d6e0586b0a20c7"));
        assert!(!request.cadence.contains("import \""));
    }

    #[test]
    fn update_profile_cleans_socials_and_blank_fields() {
        let mut input = UpdateProfileInput {
            nickname: Some("  ".into()),
            bio: Some(" hello ".into()),
            moment_id: Some(4),
            ..Default::default()
        };
        input.socials.insert("twitter".into(), "@moment".into());
        input.socials.insert("website".into(), "   ".into());

        let request = builder("testnet").update_profile(&input).unwrap();
        assert_eq!(request.args[0], CadenceValue::Optional(None));
        assert_eq!(request.args[1], CadenceValue::optional(Some(CadenceValue::string("hello"))));
        assert_eq!(
            request.args[2],
            CadenceValue::Dictionary(vec![DictionaryEntry {
                key: CadenceValue::string("twitter"),
                value: CadenceValue::string("@moment"),
            }])
        );
        assert_eq!(request.args[6], CadenceValue::Array(vec![]));
        assert_eq!(request.args[7], CadenceValue::optional(Some(CadenceValue::UInt64(4))));
    }
}

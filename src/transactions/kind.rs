use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::cache::invalidation;
use crate::cache::Resource;

/// Вид on-chain операции. От него зависит, какие ресурсы кеша сбрасываются после Sealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionKind {
    SetupAccount,
    CreateEvent,
    RegisterEvent,
    EquipAccessory,
    UnequipAccessory,
    ListMoment,
    ListAccessory,
    BuyItem,
    CancelListing,
    BuyGacha,
    RevealGacha,
    UpdateProfile,
}

impl TransactionKind {
    pub const ALL: &'static [TransactionKind] = &[
        TransactionKind::SetupAccount,
        TransactionKind::CreateEvent,
        TransactionKind::RegisterEvent,
        TransactionKind::EquipAccessory,
        TransactionKind::UnequipAccessory,
        TransactionKind::ListMoment,
        TransactionKind::ListAccessory,
        TransactionKind::BuyItem,
        TransactionKind::CancelListing,
        TransactionKind::BuyGacha,
        TransactionKind::RevealGacha,
        TransactionKind::UpdateProfile,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::SetupAccount => "setup-account",
            TransactionKind::CreateEvent => "create-event",
            TransactionKind::RegisterEvent => "register-event",
            TransactionKind::EquipAccessory => "equip-accessory",
            TransactionKind::UnequipAccessory => "unequip-accessory",
            TransactionKind::ListMoment => "list-moment",
            TransactionKind::ListAccessory => "list-accessory",
            TransactionKind::BuyItem => "buy-item",
            TransactionKind::CancelListing => "cancel-listing",
            TransactionKind::BuyGacha => "buy-gacha",
            TransactionKind::RevealGacha => "reveal-gacha",
            TransactionKind::UpdateProfile => "update-profile",
        }
    }

    pub fn invalidates(self) -> &'static [Resource] {
        invalidation::for_transaction(self)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("Unknown transaction kind: {}", s))
    }
}

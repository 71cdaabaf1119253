//! Единая таблица инвалидации: какая операция какие ресурсы задевает.
//!
//! Раньше каждый хук сам решал, какие ключи сбросить, и наборы расходились.
//! Теперь после успешной транзакции / мутации сбрасывается ровно то, что здесь записано.

use serde::{Deserialize, Serialize};

use super::keys;
use crate::mutations::MutationKind;
use crate::transactions::TransactionKind;

/// Ресурс backend'а, которому принадлежит набор корней ключей кеша.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    Events,
    Moments,
    Accessories,
    EventPasses,
    Listings,
    Users,
    Comments,
}

impl Resource {
    pub fn key_roots(self) -> &'static [&'static str] {
        match self {
            Resource::Events => &[keys::EVENTS, keys::EVENTS_LIST, keys::EVENT_DETAIL, keys::USER_EVENTS],
            Resource::Moments => &[keys::MOMENTS, keys::MOMENTS_FEED, keys::MOMENT_DETAIL],
            Resource::Accessories => &[keys::ACCESSORIES, keys::ACCESSORY_METADATA],
            Resource::EventPasses => &[keys::EVENT_PASSES, keys::EVENT_PASSES_BULK],
            Resource::Listings => &[keys::LISTINGS],
            Resource::Users => &[keys::USER_PROFILE, keys::USER_SEARCH],
            Resource::Comments => &[keys::COMMENTS],
        }
    }
}

const MARKET: &[Resource] = &[Resource::Listings, Resource::Accessories, Resource::Moments];
const INVENTORY: &[Resource] = &[Resource::Moments, Resource::Accessories];

pub const TRANSACTION_TABLE: &[(TransactionKind, &[Resource])] = &[
    (TransactionKind::SetupAccount, &[Resource::Users]),
    (TransactionKind::CreateEvent, &[Resource::Events]),
    (TransactionKind::RegisterEvent, &[Resource::Events]),
    (TransactionKind::EquipAccessory, INVENTORY),
    (TransactionKind::UnequipAccessory, INVENTORY),
    (TransactionKind::ListMoment, MARKET),
    (TransactionKind::ListAccessory, MARKET),
    (TransactionKind::BuyItem, MARKET),
    (TransactionKind::CancelListing, MARKET),
    (TransactionKind::BuyGacha, &[]),
    (TransactionKind::RevealGacha, &[Resource::Accessories]),
    (TransactionKind::UpdateProfile, &[Resource::Users]),
];

pub const MUTATION_TABLE: &[(MutationKind, &[Resource])] = &[
    (MutationKind::CheckIn, &[Resource::Events, Resource::Users]),
    (MutationKind::MintMoment, &[Resource::Moments, Resource::EventPasses, Resource::Users]),
    (MutationKind::FreeMintMoment, &[Resource::Moments, Resource::Users]),
    (MutationKind::ToggleLike, &[Resource::Moments]),
    (MutationKind::AddComment, &[Resource::Moments, Resource::Comments]),
    (MutationKind::UploadImage, &[]),
];

pub fn for_transaction(kind: TransactionKind) -> &'static [Resource] {
    TRANSACTION_TABLE
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, resources)| *resources)
        .unwrap_or(&[])
}

pub fn for_mutation(kind: MutationKind) -> &'static [Resource] {
    MUTATION_TABLE
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, resources)| *resources)
        .unwrap_or(&[])
}

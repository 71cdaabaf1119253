use serde::{Deserialize, Serialize};

use super::moment::OwnerRef;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListedItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub thumbnail: String,
    pub nft_id: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingEdges {
    #[serde(default)]
    pub seller: Option<OwnerRef>,
    #[serde(default)]
    pub nft_accessory: Option<ListedItem>,
    #[serde(default)]
    pub nft_moment: Option<ListedItem>,
}

/// Лот маркетплейса. `listing_id` - ID ресурса Listing в storefront.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    pub listing_id: u64,
    pub price: f64,
    #[serde(default)]
    pub payment_vault_type: String,
    #[serde(default)]
    pub nft_type_id: String,
    #[serde(default)]
    pub expiry: Option<String>,
    #[serde(default)]
    pub edges: ListingEdges,
}

/// Что именно выставлено на продажу.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListedNft<'a> {
    Moment(&'a ListedItem),
    Accessory(&'a ListedItem),
}

impl Listing {
    pub fn seller_address(&self) -> Option<&str> {
        self.edges.seller.as_ref().map(|s| s.address.as_str())
    }

    pub fn listed_nft(&self) -> Option<ListedNft<'_>> {
        if let Some(moment) = &self.edges.nft_moment {
            return Some(ListedNft::Moment(moment));
        }
        self.edges.nft_accessory.as_ref().map(ListedNft::Accessory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_listed_accessory() {
        let json = r#"{
            "id": 1, "listing_id": 77, "price": 2.5,
            "nft_type_id": "A.f8d6e0586b0a20c7.NFTAccessory.NFT",
            "edges": {"seller": {"address": "0x01"}, "nft_accessory": {"name": "Hat", "nft_id": 4}}
        }"#;
        let listing: Listing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.seller_address(), Some("0x01"));
        match listing.listed_nft() {
            Some(ListedNft::Accessory(item)) => assert_eq!(item.nft_id, 4),
            other => panic!("unexpected {:?}", other),
        }
    }
}

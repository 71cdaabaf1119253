use serde::{Deserialize, Serialize};

use super::moment::OwnerRef;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingRef {
    pub id: i64,
    pub price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MomentRef {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessoryEdges {
    #[serde(default)]
    pub owner: Option<OwnerRef>,
    #[serde(default)]
    pub listing: Option<ListingRef>,
    /// Обратная ссылка на момент, если аксессуар надет
    #[serde(default)]
    pub equipped_on_moment: Option<MomentRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Accessory {
    pub id: i64,
    pub nft_id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub edges: AccessoryEdges,
}

impl Accessory {
    pub fn is_equipped(&self) -> bool {
        self.edges.equipped_on_moment.is_some()
    }

    pub fn is_listed(&self) -> bool {
        self.edges.listing.is_some()
    }

    /// Можно надеть или выставить на продажу.
    pub fn is_available(&self) -> bool {
        !self.is_equipped() && !self.is_listed()
    }
}

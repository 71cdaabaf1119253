use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnerRef {
    pub address: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub pfp: Option<String>,
}

/// Аксессуар, надетый на момент. Порядок в списке = порядок наложения слоёв.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquippedAccessory {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub equipment_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MintedWithPass {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub event: Option<NamedRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MomentEdges {
    #[serde(default)]
    pub owner: Option<OwnerRef>,
    #[serde(default)]
    pub equipped_accessories: Vec<EquippedAccessory>,
    #[serde(default)]
    pub minted_with_pass: Option<MintedWithPass>,
}

/// NFT Moment: `id` - ID в базе, `nft_id` - ID в контракте.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Moment {
    pub id: i64,
    pub nft_id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub edges: MomentEdges,
}

impl Moment {
    pub fn owner_address(&self) -> Option<&str> {
        self.edges.owner.as_ref().map(|o| o.address.as_str())
    }

    pub fn equipped(&self) -> &[EquippedAccessory] {
        &self.edges.equipped_accessories
    }

    pub fn event_name(&self) -> Option<&str> {
        self.edges
            .minted_with_pass
            .as_ref()
            .and_then(|p| p.event.as_ref())
            .map(|e| e.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_stacking_order_of_accessories() {
        let json = r#"{
            "id": 1, "nft_id": 10, "name": "Sunset",
            "edges": {
                "owner": {"address": "0xabc"},
                "equipped_accessories": [
                    {"id": 5, "name": "Frame", "equipment_type": "frame"},
                    {"id": 2, "name": "Sticker", "equipment_type": "sticker"}
                ],
                "minted_with_pass": {"id": 4, "name": "Pass", "event": {"name": "Summit"}}
            }
        }"#;
        let moment: Moment = serde_json::from_str(json).unwrap();
        let ids: Vec<i64> = moment.equipped().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![5, 2]);
        assert_eq!(moment.owner_address(), Some("0xabc"));
        assert_eq!(moment.event_name(), Some("Summit"));
    }

    #[test]
    fn edges_are_optional() {
        let moment: Moment = serde_json::from_str(r#"{"id":1,"nft_id":2,"name":"x"}"#).unwrap();
        assert!(moment.equipped().is_empty());
        assert_eq!(moment.owner_address(), None);
    }
}

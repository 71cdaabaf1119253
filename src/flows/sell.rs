//! Продажа на маркетплейсе: тип -> предмет -> цена -> листинг.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::WizardError;
use crate::transactions::{TransactionBuilder, TransactionRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Moment,
    Accessory,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum SellState {
    SelectType,
    #[serde(rename_all = "camelCase")]
    SelectItem { item_type: ItemType },
    #[serde(rename_all = "camelCase")]
    SetPrice {
        item_type: ItemType,
        nft_id: u64,
        error: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Listing { action: SellAction },
    #[serde(rename_all = "camelCase")]
    Done { action: SellAction },
}

impl SellState {
    fn name(&self) -> &'static str {
        match self {
            SellState::SelectType => "SelectType",
            SellState::SelectItem { .. } => "SelectItem",
            SellState::SetPrice { .. } => "SetPrice",
            SellState::Listing { .. } => "Listing",
            SellState::Done { .. } => "Done",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SellEvent {
    ChooseType(ItemType),
    ChooseItem(u64),
    /// Цена строкой, как её ввёл пользователь.
    Submit(String),
    Back,
    Sealed,
    Failed(String),
    Reset,
}

impl SellEvent {
    fn name(&self) -> &'static str {
        match self {
            SellEvent::ChooseType(_) => "ChooseType",
            SellEvent::ChooseItem(_) => "ChooseItem",
            SellEvent::Submit(_) => "Submit",
            SellEvent::Back => "Back",
            SellEvent::Sealed => "Sealed",
            SellEvent::Failed(_) => "Failed",
            SellEvent::Reset => "Reset",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellAction {
    pub item_type: ItemType,
    pub nft_id: u64,
    pub price: f64,
}

impl SellAction {
    pub fn request(&self, builder: &TransactionBuilder) -> TransactionRequest {
        match self.item_type {
            ItemType::Moment => builder.list_moment(self.nft_id, self.price),
            ItemType::Accessory => builder.list_accessory(self.nft_id, self.price),
        }
    }
}

fn parse_price(raw: &str) -> Result<f64, WizardError> {
    let price: f64 = raw
        .trim()
        .parse()
        .map_err(|_| WizardError::InvalidPrice(raw.to_string()))?;
    if !price.is_finite() || price <= 0.0 {
        return Err(WizardError::InvalidPrice(raw.to_string()));
    }
    Ok(price)
}

#[derive(Debug, Clone)]
pub struct SellWizard {
    state: SellState,
}

impl Default for SellWizard {
    fn default() -> Self {
        Self { state: SellState::SelectType }
    }
}

impl SellWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SellState {
        &self.state
    }

    /// `Some(action)` только на Submit с корректной ценой.
    pub fn apply(&mut self, event: SellEvent) -> Result<Option<SellAction>, WizardError> {
        use SellEvent as E;
        use SellState as S;

        let mut action = None;
        let next = match (&self.state, &event) {
            (S::SelectType, E::ChooseType(item_type)) => S::SelectItem { item_type: *item_type },

            (S::SelectItem { item_type }, E::ChooseItem(nft_id)) => S::SetPrice {
                item_type: *item_type,
                nft_id: *nft_id,
                error: None,
            },
            (S::SelectItem { .. }, E::Back) => S::SelectType,

            (S::SetPrice { item_type, nft_id, .. }, E::Submit(raw)) => {
                let submitted = SellAction { item_type: *item_type, nft_id: *nft_id, price: parse_price(raw)? };
                action = Some(submitted);
                S::Listing { action: submitted }
            }
            (S::SetPrice { item_type, .. }, E::Back) => S::SelectItem { item_type: *item_type },

            (S::Listing { action }, E::Sealed) => S::Done { action: *action },
            (S::Listing { action }, E::Failed(message)) => S::SetPrice {
                item_type: action.item_type,
                nft_id: action.nft_id,
                error: Some(message.clone()),
            },

            // Модалка открылась заново - всё с начала, кроме идущей транзакции
            (S::Listing { .. }, E::Reset) => {
                return Err(WizardError::IllegalTransition { state: "Listing", event: "Reset" });
            }
            (_, E::Reset) => S::SelectType,

            (s, e) => {
                return Err(WizardError::IllegalTransition { state: s.name(), event: e.name() });
            }
        };

        debug!("Sell wizard: {} --{}--> {}", self.state.name(), event.name(), next.name());
        self.state = next;
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_accessory_after_price() {
        let mut wizard = SellWizard::new();
        wizard.apply(SellEvent::ChooseType(ItemType::Accessory)).unwrap();
        wizard.apply(SellEvent::ChooseItem(33)).unwrap();

        let action = wizard.apply(SellEvent::Submit(" 2.5 ".into())).unwrap().unwrap();
        assert_eq!(action, SellAction { item_type: ItemType::Accessory, nft_id: 33, price: 2.5 });

        wizard.apply(SellEvent::Sealed).unwrap();
        assert!(matches!(wizard.state(), SellState::Done { .. }));
    }

    #[test]
    fn bad_price_keeps_user_on_price_step() {
        let mut wizard = SellWizard::new();
        wizard.apply(SellEvent::ChooseType(ItemType::Moment)).unwrap();
        wizard.apply(SellEvent::ChooseItem(1)).unwrap();

        for raw in ["", "abc", "0", "-3", "NaN"] {
            assert!(matches!(wizard.apply(SellEvent::Submit(raw.into())), Err(WizardError::InvalidPrice(_))));
        }
        assert!(matches!(wizard.state(), SellState::SetPrice { nft_id: 1, .. }));
    }

    #[test]
    fn back_and_failure_transitions() {
        let mut wizard = SellWizard::new();
        wizard.apply(SellEvent::ChooseType(ItemType::Moment)).unwrap();
        wizard.apply(SellEvent::ChooseItem(8)).unwrap();
        wizard.apply(SellEvent::Back).unwrap();
        assert_eq!(wizard.state(), &SellState::SelectItem { item_type: ItemType::Moment });

        wizard.apply(SellEvent::ChooseItem(9)).unwrap();
        wizard.apply(SellEvent::Submit("1".into())).unwrap();
        assert!(wizard.apply(SellEvent::Reset).is_err());

        wizard.apply(SellEvent::Failed("insufficient storage".into())).unwrap();
        assert_eq!(
            wizard.state(),
            &SellState::SetPrice { item_type: ItemType::Moment, nft_id: 9, error: Some("insufficient storage".into()) }
        );

        wizard.apply(SellEvent::Reset).unwrap();
        assert_eq!(wizard.state(), &SellState::SelectType);
        assert!(wizard.apply(SellEvent::Sealed).is_err());
    }
}

//! Пошаговые сценарии модалок в виде явных конечных автоматов.

use thiserror::Error;

pub mod equip;
pub mod sell;

pub use equip::{AccessoryChoice, EquipAction, EquipEvent, EquipState, EquipWizard};
pub use sell::{ItemType, SellAction, SellEvent, SellState, SellWizard};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("Event {event} is not allowed in state {state}")]
    IllegalTransition { state: &'static str, event: &'static str },
    #[error("Nothing to save: pick an accessory or choose to unequip")]
    NothingToSave,
    #[error("Invalid price: {0}")]
    InvalidPrice(String),
}

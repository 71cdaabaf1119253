//! Экипировка: выбрать момент -> выбрать аксессуар (или снять текущий) -> транзакция.

use serde::Serialize;
use tracing::debug;

use super::WizardError;
use crate::transactions::{TransactionBuilder, TransactionRequest};

/// Что пользователь выбрал в модалке экипировки.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "nftId", rename_all = "camelCase")]
pub enum AccessoryChoice {
    /// Ничего не трогали, в превью текущий аксессуар.
    Current,
    Accessory(u64),
    Unequip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum EquipState {
    Idle,
    SelectingMoment,
    #[serde(rename_all = "camelCase")]
    Equipping {
        moment_id: u64,
        choice: AccessoryChoice,
        error: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Submitting { moment_id: u64, action: EquipAction },
    #[serde(rename_all = "camelCase")]
    Done { moment_id: u64 },
}

impl EquipState {
    fn name(&self) -> &'static str {
        match self {
            EquipState::Idle => "Idle",
            EquipState::SelectingMoment => "SelectingMoment",
            EquipState::Equipping { .. } => "Equipping",
            EquipState::Submitting { .. } => "Submitting",
            EquipState::Done { .. } => "Done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquipEvent {
    Open,
    SelectMoment(u64),
    ChooseAccessory(u64),
    ChooseUnequip,
    Save,
    Sealed,
    Failed(String),
    Cancel,
    Close,
}

impl EquipEvent {
    fn name(&self) -> &'static str {
        match self {
            EquipEvent::Open => "Open",
            EquipEvent::SelectMoment(_) => "SelectMoment",
            EquipEvent::ChooseAccessory(_) => "ChooseAccessory",
            EquipEvent::ChooseUnequip => "ChooseUnequip",
            EquipEvent::Save => "Save",
            EquipEvent::Sealed => "Sealed",
            EquipEvent::Failed(_) => "Failed",
            EquipEvent::Cancel => "Cancel",
            EquipEvent::Close => "Close",
        }
    }
}

/// Транзакция, которую надо отправить после Save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EquipAction {
    #[serde(rename_all = "camelCase")]
    Equip { moment_id: u64, accessory_id: u64 },
    #[serde(rename_all = "camelCase")]
    Unequip { moment_id: u64 },
}

impl EquipAction {
    pub fn request(&self, builder: &TransactionBuilder) -> TransactionRequest {
        match *self {
            EquipAction::Equip { moment_id, accessory_id } => builder.equip_accessory(moment_id, accessory_id),
            EquipAction::Unequip { moment_id } => builder.unequip_accessory(moment_id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EquipWizard {
    state: EquipState,
}

impl Default for EquipWizard {
    fn default() -> Self {
        Self { state: EquipState::Idle }
    }
}

impl EquipWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EquipState {
        &self.state
    }

    /// Применить событие. `Some(action)` только на Save - её и надо отправить в кошелёк.
    pub fn apply(&mut self, event: EquipEvent) -> Result<Option<EquipAction>, WizardError> {
        let (next, action) = transition(&self.state, &event)?;
        debug!("Equip wizard: {} --{}--> {}", self.state.name(), event.name(), next.name());
        self.state = next;
        Ok(action)
    }
}

fn transition(state: &EquipState, event: &EquipEvent) -> Result<(EquipState, Option<EquipAction>), WizardError> {
    use EquipEvent as E;
    use EquipState as S;

    let next = match (state, event) {
        (S::Idle, E::Open) => S::SelectingMoment,

        (S::SelectingMoment, E::SelectMoment(moment_id)) => S::Equipping {
            moment_id: *moment_id,
            choice: AccessoryChoice::Current,
            error: None,
        },

        (S::Equipping { moment_id, .. }, E::ChooseAccessory(accessory_id)) => S::Equipping {
            moment_id: *moment_id,
            choice: AccessoryChoice::Accessory(*accessory_id),
            error: None,
        },
        (S::Equipping { moment_id, .. }, E::ChooseUnequip) => S::Equipping {
            moment_id: *moment_id,
            choice: AccessoryChoice::Unequip,
            error: None,
        },
        (S::Equipping { moment_id, choice, .. }, E::Save) => {
            let moment_id = *moment_id;
            let action = match choice {
                AccessoryChoice::Current => return Err(WizardError::NothingToSave),
                AccessoryChoice::Accessory(accessory_id) => EquipAction::Equip { moment_id, accessory_id: *accessory_id },
                AccessoryChoice::Unequip => EquipAction::Unequip { moment_id },
            };
            return Ok((S::Submitting { moment_id, action }, Some(action)));
        }

        (S::Submitting { moment_id, .. }, E::Sealed) => S::Done { moment_id: *moment_id },
        // Неудача: назад к выбору с тем же выбором, можно повторить
        (S::Submitting { moment_id, action }, E::Failed(message)) => S::Equipping {
            moment_id: *moment_id,
            choice: match action {
                EquipAction::Equip { accessory_id, .. } => AccessoryChoice::Accessory(*accessory_id),
                EquipAction::Unequip { .. } => AccessoryChoice::Unequip,
            },
            error: Some(message.clone()),
        },

        (S::Done { .. }, E::Close) => S::Idle,
        (s, E::Cancel) if *s != S::Idle => S::Idle,

        (s, e) => {
            return Err(WizardError::IllegalTransition { state: s.name(), event: e.name() });
        }
    };

    Ok((next, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equip_happy_path() {
        let mut wizard = EquipWizard::new();
        wizard.apply(EquipEvent::Open).unwrap();
        wizard.apply(EquipEvent::SelectMoment(12)).unwrap();
        wizard.apply(EquipEvent::ChooseAccessory(40)).unwrap();

        let action = wizard.apply(EquipEvent::Save).unwrap();
        assert_eq!(action, Some(EquipAction::Equip { moment_id: 12, accessory_id: 40 }));
        assert!(matches!(wizard.state(), EquipState::Submitting { moment_id: 12, .. }));

        wizard.apply(EquipEvent::Sealed).unwrap();
        assert_eq!(wizard.state(), &EquipState::Done { moment_id: 12 });
        wizard.apply(EquipEvent::Close).unwrap();
        assert_eq!(wizard.state(), &EquipState::Idle);
    }

    #[test]
    fn save_without_choice_is_rejected() {
        let mut wizard = EquipWizard::new();
        wizard.apply(EquipEvent::Open).unwrap();
        wizard.apply(EquipEvent::SelectMoment(1)).unwrap();
        assert_eq!(wizard.apply(EquipEvent::Save), Err(WizardError::NothingToSave));
        assert!(matches!(wizard.state(), EquipState::Equipping { .. }));
    }

    #[test]
    fn failure_returns_to_equipping_with_error() {
        let mut wizard = EquipWizard::new();
        wizard.apply(EquipEvent::Open).unwrap();
        wizard.apply(EquipEvent::SelectMoment(5)).unwrap();
        wizard.apply(EquipEvent::ChooseUnequip).unwrap();
        assert_eq!(wizard.apply(EquipEvent::Save).unwrap(), Some(EquipAction::Unequip { moment_id: 5 }));

        wizard.apply(EquipEvent::Failed("User rejected".into())).unwrap();
        assert_eq!(
            wizard.state(),
            &EquipState::Equipping {
                moment_id: 5,
                choice: AccessoryChoice::Unequip,
                error: Some("User rejected".into()),
            }
        );
    }

    #[test]
    fn illegal_transitions_leave_state_untouched() {
        let mut wizard = EquipWizard::new();
        let err = wizard.apply(EquipEvent::Save).unwrap_err();
        assert_eq!(err, WizardError::IllegalTransition { state: "Idle", event: "Save" });
        assert_eq!(wizard.apply(EquipEvent::Cancel).unwrap_err(), WizardError::IllegalTransition { state: "Idle", event: "Cancel" });

        wizard.apply(EquipEvent::Open).unwrap();
        assert!(wizard.apply(EquipEvent::Sealed).is_err());
        assert_eq!(wizard.state(), &EquipState::SelectingMoment);

        wizard.apply(EquipEvent::Cancel).unwrap();
        assert_eq!(wizard.state(), &EquipState::Idle);
    }
}

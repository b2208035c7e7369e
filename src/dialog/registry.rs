//! Dialog registry — dialog-id → ordered step list, built once at startup.

use std::collections::HashMap;
use std::sync::Arc;

use crate::dialog::step::WaterfallStep;
use crate::error::DialogError;

/// The steps of one registered dialog.
pub struct DialogSpec {
    steps: Vec<Arc<dyn WaterfallStep>>,
}

impl DialogSpec {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, index: usize) -> Option<Arc<dyn WaterfallStep>> {
        self.steps.get(index).cloned()
    }
}

/// Immutable registry of every dialog the engine can run.
pub struct DialogRegistry {
    dialogs: HashMap<String, DialogSpec>,
}

impl DialogRegistry {
    pub fn builder() -> DialogRegistryBuilder {
        DialogRegistryBuilder {
            dialogs: HashMap::new(),
        }
    }

    pub fn get(&self, dialog_id: &str) -> Result<&DialogSpec, DialogError> {
        self.dialogs
            .get(dialog_id)
            .ok_or_else(|| DialogError::UnknownDialog {
                dialog_id: dialog_id.to_string(),
            })
    }

    pub fn contains(&self, dialog_id: &str) -> bool {
        self.dialogs.contains_key(dialog_id)
    }

    /// Fail fast on any referenced dialog id that was never registered.
    /// Called at startup so `UnknownDialog` never surfaces mid-conversation.
    pub fn validate_references<'a>(
        &self,
        referenced: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), DialogError> {
        for dialog_id in referenced {
            if !self.contains(dialog_id) {
                return Err(DialogError::UnknownDialog {
                    dialog_id: dialog_id.to_string(),
                });
            }
        }
        Ok(())
    }
}

pub struct DialogRegistryBuilder {
    dialogs: HashMap<String, DialogSpec>,
}

impl DialogRegistryBuilder {
    pub fn dialog(
        mut self,
        dialog_id: impl Into<String>,
        steps: Vec<Arc<dyn WaterfallStep>>,
    ) -> Self {
        self.dialogs.insert(dialog_id.into(), DialogSpec { steps });
        self
    }

    pub fn build(self) -> DialogRegistry {
        DialogRegistry {
            dialogs: self.dialogs,
        }
    }
}

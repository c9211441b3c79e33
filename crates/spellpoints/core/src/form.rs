//! Settings form contract.
//!
//! The presentation layer renders [`SettingsForm::fields`] and shows
//! [`SettingsForm::validation_errors`] next to the matching inputs. Field
//! names follow the host's form input names (`spLifeCost`,
//! `spellPointsCosts.3`, ...).

use crate::config::{FormulaPreset, MAX_CLASS_LEVEL, MAX_SLOT_LEVEL, Settings};
use crate::formula::FormulaEvaluator;

/// Validation failure of one form field.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    fn new(field: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            field: field.into(),
            reason: reason.to_string(),
        }
    }
}

/// Editable copy of the settings plus its validation state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsForm {
    pub fields: Settings,
    pub validation_errors: Vec<FieldError>,
}

impl SettingsForm {
    /// Opens the form on the current settings.
    pub fn open(current: &Settings) -> Self {
        Self {
            fields: current.clone(),
            validation_errors: Vec::new(),
        }
    }

    /// Overwrites the fields the preset defines.
    pub fn select_preset(&mut self, preset: FormulaPreset) {
        self.fields.apply_preset(preset);
        self.validation_errors.clear();
    }

    /// Restores every field to the hard-coded defaults.
    pub fn reset(&mut self) {
        self.fields = Settings::new();
        self.validation_errors.clear();
    }

    /// Whether the custom base and multiplier inputs are shown.
    pub fn custom_fields_visible(&self) -> bool {
        self.fields.is_custom_formula
    }

    /// Re-validates every field; returns `true` when the form is clean.
    pub fn validate(&mut self, evaluator: &dyn FormulaEvaluator) -> bool {
        let fields = &self.fields;
        let mut errors = Vec::new();

        if fields.resource_name.trim().is_empty() {
            errors.push(FieldError::new("spResource", "resource name is required"));
        }

        for level in 1..=MAX_CLASS_LEVEL {
            match fields.points_by_class_level.get(&level) {
                None => errors.push(FieldError::new(
                    format!("spellPointsByLevel.{level}"),
                    "value is required",
                )),
                Some(points) if *points < 0 => errors.push(FieldError::new(
                    format!("spellPointsByLevel.{level}"),
                    "value must not be negative",
                )),
                Some(_) => {}
            }
        }

        for level in 1..=MAX_SLOT_LEVEL {
            let field = format!("spellPointsCosts.{level}");
            match fields.cost_formula(level) {
                Some(formula) => {
                    if let Err(error) = evaluator.check(formula) {
                        errors.push(FieldError::new(field, error));
                    }
                }
                None => errors.push(FieldError::new(field, "value is required")),
            }
        }

        let formulas = [
            ("spLifeCost", &fields.hp_cost_per_point),
            ("spCustomFormulaBase", &fields.custom_base_formula),
            (
                "spCustomFormulaSlotMultiplier",
                &fields.custom_slot_multiplier_formula,
            ),
        ];
        for (field, formula) in formulas {
            if let Err(error) = evaluator.check(formula) {
                errors.push(FieldError::new(field, error));
            }
        }

        self.validation_errors = errors;
        self.validation_errors.is_empty()
    }

    /// Validates and returns the settings to store.
    pub fn submit(mut self, evaluator: &dyn FormulaEvaluator) -> Result<Settings, Vec<FieldError>> {
        if !self.validate(evaluator) {
            return Err(self.validation_errors);
        }
        let mut settings = self.fields;
        settings.normalize();
        Ok(settings)
    }
}

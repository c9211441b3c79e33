use super::RuleError;
use crate::config::Settings;
use crate::state::{CharacterRecord, ResourceSlot};

/// Finds the resource slot holding the spell point pool.
///
/// Matches the slot label against [`Settings::resource_name`] exactly and
/// case-sensitively. When several slots carry the label, the first in sheet
/// order wins.
pub fn locate<'c>(
    character: &'c CharacterRecord,
    settings: &Settings,
) -> Result<&'c ResourceSlot, RuleError> {
    character
        .resources
        .iter()
        .find(|resource| resource.label == settings.resource_name)
        .ok_or_else(|| RuleError::ResourceNotFound {
            resource: settings.resource_name.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::fixtures;

    #[test]
    fn finds_pool_by_label() {
        let character = fixtures::wizard();
        let pool = locate(&character, &Settings::new()).unwrap();
        assert_eq!(pool.key, "primary");
    }

    #[test]
    fn label_match_is_case_sensitive() {
        let mut character = fixtures::wizard();
        character.resources[0].label = "spell points".into();

        let result = locate(&character, &Settings::new());
        assert!(matches!(result, Err(RuleError::ResourceNotFound { .. })));
    }

    #[test]
    fn first_matching_slot_wins() {
        let mut character = fixtures::wizard();
        character
            .resources
            .push(ResourceSlot::new("secondary", "Spell Points", 1, 1));

        let pool = locate(&character, &Settings::new()).unwrap();
        assert_eq!(pool.key, "primary");
    }
}

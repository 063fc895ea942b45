use serde::{Deserialize, Deserializer, Serialize};

/// Dietary preference labels offered by the front-ends, in display order.
pub const DIETARY_PREFERENCES: [&str; 8] = [
    "High-Protein",
    "Vegetarian",
    "Vegan",
    "Keto",
    "Paleo",
    "High-Carb",
    "Low-Carb",
    "Dairy-Free",
];

/// Fitness goal labels offered by the front-ends, in display order.
pub const FITNESS_GOALS: [&str; 5] = [
    "Endurance",
    "Muscle Building",
    "Fat Loss",
    "Performance",
    "General Health",
];

/// An optional section the caller can ask the recipe to include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeOption {
    NutritionalInformation,
    RequiredEquipment,
    TipsAndVariations,
    StorageInstructions,
}

impl RecipeOption {
    /// Every option, in the order their keys are listed in the user prompt.
    pub const ALL: [RecipeOption; 4] = [
        RecipeOption::NutritionalInformation,
        RecipeOption::RequiredEquipment,
        RecipeOption::TipsAndVariations,
        RecipeOption::StorageInstructions,
    ];

    /// Wire key, as sent by front-ends in the `options` object
    pub fn key(&self) -> &'static str {
        match self {
            RecipeOption::NutritionalInformation => "nutritionalInformation",
            RecipeOption::RequiredEquipment => "requiredEquipment",
            RecipeOption::TipsAndVariations => "tipsAndVariations",
            RecipeOption::StorageInstructions => "storageInstructions",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.key() == key)
    }
}

/// The four optional-section toggles. Absent or `null` fields deserialize as `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeOptions {
    #[serde(deserialize_with = "null_as_default")]
    pub nutritional_information: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub required_equipment: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub tips_and_variations: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub storage_instructions: bool,
}

impl RecipeOptions {
    pub fn is_enabled(&self, option: RecipeOption) -> bool {
        match option {
            RecipeOption::NutritionalInformation => self.nutritional_information,
            RecipeOption::RequiredEquipment => self.required_equipment,
            RecipeOption::TipsAndVariations => self.tips_and_variations,
            RecipeOption::StorageInstructions => self.storage_instructions,
        }
    }

    pub fn set(&mut self, option: RecipeOption, enabled: bool) {
        let flag = match option {
            RecipeOption::NutritionalInformation => &mut self.nutritional_information,
            RecipeOption::RequiredEquipment => &mut self.required_equipment,
            RecipeOption::TipsAndVariations => &mut self.tips_and_variations,
            RecipeOption::StorageInstructions => &mut self.storage_instructions,
        };
        *flag = enabled;
    }

    /// Builder-style variant of [`RecipeOptions::set`]
    pub fn with(mut self, option: RecipeOption) -> Self {
        self.set(option, true);
        self
    }

    /// Enabled options, always in [`RecipeOption::ALL`] order
    pub fn enabled(&self) -> impl Iterator<Item = RecipeOption> + '_ {
        RecipeOption::ALL
            .into_iter()
            .filter(move |option| self.is_enabled(*option))
    }
}

impl FromIterator<RecipeOption> for RecipeOptions {
    fn from_iter<I: IntoIterator<Item = RecipeOption>>(iter: I) -> Self {
        iter.into_iter()
            .fold(RecipeOptions::default(), |options, option| options.with(option))
    }
}

/// What the caller wants a recipe for.
///
/// `dietary_preference` and `fitness_goal` are display labels taken as-is;
/// they are never checked against [`DIETARY_PREFERENCES`] or [`FITNESS_GOALS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRequest {
    /// Comma-separated free text
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingredients: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dietary_preference: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fitness_goal: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: RecipeOptions,
}

impl RecipeRequest {
    pub fn new(
        ingredients: impl Into<String>,
        dietary_preference: impl Into<String>,
        fitness_goal: impl Into<String>,
        options: RecipeOptions,
    ) -> Self {
        RecipeRequest {
            ingredients: ingredients.into(),
            dietary_preference: dietary_preference.into(),
            fitness_goal: fitness_goal.into(),
            options,
        }
    }
}

/// Front-ends send `null` for untouched controls; treat it like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The two prompts sent to the completion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptBundle {
    system_prompt: String,
    user_prompt: String,
}

impl PromptBundle {
    pub(crate) fn new(system_prompt: String, user_prompt: String) -> Self {
        PromptBundle {
            system_prompt,
            user_prompt,
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn user_prompt(&self) -> &str {
        &self.user_prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_keys_round_trip() {
        for option in RecipeOption::ALL {
            assert_eq!(RecipeOption::from_key(option.key()), Some(option));
        }
        assert_eq!(RecipeOption::from_key("calories"), None);
    }

    #[test]
    fn test_enabled_order_ignores_insertion_order() {
        let options: RecipeOptions = [
            RecipeOption::StorageInstructions,
            RecipeOption::NutritionalInformation,
            RecipeOption::TipsAndVariations,
        ]
        .into_iter()
        .collect();

        let enabled: Vec<_> = options.enabled().collect();
        assert_eq!(
            enabled,
            vec![
                RecipeOption::NutritionalInformation,
                RecipeOption::TipsAndVariations,
                RecipeOption::StorageInstructions,
            ]
        );
    }

    #[test]
    fn test_request_deserializes_camel_case() {
        let request: RecipeRequest = serde_json::from_str(
            r#"{
                "ingredients": "chicken breast, rice",
                "dietaryPreference": "High-Protein",
                "fitnessGoal": "Muscle Building",
                "options": {"nutritionalInformation": true, "storageInstructions": false}
            }"#,
        )
        .unwrap();

        assert_eq!(request.ingredients, "chicken breast, rice");
        assert_eq!(request.dietary_preference, "High-Protein");
        assert_eq!(request.fitness_goal, "Muscle Building");
        assert!(request.options.nutritional_information);
        assert!(!request.options.required_equipment);
    }

    #[test]
    fn test_request_without_options() {
        let request: RecipeRequest =
            serde_json::from_str(r#"{"ingredients": "eggs, spinach"}"#).unwrap();
        assert_eq!(request.options, RecipeOptions::default());
        assert!(request.dietary_preference.is_empty());
    }

    #[test]
    fn test_null_fields_fall_back_to_defaults() {
        let request: RecipeRequest = serde_json::from_str(
            r#"{
                "ingredients": "eggs, spinach",
                "dietaryPreference": null,
                "fitnessGoal": "Fat Loss",
                "options": null
            }"#,
        )
        .unwrap();
        assert!(request.dietary_preference.is_empty());
        assert_eq!(request.options, RecipeOptions::default());

        let options: RecipeOptions =
            serde_json::from_str(r#"{"nutritionalInformation": null, "tipsAndVariations": true}"#)
                .unwrap();
        assert!(!options.nutritional_information);
        assert!(options.tips_and_variations);

        let request: RecipeRequest = serde_json::from_str(r#"{"ingredients": null}"#).unwrap();
        assert!(request.ingredients.is_empty());
    }

    #[test]
    fn test_label_tables() {
        assert_eq!(DIETARY_PREFERENCES.len(), 8);
        assert_eq!(FITNESS_GOALS.len(), 5);
        assert!(DIETARY_PREFERENCES.contains(&"Keto"));
        assert!(FITNESS_GOALS.contains(&"Fat Loss"));
    }
}

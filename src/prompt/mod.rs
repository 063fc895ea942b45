//! Prompt assembly.
//!
//! The system prompt asks the model for an HTML document whose sections
//! follow [`SYSTEM_PROMPT_LAYOUT`]. Optional sections are gated by the
//! request's [`RecipeOptions`]; the rest are always present.
//!
//! Template text lives in `templates/*.txt` and is embedded at compile time
//! with `include_str!`, so the prompts can be edited without dealing with
//! Rust string syntax.

use log::debug;

use crate::model::{PromptBundle, RecipeOption, RecipeOptions, RecipeRequest};

/// Persona, formatting instructions and the ingredients-list scaffold.
pub const SYSTEM_PROMPT_HEADER: &str = include_str!("templates/header.txt");
pub const EQUIPMENT_SECTION: &str = include_str!("templates/equipment.txt");
/// Always present; also closes the `recipe-content` container.
pub const INSTRUCTIONS_SECTION: &str = include_str!("templates/instructions.txt");
pub const NUTRITION_SECTION: &str = include_str!("templates/nutrition.txt");
pub const FITNESS_SECTION: &str = include_str!("templates/fitness.txt");
pub const TIPS_SECTION: &str = include_str!("templates/tips.txt");
pub const STORAGE_SECTION: &str = include_str!("templates/storage.txt");
pub const SYSTEM_PROMPT_CLOSING: &str = include_str!("templates/closing.txt");

/// User prompt template with `{{INGREDIENTS}}`, `{{DIETARY_PREFERENCE}}`,
/// `{{FITNESS_GOAL}}` and `{{OPTIONAL_SECTIONS}}` placeholders. Both guideline
/// tables are part of the template and are sent whatever labels were chosen.
pub const USER_PROMPT_TEMPLATE: &str = include_str!("templates/user.txt");

/// Decides whether a section block goes into the system prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionGate {
    Always,
    When(RecipeOption),
}

impl SectionGate {
    pub fn is_open(&self, options: &RecipeOptions) -> bool {
        match self {
            SectionGate::Always => true,
            SectionGate::When(option) => options.is_enabled(*option),
        }
    }
}

/// Section blocks between the header and the closing tag, in output order.
pub const SYSTEM_PROMPT_LAYOUT: [(SectionGate, &str); 6] = [
    (
        SectionGate::When(RecipeOption::RequiredEquipment),
        EQUIPMENT_SECTION,
    ),
    (SectionGate::Always, INSTRUCTIONS_SECTION),
    (
        SectionGate::When(RecipeOption::NutritionalInformation),
        NUTRITION_SECTION,
    ),
    (SectionGate::Always, FITNESS_SECTION),
    (
        SectionGate::When(RecipeOption::TipsAndVariations),
        TIPS_SECTION,
    ),
    (
        SectionGate::When(RecipeOption::StorageInstructions),
        STORAGE_SECTION,
    ),
];

/// Build the system prompt for the given option set.
pub fn build_system_prompt(options: &RecipeOptions) -> String {
    let sections = SYSTEM_PROMPT_LAYOUT
        .iter()
        .filter(|(gate, _)| gate.is_open(options))
        .map(|(_, block)| *block);

    std::iter::once(SYSTEM_PROMPT_HEADER)
        .chain(sections)
        .chain(std::iter::once(SYSTEM_PROMPT_CLOSING))
        .collect()
}

/// Comma-joined keys of the enabled options, in fixed key order.
pub fn optional_sections_label(options: &RecipeOptions) -> String {
    options
        .enabled()
        .map(|option| option.key())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the user prompt. Field values are interpolated verbatim.
pub fn build_user_prompt(request: &RecipeRequest) -> String {
    let optional_sections = optional_sections_label(&request.options);
    render_template(USER_PROMPT_TEMPLATE, |name| match name {
        "INGREDIENTS" => Some(request.ingredients.as_str()),
        "DIETARY_PREFERENCE" => Some(request.dietary_preference.as_str()),
        "FITNESS_GOAL" => Some(request.fitness_goal.as_str()),
        "OPTIONAL_SECTIONS" => Some(optional_sections.as_str()),
        _ => None,
    })
}

/// Assemble both prompts for a request that has already been validated.
pub fn assemble(request: &RecipeRequest) -> PromptBundle {
    let system_prompt = build_system_prompt(&request.options);
    let user_prompt = build_user_prompt(request);
    debug!(
        "Assembled prompts (system: {} bytes, user: {} bytes)",
        system_prompt.len(),
        user_prompt.len()
    );
    PromptBundle::new(system_prompt, user_prompt)
}

/// Replace `{{NAME}}` placeholders in a single left-to-right pass.
///
/// Substituted values are never rescanned, so caller text that happens to
/// contain `{{...}}` comes through unchanged. Unknown placeholders are kept.
fn render_template<'a>(template: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut output = String::with_capacity(template.len() + 256);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        match after_open.find("}}") {
            Some(end) => {
                let name = &after_open[..end];
                match lookup(name) {
                    Some(value) => output.push_str(value),
                    None => {
                        output.push_str("{{");
                        output.push_str(name);
                        output.push_str("}}");
                    }
                }
                rest = &after_open[end + 2..];
            }
            None => {
                output.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    output.push_str(rest);
    output
}

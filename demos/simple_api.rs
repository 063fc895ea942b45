//! Simple API usage with the free functions
//!
//! Loads settings from config.toml / SENZU__* variables and generates one
//! recipe through the configured gateway.

use senzu_kitchen::{
    gateway, generate_recipe, preview_prompts, AppConfig, RecipeOptions, RecipeRequest,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let request = RecipeRequest::new(
        "salmon, quinoa, asparagus",
        "Dairy-Free",
        "Endurance",
        RecipeOptions {
            tips_and_variations: true,
            storage_instructions: true,
            ..Default::default()
        },
    );

    println!("=== System prompt ===");
    println!("{}", preview_prompts(&request)?.system_prompt());

    let config = AppConfig::load()?;
    let gateway = gateway::from_config(&config)?;
    println!("\n=== Recipe ({}) ===", gateway.provider_name());
    println!("{}", generate_recipe(&request, gateway.as_ref()).await?);

    Ok(())
}

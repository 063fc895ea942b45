//! Basic usage of the RecipeGenerator builder API
//!
//! 1. Preview the prompts for a request without calling the API
//! 2. Generate a recipe (needs OPENAI_API_KEY)
//! 3. Render a failure the way the recipe page shows it

use senzu_kitchen::{render, RecipeGenerator, RecipeOption};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Prompt preview ===");
    let prompts = RecipeGenerator::builder()
        .ingredients("chicken breast, rice, broccoli")
        .dietary_preference("High-Protein")
        .fitness_goal("Muscle Building")
        .option(RecipeOption::NutritionalInformation, true)
        .prompts()?;
    println!("{}", prompts.user_prompt());

    println!("\n=== Generate ===");
    let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
    let result = RecipeGenerator::builder()
        .ingredients("chicken breast, rice, broccoli")
        .dietary_preference("High-Protein")
        .fitness_goal("Muscle Building")
        .option(RecipeOption::NutritionalInformation, true)
        .option(RecipeOption::RequiredEquipment, true)
        .api_key(api_key)
        .generate()
        .await;

    match result {
        Ok(html) => println!("{}", html),
        Err(err) => println!("{}", render::error_html(&err)),
    }

    println!("\n=== Validation failure ===");
    if let Err(err) = RecipeGenerator::builder()
        .ingredients("chicken")
        .generate()
        .await
    {
        println!("{}", render::error_html(&err));
    }

    Ok(())
}

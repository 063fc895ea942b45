use std::error::Error;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use log::info;

use senzu_kitchen::config::AppConfig;
use senzu_kitchen::server::{self, AppState};
use senzu_kitchen::{
    gateway, preview_prompts, render, RecipeGenerator, RecipeOptions, RecipeRequest,
    DIETARY_PREFERENCES, FITNESS_GOALS,
};

#[derive(Parser)]
#[command(name = "senzu-kitchen", version, about = "Fitness-focused recipe generator")]
struct Cli {
    /// Configuration file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a recipe and print its HTML
    Generate {
        #[command(flatten)]
        request: RequestArgs,

        /// API key (overrides config and OPENAI_API_KEY)
        #[arg(long)]
        api_key: Option<String>,

        /// Model identifier
        #[arg(long)]
        model: Option<String>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Print failures as an HTML error block on stdout
        #[arg(long)]
        html_errors: bool,
    },
    /// Print the prompts that would be sent, without calling the API
    Prompt {
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Serve the recipe generation endpoint over HTTP
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Args)]
struct RequestArgs {
    /// Comma-separated ingredients (at least two)
    #[arg(short, long)]
    ingredients: String,

    /// Dietary preference label
    #[arg(long, default_value = DIETARY_PREFERENCES[0])]
    diet: String,

    /// Fitness goal label
    #[arg(long, default_value = FITNESS_GOALS[0])]
    goal: String,

    /// Include nutritional information
    #[arg(long)]
    nutrition: bool,

    /// Include required equipment
    #[arg(long)]
    equipment: bool,

    /// Include chef's tips and variations
    #[arg(long)]
    tips: bool,

    /// Include storage instructions
    #[arg(long)]
    storage: bool,
}

impl From<RequestArgs> for RecipeRequest {
    fn from(args: RequestArgs) -> Self {
        RecipeRequest::new(
            args.ingredients,
            args.diet,
            args.goal,
            RecipeOptions {
                nutritional_information: args.nutrition,
                required_equipment: args.equipment,
                tips_and_variations: args.tips,
                storage_instructions: args.storage,
            },
        )
    }
}

fn load_config(path: Option<&str>) -> Result<AppConfig, Box<dyn Error>> {
    let config = match path {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Generate {
            request,
            api_key,
            model,
            timeout,
            html_errors,
        } => {
            let mut builder = RecipeGenerator::builder()
                .request(request.into())
                .provider_config(config.provider.clone())
                .retry(
                    config.retry.attempts,
                    Duration::from_millis(config.retry.delay_ms),
                );
            if let Some(api_key) = api_key {
                builder = builder.api_key(api_key);
            }
            if let Some(model) = model {
                builder = builder.model(model);
            }
            if let Some(timeout) = timeout {
                builder = builder.timeout(Duration::from_secs(timeout));
            }

            match builder.generate().await {
                Ok(recipe) => {
                    println!("{}", recipe);
                    Ok(())
                }
                Err(err) => {
                    if html_errors {
                        println!("{}", render::error_html(&err));
                    }
                    Err(err.into())
                }
            }
        }
        Command::Prompt { request } => {
            let prompts = preview_prompts(&request.into())?;
            println!("=== System Prompt ===");
            println!("{}", prompts.system_prompt());
            println!("\n=== User Prompt ===");
            println!("{}", prompts.user_prompt());
            Ok(())
        }
        Command::Serve { host, port } => {
            let mut server_config = config.server.clone();
            if let Some(host) = host {
                server_config.host = host;
            }
            if let Some(port) = port {
                server_config.port = port;
            }

            let gateway = gateway::from_config(&config)?;
            info!(
                "Starting {} v{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            );
            server::serve(&server_config, AppState::new(gateway)).await?;
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Keep one-shot commands quiet unless RUST_LOG says otherwise
    let default_filter = match cli.command {
        Command::Serve { .. } => "info",
        _ => "warn",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

use clap::{Parser, Subcommand};
use placefinder_core::{ResultSet, SearchRequest, MIN_PROMPT_CHARS};
use placefinder_pipeline::HttpPipeline;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "placefinder")]
#[command(about = "Find places from a free-text prompt")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one search and print `{queries, radius}` as JSON
    Search {
        prompt: String,
        /// Your latitude; requires --lng
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Your longitude; requires --lat
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
        #[arg(long)]
        pretty: bool,
    },
    /// Print the effective configuration with credentials redacted
    Config,
}

fn render_result(result: &ResultSet, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(result)
    } else {
        serde_json::to_string(result)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = placefinder_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Search {
            prompt,
            lat,
            lng,
            pretty,
        } => {
            let request = SearchRequest::from_parts(prompt, lng, lat);
            if !request.has_valid_prompt() {
                anyhow::bail!("prompt must be at least {MIN_PROMPT_CHARS} characters");
            }

            tracing::debug!(
                prompt_chars = request.prompt.chars().count(),
                has_location = request.user_location.is_some(),
                "running search"
            );

            let pipeline = HttpPipeline::from_app_config(&config)?;
            let result = pipeline.run(&request).await?;
            tracing::info!(
                places = result.places.len(),
                radius_km = result.radius,
                "search complete"
            );

            println!("{}", render_result(&result, pretty)?);
        }
        Commands::Config => println!("{config:#?}"),
    }

    Ok(())
}

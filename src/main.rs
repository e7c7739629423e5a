use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use broadsheet::io::load_context_file;
use broadsheet::models::{Intensity, Length, TopicContext};
use broadsheet::pipeline::{Pipeline, RunRequest};
use broadsheet::registry::Registry;
use broadsheet::{AppConfig, llm, search};

#[derive(Parser)]
#[command(name = "broadsheet")]
#[command(author, version, about = "Research-grounded article generation pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Research a topic and generate a finished article
    Generate {
        /// The topic to write about
        #[arg(short, long)]
        topic: String,

        /// Publication style (see `media-types` for the list)
        #[arg(short, long)]
        media_type: Option<String>,

        /// Article length: short, medium, or long
        #[arg(short, long)]
        length: Option<Length>,

        /// JSON file with extra topic context for the prompts
        #[arg(long)]
        context_file: Option<PathBuf>,

        /// Humanizer rewrite intensity: low, medium, or high
        #[arg(long)]
        intensity: Option<Intensity>,

        /// Skip the humanizer stage
        #[arg(long)]
        no_humanize: bool,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Config file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the available media types
    MediaTypes {
        /// Config file (TOML), for a custom registry
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            topic,
            media_type,
            length,
            context_file,
            intensity,
            no_humanize,
            output,
            config,
            verbose,
        } => {
            setup_logging(verbose);
            generate_article(
                topic,
                media_type,
                length,
                context_file,
                intensity,
                no_humanize,
                output,
                config,
            )
            .await
        }
        Commands::MediaTypes { config } => {
            setup_logging(false);
            list_media_types(config)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn load_config(path: Option<PathBuf>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(&path).context("Failed to load config file"),
        None => Ok(AppConfig::default()),
    }
}

fn load_registry(config: &AppConfig) -> Result<Registry> {
    match &config.registry_file {
        Some(path) => Registry::from_toml_file(path).context("Failed to load registry file"),
        None => Ok(Registry::builtin()),
    }
}

#[allow(clippy::too_many_arguments)]
async fn generate_article(
    topic: String,
    media_type: Option<String>,
    length: Option<Length>,
    context_file: Option<PathBuf>,
    intensity: Option<Intensity>,
    no_humanize: bool,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config(config)?;
    if let Some(intensity) = intensity {
        config.humanizer.intensity = intensity;
    }
    if no_humanize {
        config.humanizer.enabled = false;
    }
    if let Some(output) = output {
        config.output.directory = output;
    }

    let context = match context_file {
        Some(path) => load_context_file(&path).context("Failed to load context file")?,
        None => TopicContext::default(),
    };

    let request = RunRequest {
        topic,
        context,
        media_type: media_type.unwrap_or_else(|| config.article.media_type.clone()),
        length: length.unwrap_or(config.article.length),
    };

    let registry = load_registry(&config)?;
    let llm_client = llm::client_from_env(&config.llm).context("Failed to set up LLM provider")?;
    let search_client =
        search::client_from_env(&config.search).context("Failed to set up search provider")?;

    let pipeline = Pipeline::new(llm_client, search_client, registry, config);
    let report = pipeline.run(request).await?;

    for claim in &report.flagged_claims {
        warn!(claim = %claim, "claim not grounded in research notes");
    }

    let path = pipeline.save(&report)?;
    info!(
        run_id = %report.run_id,
        words = report.article.word_count(),
        sources = report.sources.len(),
        "Article written to {:?}", path
    );
    println!("{}", path.display());

    Ok(())
}

fn list_media_types(config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config)?;
    let registry = load_registry(&config)?;

    println!("Available media types");
    println!("=====================");
    for name in registry.media_types() {
        let profile = registry.get(name)?;
        println!(
            "{name}: {} ({} sections)",
            profile.tone.description,
            profile.sections.len()
        );
    }

    Ok(())
}

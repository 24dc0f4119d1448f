use anyhow::Result;
use clap::{Parser, Subcommand};
use gemini_image_studio::{artifact, Config, TransformPipeline, TransformRequest};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "gemini-image-studio")]
#[command(about = "Transform images with Gemini")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Transform an image according to a text prompt.
    Transform {
        /// Path to the source image (JPEG/PNG/WebP/GIF).
        #[arg(long)]
        image: PathBuf,
        /// How the image should be transformed.
        #[arg(long)]
        prompt: String,
        /// Copy the result here instead of leaving it in the temp directory.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Save a Gemini API key to a .env file.
    Configure {
        /// API key from Google AI Studio.
        #[arg(long)]
        api_key: String,
        /// Target .env file.
        #[arg(long, default_value = ".env")]
        env_file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gemini_image_studio=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    match args.command {
        Command::Transform {
            image,
            prompt,
            output,
        } => run_transform(image, prompt, output).await,
        Command::Configure { api_key, env_file } => {
            Config::save_api_key(&env_file, &api_key)?;
            println!("API key saved to {}", env_file.display());
            Ok(())
        }
    }
}

async fn run_transform(image: PathBuf, prompt: String, output: Option<PathBuf>) -> Result<()> {
    let config = Config::from_env()?;
    let pipeline = TransformPipeline::from_config(&config)?;

    let bytes = std::fs::read(&image)?;
    info!("Loaded source image {} ({} bytes)", image.display(), bytes.len());

    let reply = pipeline
        .transform(&TransformRequest::new(bytes, prompt))
        .await;

    if !reply.is_success() {
        error!("Transformation failed: {}", reply.message);
        eprintln!("{}", reply.message);
        std::process::exit(1);
    }

    if !reply.message.trim().is_empty() {
        println!("{}", reply.message);
    }

    if let Some(path) = reply.artifact {
        match output {
            Some(dest) => {
                std::fs::copy(&path, &dest)?;
                artifact::discard(&path);
                println!("Saved transformed image to {}", dest.display());
            }
            None => println!("Transformed image written to {}", path.display()),
        }
    }

    Ok(())
}

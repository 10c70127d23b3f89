use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lessonforge::{Cli, Config, LessonPipeline};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lessonforge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // The credential must be present before any pipeline stage runs.
    let config = Config::load()?;

    // Check for the external encoder (non-fatal; the extraction strategies
    // report hard failures themselves)
    let missing_deps = lessonforge::utils::check_dependencies().await;
    if !missing_deps.is_empty() {
        eprintln!("⚠️  Dependency check warnings:");
        for dep in missing_deps {
            eprintln!("   • {}", dep);
        }
        eprintln!("   (Continuing anyway - tools may be available)");
    }

    let pipeline = LessonPipeline::new(&config);

    tracing::info!("Starting lesson pipeline for: {}", cli.video.display());

    let output_path = pipeline.run(&cli.video).await?;

    println!("\n✅ Success! Lesson data saved to: {}", output_path.display());

    Ok(())
}

// Prodscribe - image-to-product-description pipeline
// Main entry point

use anyhow::Result;
use clap::Parser;

use prodscribe::cli::{Cli, Commands, DeployAction};
use prodscribe::config::load_settings;
use prodscribe::deploy::{AgentEngineClient, DeployTarget, AGENT_DESCRIPTION, AGENT_NAME};
use prodscribe::image::ImagePayload;
use prodscribe::pipeline::{LoopOutcome, ProductPipeline};
use prodscribe::providers::create_provider;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { image, seed, model } => {
            let settings = load_settings()?;
            let provider = create_provider(&settings)?;
            let model = model.unwrap_or_else(|| settings.model.clone());

            let image = ImagePayload::from_path(&image)?;
            let pipeline = ProductPipeline::new(provider, model);
            let report = pipeline.run(&image, seed.as_deref()).await?;

            println!("{}", report.description);
            eprintln!();
            eprintln!(
                "engagement loop: {}  ·  seo loop: {}",
                outcome_label(&report.engagement),
                outcome_label(&report.seo)
            );
        }

        Commands::Deploy {
            project,
            location,
            bucket,
            action,
        } => {
            let mut settings = load_settings()?;
            settings.apply_overrides(project, location, bucket);

            // Missing deployment configuration prints a diagnostic and
            // aborts without raising.
            let Some(project) = settings.project.clone() else {
                println!("Missing required environment variable: GOOGLE_CLOUD_PROJECT");
                return Ok(());
            };
            let Some(bucket) = settings.bucket.clone() else {
                println!("Missing required environment variable: GOOGLE_CLOUD_STORAGE_BUCKET");
                return Ok(());
            };

            let access_token = match std::env::var("GOOGLE_OAUTH_ACCESS_TOKEN") {
                Ok(token) if !token.is_empty() => token,
                _ => {
                    println!("Missing required environment variable: GOOGLE_OAUTH_ACCESS_TOKEN");
                    return Ok(());
                }
            };

            let target = DeployTarget {
                project,
                location: settings.location.clone(),
                bucket,
            };
            println!("PROJECT: {}", target.project);
            println!("LOCATION: {}", target.location);
            println!("BUCKET: {}", target.bucket);

            let client = AgentEngineClient::new(target, access_token)?;
            match action {
                DeployAction::Create => {
                    let operation = client.create(AGENT_NAME, AGENT_DESCRIPTION).await?;
                    println!("Created remote agent: {operation}");
                }
                DeployAction::Delete { resource_id } => {
                    client.delete(&resource_id).await?;
                    println!("Deleted remote agent: {resource_id}");
                }
            }
        }
    }

    Ok(())
}

fn outcome_label(outcome: &LoopOutcome) -> String {
    match outcome {
        LoopOutcome::Exited { iterations } => {
            format!("converged after {iterations} iteration(s)")
        }
        LoopOutcome::MaxIterationsReached { iterations } => {
            format!("iteration cap reached ({iterations})")
        }
    }
}

// Command-line interface definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "prodscribe",
    about = "Turns a product image into an SEO-aware product description",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the description pipeline locally against a product image
    Run {
        /// Path to the product image (png, jpeg, webp, gif)
        #[arg(long)]
        image: PathBuf,

        /// Optional seed phrase describing the product
        #[arg(long)]
        seed: Option<String>,

        /// Model override (defaults to the configured model)
        #[arg(long)]
        model: Option<String>,
    },

    /// Manage the remotely registered agent
    Deploy {
        /// Cloud project id (overrides config/environment)
        #[arg(long, global = true)]
        project: Option<String>,

        /// Cloud location (overrides config/environment)
        #[arg(long, global = true)]
        location: Option<String>,

        /// Staging bucket (overrides config/environment)
        #[arg(long, global = true)]
        bucket: Option<String>,

        #[command(subcommand)]
        action: DeployAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum DeployAction {
    /// Register the pipeline as a remotely invokable agent
    Create,

    /// Delete a previously registered agent
    Delete {
        /// Agent resource id (bare id or full resource name)
        #[arg(long)]
        resource_id: String,
    },
}

///
/// This module implements the CLI interface for epub-cleaner: command parsing,
/// the `serve` entrypoint for the web service and the offline `clean` command.
///
/// All pipeline logic (string removal, archive handling, uploads) lives in the
/// [`epub-cleaner-core`] crate. This module is CLI glue and wiring only.
///
/// ## How To Use
/// - `epub-cleaner serve --bind 0.0.0.0:5000` with `S3_BUCKET` and AWS credentials in the environment.
/// - `epub-cleaner clean --input book.epub --output clean.epub --strings "Watermark"`.
/// - For programmatic or integration use: call [`run`] with a constructed [`Cli`].
///
/// [`epub-cleaner-core`]: ../../epub-cleaner-core/
use crate::load_config::load_config;
use crate::upload::S3Store;
use crate::web::{serve, AppState};
use anyhow::Result;
use clap::{Parser, Subcommand};
use epub_cleaner_core::clean::clean_archive;
use std::path::PathBuf;
use std::sync::Arc;

/// CLI for epub-cleaner: strip literal strings from EPUB files.
#[derive(Parser)]
#[clap(
    name = "epub-cleaner",
    version,
    about = "Remove literal strings from EPUB text content and share the result via signed links"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the upload web service
    Serve {
        /// Address to listen on
        #[clap(long, default_value = "127.0.0.1:5000")]
        bind: String,
        /// Optional YAML config file; environment variables override it
        #[clap(long)]
        config: Option<PathBuf>,
    },
    /// Clean a single archive locally, without uploading
    Clean {
        /// Archive to read
        #[clap(long)]
        input: PathBuf,
        /// Where to write the cleaned archive
        #[clap(long)]
        output: PathBuf,
        /// Literal string to remove; repeat for more, applied in order
        #[clap(long = "strings")]
        strings: Vec<String>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve { bind, config } => {
            let config = load_config(config.as_deref())?;
            tracing::info!(command = "serve", bind = %bind, "Starting web service");
            let store = S3Store::new_from_env(&config.bucket)
                .map_err(|e| anyhow::anyhow!("Failed to construct S3 store: {e}"))?;
            serve(&bind, AppState::new(config, Arc::new(store))).await
        }
        Commands::Clean {
            input,
            output,
            strings,
        } => {
            tracing::info!(
                command = "clean",
                input = %input.display(),
                output = %output.display(),
                strings = strings.len(),
                "Cleaning archive"
            );
            let report = tokio::task::spawn_blocking(move || clean_archive(&input, &output, &strings))
                .await
                .map_err(|e| anyhow::anyhow!("Clean task failed: {e}"))??;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

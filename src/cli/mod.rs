// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Screenshot PII redaction
#[derive(Parser, Debug)]
#[command(name = "scribe-redactor")]
#[command(version = crate::version::VERSION_NUMBER)]
#[command(about = "Detect and blur PII in workflow screenshots", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract text, find PII and print the blur regions as JSON
    Detect(commands::DetectArgs),

    /// Blur regions on a screenshot and write a PNG
    Apply(commands::ApplyArgs),

    /// Replace PII in text with type placeholders
    Anonymize(commands::AnonymizeArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Detect(args) => commands::detect(args).await,
        Commands::Apply(args) => commands::apply(args).await,
        Commands::Anonymize(args) => commands::anonymize(args).await,
    }
}

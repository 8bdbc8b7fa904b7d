use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::deepl;
use crate::runner::{self, LanguageOutcome};
use crate::settings::{Settings, SETTINGS_FILE_NAME};

#[derive(Debug, Parser)]
#[command(
    name = "transc",
    version,
    about = "Generate translated JSON language files from your source language \
             file, based on the .transc settings in the working directory."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a default .transc settings file to edit afterwards. See
    /// https://www.deepl.com/docs-api/translating-text/ for language codes.
    Init,
}

/// The bare invocation: load settings and run the translation loop.
pub async fn handle_run() -> Result<()> {
    let cwd = Path::new(".");
    let settings = match Settings::load(cwd)? {
        Some(settings) => settings,
        None => {
            println!(
                "Settings does not exist. Please execute 'transc init' first."
            );
            return Ok(());
        }
    };
    if let Err(e) = settings.ensure_complete() {
        anyhow::bail!(
            "Settings file incomplete: {}. Please edit the generated {} file.",
            e,
            SETTINGS_FILE_NAME
        );
    }

    let api_url = deepl::endpoint_url(settings.use_dev_api);
    let report = runner::run(&settings, api_url).await?;

    for (code, outcome) in &report.outcomes {
        match outcome {
            LanguageOutcome::Written { .. } => println!("{}: done", code),
            LanguageOutcome::Failed { reason } => println!("{}: failed ({})", code, reason),
        }
    }
    println!(
        "{} of {} language files written",
        report.written_count(),
        report.outcomes.len()
    );
    Ok(())
}

/// The `init` subcommand: bootstrap a settings file, never overwrite one.
pub fn handle_init() -> Result<()> {
    if Settings::write_default(Path::new("."))? {
        println!(
            "A {} settings file was created! Please edit it.",
            SETTINGS_FILE_NAME
        );
    } else {
        println!(
            "A {} settings file already exists! Please edit it.",
            SETTINGS_FILE_NAME
        );
    }
    Ok(())
}

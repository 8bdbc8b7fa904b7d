use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::deepl;
use crate::flatten::{flatten, reconstruct, FlatPairs};
use crate::settings::Settings;
use crate::tree;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// What happened to one target language during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum LanguageOutcome {
    Written { file_name: String },
    Failed { reason: String },
}

/// Per-language outcomes of one run, in settings order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<(String, LanguageOutcome)>,
}

impl RunReport {
    pub fn written_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, LanguageOutcome::Written { .. }))
            .count()
    }
}

/// Translate the source language file into every configured target language.
///
/// The source tree is read and flattened once; each target language then gets
/// its own request, reconstruction, and output file. A failing language is
/// recorded in the report and never stops the languages after it. Anything
/// wrong before the loop starts (incomplete settings, unreadable or
/// malformed source file) aborts the whole run with no files written.
pub async fn run(settings: &Settings, api_url: &str) -> Result<RunReport> {
    settings.ensure_complete()?;

    let dir = Path::new(&settings.path);
    let source = tree::read_tree(dir, &settings.source_lang_file)?;
    let pairs = flatten(&source);
    info!(
        "Flattened {} strings from {}",
        pairs.len(),
        settings.source_lang_file
    );

    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;

    let mut report = RunReport::default();
    for code in &settings.trans_lang_codes {
        let outcome =
            match translate_language(&client, api_url, settings, &pairs, code, dir).await {
                Ok(file_name) => {
                    info!("{}: wrote {}", code, file_name);
                    LanguageOutcome::Written { file_name }
                }
                Err(e) => {
                    warn!("{}: {:#}", code, e);
                    LanguageOutcome::Failed {
                        reason: format!("{:#}", e),
                    }
                }
            };
        report.outcomes.push((code.clone(), outcome));
    }

    Ok(report)
}

async fn translate_language(
    client: &reqwest::Client,
    api_url: &str,
    settings: &Settings,
    pairs: &FlatPairs,
    target_code: &str,
    dir: &Path,
) -> Result<String> {
    let translations = deepl::translate(
        client,
        api_url,
        &settings.auth_key,
        &pairs.values,
        target_code,
        None,
    )
    .await?;

    let translated = reconstruct(&pairs.keys, &translations)
        .with_context(|| format!("Translation result does not match {}", settings.source_lang_file))?;

    let file_name = format!("{}.json", target_code.to_lowercase());
    tree::write_tree(dir, &file_name, &translated)?;
    Ok(file_name)
}

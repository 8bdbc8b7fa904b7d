use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

const DEEPL_API_URL: &str = "https://api.deepl.com/v2/translate";
const DEEPL_API_FREE_URL: &str = "https://api-free.deepl.com/v2/translate";

/// Pick the endpoint for the account tier: the api-free host serves keys
/// registered for the free plan.
pub fn endpoint_url(use_dev_api: bool) -> &'static str {
    if use_dev_api {
        DEEPL_API_FREE_URL
    } else {
        DEEPL_API_URL
    }
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    text: Option<String>,
    #[allow(dead_code)]
    detected_source_language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

/// Translate a batch of strings into `target_lang` with a single request.
///
/// Every string goes out as one repeated `text` parameter and comes back as
/// one `translations` entry in the same position. Entries without a `text`
/// field are surfaced as `None`; checking that the overall count matches the
/// request is the caller's job.
pub async fn translate(
    client: &reqwest::Client,
    api_url: &str,
    auth_key: &str,
    texts: &[String],
    target_lang: &str,
    source_lang: Option<&str>,
) -> Result<Vec<Option<String>>> {
    let mut params: Vec<(&str, &str)> =
        vec![("auth_key", auth_key), ("target_lang", target_lang)];
    if let Some(source) = source_lang {
        params.push(("source_lang", source));
    }
    for text in texts {
        params.push(("text", text));
    }

    debug!("Requesting {} translations for {}", texts.len(), target_lang);

    let response = client
        .get(api_url)
        .query(&params)
        .send()
        .await
        .context("Failed to send request to the DeepL API")?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.message)
            .unwrap_or(body);
        anyhow::bail!("DeepL API error ({}): {}", status, message);
    }

    let body = response
        .text()
        .await
        .context("Failed to read DeepL response body")?;

    // The API can answer 200 with an error message instead of translations.
    if let Ok(error) = serde_json::from_str::<ErrorResponse>(&body) {
        anyhow::bail!("DeepL API error: {}", error.message);
    }

    let parsed: TranslateResponse =
        serde_json::from_str(&body).context("Failed to parse DeepL response")?;

    Ok(parsed.translations.into_iter().map(|t| t.text).collect())
}

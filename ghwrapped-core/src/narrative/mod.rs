//! Natural-language narratives for a generated profile.
//!
//! The profile is rendered as pretty JSON into one of two prompts and sent to
//! an OpenAI-compatible chat completions endpoint. The model only restates
//! what the profile already contains; it never feeds back into scoring.

use crate::analytics::Profile;
use crate::config::{LlmConfig, NarrativeLanguage};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::time::Duration;

const TEMPERATURE: f64 = 0.7;
const PROFILE_PLACEHOLDER: &str = "{{PROFILE_JSON}}";
const CHINESE_SUFFIX: &str = "\n\n请用中文输出。";

pub const SYSTEM_PROMPT: &str = "\
You are a professional technical analyst and writer.

Your task is to explain a developer's yearly GitHub activity
based strictly on a provided structured profile JSON.

Rules:
- Do NOT invent facts, metrics, or labels.
- Do NOT challenge or reinterpret the provided labels.
- Do NOT infer motivations, personality traits, or skills beyond the data.
- Use only the information explicitly present in the JSON.
- If information is missing, remain silent about it.

Your writing must be:
- Factual
- Neutral to mildly reflective
- Professional, not promotional
";

const MAIN_NARRATIVE_PROMPT: &str = "\
Based on the following developer profile JSON, write a concise
annual narrative (around 120 words) describing the developer's
working style and activity patterns during the year.

Focus on:
- Activity rhythm
- Project focus
- Collaboration behavior
- Notable shifts or emphases

Do not summarize metrics mechanically.
Do not provide advice.
Do not speculate beyond the data.

Profile JSON:
{{PROFILE_JSON}}
";

const ONE_SENTENCE_PROMPT: &str = "\
Based on the provided profile JSON, generate ONE concise sentence
(20 words or fewer) that captures the defining characteristic of
the developer's year.

Constraints:
- Must align exactly with the provided labels.
- Neutral tone.
- No emojis, no hype language.

Profile JSON:
{{PROFILE_JSON}}
";

/// Which narrative to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromptKind {
    /// Roughly 120-word annual narrative
    MainNarrative,
    /// One sentence of at most 20 words
    OneSentence,
}

impl PromptKind {
    pub const ALL: [PromptKind; 2] = [PromptKind::MainNarrative, PromptKind::OneSentence];

    fn template(&self) -> &'static str {
        match self {
            PromptKind::MainNarrative => MAIN_NARRATIVE_PROMPT,
            PromptKind::OneSentence => ONE_SENTENCE_PROMPT,
        }
    }
}

/// A generated narrative and the provenance needed to reproduce it.
#[derive(Debug, Clone, Serialize)]
pub struct Narrative {
    pub kind: PromptKind,
    pub model: String,
    pub language: NarrativeLanguage,
    pub text: String,
    /// SHA-256 of the rendered user prompt, hex encoded
    pub prompt_hash: String,
    pub generated_at: DateTime<Utc>,
}

/// Chat completion interface for narratives.
pub trait NarrativeClient: Send + Sync {
    fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// Create the default HTTP-backed narrative client.
pub fn create_narrative_client(llm: &LlmConfig) -> Result<Box<dyn NarrativeClient>> {
    Ok(Box::new(HttpNarrativeClient::new(llm)?))
}

/// Render the user prompt for `kind`.
pub fn build_prompt(
    profile: &Profile,
    kind: PromptKind,
    language: NarrativeLanguage,
) -> Result<String> {
    let profile_json = profile.to_json_pretty()?;
    let mut prompt = kind.template().replace(PROFILE_PLACEHOLDER, &profile_json);
    if language == NarrativeLanguage::Zh {
        prompt.push_str(CHINESE_SUFFIX);
    }
    Ok(prompt)
}

/// Generate a narrative with a supplied client (used for tests and custom clients).
pub fn generate_narrative(
    client: &dyn NarrativeClient,
    llm: &LlmConfig,
    profile: &Profile,
    kind: PromptKind,
) -> Result<Narrative> {
    let prompt = build_prompt(profile, kind, llm.language)?;
    let mut hasher = Sha256::new();
    hasher.update(prompt.as_bytes());
    let prompt_hash = hex::encode(hasher.finalize());

    tracing::debug!(kind = ?kind, prompt_hash = %prompt_hash, "Requesting narrative");
    let text = client.complete(SYSTEM_PROMPT, &prompt)?.trim().to_string();
    if text.is_empty() {
        return Err(Error::Llm("narrative response was empty".to_string()));
    }

    Ok(Narrative {
        kind,
        model: llm.model.clone(),
        language: llm.language,
        text,
        prompt_hash,
        generated_at: Utc::now(),
    })
}

/// Pull `choices[0].message.content` out of a chat completions body.
fn parse_completion(body: &str) -> Result<String> {
    let json: serde_json::Value = serde_json::from_str(body)?;
    json.get("choices")
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .and_then(|v| v.get("message"))
        .and_then(|v| v.get("content"))
        .and_then(|v| v.as_str())
        .map(ToString::to_string)
        .ok_or_else(|| Error::Llm("response missing choices[0].message.content".to_string()))
}

struct HttpNarrativeClient {
    model: String,
    endpoint: String,
    api_key: String,
    runtime: tokio::runtime::Runtime,
    http: reqwest::Client,
}

impl HttpNarrativeClient {
    fn new(config: &LlmConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());
        let (Some(base_url), Some(api_key)) = (base_url, config.resolved_api_key()) else {
            return Err(Error::Config("Missing LLM configuration".to_string()));
        };

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Llm(format!("failed to build tokio runtime: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| Error::Llm(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            model: config.model.clone(),
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key,
            runtime,
            http,
        })
    }
}

impl NarrativeClient for HttpNarrativeClient {
    fn complete(&self, system: &str, user: &str) -> Result<String> {
        self.runtime.block_on(async {
            let mut headers = HeaderMap::new();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                    .map_err(|e| Error::Llm(format!("invalid auth header: {e}")))?,
            );

            let resp = self
                .http
                .post(&self.endpoint)
                .headers(headers)
                .json(&json!({
                    "model": self.model,
                    "temperature": TEMPERATURE,
                    "messages": [
                        { "role": "system", "content": system },
                        { "role": "user", "content": user }
                    ]
                }))
                .send()
                .await
                .map_err(|e| Error::Llm(format!("request failed: {e}")))?;
            let status = resp.status();
            let body = resp
                .text()
                .await
                .map_err(|e| Error::Llm(format!("read body failed: {e}")))?;
            if !status.is_success() {
                return Err(Error::Llm(format!(
                    "endpoint returned {}: {}",
                    status.as_u16(),
                    body
                )));
            }
            parse_completion(&body)
        })
    }
}

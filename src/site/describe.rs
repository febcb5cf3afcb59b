use anyhow::{Context, Result, bail};
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::site::config::DescribeKeys;
use crate::site::warn;

/// Shown when every provider fails or none is configured.
pub const FALLBACK_DESCRIPTION: &str = "説明文を生成できませんでした。";

const OPENAI_MODEL: &str = "gpt-4o-mini";
const GEMINI_MODEL: &str = "gemini-2.5-flash";

fn build_prompt(title: &str) -> String {
    format!("商品タイトル: {title}\nこの商品を魅力的に紹介する短い文章を日本語で作ってください。")
}

/// One interchangeable text-generation backend. Providers are tried in
/// a fixed order; the first success wins.
pub trait DescriptionProvider {
    fn name(&self) -> &'static str;
    fn generate(&self, title: &str) -> Result<String>;
}

pub struct OpenAiDescriber {
    api_key: String,
    client: Client,
}

impl OpenAiDescriber {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("failed to build OpenAI HTTP client")?;
        Ok(Self { api_key, client })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: usize,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}

impl DescriptionProvider for OpenAiDescriber {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn generate(&self, title: &str) -> Result<String> {
        let prompt = build_prompt(title);
        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", self.api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth).context("invalid OpenAI API key")?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let body = ChatRequest {
            model: OPENAI_MODEL,
            max_tokens: 60,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
        };
        let resp = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .headers(headers)
            .json(&body)
            .send()
            .context("failed to call OpenAI chat completions")?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp
                .text()
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            bail!("OpenAI returned {status}: {text}");
        }
        let parsed: ChatResponse = resp.json().context("failed to parse OpenAI response")?;
        let Some(choice) = parsed.choices.into_iter().next() else {
            bail!("OpenAI response contained no choices");
        };
        Ok(choice.message.content.trim().to_string())
    }
}

pub struct GeminiDescriber {
    api_key: String,
    client: Client,
}

impl GeminiDescriber {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("failed to build Gemini HTTP client")?;
        Ok(Self { api_key, client })
    }
}

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidatePart {
    #[serde(default)]
    text: String,
}

impl DescriptionProvider for GeminiDescriber {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn generate(&self, title: &str) -> Result<String> {
        let prompt = build_prompt(title);
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{GEMINI_MODEL}:generateContent?key={}",
            self.api_key.trim()
        );
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: &prompt }],
            }],
        };
        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .context("failed to call Gemini generateContent")?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp
                .text()
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            bail!("Gemini returned {status}: {text}");
        }
        let parsed: GeminiResponse = resp.json().context("failed to parse Gemini response")?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text.trim().to_string())
            .unwrap_or_default();
        if text.is_empty() {
            bail!("Gemini response contained no text");
        }
        Ok(text)
    }
}

/// Build the ordered chain from whatever keys are present: OpenAI
/// first, Gemini second. An empty chain is valid and degrades every
/// description to the placeholder.
pub fn provider_chain(keys: &DescribeKeys) -> Result<Vec<Box<dyn DescriptionProvider>>> {
    let mut chain: Vec<Box<dyn DescriptionProvider>> = Vec::new();
    if let Some(key) = &keys.openai {
        chain.push(Box::new(OpenAiDescriber::new(key.clone())?));
    }
    if let Some(key) = &keys.google {
        chain.push(Box::new(GeminiDescriber::new(key.clone())?));
    }
    Ok(chain)
}

/// First provider to answer wins; each failure is a diagnostic, and
/// total failure substitutes the fixed placeholder.
pub fn describe(providers: &[Box<dyn DescriptionProvider>], title: &str) -> String {
    for provider in providers {
        match provider.generate(title) {
            Ok(text) if !text.is_empty() => return text,
            Ok(_) => warn::emit("describe_empty", provider.name(), title, "empty response"),
            Err(err) => warn::emit("describe_failed", provider.name(), title, &err.to_string()),
        }
    }
    FALLBACK_DESCRIPTION.to_string()
}

#[cfg(test)]
mod tests {
    use super::{DescriptionProvider, FALLBACK_DESCRIPTION, build_prompt, describe};
    use anyhow::{Result, bail};

    struct Failing;
    struct Fixed(&'static str);

    impl DescriptionProvider for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }
        fn generate(&self, _title: &str) -> Result<String> {
            bail!("quota exhausted")
        }
    }

    impl DescriptionProvider for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }
        fn generate(&self, _title: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn prompt_embeds_the_title() {
        let prompt = build_prompt("犬用ボール");
        assert!(prompt.starts_with("商品タイトル: 犬用ボール"));
    }

    #[test]
    fn chain_falls_through_to_next_provider() {
        let providers: Vec<Box<dyn DescriptionProvider>> =
            vec![Box::new(Failing), Box::new(Fixed("とても良い商品です。"))];
        assert_eq!(describe(&providers, "x"), "とても良い商品です。");
    }

    #[test]
    fn total_failure_yields_placeholder() {
        let providers: Vec<Box<dyn DescriptionProvider>> =
            vec![Box::new(Failing), Box::new(Failing)];
        assert_eq!(describe(&providers, "x"), FALLBACK_DESCRIPTION);
    }

    #[test]
    fn empty_chain_yields_placeholder() {
        let providers: Vec<Box<dyn DescriptionProvider>> = Vec::new();
        assert_eq!(describe(&providers, "x"), FALLBACK_DESCRIPTION);
    }
}

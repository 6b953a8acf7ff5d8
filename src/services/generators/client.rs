//! 文本生成客户端
//!
//! `TextGenerator` 抽象出“提示词进、文本出”，默认实现调用 Gemini
//! `generateContent` 接口。测试中可以替换为固定输出的实现。

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::GeminiConfig;
use crate::errors::{EvalAdminError, Result};

#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

/// 拼接第一个候选的全部文本片段
fn extract_text(response: GenerateContentResponse) -> Result<String> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| EvalAdminError::response_parse("Model returned no candidates"))?;

    let text: String = candidate
        .content
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect::<Vec<_>>()
        .join("");

    if text.trim().is_empty() {
        return Err(EvalAdminError::response_parse("Model returned empty text"));
    }
    Ok(text)
}

pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait::async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        if self.config.api_key.trim().is_empty() {
            return Err(EvalAdminError::external_service_config(
                "Gemini API key is not configured",
            ));
        }

        debug!("Calling Gemini model {}", self.config.model);

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EvalAdminError::external_service(format!(
                "Gemini request failed with status {status}: {error_text}"
            )));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            EvalAdminError::response_parse(format!("Failed to decode Gemini response: {e}"))
        })?;

        extract_text(body)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 返回固定文本的生成器
    pub(crate) struct StaticGenerator(pub String);

    #[async_trait::async_trait]
    impl TextGenerator for StaticGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    fn config(api_key: &str) -> GeminiConfig {
        GeminiConfig {
            api_key: api_key.to_string(),
            base_url: "https://generativelanguage.googleapis.com/".into(),
            model: "gemini-1.5-flash".into(),
            temperature: 0.7,
            max_output_tokens: 1024,
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_endpoint() {
        let client = GeminiClient::new(config("k")).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_key_is_config_error() {
        let client = GeminiClient::new(config("  ")).unwrap();
        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, EvalAdminError::ExternalServiceConfig(_)));
    }

    #[test]
    fn test_extract_text() {
        let body: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"world"}]}},
                {"content":{"parts":[{"text":"ignored"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(body).unwrap(), "Hello world");

        let empty: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(matches!(
            extract_text(empty).unwrap_err(),
            EvalAdminError::ResponseParse(_)
        ));

        let missing: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(extract_text(missing).is_err());
    }

    #[tokio::test]
    async fn test_static_generator() {
        let generator: Box<dyn TextGenerator> = Box::new(StaticGenerator("ok".into()));
        assert_eq!(generator.generate("anything").await.unwrap(), "ok");
    }
}

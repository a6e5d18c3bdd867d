use serde::Deserialize;
use serde::Serialize;

use crate::config::Config;
use crate::tones::Tone;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Input text cannot be empty.")]
    EmptyInput,
    #[error("could not reach the generation service: {0}")]
    Transport(String),
    #[error("the generation service rejected the request (HTTP {status}): {message}")]
    Provider { status: u16, message: String },
    #[error("the generation service returned no text")]
    EmptyResponse,
}

/// Client for the remote rewrite call. One awaited request per invocation;
/// no retries, no streaming. Cheap to clone (the inner reqwest client is
/// reference-counted), which is how the UI hands it to a spawned task.
#[derive(Clone, Debug)]
pub struct GenerationClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GenerationClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    /// Rewrites `input` in the given tone. Precondition failures resolve
    /// locally, before any network I/O.
    pub async fn generate(&self, input: &str, tone: &Tone) -> Result<String, GenerationError> {
        if input.trim().is_empty() {
            return Err(GenerationError::EmptyInput);
        }

        let url = format!(
            "{base}/v1beta/models/{model}:generateContent",
            base = self.base_url,
            model = self.model,
        );
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(input, tone),
                }],
            }],
        };

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| GenerationError::Transport(err.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| GenerationError::Transport(err.to_string()))?;
        if !status.is_success() {
            return Err(GenerationError::Provider {
                status: status.as_u16(),
                message: provider_error_message(&bytes),
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_slice(&bytes).map_err(|err| {
            GenerationError::Transport(format!("unexpected response payload: {err}"))
        })?;
        let text = parsed.text();
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Single prompt embedding the tone and the verbatim input between clear
/// delimiters, instructing the model to return only the rewritten text.
pub fn build_prompt(input: &str, tone: &Tone) -> String {
    format!(
        "You are an expert writer capable of adopting any tone of voice. \
Your task is to rewrite the following text in the specified tone.\n\n\
**Tone to adopt:**\n\
Name: {name}\n\
Description: {description}\n\n\
**Original Text to Rewrite:**\n\
---\n\
{input}\n\
---\n\n\
**Rewritten Text:**",
        name = tone.name,
        description = tone.description,
    )
}

fn provider_error_message(body: &[u8]) -> String {
    if let Ok(parsed) = serde_json::from_slice::<ProviderErrorBody>(body)
        && !parsed.error.message.is_empty()
    {
        return parsed.error.message;
    }
    let raw = String::from_utf8_lossy(body);
    let raw = raw.trim();
    if raw.is_empty() {
        "no further detail from the provider".to_string()
    } else {
        raw.chars().take(200).collect()
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::path::PathBuf;
    use wiremock::Mock;
    use wiremock::MockServer;
    use wiremock::ResponseTemplate;
    use wiremock::matchers::body_partial_json;
    use wiremock::matchers::header;
    use wiremock::matchers::method;
    use wiremock::matchers::path;

    fn config(base_url: &str) -> Config {
        Config {
            toneshift_home: PathBuf::from("/unused"),
            api_key: "test-key".to_string(),
            model: "gemini-2.5-flash".to_string(),
            base_url: base_url.to_string(),
        }
    }

    fn witty() -> Tone {
        Tone {
            name: "Witty Comedian".to_string(),
            description: "Use a humorous, sarcastic, and clever style.".to_string(),
        }
    }

    #[test]
    fn prompt_embeds_tone_and_verbatim_input() {
        let prompt = build_prompt("I lost my keys again", &witty());
        assert!(prompt.contains("Name: Witty Comedian"));
        assert!(prompt.contains("Description: Use a humorous, sarcastic, and clever style."));
        assert!(prompt.contains("---\nI lost my keys again\n---"));
        assert!(prompt.ends_with("**Rewritten Text:**"));
    }

    #[tokio::test]
    async fn empty_input_fails_before_any_network_call() {
        // An unroutable base URL: reaching the network would fail loudly
        // with a transport error instead of the expected validation error.
        let client = GenerationClient::new(&config("http://127.0.0.1:9"));
        let err = client.generate("   \n  ", &witty()).await.unwrap_err();
        assert_matches!(err, GenerationError::EmptyInput);
    }

    #[tokio::test]
    async fn generate_returns_the_provider_text_unmodified() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{"parts": [{"text": build_prompt("I lost my keys again", &witty())}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"parts": [{"text": "Ah yes, the keys: gone again, as is tradition."}]}
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GenerationClient::new(&config(&server.uri()));
        let output = client
            .generate("I lost my keys again", &witty())
            .await
            .unwrap();
        assert_eq!(output, "Ah yes, the keys: gone again, as is tradition.");
        assert_ne!(output, "I lost my keys again");
    }

    #[tokio::test]
    async fn multiple_text_parts_are_concatenated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "Ahoy, "}, {"text": "matey!"}]}}]
            })))
            .mount(&server)
            .await;

        let client = GenerationClient::new(&config(&server.uri()));
        let output = client.generate("hello", &witty()).await.unwrap();
        assert_eq!(output, "Ahoy, matey!");
    }

    #[tokio::test]
    async fn provider_failure_becomes_a_descriptive_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {"message": "Resource has been exhausted"}
            })))
            .mount(&server)
            .await;

        let client = GenerationClient::new(&config(&server.uri()));
        let err = client.generate("hello", &witty()).await.unwrap_err();
        assert_matches!(
            &err,
            GenerationError::Provider { status: 429, message } if message == "Resource has been exhausted"
        );
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn empty_candidate_list_is_an_empty_response_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let client = GenerationClient::new(&config(&server.uri()));
        let err = client.generate("hello", &witty()).await.unwrap_err();
        assert_matches!(err, GenerationError::EmptyResponse);
    }
}

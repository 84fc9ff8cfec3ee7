use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{Annotator, AnnotatorError, RawAnnotation};
use crate::domain::Unit;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

const EXTRACTION_INSTRUCTION: &str = r#"You are a medical entity extraction system.
Identify and extract medically relevant entities from the following paragraph.
Provide the context where the entity was found along with its start and end position within the paragraph.
The output must strictly adhere to this JSON format, no explanation is required:

[
  {
    "entity": "entity1",
    "context": "context of entity1 within the paragraph",
    "start": start_position,
    "end": end_position
  }
]
"#;

/// Annotation backend driven by a hosted generative model behind an
/// OpenAI-compatible chat-completions endpoint. The model is instructed to
/// return a strict JSON array; anything else is a parse failure the
/// reconciler downgrades to zero annotations for that unit.
pub struct GenerativeAnnotator {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GenerativeAnnotator {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Result<Self, AnnotatorError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AnnotatorError::CallFailed(format!("http client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn build_prompt(paragraph: &str) -> String {
        format!("{EXTRACTION_INSTRUCTION}\nParagraph:\n{paragraph}\n\nEntities:\n")
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatRequestMessage>,
    temperature: f32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatRequestMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl Annotator for GenerativeAnnotator {
    #[tracing::instrument(skip(self, unit), fields(unit_offset = unit.start_offset))]
    async fn annotate(&self, unit: &Unit) -> Result<Vec<RawAnnotation>, AnnotatorError> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatRequestMessage {
                role: "user",
                content: Self::build_prompt(&unit.content),
            }],
            temperature: 0.0,
            stream: false,
        };

        let url = format!("{}/v1/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| AnnotatorError::CallFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AnnotatorError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AnnotatorError::CallFailed(format!("HTTP {status}: {text}")));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| AnnotatorError::ParseFailed(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            tracing::warn!("Empty completion from model");
            return Ok(Vec::new());
        }

        parse_entity_array(&content)
    }
}

/// Parses a model completion as a JSON array of annotation records.
///
/// The array must parse as a whole, but individual malformed elements are
/// dropped so that one bad record does not take its valid siblings with it.
pub fn parse_entity_array(content: &str) -> Result<Vec<RawAnnotation>, AnnotatorError> {
    let value: serde_json::Value = serde_json::from_str(content.trim())
        .map_err(|e| AnnotatorError::ParseFailed(e.to_string()))?;

    let elements = value
        .as_array()
        .ok_or_else(|| AnnotatorError::ParseFailed("expected a JSON array".to_string()))?;

    let annotations = elements
        .iter()
        .filter_map(|element| match RawAnnotation::deserialize(element) {
            Ok(annotation) => Some(annotation),
            Err(e) => {
                tracing::warn!(error = %e, "Dropping unparsable annotation record");
                None
            }
        })
        .collect();

    Ok(annotations)
}

//! OpenAI implementation of the AI trait.
//!
//! Uses chat completions with `json_schema` structured output for case
//! extraction, a plain completion for query suggestions, and
//! text-embedding-3-small for embeddings.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};
use crate::traits::ai::AI;
use crate::types::CaseDraft;

/// Timeout for a single LLM call. Extraction over a large context is slow;
/// anything past this ends that unit of work.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

const EXTRACTION_SYSTEM_PROMPT: &str = r#"You are a meticulous business analyst. Analyze the provided web search results about failed companies and identify every distinct failed company they describe.

For each failure, extract:
- "company_name": the company's name
- "failure_reason_category": a short category for why it failed
- "what_they_did": what the company built or sold
- "what_went_wrong": the concrete story of the failure
- "key_takeaway": the lesson another founder should draw
- "source_url": the URL from the 'Source URL' line the information came from

Only include companies the sources actually describe as failed. If the results describe none, return an empty list."#;

const SUGGEST_SYSTEM_PROMPT: &str = "Based on these summaries of recently discovered failed companies, generate 5 new, highly specific search queries to find similar stories or dig deeper. Return a simple list of queries, one per line, with no other text.";

/// OpenAI-based AI implementation.
pub struct OpenAI {
    client: Client,
    api_key: SecretString,
    model: String,
    embedding_model: String,
    base_url: String,
}

impl OpenAI {
    /// Create a new OpenAI client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: SecretString::from(api_key.into()),
            model: "gpt-4o".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Set the chat model (default: gpt-4o).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the embedding model (default: text-embedding-3-small).
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Make a plain chat completion request.
    async fn chat(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: Some(0.7),
            max_tokens: Some(1024),
            response_format: None,
        };

        self.completion(&request).await
    }

    /// Make a chat completion request with strict `json_schema` output.
    async fn structured(
        &self,
        system: &str,
        user: &str,
        schema_name: &str,
        schema: serde_json::Value,
    ) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: Some(0.0),
            max_tokens: None,
            response_format: Some(ResponseFormat {
                format_type: "json_schema".to_string(),
                json_schema: JsonSchemaFormat {
                    name: schema_name.to_string(),
                    strict: true,
                    schema,
                },
            }),
        };

        self.completion(&request).await
    }

    async fn completion(&self, request: &ChatRequest) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key.expose_secret()))
            .header("Content-Type", "application/json")
            .timeout(REQUEST_TIMEOUT)
            .json(request)
            .send()
            .await
            .map_err(|e| AgentError::Ai(e.to_string().into()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AgentError::Ai(
                format!("OpenAI API error: {}", error_text).into(),
            ));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Ai(e.to_string().into()))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AgentError::Ai("No response from OpenAI".into()))
    }

    /// Make an embedding request.
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: self.embedding_model.clone(),
            input: text.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key.expose_secret()))
            .header("Content-Type", "application/json")
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::Ai(e.to_string().into()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AgentError::Ai(
                format!("OpenAI embedding error: {}", error_text).into(),
            ));
        }

        let embed_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Ai(e.to_string().into()))?;

        embed_response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| AgentError::Ai("No embedding from OpenAI".into()))
    }
}

/// Strict schema for the extraction response: a list of six-field cases.
fn case_list_schema() -> serde_json::Value {
    let case_fields = serde_json::json!({
        "company_name": { "type": "string" },
        "failure_reason_category": { "type": "string" },
        "what_they_did": { "type": "string" },
        "what_went_wrong": { "type": "string" },
        "key_takeaway": { "type": "string" },
        "source_url": { "type": "string" }
    });

    serde_json::json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["failures"],
        "properties": {
            "failures": {
                "type": "array",
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": [
                        "company_name",
                        "failure_reason_category",
                        "what_they_did",
                        "what_went_wrong",
                        "key_takeaway",
                        "source_url"
                    ],
                    "properties": case_fields
                }
            }
        }
    })
}

#[async_trait]
impl AI for OpenAI {
    async fn extract_cases(&self, query: &str, context: &str) -> Result<Vec<CaseDraft>> {
        let user = format!(
            "Query: \"{}\"\n\nContext from web search:\n---\n{}\n---",
            query, context
        );

        let response = self
            .structured(EXTRACTION_SYSTEM_PROMPT, &user, "failure_cases", case_list_schema())
            .await?;

        let parsed: ExtractionResponse = serde_json::from_str(&response)
            .map_err(|e| AgentError::Ai(format!("Failed to parse extraction: {}", e).into()))?;

        Ok(parsed.failures)
    }

    async fn suggest_queries(&self, digest: &str) -> Result<String> {
        let user = format!("Discovered companies:\n---\n{}\n---", digest);
        self.chat(SUGGEST_SYSTEM_PROMPT, &user).await
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_text(text).await
    }
}

// Request/Response types

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
    json_schema: JsonSchemaFormat,
}

#[derive(Serialize)]
struct JsonSchemaFormat {
    name: String,
    strict: bool,
    schema: serde_json::Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Serialize)]
struct EmbeddingRequest {
    model: String,
    input: String,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ExtractionResponse {
    failures: Vec<CaseDraft>,
}

//! Gemini-backed content provider.
//!
//! Talks to the Generative Language API in JSON response mode and turns
//! its payloads into validated [`Scenario`] and [`Question`] values.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, error, info, instrument};

use crate::config::GeminiConfig;
use crate::content::{ContentError, ContentProvider};
use crate::image_resolver::ImageResolver;
use crate::scenario::{Question, Scenario};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Content provider backed by the Gemini API plus the static image registry.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    http: reqwest::Client,
    images: ImageResolver,
}

impl GeminiClient {
    /// Creates a new client.
    #[instrument(skip(config, images), fields(model = %config.model()))]
    pub fn new(config: GeminiConfig, images: ImageResolver) -> Self {
        info!("Creating Gemini client");
        Self {
            config,
            http: reqwest::Client::new(),
            images,
        }
    }

    /// System instruction framing every generation request.
    fn system_instruction() -> &'static str {
        "You are an AI assistant for Nigeria's National Emergency Management Agency (NEMA). \
         Your role is to create educational disaster preparedness game scenarios. Generate a \
         question and multiple-choice answers for the given disaster type. One choice must be \
         the safest and correct action according to NEMA guidelines. The other choices should \
         represent common but dangerous mistakes. Provide brief, clear feedback for each \
         choice. The tone should be serious, educational, and supportive. Ensure the \
         scenarios are culturally relevant to Nigeria."
    }

    /// Response schema for a bare question payload.
    fn question_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "question": {
                    "type": "STRING",
                    "description": "The scenario question for the user."
                },
                "choices": {
                    "type": "ARRAY",
                    "description": "An array of 2 to 3 possible actions for the user to choose from.",
                    "items": { "type": "STRING" }
                },
                "correctChoiceIndex": {
                    "type": "INTEGER",
                    "description": "The 0-based index of the correct choice in the 'choices' array. \
                                    This choice must be the objectively safest and best practice."
                },
                "feedback": {
                    "type": "ARRAY",
                    "description": "An array of feedback strings, one for each choice, in the same \
                                    order. Explain why each choice is good or bad in a supportive, \
                                    educational tone.",
                    "items": { "type": "STRING" }
                }
            },
            "required": ["question", "choices", "correctChoiceIndex", "feedback"]
        })
    }

    /// Response schema for the first-turn briefing plus question payload.
    fn briefing_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "briefing": {
                    "type": "STRING",
                    "description": "A short, one or two-sentence dramatic and immersive description \
                                    of the emergency scenario, setting the scene for the user. This \
                                    will be shown before the first question."
                },
                "questionData": Self::question_schema()
            },
            "required": ["briefing", "questionData"]
        })
    }

    /// Sends one generation request and returns the raw response text.
    #[instrument(skip(self, prompt, response_schema), fields(model = %self.config.model()))]
    async fn generate_content(
        &self,
        prompt: &str,
        response_schema: Value,
    ) -> Result<String, ContentError> {
        debug!("Building Gemini API request");
        let request_body = json!({
            "system_instruction": {
                "parts": [{ "text": Self::system_instruction() }]
            },
            "contents": [{
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "response_mime_type": "application/json",
                "response_schema": response_schema
            }
        });

        let url = format!("{}/{}:generateContent", API_BASE, self.config.model());

        debug!("Sending request to Gemini");
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", self.config.api_key())
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Gemini API request failed");
                ContentError::generation(format!("Gemini API request failed: {e}"))
            })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read Gemini response");
            ContentError::generation(format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            error!(status = %status, response = %response_text, "Gemini API error");
            return Err(ContentError::generation(format!(
                "Gemini API error {status}: {response_text}"
            )));
        }

        debug!(response_length = response_text.len(), "Parsing Gemini response envelope");
        let response_json: Value = serde_json::from_str(&response_text).map_err(|e| {
            error!(error = ?e, response = %response_text, "Failed to parse Gemini response envelope");
            ContentError::generation(format!("Failed to parse response: {e}"))
        })?;

        let content = response_json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                error!(response = %response_json, "No text content in Gemini response");
                ContentError::generation("No text content in Gemini response")
            })?
            .to_string();

        info!(content_length = content.len(), "Generated content");
        Ok(content)
    }

    /// Requests the first-turn briefing and question for a category.
    #[instrument(skip(self, prompt_detail))]
    async fn generate_briefing_and_question(
        &self,
        category_title: &str,
        prompt_detail: &str,
    ) -> Result<(String, Question), ContentError> {
        let prompt = format!(
            "Create the first challenging scenario for '{category_title}'. The scene: \
             {prompt_detail}. Provide a brief, immersive setup description and the first \
             question with choices and feedback."
        );
        let text = self
            .generate_content(&prompt, Self::briefing_schema())
            .await?;
        parse_briefing_and_question(&text)
    }
}

#[async_trait]
impl ContentProvider for GeminiClient {
    #[instrument(skip(self, prompt_detail))]
    async fn generate_initial_scenario(
        &self,
        category_title: &str,
        prompt_detail: &str,
    ) -> Result<Scenario, ContentError> {
        // Text first, then image. The two requests are never in flight
        // together; either failing fails the whole operation.
        let (briefing, question) = self
            .generate_briefing_and_question(category_title, prompt_detail)
            .await?;
        let image_b64 = self.images.resolve(category_title).await;
        Ok(Scenario::new(image_b64, briefing, question))
    }

    #[instrument(skip(self, context))]
    async fn generate_next_question(
        &self,
        category_title: &str,
        context: &str,
    ) -> Result<Question, ContentError> {
        let prompt = format!(
            "The scenario is '{category_title}'. Here is what just happened: {context}. \
             Now, create the next logical question and choices in this scenario."
        );
        let text = self
            .generate_content(&prompt, Self::question_schema())
            .await?;
        parse_question(&text)
    }
}

/// First-turn wire payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BriefingAndQuestion {
    briefing: String,
    question_data: Question,
}

/// Strips a fenced code-block wrapper from a response body, if present.
///
/// Transport quirk only; the structural rules applied afterwards do not
/// depend on it.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/// Parses and validates a bare question payload.
#[instrument(skip(text))]
fn parse_question(text: &str) -> Result<Question, ContentError> {
    let body = strip_code_fence(text);
    let question: Question = serde_json::from_str(body).map_err(|e| {
        error!(error = ?e, "Question payload was not valid JSON");
        ContentError::parse(format!("Question payload was not valid JSON: {e}"))
    })?;
    question.validate()?;
    Ok(question)
}

/// Parses and validates a first-turn briefing-plus-question payload.
#[instrument(skip(text))]
fn parse_briefing_and_question(text: &str) -> Result<(String, Question), ContentError> {
    let body = strip_code_fence(text);
    let payload: BriefingAndQuestion = serde_json::from_str(body).map_err(|e| {
        error!(error = ?e, "Briefing payload was not valid JSON");
        ContentError::parse(format!("Briefing payload was not valid JSON: {e}"))
    })?;
    if payload.briefing.trim().is_empty() {
        return Err(ContentError::format("briefing text is empty"));
    }
    payload.question_data.validate()?;
    Ok((payload.briefing, payload.question_data))
}

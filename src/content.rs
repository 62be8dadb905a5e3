//! Content provider contract for scenario and question generation.
//!
//! The game controller only sees this trait; the Gemini-backed
//! implementation lives in [`crate::gemini_client`].

use async_trait::async_trait;
use derive_more::{Display, Error};
use tracing::{error, instrument};

use crate::scenario::{Question, Scenario};

/// Generates scenario content for a category and, after the first turn,
/// follow-up questions conditioned on free-text context from the prior turn.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Produces a briefing, the first question, and an image for the
    /// category. The result has already passed structural validation.
    async fn generate_initial_scenario(
        &self,
        category_title: &str,
        prompt_detail: &str,
    ) -> Result<Scenario, ContentError>;

    /// Produces the next question given a context string describing the
    /// previous question, the user's choice, its correctness, and the
    /// feedback received. No briefing or image is regenerated.
    async fn generate_next_question(
        &self,
        category_title: &str,
        context: &str,
    ) -> Result<Question, ContentError>;
}

#[async_trait]
impl<T: ContentProvider + ?Sized> ContentProvider for std::sync::Arc<T> {
    async fn generate_initial_scenario(
        &self,
        category_title: &str,
        prompt_detail: &str,
    ) -> Result<Scenario, ContentError> {
        (**self)
            .generate_initial_scenario(category_title, prompt_detail)
            .await
    }

    async fn generate_next_question(
        &self,
        category_title: &str,
        context: &str,
    ) -> Result<Question, ContentError> {
        (**self).generate_next_question(category_title, context).await
    }
}

/// Classifies a content provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ContentErrorKind {
    /// The upstream call itself failed (network or service level).
    #[display("Content generation failed")]
    Generation,
    /// The response text could not be parsed as JSON at all.
    #[display("The AI response was not valid JSON")]
    Parse,
    /// The response parsed but violated the question structure rules.
    #[display("The AI response had an invalid structure")]
    Format,
}

/// Content provider error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("{}: {} at {}:{}", kind, message, file, line)]
pub struct ContentError {
    /// Failure classification.
    pub kind: ContentErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where the error was created.
    pub line: u32,
    /// Source file where the error was created.
    pub file: &'static str,
}

impl ContentError {
    #[track_caller]
    fn with_kind(kind: ContentErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        error!(?kind, error_message = %message, "Content error created");
        Self {
            kind,
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Creates an upstream-failure error.
    #[track_caller]
    pub fn generation(message: impl Into<String>) -> Self {
        Self::with_kind(ContentErrorKind::Generation, message)
    }

    /// Creates an unparseable-response error.
    #[track_caller]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::with_kind(ContentErrorKind::Parse, message)
    }

    /// Creates an invalid-structure error.
    #[track_caller]
    pub fn format(message: impl Into<String>) -> Self {
        Self::with_kind(ContentErrorKind::Format, message)
    }

    /// Returns the failure classification.
    #[instrument(skip(self))]
    pub fn kind(&self) -> ContentErrorKind {
        self.kind
    }
}

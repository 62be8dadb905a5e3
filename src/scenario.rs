//! Scenario and question data model with structural validation.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::content::ContentError;

/// Minimum number of answer choices a question may carry.
pub const MIN_CHOICES: usize = 2;
/// Maximum number of answer choices a question may carry.
pub const MAX_CHOICES: usize = 3;

/// One decision point: a prompt, 2 to 3 choices, the index of the correct
/// choice, and one feedback string per choice.
///
/// Field names follow the provider wire format (`correctChoiceIndex`).
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// The scenario question posed to the user.
    question: String,
    /// Ordered answer choices.
    choices: Vec<String>,
    /// Zero-based index of the objectively correct choice.
    correct_choice_index: usize,
    /// Feedback strings, parallel to `choices`.
    feedback: Vec<String>,
}

impl Question {
    /// Creates a question. Intended for tests and scripted providers; wire
    /// payloads deserialize directly and are checked with [`Question::validate`].
    #[instrument(skip_all, fields(choices = choices.len()))]
    pub fn new(
        question: impl Into<String>,
        choices: Vec<String>,
        correct_choice_index: usize,
        feedback: Vec<String>,
    ) -> Self {
        Self {
            question: question.into(),
            choices,
            correct_choice_index,
            feedback,
        }
    }

    /// Checks the structural rules every provider payload must satisfy
    /// before it is accepted into game state.
    ///
    /// Rules: non-empty question text, 2 or 3 choices, exactly one feedback
    /// string per choice, and a correct index inside the choice range.
    /// Violations surface as format errors and are never repaired.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.question.trim().is_empty() {
            return Err(ContentError::format("question text is empty"));
        }
        if self.choices.len() < MIN_CHOICES || self.choices.len() > MAX_CHOICES {
            return Err(ContentError::format(format!(
                "expected {} to {} choices, got {}",
                MIN_CHOICES,
                MAX_CHOICES,
                self.choices.len()
            )));
        }
        if self.feedback.len() != self.choices.len() {
            return Err(ContentError::format(format!(
                "feedback length {} does not match choices length {}",
                self.feedback.len(),
                self.choices.len()
            )));
        }
        if self.correct_choice_index >= self.choices.len() {
            return Err(ContentError::format(format!(
                "correctChoiceIndex {} out of range for {} choices",
                self.correct_choice_index,
                self.choices.len()
            )));
        }
        debug!("Question payload passed validation");
        Ok(())
    }

    /// Returns whether the given choice index is the correct one.
    #[instrument(skip(self))]
    pub fn is_correct(&self, choice_index: usize) -> bool {
        choice_index == self.correct_choice_index
    }
}

/// One category session's persistent content: the image and briefing set at
/// creation, plus the current question, which is swapped each turn.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario image, base64 encoded.
    image_b64: String,
    /// One-to-two-sentence briefing, set once at scenario creation.
    briefing: String,
    /// The current question.
    question: Question,
}

impl Scenario {
    /// Creates a scenario from its parts.
    #[instrument(skip_all, fields(briefing_len = briefing.len()))]
    pub fn new(image_b64: String, briefing: String, question: Question) -> Self {
        Self {
            image_b64,
            briefing,
            question,
        }
    }

    /// Replaces the current question in place. Briefing and image persist
    /// across turns within one category session.
    #[instrument(skip(self, question))]
    pub fn replace_question(&mut self, question: Question) {
        debug!("Replacing scenario question");
        self.question = question;
    }
}

//! Game controller — the state machine driving the multi-screen session.

use derive_getters::Getters;
use tracing::{debug, info, instrument, warn};

use crate::category::Category;
use crate::content::{ContentError, ContentProvider};
use crate::scenario::{Question, Scenario};

/// Message shown while the initial scenario generates.
pub const LOADING_MESSAGE: &str = "Generating your mission...";

/// Per-question answer progress within the game screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct AnswerState {
    /// The choice the user picked, once recorded.
    user_choice: Option<usize>,
    /// Whether feedback for the recorded choice is revealed.
    feedback_shown: bool,
    /// Whether a next-question request is outstanding. Input stays
    /// disabled while set.
    loading_next: bool,
}

/// Active screen in the game state machine.
///
/// Screens that need session data carry it in the variant, so the game
/// screen cannot exist without a scenario and category.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Landing screen.
    Welcome,
    /// Category picker.
    CategorySelection,
    /// Initial scenario generation in flight.
    Loading {
        /// Progress message for the presentation layer.
        message: String,
    },
    /// Briefing shown before the first question.
    MissionBriefing {
        /// The selected category.
        category: Category,
        /// The freshly generated scenario.
        scenario: Scenario,
    },
    /// Question-and-answer play.
    Game {
        /// The selected category.
        category: Category,
        /// The scenario, whose question is replaced each turn.
        scenario: Scenario,
        /// Answer progress for the current question.
        answer: AnswerState,
    },
    /// Recoverable failure; retry returns to the welcome flow.
    Error {
        /// Human-readable failure description.
        message: String,
    },
}

/// Controller owning the session state.
///
/// All mutation goes through the transition methods below; the
/// presentation layer only reads [`GameController::screen`] and forwards
/// user intents. The two async transitions are the only suspension
/// points, and no second request can start while one is outstanding.
#[derive(Debug)]
pub struct GameController<P: ContentProvider> {
    provider: P,
    screen: Screen,
}

impl<P: ContentProvider> GameController<P> {
    /// Creates a controller on the welcome screen.
    #[instrument(skip(provider))]
    pub fn new(provider: P) -> Self {
        info!("Creating game controller");
        Self {
            provider,
            screen: Screen::Welcome,
        }
    }

    /// Returns the current screen.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Welcome → CategorySelection.
    #[instrument(skip(self))]
    pub fn start(&mut self) {
        match self.screen {
            Screen::Welcome => {
                info!("Navigating to CategorySelection");
                self.screen = Screen::CategorySelection;
            }
            _ => warn!(screen = ?self.screen, "start ignored outside Welcome"),
        }
    }

    /// CategorySelection → Loading → MissionBriefing or Error.
    ///
    /// The single suspension point for scenario creation; no other
    /// transition can begin until the provider call settles.
    #[instrument(skip(self, category), fields(category = %category.title()))]
    pub async fn select_category(&mut self, category: Category) {
        if !self.begin_generation() {
            return;
        }
        let result = self
            .provider
            .generate_initial_scenario(category.title(), category.prompt_detail())
            .await;
        self.settle_generation(category, result);
    }

    /// MissionBriefing → Game.
    #[instrument(skip(self))]
    pub fn begin_mission(&mut self) {
        let current = std::mem::replace(&mut self.screen, Screen::Welcome);
        self.screen = match current {
            Screen::MissionBriefing { category, scenario } => {
                info!(category = %category.title(), "Navigating to Game");
                Screen::Game {
                    category,
                    scenario,
                    answer: AnswerState::default(),
                }
            }
            other => {
                warn!(screen = ?other, "begin_mission ignored outside MissionBriefing");
                other
            }
        };
    }

    /// Records an answer for the current question and reveals feedback.
    ///
    /// Idempotent once an answer is recorded: further submissions are
    /// ignored until the next question loads. Out-of-range indices are
    /// ignored. The top-level screen does not change.
    #[instrument(skip(self))]
    pub fn submit_answer(&mut self, choice_index: usize) {
        let Screen::Game {
            scenario, answer, ..
        } = &mut self.screen
        else {
            warn!("submit_answer ignored outside Game");
            return;
        };
        if answer.feedback_shown || answer.loading_next {
            debug!(choice_index, "Answer already recorded, ignoring");
            return;
        }
        if choice_index >= scenario.question().choices().len() {
            warn!(choice_index, "Choice index out of range, ignoring");
            return;
        }
        info!(
            choice_index,
            correct = scenario.question().is_correct(choice_index),
            "Answer recorded"
        );
        answer.user_choice = Some(choice_index);
        answer.feedback_shown = true;
    }

    /// Requests the next question, conditioned on the previous turn.
    ///
    /// Only valid after an answer has been submitted. On success the
    /// scenario's question is replaced in place and the answer markers
    /// reset; on failure the screen becomes [`Screen::Error`]. This is
    /// the second suspension point; `loading_next` stays set while the
    /// request is outstanding.
    #[instrument(skip(self))]
    pub async fn advance_question(&mut self) {
        let Some((category_title, context)) = self.begin_advance() else {
            return;
        };
        let result = self
            .provider
            .generate_next_question(&category_title, &context)
            .await;
        self.settle_advance(result);
    }

    /// Clears the session and returns to the welcome screen, from any state.
    #[instrument(skip(self))]
    pub fn return_home(&mut self) {
        info!("Returning to Welcome, clearing session");
        self.screen = Screen::Welcome;
    }

    /// Recovery action from the error screen. Identical to
    /// [`GameController::return_home`]: there is no automatic resume, the
    /// user re-selects a category.
    #[instrument(skip(self))]
    pub fn retry(&mut self) {
        debug!("Retry requested");
        self.return_home();
    }

    /// CategorySelection → Loading. Returns whether generation may proceed.
    fn begin_generation(&mut self) -> bool {
        match self.screen {
            Screen::CategorySelection => {
                info!("Navigating to Loading");
                self.screen = Screen::Loading {
                    message: LOADING_MESSAGE.to_string(),
                };
                true
            }
            _ => {
                warn!(screen = ?self.screen, "select_category ignored outside CategorySelection");
                false
            }
        }
    }

    /// Loading → MissionBriefing or Error.
    fn settle_generation(&mut self, category: Category, result: Result<Scenario, ContentError>) {
        if !matches!(self.screen, Screen::Loading { .. }) {
            warn!(screen = ?self.screen, "Scenario generation settled outside Loading, ignoring");
            return;
        }
        match result {
            Ok(scenario) => {
                info!(category = %category.title(), "Navigating to MissionBriefing");
                self.screen = Screen::MissionBriefing { category, scenario };
            }
            Err(e) => {
                warn!(error = %e, "Scenario generation failed, navigating to Error");
                self.screen = Screen::Error {
                    message: e.to_string(),
                };
            }
        }
    }

    /// Marks the next-question request outstanding and returns the
    /// category title and context string for it, or `None` when no
    /// request may start.
    fn begin_advance(&mut self) -> Option<(String, String)> {
        let Screen::Game {
            category,
            scenario,
            answer,
        } = &mut self.screen
        else {
            warn!("advance_question ignored outside Game");
            return None;
        };
        if answer.loading_next {
            debug!("Next question already loading, ignoring");
            return None;
        }
        let Some(choice) = answer.user_choice else {
            warn!("advance_question ignored before an answer was submitted");
            return None;
        };
        answer.loading_next = true;
        let context = turn_context(scenario.question(), choice);
        debug!(context = %context, "Requesting next question");
        Some((category.title().clone(), context))
    }

    /// Applies the next-question result: replace the question and reset
    /// the answer markers, or drop to the error screen.
    fn settle_advance(&mut self, result: Result<Question, ContentError>) {
        if !matches!(self.screen, Screen::Game { .. }) {
            warn!("Next question settled outside Game, ignoring");
            return;
        }
        match result {
            Ok(question) => {
                if let Screen::Game {
                    scenario, answer, ..
                } = &mut self.screen
                {
                    info!("Next question loaded");
                    scenario.replace_question(question);
                    *answer = AnswerState::default();
                }
            }
            Err(e) => {
                warn!(error = %e, "Next question failed, navigating to Error");
                self.screen = Screen::Error {
                    message: e.to_string(),
                };
            }
        }
    }
}

/// Builds the free-text context describing the previous turn for the
/// follow-up request.
fn turn_context(question: &Question, choice: usize) -> String {
    let correctness = if question.is_correct(choice) {
        "correct"
    } else {
        "incorrect"
    };
    format!(
        "Previous question: \"{}\". My choice was: \"{}\". This was {}. \
         The feedback I received was: \"{}\".",
        question.question(),
        question.choices()[choice],
        correctness,
        question.feedback()[choice]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentError;
    use async_trait::async_trait;

    /// Provider for synchronous state-machine tests. The async transitions
    /// are exercised through the private step helpers instead.
    struct UnreachableProvider;

    #[async_trait]
    impl ContentProvider for UnreachableProvider {
        async fn generate_initial_scenario(
            &self,
            _category_title: &str,
            _prompt_detail: &str,
        ) -> Result<Scenario, ContentError> {
            panic!("provider must not be called in synchronous tests");
        }

        async fn generate_next_question(
            &self,
            _category_title: &str,
            _context: &str,
        ) -> Result<Question, ContentError> {
            panic!("provider must not be called in synchronous tests");
        }
    }

    fn controller() -> GameController<UnreachableProvider> {
        GameController::new(UnreachableProvider)
    }

    fn fire_category() -> Category {
        Category::builtin()
            .into_iter()
            .find(|c| c.title() == "Urban Fire Safety")
            .expect("built-in category")
    }

    fn stairs_question() -> Question {
        Question::new(
            "A fire blocks the main exit. What do you do?",
            vec![
                "Use elevator".to_string(),
                "Use stairs".to_string(),
                "Jump from window".to_string(),
            ],
            1,
            vec![
                "Elevators can fail during fires.".to_string(),
                "Correct - stairs are the safe route.".to_string(),
                "Jumping risks severe injury.".to_string(),
            ],
        )
    }

    fn scenario() -> Scenario {
        Scenario::new(
            "aW1hZ2U=".to_string(),
            "Smoke fills the corridor.".to_string(),
            stairs_question(),
        )
    }

    /// Drives a controller into the game screen with an unanswered question.
    fn in_game() -> GameController<UnreachableProvider> {
        let mut c = controller();
        c.start();
        assert!(c.begin_generation());
        c.settle_generation(fire_category(), Ok(scenario()));
        c.begin_mission();
        assert!(matches!(c.screen(), Screen::Game { .. }));
        c
    }

    #[test]
    fn test_start_moves_to_category_selection() {
        let mut c = controller();
        c.start();
        assert_eq!(*c.screen(), Screen::CategorySelection);
    }

    #[test]
    fn test_start_ignored_outside_welcome() {
        let mut c = controller();
        c.start();
        c.start();
        assert_eq!(*c.screen(), Screen::CategorySelection);
    }

    #[test]
    fn test_generation_passes_through_loading() {
        let mut c = controller();
        c.start();
        assert!(c.begin_generation());
        match c.screen() {
            Screen::Loading { message } => assert_eq!(message, LOADING_MESSAGE),
            other => panic!("expected Loading, got {other:?}"),
        }
    }

    #[test]
    fn test_generation_refused_outside_category_selection() {
        let mut c = controller();
        assert!(!c.begin_generation());
        assert_eq!(*c.screen(), Screen::Welcome);
    }

    #[test]
    fn test_successful_generation_reaches_briefing() {
        let mut c = controller();
        c.start();
        assert!(c.begin_generation());
        c.settle_generation(fire_category(), Ok(scenario()));
        match c.screen() {
            Screen::MissionBriefing { category, scenario } => {
                assert_eq!(category.title(), "Urban Fire Safety");
                assert_eq!(scenario.briefing(), "Smoke fills the corridor.");
            }
            other => panic!("expected MissionBriefing, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_generation_reaches_error() {
        let mut c = controller();
        c.start();
        assert!(c.begin_generation());
        c.settle_generation(fire_category(), Err(ContentError::generation("service down")));
        match c.screen() {
            Screen::Error { message } => assert!(message.contains("service down")),
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[test]
    fn test_begin_mission_carries_session_data() {
        let c = in_game();
        match c.screen() {
            Screen::Game {
                category,
                scenario,
                answer,
            } => {
                assert_eq!(category.title(), "Urban Fire Safety");
                assert_eq!(scenario.question(), &stairs_question());
                assert_eq!(*answer, AnswerState::default());
            }
            other => panic!("expected Game, got {other:?}"),
        }
    }

    #[test]
    fn test_submit_answer_reveals_feedback() {
        let mut c = in_game();
        c.submit_answer(1);
        match c.screen() {
            Screen::Game { answer, .. } => {
                assert_eq!(*answer.user_choice(), Some(1));
                assert!(*answer.feedback_shown());
            }
            other => panic!("expected Game, got {other:?}"),
        }
    }

    #[test]
    fn test_submit_answer_is_idempotent() {
        let mut c = in_game();
        c.submit_answer(2);
        c.submit_answer(0);
        match c.screen() {
            Screen::Game { answer, .. } => assert_eq!(*answer.user_choice(), Some(2)),
            other => panic!("expected Game, got {other:?}"),
        }
    }

    #[test]
    fn test_submit_answer_out_of_range_ignored() {
        let mut c = in_game();
        c.submit_answer(3);
        match c.screen() {
            Screen::Game { answer, .. } => assert_eq!(*answer.user_choice(), None),
            other => panic!("expected Game, got {other:?}"),
        }
    }

    #[test]
    fn test_submit_answer_ignored_outside_game() {
        let mut c = controller();
        c.submit_answer(0);
        assert_eq!(*c.screen(), Screen::Welcome);
    }

    #[test]
    fn test_advance_requires_submitted_answer() {
        let mut c = in_game();
        assert!(c.begin_advance().is_none());
    }

    #[test]
    fn test_advance_context_names_the_previous_turn() {
        let mut c = in_game();
        c.submit_answer(1);
        let (title, context) = c.begin_advance().expect("advance should start");
        assert_eq!(title, "Urban Fire Safety");
        assert_eq!(
            context,
            "Previous question: \"A fire blocks the main exit. What do you do?\". \
             My choice was: \"Use stairs\". This was correct. \
             The feedback I received was: \"Correct - stairs are the safe route.\"."
        );
    }

    #[test]
    fn test_advance_context_reports_incorrect_choice() {
        let mut c = in_game();
        c.submit_answer(0);
        let (_, context) = c.begin_advance().expect("advance should start");
        assert!(context.contains("My choice was: \"Use elevator\""));
        assert!(context.contains("This was incorrect"));
    }

    #[test]
    fn test_advance_sets_loading_next_and_blocks_reentry() {
        let mut c = in_game();
        c.submit_answer(1);
        assert!(c.begin_advance().is_some());
        match c.screen() {
            Screen::Game { answer, .. } => assert!(*answer.loading_next()),
            other => panic!("expected Game, got {other:?}"),
        }
        // A second request while one is outstanding is refused.
        assert!(c.begin_advance().is_none());
        c.submit_answer(0);
        match c.screen() {
            Screen::Game { answer, .. } => assert_eq!(*answer.user_choice(), Some(1)),
            other => panic!("expected Game, got {other:?}"),
        }
    }

    #[test]
    fn test_advance_replaces_question_only() {
        let mut c = in_game();
        c.submit_answer(1);
        assert!(c.begin_advance().is_some());
        let next = Question::new(
            "The stairwell is crowded. What now?",
            vec!["Push through".to_string(), "Keep calm and descend".to_string()],
            1,
            vec!["Pushing causes falls.".to_string(), "Correct.".to_string()],
        );
        c.settle_advance(Ok(next.clone()));
        match c.screen() {
            Screen::Game {
                scenario, answer, ..
            } => {
                assert_eq!(scenario.question(), &next);
                assert_eq!(scenario.briefing(), "Smoke fills the corridor.");
                assert_eq!(scenario.image_b64(), "aW1hZ2U=");
                assert_eq!(*answer, AnswerState::default());
            }
            other => panic!("expected Game, got {other:?}"),
        }
    }

    #[test]
    fn test_advance_failure_reaches_error() {
        let mut c = in_game();
        c.submit_answer(1);
        assert!(c.begin_advance().is_some());
        c.settle_advance(Err(ContentError::parse("not valid JSON")));
        assert!(matches!(c.screen(), Screen::Error { .. }));
    }

    #[test]
    fn test_return_home_resets_from_every_screen() {
        // From Game, with session data.
        let mut c = in_game();
        c.return_home();
        assert_eq!(*c.screen(), Screen::Welcome);

        // From Error, via retry.
        let mut c = controller();
        c.start();
        assert!(c.begin_generation());
        c.settle_generation(fire_category(), Err(ContentError::generation("boom")));
        c.retry();
        assert_eq!(*c.screen(), Screen::Welcome);

        // From Loading.
        let mut c = controller();
        c.start();
        assert!(c.begin_generation());
        c.return_home();
        assert_eq!(*c.screen(), Screen::Welcome);
    }
}

//! Terminal presentation layer.
//!
//! Renders the controller's current screen and forwards key presses as
//! intents. All session state lives in the controller; this module only
//! reads it.

mod ui;

use std::io;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::time::{Duration, sleep};
use tracing::{debug, info, instrument};

use crate::category::Category;
use crate::content::ContentProvider;
use crate::controller::{GameController, Screen};

/// User intent derived from one key press on the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Intent {
    /// No action for this key on this screen.
    None,
    /// Exit the application.
    Quit,
    /// Welcome → category selection.
    Start,
    /// Move the category cursor up.
    SelectPrevious,
    /// Move the category cursor down.
    SelectNext,
    /// Request a scenario for the highlighted category.
    ChooseCategory,
    /// Briefing → game.
    BeginMission,
    /// Record an answer choice.
    Answer(usize),
    /// Request the next question.
    Advance,
    /// End the session and return to the welcome screen.
    Home,
    /// Recover from the error screen.
    Retry,
}

/// Maps a key press to an intent for the current screen.
///
/// Input is disabled while the loading screen is active or a next-question
/// request is outstanding.
fn handle_key(screen: &Screen, key: KeyEvent) -> Intent {
    match screen {
        Screen::Welcome => match key.code {
            KeyCode::Enter => Intent::Start,
            KeyCode::Char('q') | KeyCode::Esc => Intent::Quit,
            _ => Intent::None,
        },
        Screen::CategorySelection => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Intent::SelectPrevious,
            KeyCode::Down | KeyCode::Char('j') => Intent::SelectNext,
            KeyCode::Enter => Intent::ChooseCategory,
            KeyCode::Esc => Intent::Home,
            KeyCode::Char('q') => Intent::Quit,
            _ => Intent::None,
        },
        Screen::Loading { .. } => Intent::None,
        Screen::MissionBriefing { .. } => match key.code {
            KeyCode::Enter => Intent::BeginMission,
            KeyCode::Esc => Intent::Home,
            KeyCode::Char('q') => Intent::Quit,
            _ => Intent::None,
        },
        Screen::Game { answer, .. } => {
            if *answer.loading_next() {
                return Intent::None;
            }
            match key.code {
                KeyCode::Char(c @ '1'..='3') => Intent::Answer(c as usize - '1' as usize),
                KeyCode::Char(c @ 'a'..='c') => Intent::Answer(c as usize - 'a' as usize),
                KeyCode::Char(c @ 'A'..='C') => Intent::Answer(c as usize - 'A' as usize),
                KeyCode::Enter => Intent::Advance,
                KeyCode::Esc => Intent::Home,
                KeyCode::Char('q') => Intent::Quit,
                _ => Intent::None,
            }
        }
        Screen::Error { .. } => match key.code {
            KeyCode::Enter | KeyCode::Char('r') => Intent::Retry,
            KeyCode::Char('q') | KeyCode::Esc => Intent::Quit,
            _ => Intent::None,
        },
    }
}

/// Runs the TUI until the user quits.
///
/// Sets up the terminal, drives the controller from key presses, and
/// restores the terminal on exit.
#[instrument(skip_all)]
pub async fn run<P: ContentProvider>(controller: &mut GameController<P>) -> Result<()> {
    info!("Starting TUI event loop");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_loop(&mut terminal, controller).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    res
}

async fn run_loop<B, P>(
    terminal: &mut Terminal<B>,
    controller: &mut GameController<P>,
) -> Result<()>
where
    B: ratatui::backend::Backend,
    P: ContentProvider,
{
    let categories = Category::builtin();
    let mut selected: usize = 0;

    loop {
        terminal.draw(|f| ui::draw(f, controller.screen(), &categories, selected))?;

        // Poll with a short timeout to keep the loop responsive.
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
        {
            // Skip key release events (crossterm fires both press and release).
            if key.kind == KeyEventKind::Release {
                continue;
            }

            let intent = handle_key(controller.screen(), key);
            debug!(?intent, "Handling key press");
            match intent {
                Intent::None => {}
                Intent::Quit => {
                    info!("User quit");
                    return Ok(());
                }
                Intent::Start => controller.start(),
                Intent::SelectPrevious => {
                    selected = selected
                        .checked_sub(1)
                        .unwrap_or(categories.len().saturating_sub(1));
                }
                Intent::SelectNext => {
                    selected = (selected + 1) % categories.len();
                }
                Intent::ChooseCategory => {
                    let category = categories[selected].clone();
                    // Paint the loading screen before the request suspends
                    // the loop; the controller enters Loading internally.
                    terminal.draw(|f| {
                        ui::draw_loading(f, crate::controller::LOADING_MESSAGE);
                    })?;
                    controller.select_category(category).await;
                }
                Intent::BeginMission => controller.begin_mission(),
                Intent::Answer(index) => controller.submit_answer(index),
                Intent::Advance => {
                    if can_advance(controller.screen()) {
                        terminal.draw(|f| ui::draw_loading(f, "Loading the next challenge..."))?;
                    }
                    controller.advance_question().await;
                }
                Intent::Home => controller.return_home(),
                Intent::Retry => controller.retry(),
            }
        }

        sleep(Duration::from_millis(10)).await;
    }
}

/// Whether an advance request would actually start, so the loading frame
/// is only painted when the request will go out.
fn can_advance(screen: &Screen) -> bool {
    matches!(
        screen,
        Screen::Game { answer, .. }
            if answer.user_choice().is_some() && !*answer.loading_next()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{Question, Scenario};
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn game_screen() -> Screen {
        let question = Question::new(
            "Which exit?",
            vec!["Front door".to_string(), "Back door".to_string()],
            1,
            vec!["Blocked.".to_string(), "Clear.".to_string()],
        );
        let scenario = Scenario::new(
            "aW1hZ2U=".to_string(),
            "Smoke everywhere.".to_string(),
            question,
        );
        let category = Category::builtin().remove(0);
        Screen::Game {
            category,
            scenario,
            answer: Default::default(),
        }
    }

    #[test]
    fn test_welcome_enter_starts() {
        assert_eq!(handle_key(&Screen::Welcome, key(KeyCode::Enter)), Intent::Start);
        assert_eq!(
            handle_key(&Screen::Welcome, key(KeyCode::Char('q'))),
            Intent::Quit
        );
    }

    #[test]
    fn test_loading_ignores_input() {
        let screen = Screen::Loading {
            message: "working".to_string(),
        };
        assert_eq!(handle_key(&screen, key(KeyCode::Enter)), Intent::None);
        assert_eq!(handle_key(&screen, key(KeyCode::Esc)), Intent::None);
    }

    #[test]
    fn test_game_maps_answer_keys() {
        let screen = game_screen();
        assert_eq!(
            handle_key(&screen, key(KeyCode::Char('1'))),
            Intent::Answer(0)
        );
        assert_eq!(
            handle_key(&screen, key(KeyCode::Char('b'))),
            Intent::Answer(1)
        );
        assert_eq!(
            handle_key(&screen, key(KeyCode::Char('C'))),
            Intent::Answer(2)
        );
        assert_eq!(handle_key(&screen, key(KeyCode::Esc)), Intent::Home);
    }

    #[test]
    fn test_error_maps_retry() {
        let screen = Screen::Error {
            message: "boom".to_string(),
        };
        assert_eq!(handle_key(&screen, key(KeyCode::Enter)), Intent::Retry);
        assert_eq!(handle_key(&screen, key(KeyCode::Char('r'))), Intent::Retry);
        assert_eq!(handle_key(&screen, key(KeyCode::Char('q'))), Intent::Quit);
    }

    #[test]
    fn test_can_advance_requires_recorded_answer() {
        assert!(!can_advance(&game_screen()));
        assert!(!can_advance(&Screen::Welcome));
    }
}

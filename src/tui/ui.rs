//! Stateless rendering for each screen of the game.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::category::Category;
use crate::controller::{AnswerState, Screen};
use crate::scenario::Scenario;

/// Renders the current screen.
pub(crate) fn draw(frame: &mut Frame, screen: &Screen, categories: &[Category], selected: usize) {
    match screen {
        Screen::Welcome => draw_welcome(frame),
        Screen::CategorySelection => draw_category_selection(frame, categories, selected),
        Screen::Loading { message } => draw_loading(frame, message),
        Screen::MissionBriefing { category, scenario } => {
            draw_briefing(frame, category, scenario);
        }
        Screen::Game {
            category,
            scenario,
            answer,
        } => draw_game(frame, category, scenario, answer),
        Screen::Error { message } => draw_error(frame, message),
    }
}

fn chrome(frame: &mut Frame, title: &str) -> Rect {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(5)])
        .split(area);

    let header = Paragraph::new(title.to_string())
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);
    chunks[1]
}

fn draw_welcome(frame: &mut Frame) {
    let body = chrome(frame, "NEMA PrepZone");
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Welcome to NEMA PrepZone!",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Master disaster preparedness through AI-powered scenarios."),
        Line::from("Every decision shapes your safety knowledge."),
        Line::from(""),
        Line::from(Span::styled(
            "Enter: start training    q: quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, body);
}

fn draw_category_selection(frame: &mut Frame, categories: &[Category], selected: usize) {
    let body = chrome(frame, "Choose Your Emergency Scenario");
    let items: Vec<ListItem> = categories
        .iter()
        .map(|c| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    c.title().clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("  {}", c.description()),
                    Style::default().fg(Color::Gray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Up/Down: select   Enter: start   Esc: back"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(selected.min(categories.len().saturating_sub(1))));
    frame.render_stateful_widget(list, body, &mut state);
}

pub(crate) fn draw_loading(frame: &mut Frame, message: &str) {
    let body = chrome(frame, "Preparing Your Mission");
    let paragraph = Paragraph::new(vec![Line::from(""), Line::from(message.to_string())])
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(paragraph, body);
}

fn draw_briefing(frame: &mut Frame, category: &Category, scenario: &Scenario) {
    let body = chrome(frame, &format!("Mission Briefing — {}", category.title()));
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Situation Overview",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(scenario.briefing().clone()),
        Line::from(""),
        Line::from(image_note(scenario)),
        Line::from(""),
        Line::from(Span::styled(
            "Enter: begin emergency response    Esc: return to safety",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, body);
}

fn draw_game(frame: &mut Frame, category: &Category, scenario: &Scenario, answer: &AnswerState) {
    let body = chrome(frame, category.title());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(8)])
        .split(body);

    let question = scenario.question();
    let mut lines = vec![
        Line::from(Span::styled(
            question.question().clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for (i, choice) in question.choices().iter().enumerate() {
        let label = (b'A' + i as u8) as char;
        let style = choice_style(question.is_correct(i), answer, i);
        lines.push(Line::from(Span::styled(
            format!("  {label}. {choice}"),
            style,
        )));
    }
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Critical Decision Required"),
    );
    frame.render_widget(paragraph, chunks[0]);

    let feedback = question_feedback(scenario, answer);
    frame.render_widget(feedback_panel(feedback, answer), chunks[1]);
}

/// Choice styling: neutral before feedback; afterwards the correct choice
/// is green, a wrong pick red, the rest dimmed.
fn choice_style(is_correct: bool, answer: &AnswerState, index: usize) -> Style {
    if !*answer.feedback_shown() {
        return Style::default();
    }
    if is_correct {
        return Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD);
    }
    if *answer.user_choice() == Some(index) {
        return Style::default().fg(Color::Red);
    }
    Style::default().fg(Color::DarkGray)
}

fn question_feedback<'a>(scenario: &'a Scenario, answer: &AnswerState) -> Option<(&'a str, bool)> {
    if !*answer.feedback_shown() {
        return None;
    }
    let choice = (*answer.user_choice())?;
    let question = scenario.question();
    Some((
        question.feedback()[choice].as_str(),
        question.is_correct(choice),
    ))
}

fn feedback_panel(feedback: Option<(&str, bool)>, answer: &AnswerState) -> Paragraph<'static> {
    let lines = match feedback {
        Some((text, correct)) => {
            let headline = if correct {
                Span::styled(
                    "Excellent Decision!",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(
                    "Let's Learn from This",
                    Style::default()
                        .fg(Color::Red)
                        .add_modifier(Modifier::BOLD),
                )
            };
            let hint = if *answer.loading_next() {
                "Loading next challenge..."
            } else {
                "Enter: next challenge    Esc: end mission"
            };
            vec![
                Line::from(headline),
                Line::from(text.to_string()),
                Line::from(""),
                Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
            ]
        }
        None => vec![
            Line::from("Choose the safest action."),
            Line::from(""),
            Line::from(Span::styled(
                "A-C or 1-3: answer    Esc: end mission",
                Style::default().fg(Color::DarkGray),
            )),
        ],
    };
    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Feedback"))
}

fn draw_error(frame: &mut Frame, message: &str) {
    let body = chrome(frame, "Mission Interrupted");
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter: return to safety    q: quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
    frame.render_widget(paragraph, body);
}

/// The scenario image is base64 text; the terminal shows a reference to it
/// rather than the pixels.
fn image_note(scenario: &Scenario) -> String {
    format!(
        "[scenario image: {} base64 bytes]",
        scenario.image_b64().len()
    )
}

//! PrepZone library — AI-driven disaster preparedness training.
//!
//! A branching-scenario quiz game: the user picks a disaster category, a
//! generated scenario (briefing, image, multiple-choice question) comes
//! back from the Gemini API, and each answer conditions the next question.
//!
//! # Architecture
//!
//! - **Controller**: finite-state screen machine owning all session state
//! - **Content**: provider contract plus the Gemini-backed implementation
//! - **Images**: static category-to-image lookup with a guaranteed fallback
//! - **Tui**: terminal presentation reading controller state, emitting intents
//!
//! # Example
//!
//! ```no_run
//! use prep_zone::category::Category;
//! use prep_zone::config::GeminiConfig;
//! use prep_zone::controller::GameController;
//! use prep_zone::gemini_client::GeminiClient;
//! use prep_zone::image_resolver::ImageResolver;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = GeminiConfig::from_env("gemini-1.5-flash")?;
//! let client = GeminiClient::new(config, ImageResolver::new(None));
//! let mut controller = GameController::new(client);
//!
//! controller.start();
//! let category = Category::builtin().remove(0);
//! controller.select_category(category).await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod category;
pub mod cli;
pub mod config;
pub mod content;
pub mod controller;
pub mod gemini_client;
pub mod image_resolver;
pub mod scenario;
pub mod tui;

pub use category::Category;
pub use config::{ConfigError, GeminiConfig};
pub use content::{ContentError, ContentErrorKind, ContentProvider};
pub use controller::{AnswerState, GameController, Screen};
pub use gemini_client::GeminiClient;
pub use image_resolver::ImageResolver;
pub use scenario::{Question, Scenario};

//! Integration test for Gemini connectivity.
//!
//! Run with `cargo test --features api` and a `GEMINI_API_KEY` in the
//! environment or a .env file.

use prep_zone::{ContentProvider, GeminiClient, GeminiConfig, ImageResolver};

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_gemini_initial_scenario() {
    dotenvy::dotenv().ok();

    let config = GeminiConfig::from_env("gemini-1.5-flash").expect("GEMINI_API_KEY not set");
    let client = GeminiClient::new(config, ImageResolver::new(None));

    let scenario = client
        .generate_initial_scenario(
            "Urban Fire Safety",
            "a fire starting in a crowded apartment building in a Nigerian city like Lagos",
        )
        .await
        .expect("Failed to generate initial scenario");

    assert!(!scenario.briefing().is_empty(), "Briefing should not be empty");
    assert!(!scenario.image_b64().is_empty(), "Image should not be empty");
    assert!(scenario.question().validate().is_ok());
    eprintln!("Briefing: {}", scenario.briefing());
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_gemini_next_question() {
    dotenvy::dotenv().ok();

    let config = GeminiConfig::from_env("gemini-1.5-flash").expect("GEMINI_API_KEY not set");
    let client = GeminiClient::new(config, ImageResolver::new(None));

    let question = client
        .generate_next_question(
            "Urban Fire Safety",
            "Previous question: \"A fire blocks the main exit. What do you do?\". \
             My choice was: \"Use stairs\". This was correct. \
             The feedback I received was: \"Stairs are the safe route.\".",
        )
        .await
        .expect("Failed to generate next question");

    assert!(question.validate().is_ok());
    eprintln!("Question: {}", question.question());
}

//! Disaster categories available for training sessions.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A disaster category the user can train on.
///
/// Categories are statically enumerated at startup and immutable for the
/// lifetime of the process. The `prompt_detail` feeds the content provider's
/// scene-setting request.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Category {
    /// Stable identifier.
    id: String,
    /// Display title, also the key for image resolution.
    title: String,
    /// Short description shown on the selection screen.
    description: String,
    /// Scene detail passed to the content provider.
    prompt_detail: String,
}

impl Category {
    /// Creates a new category.
    #[instrument(skip_all)]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        prompt_detail: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            prompt_detail: prompt_detail.into(),
        }
    }

    /// Returns the built-in scenario categories.
    #[instrument]
    pub fn builtin() -> Vec<Category> {
        vec![
            Category::new(
                "Urban Fire Safety",
                "Urban Fire Safety",
                "Navigate the dangers of a fire in a dense city environment.",
                "a fire starting in a crowded apartment building in a Nigerian city like Lagos",
            ),
            Category::new(
                "Flood Response",
                "Flood Response",
                "Make critical decisions during a sudden and intense flood.",
                "a flash flood in an urban Nigerian neighborhood, with water levels rising rapidly \
                 around houses and cars",
            ),
            Category::new(
                "Road Traffic Accident",
                "Road Traffic Accident",
                "Learn the correct and safe procedures when encountering a traffic accident.",
                "the scene of a multi-vehicle road traffic accident on a busy Nigerian highway",
            ),
            Category::new(
                "Marketplace Stampede",
                "Marketplace Stampede",
                "Find the safest way out of a dangerously overcrowded public space.",
                "a stampede starting in a crowded, open-air market in Nigeria",
            ),
        ]
    }
}

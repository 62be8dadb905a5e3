//! Static image lookup for scenario categories.
//!
//! Resolution is total: unknown categories and every fetch or transport
//! failure degrade to a deterministic placeholder image, so this module
//! never fails its caller.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, info, instrument, warn};

/// Maps category titles to pre-registered scenario images.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    /// Base URL joined onto relative image paths. Without one, relative
    /// entries fall back to the placeholder.
    asset_base: Option<String>,
    registry: HashMap<String, String>,
    http: reqwest::Client,
}

impl ImageResolver {
    /// Creates a resolver with the built-in category image registry.
    #[instrument(skip(asset_base))]
    pub fn new(asset_base: Option<String>) -> Self {
        let mut registry = HashMap::new();
        registry.insert(
            "Urban Fire Safety".to_string(),
            "/static/images/urban-fire-real.webp".to_string(),
        );
        registry.insert(
            "Flood Response".to_string(),
            "/static/images/flood-real.webp".to_string(),
        );
        registry.insert(
            "Road Traffic Accident".to_string(),
            "https://cdn.builder.io/api/v1/image/assets%2Fbaef4d28acc542ce9e6b0e6d8ccdf936%2F3df4f3fd03a24e83bd95360f64267f0f?format=webp&width=800"
                .to_string(),
        );
        registry.insert(
            "Marketplace Stampede".to_string(),
            "https://cdn.builder.io/api/v1/image/assets%2Fbaef4d28acc542ce9e6b0e6d8ccdf936%2F07e99fb5c4914e6abfe69a9fe1b3ef3d?format=webp&width=800"
                .to_string(),
        );

        info!(entries = registry.len(), "Created image resolver");
        Self {
            asset_base,
            registry,
            http: reqwest::Client::new(),
        }
    }

    /// Resolves the image for a category title as base64-encoded bytes.
    ///
    /// Never errors: unknown titles and failed fetches return the
    /// placeholder, synthesized fresh on each call.
    #[instrument(skip(self))]
    pub async fn resolve(&self, category_title: &str) -> String {
        let Some(location) = self.registry.get(category_title) else {
            warn!(category_title, "No registered image, using placeholder");
            return placeholder_image();
        };

        let url = match self.full_url(location) {
            Some(u) => u,
            None => {
                warn!(
                    location,
                    "Relative image path with no asset base, using placeholder"
                );
                return placeholder_image();
            }
        };

        match self.fetch(&url).await {
            Ok(encoded) => {
                debug!(url = %url, bytes = encoded.len(), "Resolved category image");
                encoded
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Image fetch failed, using placeholder");
                placeholder_image()
            }
        }
    }

    /// Joins a registry entry onto the asset base if it is relative.
    #[instrument(skip(self))]
    fn full_url(&self, location: &str) -> Option<String> {
        if location.starts_with("http://") || location.starts_with("https://") {
            return Some(location.to_string());
        }
        self.asset_base
            .as_ref()
            .map(|base| format!("{}{}", base.trim_end_matches('/'), location))
    }

    /// Fetches an image and encodes its bytes as base64.
    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, reqwest::Error> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        Ok(STANDARD.encode(&bytes))
    }
}

/// Synthesizes the deterministic placeholder image, base64 encoded.
///
/// Built at call time rather than cached so the fallback has no state.
#[instrument]
pub fn placeholder_image() -> String {
    let svg = r##"<svg width="400" height="300" xmlns="http://www.w3.org/2000/svg">
    <rect width="100%" height="100%" fill="#1a1a2e"/>
    <rect x="50" y="50" width="300" height="200" fill="#16213e" stroke="#0f4c75" stroke-width="2"/>
    <text x="200" y="120" font-family="Arial" font-size="16" fill="#e94560" text-anchor="middle">EMERGENCY SCENARIO</text>
    <text x="200" y="150" font-family="Arial" font-size="14" fill="#eee" text-anchor="middle">Disaster Preparedness Training</text>
    <text x="200" y="180" font-family="Arial" font-size="12" fill="#bbb" text-anchor="middle">NEMA PrepZone</text>
  </svg>"##;
    STANDARD.encode(svg.as_bytes())
}

// ABOUTME: Detached recipe image generation dispatched after a recipe is produced
// ABOUTME: Failures are logged inside the task and never reach the recipe caller
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use pierre_nutrition::GeneratedRecipe;

use crate::llm::ProviderError;

/// Backend that renders a picture of a recipe
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Produce an image for `recipe`, returning its URL or storage key
    ///
    /// # Errors
    ///
    /// Returns a provider error when the image backend fails
    async fn generate_image(&self, recipe: &GeneratedRecipe) -> Result<String, ProviderError>;
}

/// Spawn image generation for `recipe` without waiting for it
///
/// The handle resolves to `None` when generation failed. Dropping it detaches
/// the task; the image is then eventually consistent at best.
#[must_use = "dropping the handle detaches the task"]
pub fn spawn_image_task(
    images: Arc<dyn ImageGenerator>,
    recipe: GeneratedRecipe,
    request_id: Uuid,
) -> JoinHandle<Option<String>> {
    let span = info_span!("recipe_image", %request_id, recipe = %recipe.name);
    tokio::spawn(
        async move {
            match images.generate_image(&recipe).await {
                Ok(location) => {
                    info!(%location, "Recipe image generated");
                    Some(location)
                }
                Err(e) => {
                    warn!(error_kind = %e.kind(), error = %e, "Recipe image generation failed");
                    None
                }
            }
        }
        .instrument(span),
    )
}

// ABOUTME: Batch recipe generation driver for the Pierre meal planner
// ABOUTME: Generates recipes from command-line requests or a planned day and writes them as JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Batch recipe generator.
//!
//! Provider selection and retry tuning come from the `MEAL_LLM_*` environment
//! variables (see `GenerationConfig::from_env`). Logging honours `RUST_LOG`
//! and `LOG_FORMAT`.
//!
//! Usage:
//! ```bash
//! # Three vegan dinners, 35g protein each
//! cargo run --bin generate-recipes -- --diet vegan --meal dinner --protein 35 --count 3
//!
//! # Plan a 2200 kcal day over three meals, one recipe per slot
//! cargo run --bin generate-recipes -- --daily-calories 2200 --meals breakfast,lunch,dinner
//! ```

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::{info, warn};

use pierre_meal_planner::batch::RecipeWriter;
use pierre_meal_planner::config::GenerationConfig;
use pierre_meal_planner::generation::{GenerationRequest, RecipeGenerator};
use pierre_meal_planner::logging::LoggingConfig;
use pierre_meal_planner::nutrition::{
    AllocationConfig, DietType, Difficulty, MacroAllocationEngine, MealType,
};

#[derive(Parser)]
#[command(
    name = "generate-recipes",
    about = "Pierre Meal Planner Batch Recipe Generator",
    long_about = "Generate recipes with the configured text-generation backend and store them as JSON files"
)]
struct GenerateArgs {
    /// Dietary regime (standard, vegan, vegetarian, pescatarian, keto, paleo)
    #[arg(long, default_value = "standard")]
    diet: DietType,

    /// Meal slot for single-request mode
    #[arg(long)]
    meal: Option<MealType>,

    /// Difficulty tier (easy, medium, hard)
    #[arg(long, default_value = "medium")]
    difficulty: Difficulty,

    /// Servings per recipe
    #[arg(long, default_value_t = 2)]
    servings: u32,

    /// Prep plus cook time budget in minutes
    #[arg(long, default_value_t = 45)]
    total_time: u32,

    /// Protein target in grams (single-request mode)
    #[arg(long)]
    protein: Option<f64>,

    /// Calorie target in kcal (single-request mode)
    #[arg(long)]
    calories: Option<f64>,

    /// Carbohydrate target in grams (single-request mode)
    #[arg(long)]
    carbs: Option<f64>,

    /// Fat target in grams (single-request mode)
    #[arg(long)]
    fat: Option<f64>,

    /// Allergens to exclude (comma separated)
    #[arg(long, value_delimiter = ',')]
    allergies: Vec<String>,

    /// Ingredients to avoid (comma separated)
    #[arg(long, value_delimiter = ',')]
    dislikes: Vec<String>,

    /// Cuisines to lean towards (comma separated)
    #[arg(long, value_delimiter = ',')]
    cuisines: Vec<String>,

    /// Daily calorie total for plan mode
    #[arg(long, requires = "meals")]
    daily_calories: Option<f64>,

    /// Meal slots for plan mode (comma separated)
    #[arg(long, value_delimiter = ',', requires = "daily_calories")]
    meals: Vec<MealType>,

    /// Recipes per request
    #[arg(long, default_value_t = 1)]
    count: u32,

    /// Output directory
    #[arg(long, default_value = "generated_recipes")]
    out_dir: PathBuf,

    /// Model override
    #[arg(long)]
    model: Option<String>,
}

impl GenerateArgs {
    fn base_request(&self, meal: MealType) -> GenerationRequest {
        let mut request = GenerationRequest::new(self.diet, meal, self.difficulty)
            .with_servings(self.servings)
            .with_total_time(self.total_time);
        request.allergies.clone_from(&self.allergies);
        request.disliked_ingredients.clone_from(&self.dislikes);
        request.preferred_cuisines.clone_from(&self.cuisines);
        request
    }

    fn requests(&self) -> Result<Vec<GenerationRequest>> {
        if let Some(daily_calories) = self.daily_calories {
            let engine = MacroAllocationEngine::new(AllocationConfig::default())?;
            let targets = engine.plan_meals(daily_calories, &self.meals)?;
            return Ok(targets
                .iter()
                .map(|target| self.base_request(target.meal_type).with_targets(&target.allocation))
                .collect());
        }

        let Some(meal) = self.meal else {
            bail!("either --meal or --daily-calories with --meals is required");
        };
        let mut request = self.base_request(meal);
        request.protein_target = self.protein;
        request.calorie_target = self.calories;
        request.carb_target = self.carbs;
        request.fat_target = self.fat;
        Ok(vec![request])
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = GenerateArgs::parse();
    LoggingConfig::from_env().init()?;

    let mut config = GenerationConfig::from_env()?;
    if args.model.is_some() {
        config.model.clone_from(&args.model);
    }
    let generator = RecipeGenerator::from_config(&config)?;
    let writer = RecipeWriter::new(&args.out_dir);
    let requests = args.requests()?;

    info!(
        provider = generator.provider().name(),
        requests = requests.len(),
        count = args.count,
        out_dir = %args.out_dir.display(),
        "Starting batch generation"
    );

    let mut written = 0_u32;
    let mut failed = 0_u32;
    for request in &requests {
        for _ in 0..args.count {
            match generator.generate(request).await {
                Ok(outcome) => {
                    let path = writer.write(&outcome.recipe).await?;
                    info!(
                        recipe = %outcome.recipe.name,
                        attempts = outcome.attempts,
                        path = %path.display(),
                        "Recipe saved"
                    );
                    written += 1;
                }
                Err(e) => {
                    warn!(error_kind = %e.kind(), error = %e, "Recipe generation failed");
                    failed += 1;
                }
            }
        }
    }

    info!(written, failed, "Batch generation finished");
    if written == 0 && failed > 0 {
        bail!("no recipes were generated ({failed} failures)");
    }
    Ok(())
}

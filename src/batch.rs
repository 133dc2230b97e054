// ABOUTME: Recipe file writer used by the batch generation driver
// ABOUTME: Stores each recipe as pretty JSON under a slug of its name without overwriting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::errors::AppResult;
use crate::nutrition::GeneratedRecipe;

/// Longest slug kept from a recipe name
const MAX_SLUG_CHARS: usize = 60;

/// Writes generated recipes to a directory
#[derive(Debug, Clone)]
pub struct RecipeWriter {
    out_dir: PathBuf,
}

impl RecipeWriter {
    /// Writer rooted at `out_dir`; the directory is created on first write
    #[must_use]
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Output directory
    #[must_use]
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Write `recipe` to `<out_dir>/<slug>-<n>.json` using the first free `n`
    ///
    /// # Errors
    ///
    /// Returns a storage error if the directory or file cannot be written, or a
    /// serialization error if the recipe cannot be encoded
    pub async fn write(&self, recipe: &GeneratedRecipe) -> AppResult<PathBuf> {
        fs::create_dir_all(&self.out_dir).await?;
        let body = serde_json::to_vec_pretty(recipe)?;
        let slug = slugify(&recipe.name);

        let mut n: u32 = 1;
        loop {
            let path = self.out_dir.join(format!("{slug}-{n}.json"));
            // create_new makes the existence check and the create one step
            match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(mut file) => {
                    file.write_all(&body).await?;
                    file.flush().await?;
                    debug!(path = %path.display(), recipe = %recipe.name, "Wrote recipe file");
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Lowercase ASCII slug of `name`; `recipe` when nothing usable remains
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug: String = slug.trim_end_matches('-').chars().take(MAX_SLUG_CHARS).collect();
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "recipe".to_owned()
    } else {
        slug.to_owned()
    }
}

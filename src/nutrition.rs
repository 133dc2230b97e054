// ABOUTME: Re-exports the pierre-nutrition crate under crate::nutrition
// ABOUTME: Recipe types, macro allocation and scaling live in crates/pierre-nutrition
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use pierre_nutrition::*;

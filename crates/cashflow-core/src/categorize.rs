//! AI category suggestions
//!
//! Asks the text generator to pick one existing category for a transaction
//! description. The reply is only trusted when it names a category of the
//! right type; anything else comes back as a low-confidence miss.

use std::fmt::Write;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::ai::TextGenerator;
use crate::error::{Error, Result};
use crate::insights::parse_insights;
use crate::models::{Category, TransactionType, CONFIDENCE_DISABLED};

/// The reply named a category of the requested type
pub const CONFIDENCE_HIGH: &str = "high";

/// No category matched, or there was nothing to choose from
pub const CONFIDENCE_LOW: &str = "low";

/// Outcome of a suggestion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySuggestion {
    pub category: Option<Category>,
    pub confidence: String,
    /// Raw model reply, or why no model was asked
    pub reasoning: String,
}

impl CategorySuggestion {
    fn miss(confidence: &str, reasoning: &str) -> Self {
        Self {
            category: None,
            confidence: confidence.to_string(),
            reasoning: reasoning.to_string(),
        }
    }
}

/// Suggests categories for transaction descriptions
pub struct CategorySuggester<'a, G: ?Sized> {
    generator: &'a G,
}

impl<'a, G: TextGenerator + ?Sized> CategorySuggester<'a, G> {
    pub fn new(generator: &'a G) -> Self {
        Self { generator }
    }

    /// Pick one of `categories` of type `kind` for `description`
    pub async fn suggest(
        &self,
        categories: &[Category],
        description: &str,
        kind: TransactionType,
    ) -> Result<CategorySuggestion> {
        let description = description.trim();
        if description.is_empty() {
            return Err(Error::InvalidData("Description must not be empty".into()));
        }

        if !self.generator.is_enabled() {
            return Ok(CategorySuggestion::miss(
                CONFIDENCE_DISABLED,
                "AI categorization is disabled",
            ));
        }
        if categories.is_empty() {
            return Ok(CategorySuggestion::miss(
                CONFIDENCE_LOW,
                "No categories available in the system",
            ));
        }

        let candidates: Vec<&Category> = categories
            .iter()
            .filter(|c| c.category_type == kind)
            .collect();
        if candidates.is_empty() {
            return Err(Error::InvalidData(format!(
                "No categories found for type: {}",
                kind
            )));
        }

        info!(
            kind = %kind,
            candidates = candidates.len(),
            model = %self.generator.model(),
            "Requesting category suggestion"
        );

        let prompt = build_categorize_prompt(&candidates, description, kind);
        let raw = self.generator.generate(&prompt).await.map_err(|e| {
            warn!(error = %e, "Category suggestion failed");
            e
        })?;

        let raw = raw.trim();
        if raw.is_empty() {
            return Err(Error::Generation("Empty response from model".into()));
        }

        let suggestion = match match_category(raw, &candidates) {
            Some(category) => CategorySuggestion {
                category: Some(category.clone()),
                confidence: CONFIDENCE_HIGH.to_string(),
                reasoning: raw.to_string(),
            },
            None => CategorySuggestion::miss(CONFIDENCE_LOW, raw),
        };
        debug!(
            matched = suggestion.category.is_some(),
            "Category suggestion parsed"
        );

        Ok(suggestion)
    }
}

/// Prompt listing the candidate names, one per line
pub fn build_categorize_prompt(
    candidates: &[&Category],
    description: &str,
    kind: TransactionType,
) -> String {
    let mut prompt = String::from(
        "You are a transaction categorizer. Select the most appropriate category from the \
         list below based on the transaction description.\n\n",
    );

    let _ = writeln!(prompt, "Available {} categories:", kind);
    for category in candidates {
        let _ = writeln!(prompt, "- {}", category.name);
    }
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Transaction: \"{}\"", description);
    let _ = writeln!(prompt);
    prompt.push_str("Respond with ONLY the category name, nothing else.");

    prompt
}

/// Case-insensitive name match on the first usable line of the reply
fn match_category<'c>(raw: &str, candidates: &[&'c Category]) -> Option<&'c Category> {
    let first = parse_insights(raw).into_iter().next()?;
    let answer = first
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`' || c == '.')
        .trim()
        .to_lowercase();

    candidates
        .iter()
        .find(|c| c.name.to_lowercase() == answer)
        .copied()
}

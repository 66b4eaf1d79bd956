//! Model pricing catalog.
//!
//! Maps free-form model identifiers to per-million-token input/output rates.
//! Resolution never fails: unknown models fall back to [`DEFAULT_RATES`].

use serde::{Deserialize, Serialize};

/// Per-million-token USD rates for one model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelRates {
    /// USD per million input tokens.
    pub input_per_million: f64,
    /// USD per million output tokens.
    pub output_per_million: f64,
}

impl ModelRates {
    /// Creates a rate pair.
    pub const fn new(input_per_million: f64, output_per_million: f64) -> Self {
        Self {
            input_per_million,
            output_per_million,
        }
    }

    /// Computes the USD cost of one call at these rates.
    #[allow(clippy::cast_precision_loss)]
    pub fn cost(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        (input_tokens as f64 / 1_000_000.0) * self.input_per_million
            + (output_tokens as f64 / 1_000_000.0) * self.output_per_million
    }
}

/// Fallback rates applied when no catalog entry matches.
pub const DEFAULT_RATES: ModelRates = ModelRates::new(0.50, 0.50);

/// Built-in price list for the upstream provider's models.
///
/// Order is significant: [`PricingCatalog::resolve`] returns the first entry
/// whose normalized name matches, so more specific names must precede any
/// entry they could collide with.
const BUILTIN_PRICING: &[(&str, ModelRates)] = &[
    ("llama3-70b-8192", ModelRates::new(0.59, 0.79)),
    ("llama3-8b-8192", ModelRates::new(0.05, 0.08)),
    ("llama3.1-8b-instant", ModelRates::new(0.05, 0.08)),
    ("llama3.3-70b-versatile", ModelRates::new(0.59, 0.79)),
    ("qwen3-32b", ModelRates::new(0.29, 0.59)),
    ("gemma2-9b", ModelRates::new(0.20, 0.20)),
    ("gpt-oss-20b", ModelRates::new(0.10, 0.50)),
    ("gpt-oss-120b", ModelRates::new(0.15, 0.75)),
    ("kimi-k2-1t", ModelRates::new(1.00, 3.00)),
    ("llama4-scout", ModelRates::new(0.11, 0.34)),
    ("llama4-maverick", ModelRates::new(0.20, 0.60)),
    ("llama-guard-4", ModelRates::new(0.20, 0.20)),
    ("deepseek-r1", ModelRates::new(0.75, 0.99)),
    ("mistral-saba", ModelRates::new(0.79, 0.79)),
    ("llama-guard-3", ModelRates::new(0.20, 0.20)),
];

/// Normalizes a model identifier for matching.
///
/// Lowercases and strips hyphens/underscores, so `Llama3-70B-8192`,
/// `llama3_70b_8192`, and `LLAMA370B8192` all compare equal.
fn normalize(model: &str) -> String {
    model
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Ordered table resolving model identifiers to rate pairs.
#[derive(Debug, Clone)]
pub struct PricingCatalog {
    entries: Vec<(String, ModelRates)>,
}

impl PricingCatalog {
    /// Creates a catalog with the built-in price list.
    pub fn new() -> Self {
        Self::with_entries(
            BUILTIN_PRICING
                .iter()
                .map(|(name, rates)| ((*name).to_string(), *rates)),
        )
    }

    /// Creates a catalog from custom entries. Entry order is significant.
    pub fn with_entries(entries: impl IntoIterator<Item = (String, ModelRates)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Resolves a free-form model identifier to a rate pair.
    ///
    /// Both sides are normalized; the first entry whose normalized name
    /// contains, or is contained in, the normalized query wins. Falls back
    /// to [`DEFAULT_RATES`] when nothing matches. Total function.
    pub fn resolve(&self, model: &str) -> ModelRates {
        let query = normalize(model);

        for (name, rates) in &self.entries {
            let canonical = normalize(name);
            if canonical.contains(&query) || query.contains(&canonical) {
                return *rates;
            }
        }

        DEFAULT_RATES
    }

    /// Number of entries in the catalog.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PricingCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Llama3-70B-8192"), "llama370b8192");
        assert_eq!(normalize("llama3_70b_8192"), "llama370b8192");
        assert_eq!(normalize("LLAMA370B8192"), "llama370b8192");
    }

    #[test]
    fn test_resolve_normalized_variants_agree() {
        let catalog = PricingCatalog::new();
        let a = catalog.resolve("Llama3-70B-8192");
        let b = catalog.resolve("llama3_70b_8192");
        let c = catalog.resolve("LLAMA370B8192");

        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a, ModelRates::new(0.59, 0.79));
    }

    #[test]
    fn test_resolve_distinct_models() {
        let catalog = PricingCatalog::new();
        assert_eq!(
            catalog.resolve("llama3-8b-8192"),
            ModelRates::new(0.05, 0.08)
        );
        assert_eq!(catalog.resolve("deepseek-r1"), ModelRates::new(0.75, 0.99));
    }

    #[test]
    fn test_resolve_unknown_falls_back() {
        let catalog = PricingCatalog::new();
        assert_eq!(catalog.resolve("totally-unknown-model"), DEFAULT_RATES);
    }

    #[test]
    fn test_resolve_first_match_wins() {
        // Two entries that would both match; table order decides.
        let catalog = PricingCatalog::with_entries([
            ("model-x".to_string(), ModelRates::new(1.0, 1.0)),
            ("model-x-large".to_string(), ModelRates::new(2.0, 2.0)),
        ]);
        assert_eq!(catalog.resolve("model-x-large"), ModelRates::new(1.0, 1.0));
    }

    #[test]
    fn test_cost() {
        let rates = ModelRates::new(0.59, 0.79);
        let cost = rates.cost(1500, 800);
        assert!((cost - 0.001517).abs() < 1e-12);

        let rates = ModelRates::new(0.05, 0.08);
        let cost = rates.cost(800, 400);
        assert!((cost - 0.000072).abs() < 1e-12);
    }

    #[test]
    fn test_builtin_table_size() {
        let catalog = PricingCatalog::new();
        assert_eq!(catalog.len(), 15);
    }
}

//! Description similarity kernel.
//!
//! This module scores how likely two free-text item descriptions name the
//! same item:
//! - Token-set Jaccard (shared token overlap)
//! - Token-set cosine (normalized shared token count)
//!
//! The score is the mean of both measures, in [0, 1]. Scoring is pure and
//! deterministic; any scorer honoring the same contract can substitute.

use apmatch_core::{domain::Domain, kernel::KernelMetadata, traits::Kernel};
use std::collections::HashSet;

// ============================================================================
// Description Similarity Kernel
// ============================================================================

/// Description similarity kernel.
///
/// Compares descriptions case-insensitively, ignoring punctuation, whitespace
/// variance, and token order. Digit-group separators are absorbed, so
/// `"Ready Mix Concrete, 4,000 psi"` and `"4000 psi ready-mix concrete"`
/// score as the same item.
#[derive(Debug, Clone)]
pub struct DescriptionSimilarity {
    metadata: KernelMetadata,
}

impl DescriptionSimilarity {
    /// Create a new description similarity kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::batch(
                "procurement/description-similarity",
                Domain::Procurement,
            )
            .with_description("Token-set similarity between item descriptions")
            .with_throughput(1_000_000)
            .with_latency_us(1.0),
        }
    }

    /// Score two descriptions in [0, 1].
    ///
    /// 1.0 means the same item, 0.0 means unrelated. Symmetric in its
    /// arguments. Two blank descriptions count as identical.
    #[must_use]
    pub fn score(a: &str, b: &str) -> f64 {
        let tokens_a = Self::tokenize(a);
        let tokens_b = Self::tokenize(b);

        if tokens_a.is_empty() && tokens_b.is_empty() {
            return 1.0;
        }
        if tokens_a.is_empty() || tokens_b.is_empty() {
            return 0.0;
        }

        let intersection = tokens_a.intersection(&tokens_b).count();
        let union = tokens_a.len() + tokens_b.len() - intersection;

        let jaccard = intersection as f64 / union as f64;
        let cosine = intersection as f64 / (tokens_a.len() as f64 * tokens_b.len() as f64).sqrt();

        (jaccard + cosine) / 2.0
    }

    /// Normalize a description into its token set.
    ///
    /// Lowercases and splits on non-alphanumeric characters, except that a
    /// `,` or `.` with digits on both sides is a digit-group separator and
    /// joins them (`4,000` tokenizes as `4000`).
    fn tokenize(text: &str) -> HashSet<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut tokens = HashSet::new();
        let mut current = String::new();

        for (i, &c) in chars.iter().enumerate() {
            if c.is_alphanumeric() {
                for lower in c.to_lowercase() {
                    current.push(lower);
                }
            } else if (c == ',' || c == '.')
                && i > 0
                && chars[i - 1].is_ascii_digit()
                && chars.get(i + 1).is_some_and(char::is_ascii_digit)
            {
                // Digit-group separator: absorbed, no token boundary.
            } else if !current.is_empty() {
                tokens.insert(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            tokens.insert(current);
        }

        tokens
    }
}

impl Default for DescriptionSimilarity {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for DescriptionSimilarity {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

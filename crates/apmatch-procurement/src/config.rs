//! Matching configuration.

use apmatch_core::error::{KernelError, Result};
use serde::{Deserialize, Serialize};

/// Default description similarity acceptance threshold.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.80;

/// Default relative tolerance for unit price and line amount checks.
pub const DEFAULT_PRICE_TOLERANCE: f64 = 0.05;

/// Default maximum number of GR lines in a consolidated match.
pub const DEFAULT_MAX_SUBSET_SIZE: usize = 5;

/// Default GR candidate-set size above which the subset search switches from
/// plain enumeration to branch-and-bound.
pub const DEFAULT_MAX_GR_CANDIDATES: usize = 20;

/// Default cap on evaluated subset combinations per invoice line.
pub const DEFAULT_ENUMERATION_CAP: u64 = 200_000;

/// Matching configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Similarity acceptance threshold in (0, 1]. Descriptions scoring below
    /// this are not the same item.
    pub similarity_threshold: f64,
    /// Relative tolerance for unit price and line amount comparisons.
    pub price_tolerance: f64,
    /// Maximum subset size for consolidated GR matches.
    pub max_subset_size: usize,
    /// GR candidate-set size above which branch-and-bound pruning kicks in.
    pub max_gr_candidates: usize,
    /// Hard cap on subset combinations evaluated per invoice line. Exceeding
    /// it fails the GR stage closed rather than searching unbounded.
    pub enumeration_cap: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            price_tolerance: DEFAULT_PRICE_TOLERANCE,
            max_subset_size: DEFAULT_MAX_SUBSET_SIZE,
            max_gr_candidates: DEFAULT_MAX_GR_CANDIDATES,
            enumeration_cap: DEFAULT_ENUMERATION_CAP,
        }
    }
}

impl MatchConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for out-of-range values. Engines reject invalid
    /// configuration at construction, not per call.
    pub fn validate(&self) -> Result<()> {
        if !self.similarity_threshold.is_finite()
            || self.similarity_threshold <= 0.0
            || self.similarity_threshold > 1.0
        {
            return Err(KernelError::config(format!(
                "similarity_threshold must be in (0, 1], got {}",
                self.similarity_threshold
            )));
        }
        if !self.price_tolerance.is_finite() || self.price_tolerance <= 0.0 {
            return Err(KernelError::config(format!(
                "price_tolerance must be positive, got {}",
                self.price_tolerance
            )));
        }
        if self.max_subset_size == 0 {
            return Err(KernelError::config("max_subset_size must be at least 1"));
        }
        if self.max_gr_candidates == 0 {
            return Err(KernelError::config("max_gr_candidates must be at least 1"));
        }
        if self.enumeration_cap == 0 {
            return Err(KernelError::config("enumeration_cap must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(MatchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_similarity_threshold() {
        for bad in [0.0, -0.1, 1.01, f64::NAN] {
            let config = MatchConfig {
                similarity_threshold: bad,
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(KernelError::ConfigError(_))),
                "threshold {bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_nonpositive_tolerance() {
        let config = MatchConfig {
            price_tolerance: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(KernelError::ConfigError(_))));
    }

    #[test]
    fn test_rejects_zero_bounds() {
        let config = MatchConfig {
            max_subset_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = MatchConfig {
            max_gr_candidates: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = MatchConfig {
            enumeration_cap: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

//! Domain definitions for kernel categorization.
//!
//! Kernels are organized into domains representing different business areas.
//! Domains are used for:
//! - Kernel discovery and organization
//! - Registry statistics and filtering

use serde::{Deserialize, Serialize};
use std::fmt;

/// Business domain for kernel categorization.
///
/// Each domain represents a distinct area of functionality. The matching
/// library currently ships procurement kernels plus core infrastructure
/// validation kernels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Domain {
    /// Procurement: invoice/PO/GR reconciliation and 3-way matching
    Procurement,

    /// Core: test kernels and infrastructure validation
    Core,
}

impl Domain {
    /// All available domains.
    pub const ALL: &'static [Domain] = &[Domain::Procurement, Domain::Core];

    /// Returns the domain name as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Domain::Procurement => "Procurement",
            Domain::Core => "Core",
        }
    }

    /// Parse a domain from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Procurement" => Some(Domain::Procurement),
            "Core" => Some(Domain::Core),
            _ => None,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_all_count() {
        assert_eq!(Domain::ALL.len(), 2);
    }

    #[test]
    fn test_domain_parse() {
        assert_eq!(Domain::parse("Procurement"), Some(Domain::Procurement));
        assert_eq!(Domain::parse("Core"), Some(Domain::Core));
        assert_eq!(Domain::parse("Unknown"), None);
    }

    #[test]
    fn test_domain_display() {
        assert_eq!(Domain::Procurement.to_string(), "Procurement");
        assert_eq!(Domain::Core.to_string(), "Core");
    }
}

//! # ApMatch Procurement
//!
//! Deterministic 3-way procurement matching kernels.
//!
//! ## Kernels
//! - `DescriptionSimilarity` - Item description scoring
//! - `PoLineMatching` - Invoice to PO line association
//! - `GrConsolidation` - Invoice quantity reconciliation against goods receipts
//! - `ThreeWayMatch` - Full invoice / PO / GR orchestration
//!
//! The engine is a pure library: no network, filesystem, or environment
//! dependency. Each run is stateless; the documented limitation is that GR
//! consumption is not tracked across invoice lines within a batch.

#![warn(missing_docs)]

pub mod config;
pub mod gr_resolve;
pub mod po_match;
pub mod similarity;
pub mod threeway;
pub mod tolerance;
pub mod types;
pub mod validation;

pub use config::MatchConfig;
pub use gr_resolve::{GrConsolidation, GrDecision};
pub use po_match::{PoDecision, PoLineMatching};
pub use similarity::DescriptionSimilarity;
pub use threeway::ThreeWayMatch;
pub use types::{
    GoodsReceiptLine, GrMatchOutcome, InvoiceLine, MatchOutput, MatchResult, MatchStats,
    PoMatchOutcome, PurchaseOrderLine, ThreeWayMatchInput,
};
pub use validation::{validate_batches, InputValidationError};

/// Register all procurement kernels.
pub fn register_all(
    registry: &apmatch_core::registry::KernelRegistry,
) -> apmatch_core::error::Result<()> {
    use apmatch_core::traits::Kernel;

    tracing::info!("Registering procurement kernels");

    // Similarity kernel (1)
    registry.register_metadata(similarity::DescriptionSimilarity::new().metadata().clone())?;

    // PO matching kernel (1)
    registry.register_metadata(po_match::PoLineMatching::new().metadata().clone())?;

    // GR consolidation kernel (1)
    registry.register_metadata(gr_resolve::GrConsolidation::new().metadata().clone())?;

    // Orchestrator kernel (1)
    registry.register_metadata(threeway::ThreeWayMatch::new().metadata().clone())?;

    tracing::info!("Registered 4 procurement kernels");
    Ok(())
}

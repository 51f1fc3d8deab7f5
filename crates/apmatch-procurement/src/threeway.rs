//! 3-way match orchestrator kernel.
//!
//! This module drives the full reconciliation for a batch:
//! - Input batch validation
//! - PO matching per invoice line
//! - GR consolidation for PO-matched lines
//! - Ordered result assembly with batch statistics

use crate::config::MatchConfig;
use crate::gr_resolve::{GrConsolidation, GrDecision};
use crate::po_match::{PoDecision, PoLineMatching};
use crate::types::{
    GoodsReceiptLine, GrMatchOutcome, InvoiceLine, MatchOutput, MatchResult, MatchStats,
    PoMatchOutcome, PurchaseOrderLine, ThreeWayMatchInput,
};
use crate::validation::validate_batches;
use apmatch_core::error::{KernelError, Result};
use apmatch_core::{domain::Domain, kernel::KernelMetadata, traits::{BatchKernel, Kernel}};
use async_trait::async_trait;

// ============================================================================
// Three-Way Match Kernel
// ============================================================================

/// 3-way match orchestrator kernel.
///
/// Stateless between invocations: each run re-evaluates every invoice line
/// against the full PO and unconsumed GR sets, in input order. Result order
/// always matches invoice input order.
#[derive(Debug, Clone)]
pub struct ThreeWayMatch {
    metadata: KernelMetadata,
    config: MatchConfig,
}

impl Default for ThreeWayMatch {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreeWayMatch {
    /// Create a new 3-way match kernel with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MatchConfig::default()).expect("default config is valid")
    }

    /// Create a new 3-way match kernel with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an invalid configuration; the failure is
    /// fatal to this instance, not per call.
    pub fn with_config(config: MatchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            metadata: KernelMetadata::batch("procurement/three-way-match", Domain::Procurement)
                .with_description("Invoice / PO / GR 3-way match")
                .with_throughput(10_000)
                .with_latency_us(500.0),
            config,
        })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Reconcile a batch of invoice lines against PO and GR sets.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` naming the first offending record when an
    /// input batch fails validation; no partial results are produced.
    pub fn reconcile(
        &self,
        invoice_lines: &[InvoiceLine],
        po_lines: &[PurchaseOrderLine],
        gr_lines: &[GoodsReceiptLine],
    ) -> Result<MatchOutput> {
        let violations = validate_batches(invoice_lines, po_lines, gr_lines);
        if let Some(first) = violations.first() {
            return Err(KernelError::validation(format!(
                "{} ({} invalid records total)",
                first,
                violations.len()
            )));
        }

        let mut matches = Vec::with_capacity(invoice_lines.len());
        let mut stats = MatchStats {
            total_lines: invoice_lines.len(),
            ..Default::default()
        };

        for invoice in invoice_lines {
            let result = self.match_line(invoice, po_lines, gr_lines);

            if result.po_outcome == PoMatchOutcome::Matched {
                stats.po_matched += 1;
            }
            match result.gr_outcome {
                Some(GrMatchOutcome::Exact) => stats.gr_exact += 1,
                Some(GrMatchOutcome::Consolidated) => stats.gr_consolidated += 1,
                Some(GrMatchOutcome::Unmatched) => stats.gr_unmatched += 1,
                None => {}
            }

            matches.push(result);
        }

        let reconciled = stats.gr_exact + stats.gr_consolidated;
        stats.reconciliation_rate = if stats.total_lines > 0 {
            reconciled as f64 / stats.total_lines as f64
        } else {
            0.0
        };

        tracing::debug!(
            total = stats.total_lines,
            po_matched = stats.po_matched,
            reconciled,
            "3-way match batch complete"
        );

        Ok(MatchOutput { matches, stats })
    }

    /// Match a single invoice line through both stages.
    fn match_line(
        &self,
        invoice: &InvoiceLine,
        po_lines: &[PurchaseOrderLine],
        gr_lines: &[GoodsReceiptLine],
    ) -> MatchResult {
        match PoLineMatching::match_invoice_line(invoice, po_lines, &self.config) {
            PoDecision::Unmatched { reason } => MatchResult {
                invoice_line_id: invoice.id.clone(),
                po_outcome: PoMatchOutcome::Unmatched,
                matched_po: None,
                po_similarity: None,
                po_failure_reason: Some(reason),
                gr_outcome: None,
                matched_grs: Vec::new(),
                gr_failure_reason: None,
            },
            PoDecision::Matched { line, similarity } => {
                let (gr_outcome, matched_grs, gr_failure_reason) =
                    match GrConsolidation::resolve(invoice, &line, gr_lines, &self.config) {
                        GrDecision::Exact { line } => (GrMatchOutcome::Exact, vec![line], None),
                        GrDecision::Consolidated { lines } => {
                            (GrMatchOutcome::Consolidated, lines, None)
                        }
                        GrDecision::Unmatched { reason } => {
                            (GrMatchOutcome::Unmatched, Vec::new(), Some(reason))
                        }
                    };

                MatchResult {
                    invoice_line_id: invoice.id.clone(),
                    po_outcome: PoMatchOutcome::Matched,
                    matched_po: Some(line),
                    po_similarity: Some(similarity),
                    po_failure_reason: None,
                    gr_outcome: Some(gr_outcome),
                    matched_grs,
                    gr_failure_reason,
                }
            }
        }
    }
}

impl Kernel for ThreeWayMatch {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }

    fn validate(&self) -> Result<()> {
        self.config.validate()
    }
}

#[async_trait]
impl BatchKernel<ThreeWayMatchInput, MatchOutput> for ThreeWayMatch {
    async fn execute(&self, input: ThreeWayMatchInput) -> Result<MatchOutput> {
        self.validate_input(&input)?;
        self.reconcile(&input.invoice_lines, &input.po_lines, &input.gr_lines)
    }

    fn validate_input(&self, input: &ThreeWayMatchInput) -> Result<()> {
        let violations =
            validate_batches(&input.invoice_lines, &input.po_lines, &input.gr_lines);
        match violations.first() {
            Some(first) => Err(KernelError::validation(first.to_string())),
            None => Ok(()),
        }
    }
}

//! Invoice to PO line matching kernel.
//!
//! This module selects the PO line an invoice line bills against:
//! - Unit-of-measure candidate filter
//! - Unit price and line amount tolerance filter
//! - Description similarity filter
//! - Deterministic best-candidate selection with a tie-break cascade

use crate::config::MatchConfig;
use crate::similarity::DescriptionSimilarity;
use crate::tolerance::{relative_deviation, within_tolerance};
use crate::types::{InvoiceLine, PurchaseOrderLine};
use apmatch_core::{domain::Domain, kernel::KernelMetadata, traits::Kernel};

// ============================================================================
// PO Line Matching Kernel
// ============================================================================

/// Decision of the PO matching stage for one invoice line.
#[derive(Debug, Clone)]
pub enum PoDecision {
    /// The invoice line bills against this PO line.
    Matched {
        /// The selected PO line.
        line: PurchaseOrderLine,
        /// Description similarity of the accepted match.
        similarity: f64,
    },
    /// No PO line passed every criterion.
    Unmatched {
        /// The first failing criterion, in filter priority order.
        reason: String,
    },
}

/// PO line matching kernel.
///
/// Pure function of its inputs; multiple invoice lines may select the same
/// PO line within a run (no cross-invoice consumption accounting).
#[derive(Debug, Clone)]
pub struct PoLineMatching {
    metadata: KernelMetadata,
}

impl Default for PoLineMatching {
    fn default() -> Self {
        Self::new()
    }
}

impl PoLineMatching {
    /// Create a new PO line matching kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::batch("procurement/po-line-matching", Domain::Procurement)
                .with_description("Invoice line to PO line association")
                .with_throughput(100_000)
                .with_latency_us(20.0),
        }
    }

    /// Match one invoice line against the PO line set.
    ///
    /// Filter stages apply in priority order (unit of measure, then price and
    /// amount tolerance, then description similarity); an unmatched decision
    /// reports the first stage that eliminated every candidate.
    #[must_use]
    pub fn match_invoice_line(
        invoice: &InvoiceLine,
        po_lines: &[PurchaseOrderLine],
        config: &MatchConfig,
    ) -> PoDecision {
        // Stage 1: unit of measure, uppercase-normalized.
        let invoice_uom = invoice.uom.to_uppercase();
        let uom_candidates: Vec<&PurchaseOrderLine> = po_lines
            .iter()
            .filter(|po| po.uom.to_uppercase() == invoice_uom)
            .collect();
        if uom_candidates.is_empty() {
            return PoDecision::Unmatched {
                reason: format!(
                    "No PO line with matching unit of measure {}",
                    invoice.uom
                ),
            };
        }

        // Stage 2: unit price and line amount inside the tolerance band.
        let priced_candidates: Vec<&PurchaseOrderLine> = uom_candidates
            .into_iter()
            .filter(|po| {
                within_tolerance(invoice.unit_price, po.unit_price, config.price_tolerance)
                    && within_tolerance(invoice.amount, po.line_amount, config.price_tolerance)
            })
            .collect();
        if priced_candidates.is_empty() {
            return PoDecision::Unmatched {
                reason: "No PO line within unit price and line amount tolerance".to_string(),
            };
        }

        // Stage 3: description similarity at or above the threshold.
        let scored: Vec<(&PurchaseOrderLine, f64)> = priced_candidates
            .into_iter()
            .map(|po| {
                (
                    po,
                    DescriptionSimilarity::score(&invoice.description, &po.description),
                )
            })
            .filter(|(_, score)| *score >= config.similarity_threshold)
            .collect();
        if scored.is_empty() {
            return PoDecision::Unmatched {
                reason: "No PO line description met the similarity threshold".to_string(),
            };
        }

        // Selection: highest similarity, then smallest unit-price deviation,
        // then lowest PO number, then lowest position.
        let mut best: Option<(&PurchaseOrderLine, f64)> = None;
        for (po, score) in scored {
            match best {
                None => best = Some((po, score)),
                Some((current, current_score)) => {
                    if Self::prefer(invoice, (po, score), (current, current_score)) {
                        best = Some((po, score));
                    }
                }
            }
        }

        let (line, similarity) = best.expect("non-empty candidate set");
        PoDecision::Matched {
            line: line.clone(),
            similarity,
        }
    }

    /// Returns true if `challenger` beats `incumbent` in the tie-break
    /// cascade.
    fn prefer(
        invoice: &InvoiceLine,
        challenger: (&PurchaseOrderLine, f64),
        incumbent: (&PurchaseOrderLine, f64),
    ) -> bool {
        let (cand, cand_score) = challenger;
        let (cur, cur_score) = incumbent;

        if cand_score != cur_score {
            return cand_score > cur_score;
        }

        let cand_dev = relative_deviation(invoice.unit_price, cand.unit_price);
        let cur_dev = relative_deviation(invoice.unit_price, cur.unit_price);
        if cand_dev != cur_dev {
            return cand_dev < cur_dev;
        }

        if cand.po_number != cur.po_number {
            return cand.po_number < cur.po_number;
        }

        cand.position < cur.position
    }
}

impl Kernel for PoLineMatching {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_invoice() -> InvoiceLine {
        InvoiceLine {
            id: "INV1001".to_string(),
            description: "Ready Mix Concrete, 4,000 psi".to_string(),
            quantity: 100.0,
            uom: "YRD".to_string(),
            unit_price: 85.0,
            amount: 8500.0,
        }
    }

    fn test_po(po_number: &str, position: &str) -> PurchaseOrderLine {
        PurchaseOrderLine {
            position: position.to_string(),
            po_number: po_number.to_string(),
            description: "4000 psi ready-mix concrete".to_string(),
            ordered_quantity: 100.0,
            uom: "YRD".to_string(),
            unit_price: 85.0,
            line_amount: 8500.0,
        }
    }

    #[test]
    fn test_single_candidate_matches() {
        let invoice = test_invoice();
        let po_lines = vec![test_po("PO4001", "10")];

        let decision =
            PoLineMatching::match_invoice_line(&invoice, &po_lines, &MatchConfig::default());
        match decision {
            PoDecision::Matched { line, similarity } => {
                assert_eq!(line.po_number, "PO4001");
                assert!(similarity >= 0.80);
            }
            PoDecision::Unmatched { reason } => panic!("expected match, got: {reason}"),
        }
    }

    #[test]
    fn test_uom_mismatch_reason() {
        let invoice = test_invoice();
        let mut po = test_po("PO4001", "10");
        po.uom = "TON".to_string();

        let decision =
            PoLineMatching::match_invoice_line(&invoice, &[po], &MatchConfig::default());
        match decision {
            PoDecision::Unmatched { reason } => assert!(reason.contains("unit of measure")),
            PoDecision::Matched { .. } => panic!("expected UOM failure"),
        }
    }

    #[test]
    fn test_uom_comparison_is_case_insensitive() {
        let invoice = test_invoice();
        let mut po = test_po("PO4001", "10");
        po.uom = "yrd".to_string();

        let decision =
            PoLineMatching::match_invoice_line(&invoice, &[po], &MatchConfig::default());
        assert!(matches!(decision, PoDecision::Matched { .. }));
    }

    #[test]
    fn test_price_tolerance_reason_beats_similarity() {
        // Price outside tolerance AND unrelated description: the earlier
        // filter stage names the failure.
        let invoice = test_invoice();
        let mut po = test_po("PO4001", "10");
        po.unit_price = 120.0;
        po.description = "LED Streetlight Fixture 150W".to_string();

        let decision =
            PoLineMatching::match_invoice_line(&invoice, &[po], &MatchConfig::default());
        match decision {
            PoDecision::Unmatched { reason } => assert!(reason.contains("tolerance")),
            PoDecision::Matched { .. } => panic!("expected tolerance failure"),
        }
    }

    #[test]
    fn test_amount_tolerance_checked() {
        let invoice = test_invoice();
        let mut po = test_po("PO4001", "10");
        po.line_amount = 10_000.0;

        let decision =
            PoLineMatching::match_invoice_line(&invoice, &[po], &MatchConfig::default());
        match decision {
            PoDecision::Unmatched { reason } => assert!(reason.contains("tolerance")),
            PoDecision::Matched { .. } => panic!("expected amount failure"),
        }
    }

    #[test]
    fn test_similarity_reason() {
        let invoice = test_invoice();
        let mut po = test_po("PO4001", "10");
        po.description = "LED Streetlight Fixture 150W".to_string();

        let decision =
            PoLineMatching::match_invoice_line(&invoice, &[po], &MatchConfig::default());
        match decision {
            PoDecision::Unmatched { reason } => assert!(reason.contains("similarity")),
            PoDecision::Matched { .. } => panic!("expected similarity failure"),
        }
    }

    #[test]
    fn test_highest_similarity_wins() {
        let invoice = test_invoice();
        let close = test_po("PO9000", "10");
        let mut weaker = test_po("PO1000", "10");
        weaker.description = "Ready mix concrete, 4,000 psi batch".to_string();

        let decision = PoLineMatching::match_invoice_line(
            &invoice,
            &[weaker, close],
            &MatchConfig::default(),
        );
        match decision {
            PoDecision::Matched { line, .. } => assert_eq!(line.po_number, "PO9000"),
            PoDecision::Unmatched { reason } => panic!("expected match, got: {reason}"),
        }
    }

    #[test]
    fn test_price_deviation_tie_break() {
        let invoice = test_invoice();
        let exact_price = test_po("PO9000", "10");
        let mut off_price = test_po("PO1000", "10");
        off_price.unit_price = 87.0;
        off_price.line_amount = 8700.0;

        let decision = PoLineMatching::match_invoice_line(
            &invoice,
            &[off_price, exact_price],
            &MatchConfig::default(),
        );
        match decision {
            PoDecision::Matched { line, .. } => assert_eq!(line.po_number, "PO9000"),
            PoDecision::Unmatched { reason } => panic!("expected match, got: {reason}"),
        }
    }

    #[test]
    fn test_po_number_tie_break() {
        let invoice = test_invoice();
        let a = test_po("PO2000", "10");
        let b = test_po("PO1000", "10");

        let decision = PoLineMatching::match_invoice_line(
            &invoice,
            &[a, b],
            &MatchConfig::default(),
        );
        match decision {
            PoDecision::Matched { line, .. } => assert_eq!(line.po_number, "PO1000"),
            PoDecision::Unmatched { reason } => panic!("expected match, got: {reason}"),
        }
    }

    #[test]
    fn test_selection_is_order_independent() {
        let invoice = test_invoice();
        let mut po_lines = vec![
            test_po("PO3000", "20"),
            test_po("PO1000", "10"),
            test_po("PO2000", "30"),
        ];

        let forward =
            PoLineMatching::match_invoice_line(&invoice, &po_lines, &MatchConfig::default());
        po_lines.reverse();
        let reversed =
            PoLineMatching::match_invoice_line(&invoice, &po_lines, &MatchConfig::default());

        match (forward, reversed) {
            (
                PoDecision::Matched { line: a, .. },
                PoDecision::Matched { line: b, .. },
            ) => {
                assert_eq!(a.po_number, "PO1000");
                assert_eq!(a, b);
            }
            _ => panic!("expected matches in both orders"),
        }
    }
}
